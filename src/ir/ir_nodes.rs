//! ============================================================
//!                         Target IR Nodes
//! ============================================================
//! The language-agnostic tree the translator produces.
//!
//! The shape is deliberately small: a namespace of type declarations whose
//! members hold statement lists built from a handful of statement and
//! expression primitives. Everything PHP-specific has already been
//! rewritten away by the time a node lands here — the external emitter
//! renders this tree into concrete output (text, bytecode, or live
//! designer objects) without knowing anything about PHP.
//!
//! Construction is append-only: once a statement is added to a container
//! it is never removed, only preceded by later hoisted insertions.
//!
//! The whole tree derives Serialize so design-time tooling can export a
//! lowered unit; see [`IrNamespace::to_pretty_json`].

use crate::source_ast::locations::TextLocation;
use serde::Serialize;

// ============================================================
// Type references
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrTypeRef {
    /// Fully resolved dotted name (`System.Int32`).
    Named(String),
    Array(Box<IrTypeRef>),
}

impl IrTypeRef {
    pub fn named(name: impl Into<String>) -> IrTypeRef {
        IrTypeRef::Named(name.into())
    }

    pub fn array_of(element: IrTypeRef) -> IrTypeRef {
        IrTypeRef::Array(Box::new(element))
    }

    pub fn object() -> IrTypeRef {
        IrTypeRef::Named(crate::settings::GENERIC_OBJECT_TYPE.to_string())
    }

    pub fn display_name(&self) -> String {
        match self {
            IrTypeRef::Named(name) => name.clone(),
            IrTypeRef::Array(element) => format!("{}[]", element.display_name()),
        }
    }
}

// ============================================================
// Namespace and type declarations
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrNamespace {
    pub name: Option<String>,
    pub imports: Vec<String>,
    pub types: Vec<IrTypeDecl>,
}

impl IrNamespace {
    /// Export for design-time tooling. The translator itself never reads
    /// this back.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrTypeDecl {
    pub name: String,
    pub base_types: Vec<IrTypeRef>,
    pub attributes: Vec<IrAttribute>,
    pub members: Vec<IrMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrAttribute {
    pub name: String,
    pub args: Vec<IrExpr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrVisibility {
    Public,
    /// Visible to the type and derived types (protected).
    Family,
    Private,
}

// ============================================================
// Members
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrMember {
    Field(IrField),
    Property(IrProperty),
    Constant(IrConstant),
    Method(IrMethod),
    Constructor(IrConstructor),
}

impl IrMember {
    pub fn name(&self) -> &str {
        match self {
            IrMember::Field(f) => &f.name,
            IrMember::Property(p) => &p.name,
            IrMember::Constant(c) => &c.name,
            IrMember::Method(m) => &m.name,
            IrMember::Constructor(_) => ".ctor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrField {
    pub name: String,
    pub ty: IrTypeRef,
    pub visibility: IrVisibility,
    pub is_static: bool,
    pub initializer: Option<IrExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrProperty {
    pub name: String,
    pub ty: IrTypeRef,
    pub visibility: IrVisibility,
    pub is_static: bool,
    pub getter: Vec<IrStmt>,
    pub setter: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrConstant {
    pub name: String,
    pub visibility: IrVisibility,
    pub value: IrExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrMethod {
    pub name: String,
    pub visibility: IrVisibility,
    pub is_static: bool,
    pub params: Vec<IrParam>,
    /// None means no value is ever returned.
    pub return_type: Option<IrTypeRef>,
    pub attributes: Vec<IrAttribute>,
    pub body: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrConstructor {
    pub visibility: IrVisibility,
    pub params: Vec<IrParam>,
    pub body: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrParam {
    pub name: String,
    pub ty: IrTypeRef,
    pub by_ref: bool,
}

// ============================================================
// Statements
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrStmt {
    pub kind: IrStmtKind,
    pub location: TextLocation,
}

impl IrStmt {
    pub fn new(kind: IrStmtKind, location: TextLocation) -> IrStmt {
        IrStmt { kind, location }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrCatchClause {
    pub exception_type: IrTypeRef,
    pub variable: String,
    pub body: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrStmtKind {
    Block(Vec<IrStmt>),
    If {
        condition: IrExpr,
        then_branch: Vec<IrStmt>,
        else_branch: Vec<IrStmt>,
    },
    /// The single iteration primitive. `init` and `step` each hold at
    /// most one statement; anything else a source loop needs is placed
    /// around the header or inside the body by the lowering.
    Iteration {
        init: Option<Box<IrStmt>>,
        test: Option<IrExpr>,
        step: Option<Box<IrStmt>>,
        body: Vec<IrStmt>,
    },
    Labeled {
        label: String,
        statement: Option<Box<IrStmt>>,
    },
    Goto {
        label: String,
    },
    Return(Option<IrExpr>),
    Throw(IrExpr),
    TryCatch {
        body: Vec<IrStmt>,
        catches: Vec<IrCatchClause>,
    },
    Assign {
        target: IrExpr,
        value: IrExpr,
    },
    Expression(IrExpr),
    VariableDeclaration {
        name: String,
        ty: IrTypeRef,
        initializer: Option<IrExpr>,
    },
    AttachEvent {
        target: IrExpr,
        event: String,
        handler: IrExpr,
    },
    DetachEvent {
        target: IrExpr,
        event: String,
        handler: IrExpr,
    },
}

// ============================================================
// Expressions
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrExpr {
    pub kind: IrExprKind,
    pub location: TextLocation,
}

impl IrExpr {
    pub fn new(kind: IrExprKind, location: TextLocation) -> IrExpr {
        IrExpr { kind, location }
    }

    pub fn primitive(literal: IrLiteral, location: TextLocation) -> IrExpr {
        IrExpr::new(IrExprKind::Primitive(literal), location)
    }

    pub fn null(location: TextLocation) -> IrExpr {
        IrExpr::primitive(IrLiteral::Null, location)
    }

    pub fn bool_value(value: bool, location: TextLocation) -> IrExpr {
        IrExpr::primitive(IrLiteral::Bool(value), location)
    }

    pub fn int_value(value: i64, location: TextLocation) -> IrExpr {
        IrExpr::primitive(IrLiteral::Int(value), location)
    }

    pub fn str_value(value: impl Into<String>, location: TextLocation) -> IrExpr {
        IrExpr::primitive(IrLiteral::Str(value.into()), location)
    }

    pub fn variable(name: impl Into<String>, location: TextLocation) -> IrExpr {
        IrExpr::new(IrExprKind::VariableRef(name.into()), location)
    }

    pub fn type_ref(ty: IrTypeRef, location: TextLocation) -> IrExpr {
        IrExpr::new(IrExprKind::TypeRef(ty), location)
    }

    pub fn binary(op: IrBinaryOp, left: IrExpr, right: IrExpr, location: TextLocation) -> IrExpr {
        IrExpr::new(
            IrExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn method_call(
        target: IrExpr,
        method: impl Into<String>,
        args: Vec<IrExpr>,
        location: TextLocation,
    ) -> IrExpr {
        IrExpr::new(
            IrExprKind::MethodCall {
                target: Box::new(target),
                method: method.into(),
                args,
            },
            location,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrLiteral {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Concatenate,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    BooleanAnd,
    BooleanOr,
    ValueEquality,
    ValueInequality,
    IdentityEquality,
    IdentityInequality,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrUnaryOp {
    Negate,
    Not,
    BitwiseNot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrExprKind {
    Binary {
        op: IrBinaryOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    Unary {
        op: IrUnaryOp,
        operand: Box<IrExpr>,
    },
    MethodCall {
        target: Box<IrExpr>,
        method: String,
        args: Vec<IrExpr>,
    },
    FieldRef {
        target: Box<IrExpr>,
        name: String,
    },
    PropertyRef {
        target: Box<IrExpr>,
        name: String,
    },
    VariableRef(String),
    ThisRef,
    /// A type used in expression position (static member targets).
    TypeRef(IrTypeRef),
    Primitive(IrLiteral),
    ObjectCreate {
        ty: IrTypeRef,
        args: Vec<IrExpr>,
    },
    ArrayCreate {
        element_type: IrTypeRef,
        initializers: Vec<IrExpr>,
    },
    ArrayIndex {
        target: Box<IrExpr>,
        index: Box<IrExpr>,
    },
    Cast {
        ty: IrTypeRef,
        expr: Box<IrExpr>,
    },
    TypeOf(IrTypeRef),
    DelegateCreate {
        delegate_type: IrTypeRef,
        target: Box<IrExpr>,
        method_name: String,
    },
}
