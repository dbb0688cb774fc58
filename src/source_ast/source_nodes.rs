//! ============================================================
//!                       Source AST Nodes
//! ============================================================
//! The parsed PHP program as handed over by the external parser.
//!
//! The translator consumes this tree read-only: nothing here is ever
//! mutated, and no node owns anything outside its own subtree. Every
//! statement and expression shape the lowering tables know about has its
//! own variant, so the lowering code can match exhaustively and a new
//! variant cannot be silently skipped.
//!
//! Constructs the translator refuses (eval, include, reference
//! assignment, ...) still have variants: the parser may produce them, and
//! the lowering turns them into UnsupportedConstruct errors with their
//! source position attached.

use crate::source_ast::locations::TextLocation;
use serde::Serialize;
use std::fmt;

// ============================================================
// Names
// ============================================================

/// A possibly namespace-qualified PHP name (`Foo`, `A\B\Foo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedName {
    pub parts: Vec<String>,
}

impl QualifiedName {
    pub fn single(name: impl Into<String>) -> QualifiedName {
        QualifiedName {
            parts: vec![name.into()],
        }
    }

    /// Parses a backslash-separated PHP name.
    pub fn from_php(name: &str) -> QualifiedName {
        QualifiedName {
            parts: name
                .split('\\')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    pub fn short_name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// The dot-separated spelling used on the IR side.
    pub fn to_dotted(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("\\"))
    }
}

// ============================================================
// Program and declarations
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceProgram {
    /// Display name of the translation unit, used for `__FILE__`.
    pub source_name: Option<String>,
    pub namespace: Option<QualifiedName>,
    pub types: Vec<SourceClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceClass {
    pub name: String,
    pub base: Option<QualifiedName>,
    pub interfaces: Vec<QualifiedName>,
    pub attributes: Vec<SourceAttribute>,
    pub members: Vec<SourceMember>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAttribute {
    pub name: QualifiedName,
    pub args: Vec<SourceExpr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceMember {
    Field(SourceField),
    Constant(SourceConstant),
    Method(SourceMethod),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceField {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub initializer: Option<SourceExpr>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceConstant {
    pub name: String,
    pub value: SourceExpr,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMethod {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: Vec<SourceParam>,
    pub attributes: Vec<SourceAttribute>,
    pub body: Vec<SourceStmt>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceParam {
    pub name: String,
    pub type_hint: Option<QualifiedName>,
    pub by_ref: bool,
    pub default: Option<SourceExpr>,
    pub location: TextLocation,
}

// ============================================================
// Statements
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStmt {
    pub kind: SourceStmtKind,
    pub location: TextLocation,
}

impl SourceStmt {
    pub fn new(kind: SourceStmtKind, location: TextLocation) -> SourceStmt {
        SourceStmt { kind, location }
    }
}

/// One clause of a flat `if`/`elseif`/`else` list.
/// `condition` is None for the `else` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfClause {
    pub condition: Option<SourceExpr>,
    pub body: Vec<SourceStmt>,
    pub location: TextLocation,
}

/// `test` is None for the `default` case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub test: Option<SourceExpr>,
    pub body: Vec<SourceStmt>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub class: QualifiedName,
    pub variable: String,
    pub body: Vec<SourceStmt>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticVar {
    pub name: String,
    pub initializer: Option<SourceExpr>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceStmtKind {
    Block(Vec<SourceStmt>),
    Expression(SourceExpr),
    Echo(Vec<SourceExpr>),
    If {
        clauses: Vec<IfClause>,
    },
    While {
        condition: SourceExpr,
        body: Vec<SourceStmt>,
    },
    DoWhile {
        body: Vec<SourceStmt>,
        condition: SourceExpr,
    },
    /// `for` keeps its comma-separated init/condition/step groups; the
    /// lowering decides which item lands in the native header slot.
    For {
        init: Vec<SourceExpr>,
        condition: Vec<SourceExpr>,
        step: Vec<SourceExpr>,
        body: Vec<SourceStmt>,
    },
    Foreach {
        array: SourceExpr,
        key: Option<SourceExpr>,
        value: SourceExpr,
        body: Vec<SourceStmt>,
    },
    Switch {
        subject: SourceExpr,
        cases: Vec<SwitchCase>,
    },
    Break {
        levels: u32,
    },
    Continue {
        levels: u32,
    },
    Return(Option<SourceExpr>),
    Throw(SourceExpr),
    Try {
        body: Vec<SourceStmt>,
        catches: Vec<CatchClause>,
    },
    Goto(String),
    Label(String),
    StaticDecl(Vec<StaticVar>),
    Unset(Vec<SourceExpr>),

    // Statements with no lowering. Kept as variants so the error message
    // can name them and their position.
    Global(Vec<String>),
    FunctionDecl {
        name: String,
    },
    ConstDecl {
        name: String,
    },

    Nop,
}

// ============================================================
// Expressions
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceExpr {
    pub kind: SourceExprKind,
    pub location: TextLocation,
}

impl SourceExpr {
    pub fn new(kind: SourceExprKind, location: TextLocation) -> SourceExpr {
        SourceExpr { kind, location }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// PHP `.`
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    And,
    Or,
    Xor,
    Equal,
    NotEqual,
    /// PHP `===`
    Identical,
    NotIdentical,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncDecOp {
    PreIncrement,
    PostIncrement,
    PreDecrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CastKind {
    Int,
    Float,
    Str,
    Bool,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PseudoConstKind {
    Line,
    File,
    Class,
    Function,
    Method,
}

/// One element of an array literal. `by_ref` items have no lowering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayItem {
    pub key: Option<SourceExpr>,
    pub value: SourceExpr,
    pub by_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceExprKind {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),

    /// `$name` (without the `$`). `$this` arrives as `Variable("this")`.
    Variable(String),
    /// `$$expr`
    IndirectVariable(Box<SourceExpr>),

    Assign {
        target: Box<SourceExpr>,
        /// Some(op) for compound assignment (`+=`, `.=`, ...).
        op: Option<BinaryOp>,
        value: Box<SourceExpr>,
    },
    /// `$a =& $b` — no lowering.
    RefAssign {
        target: Box<SourceExpr>,
        value: Box<SourceExpr>,
    },
    /// `list($a, , $b) = $expr`; skipped positions are None.
    ListAssign {
        targets: Vec<Option<SourceExpr>>,
        value: Box<SourceExpr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<SourceExpr>,
        right: Box<SourceExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SourceExpr>,
    },
    IncDec {
        op: IncDecOp,
        target: Box<SourceExpr>,
    },
    Ternary {
        condition: Box<SourceExpr>,
        if_true: Box<SourceExpr>,
        if_false: Box<SourceExpr>,
    },
    /// Interpolated string parts, in order.
    Concat(Vec<SourceExpr>),

    FunctionCall {
        name: QualifiedName,
        args: Vec<SourceExpr>,
    },
    MethodCall {
        target: Box<SourceExpr>,
        name: String,
        args: Vec<SourceExpr>,
    },
    StaticCall {
        class: QualifiedName,
        name: String,
        args: Vec<SourceExpr>,
    },

    PropertyAccess {
        target: Box<SourceExpr>,
        name: String,
    },
    /// `$obj->$name`
    IndirectPropertyAccess {
        target: Box<SourceExpr>,
        name: Box<SourceExpr>,
    },
    StaticPropertyAccess {
        class: QualifiedName,
        name: String,
    },
    /// `T::$$name`
    IndirectStaticPropertyAccess {
        class: QualifiedName,
        name: Box<SourceExpr>,
    },
    ClassConstant {
        class: QualifiedName,
        name: String,
    },
    Constant(QualifiedName),
    PseudoConstant(PseudoConstKind),

    ArrayLiteral(Vec<ArrayItem>),
    /// `$a[$k]`; `$a[]` (append target) has index None.
    Index {
        target: Box<SourceExpr>,
        index: Option<Box<SourceExpr>>,
    },

    New {
        class: QualifiedName,
        args: Vec<SourceExpr>,
    },
    Clone(Box<SourceExpr>),
    Print(Box<SourceExpr>),
    /// `@expr`
    ErrorSuppress(Box<SourceExpr>),
    Isset(Vec<SourceExpr>),
    InstanceOf {
        expr: Box<SourceExpr>,
        class: QualifiedName,
    },
    /// A literal type reference (`T::class` style).
    TypeOfName(QualifiedName),
    /// Backtick operator; parts are interpolated like a string.
    ShellExec(Vec<SourceExpr>),
    Cast {
        target: CastKind,
        expr: Box<SourceExpr>,
    },

    // Expressions with no lowering.
    Empty(Box<SourceExpr>),
    Eval(Box<SourceExpr>),
    Include {
        once: bool,
        require: bool,
        path: Box<SourceExpr>,
    },
    /// Host-extension query syntax. The parser may produce it; the
    /// translator never lowers it.
    QueryComprehension,
}

impl SourceExprKind {
    /// Short construct name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            SourceExprKind::Null
            | SourceExprKind::Bool(_)
            | SourceExprKind::Int(_)
            | SourceExprKind::Float(_)
            | SourceExprKind::Str(_) => "literal",
            SourceExprKind::Variable(_) => "variable",
            SourceExprKind::IndirectVariable(_) => "indirect variable access",
            SourceExprKind::Assign { .. } => "assignment",
            SourceExprKind::RefAssign { .. } => "reference assignment",
            SourceExprKind::ListAssign { .. } => "list assignment",
            SourceExprKind::Binary { .. } => "binary operation",
            SourceExprKind::Unary { .. } => "unary operation",
            SourceExprKind::IncDec { .. } => "increment/decrement",
            SourceExprKind::Ternary { .. } => "ternary",
            SourceExprKind::Concat(_) => "string interpolation",
            SourceExprKind::FunctionCall { .. } => "function call",
            SourceExprKind::MethodCall { .. } => "method call",
            SourceExprKind::StaticCall { .. } => "static method call",
            SourceExprKind::PropertyAccess { .. } => "property access",
            SourceExprKind::IndirectPropertyAccess { .. } => "indirect property access",
            SourceExprKind::StaticPropertyAccess { .. } => "static property access",
            SourceExprKind::IndirectStaticPropertyAccess { .. } => {
                "indirect static property access"
            }
            SourceExprKind::ClassConstant { .. } => "class constant",
            SourceExprKind::Constant(_) => "constant",
            SourceExprKind::PseudoConstant(_) => "pseudo constant",
            SourceExprKind::ArrayLiteral(_) => "array literal",
            SourceExprKind::Index { .. } => "array index",
            SourceExprKind::New { .. } => "object creation",
            SourceExprKind::Clone(_) => "clone",
            SourceExprKind::Print(_) => "print",
            SourceExprKind::ErrorSuppress(_) => "error suppression",
            SourceExprKind::Isset(_) => "isset",
            SourceExprKind::InstanceOf { .. } => "instanceof",
            SourceExprKind::TypeOfName(_) => "type reference",
            SourceExprKind::ShellExec(_) => "shell execution",
            SourceExprKind::Cast { .. } => "cast",
            SourceExprKind::Empty(_) => "empty()",
            SourceExprKind::Eval(_) => "eval",
            SourceExprKind::Include { .. } => "include/require",
            SourceExprKind::QueryComprehension => "query comprehension",
        }
    }
}
