//! ============================================================
//!                 Expression Type Inference
//! ============================================================
//! Best-effort static types for already-lowered IR expressions.
//!
//! This is a heuristic, not a type checker. Its only consumers are the
//! field-vs-property disambiguation, overload ranking by parameter count,
//! and array-literal element typing — every failure collapses to
//! [`KnownType::Unknown`] and the consumer falls back to the generic
//! object type. Nothing here can reject a program.

use crate::ir::ir_nodes::{IrBinaryOp, IrExpr, IrExprKind, IrLiteral, IrTypeRef, IrUnaryOp};
use crate::settings;
use crate::source_ast::source_nodes::QualifiedName;
use crate::types::resolver::TypeResolver;
use crate::types::symbols::{MemberInfo, MemberKind, SymbolProvider, TypeHandle};

// ============================================================
// Known types
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownType {
    Bool,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Char,
    Str,
    Object,
    /// The type currently being lowered (its members live in the scope
    /// chain, not in the symbol provider).
    Own,
    Class(TypeHandle),
    Array(Box<KnownType>),
    Unknown,
}

impl KnownType {
    pub fn from_type_name(name: &str, symbols: &dyn SymbolProvider) -> KnownType {
        match name {
            "System.Boolean" => KnownType::Bool,
            "System.SByte" => KnownType::SByte,
            "System.Byte" => KnownType::Byte,
            "System.Int16" => KnownType::Short,
            "System.UInt16" => KnownType::UShort,
            "System.Int32" => KnownType::Int,
            "System.UInt32" => KnownType::UInt,
            "System.Int64" => KnownType::Long,
            "System.UInt64" => KnownType::ULong,
            "System.Single" => KnownType::Float,
            "System.Double" => KnownType::Double,
            "System.Char" => KnownType::Char,
            "System.String" => KnownType::Str,
            "System.Object" => KnownType::Object,
            other => match symbols.lookup_type(other) {
                Some(handle) => KnownType::Class(handle),
                None => KnownType::Unknown,
            },
        }
    }

    pub fn from_ir_type_ref(ty: &IrTypeRef, symbols: &dyn SymbolProvider) -> KnownType {
        match ty {
            IrTypeRef::Named(name) => KnownType::from_type_name(name, symbols),
            IrTypeRef::Array(element) => {
                KnownType::Array(Box::new(KnownType::from_ir_type_ref(element, symbols)))
            }
        }
    }

    /// Dotted display name used when the lowering needs to write this
    /// type into the IR. Unknown collapses to the generic object type.
    pub fn display_name(&self, ctx: &InferenceContext) -> String {
        match self {
            KnownType::Bool => settings::BOOL_TYPE.to_string(),
            KnownType::SByte => "System.SByte".to_string(),
            KnownType::Byte => "System.Byte".to_string(),
            KnownType::Short => "System.Int16".to_string(),
            KnownType::UShort => "System.UInt16".to_string(),
            KnownType::Int => settings::INT_TYPE.to_string(),
            KnownType::UInt => "System.UInt32".to_string(),
            KnownType::Long => settings::LONG_TYPE.to_string(),
            KnownType::ULong => "System.UInt64".to_string(),
            KnownType::Float => "System.Single".to_string(),
            KnownType::Double => settings::DOUBLE_TYPE.to_string(),
            KnownType::Char => "System.Char".to_string(),
            KnownType::Str => settings::STRING_TYPE.to_string(),
            KnownType::Own => ctx
                .own_type_name
                .map(str::to_string)
                .unwrap_or_else(|| settings::GENERIC_OBJECT_TYPE.to_string()),
            KnownType::Class(handle) => ctx
                .symbols
                .type_info(*handle)
                .map(|info| info.full_name.clone())
                .unwrap_or_else(|| settings::GENERIC_OBJECT_TYPE.to_string()),
            KnownType::Array(element) => format!("{}[]", element.display_name(ctx)),
            KnownType::Object | KnownType::Unknown => settings::GENERIC_OBJECT_TYPE.to_string(),
        }
    }

    fn numeric_rank(&self) -> Option<u8> {
        match self {
            KnownType::Bool => Some(0),
            KnownType::SByte | KnownType::Byte => Some(1),
            KnownType::Short | KnownType::UShort => Some(2),
            KnownType::Int | KnownType::UInt => Some(3),
            KnownType::Long | KnownType::ULong => Some(4),
            KnownType::Float => Some(5),
            KnownType::Double => Some(6),
            _ => None,
        }
    }
}

/// Fixed numeric promotion ladder for arithmetic and bitwise operators.
/// Strings and chars coerce to the double fallback; anything else is
/// Unknown.
pub fn promote_numeric(left: &KnownType, right: &KnownType) -> KnownType {
    let coerce = |ty: &KnownType| match ty {
        KnownType::Str | KnownType::Char => KnownType::Double,
        other => other.clone(),
    };

    let left = coerce(left);
    let right = coerce(right);

    match (left.numeric_rank(), right.numeric_rank()) {
        (Some(lr), Some(rr)) => {
            if rr > lr {
                right
            } else {
                left
            }
        }
        _ => KnownType::Unknown,
    }
}

// ============================================================
// Inference context
// ============================================================

/// Where locals get their best-effort types from. Implemented by the
/// scope chain.
pub trait LocalTypeLookup {
    fn local_type(&self, name: &str) -> KnownType;
}

pub struct InferenceContext<'a> {
    pub symbols: &'a dyn SymbolProvider,
    pub resolver: &'a TypeResolver<'a>,
    pub own_type_name: Option<&'a str>,
    pub own_base: Option<&'a QualifiedName>,
    pub own_members: &'a [MemberInfo],
    pub locals: &'a dyn LocalTypeLookup,
}

// ============================================================
// Member walks
// ============================================================

/// Exact-name member selection; for methods an arity match wins over the
/// first name match.
fn pick_member<'m>(
    members: &'m [MemberInfo],
    name: &str,
    arity: Option<usize>,
    allow_non_public: bool,
) -> Option<&'m MemberInfo> {
    let visible = |m: &&MemberInfo| m.name == name && (allow_non_public || m.is_public);

    if let Some(arity) = arity {
        let exact = members
            .iter()
            .filter(visible)
            .find(|m| matches!(m.kind, MemberKind::Method { param_count } if param_count == arity));
        if exact.is_some() {
            return exact;
        }
    }

    members.iter().find(visible)
}

fn lookup_external_member<'c>(
    ctx: &InferenceContext<'c>,
    mut handle: TypeHandle,
    name: &str,
    arity: Option<usize>,
    from_own: bool,
) -> Option<&'c MemberInfo> {
    loop {
        let info = ctx.symbols.type_info(handle)?;
        if let Some(member) = pick_member(&info.members, name, arity, from_own) {
            return Some(member);
        }

        let base = info.base.as_deref()?;
        handle = ctx.symbols.lookup_type(base)?;
    }
}

/// The §4.2 member walk: own-type registry → first base type (if not an
/// interface) → referenced binaries. Own-type access sees non-public
/// members; everything else only public ones.
fn member_walk<'c>(
    ctx: &InferenceContext<'c>,
    target: &KnownType,
    name: &str,
    arity: Option<usize>,
) -> Option<&'c MemberInfo> {
    match target {
        KnownType::Own => {
            if let Some(member) = pick_member(ctx.own_members, name, arity, true) {
                return Some(member);
            }

            let base = ctx.own_base?;
            let handle = ctx.resolver.resolve(base)?;
            let info = ctx.symbols.type_info(handle)?;
            if info.is_interface {
                return None;
            }
            lookup_external_member(ctx, handle, name, arity, true)
        }
        KnownType::Class(handle) => lookup_external_member(ctx, *handle, name, arity, false),
        _ => None,
    }
}

/// Field-vs-property disambiguation support: the kind of the member a
/// `target->name` access would hit, if the target type resolves at all.
pub fn probe_member_kind(
    ctx: &InferenceContext,
    target: &KnownType,
    name: &str,
) -> Option<MemberKind> {
    member_walk(ctx, target, name, None).map(|m| m.kind)
}

fn member_result_type(ctx: &InferenceContext, member: &MemberInfo) -> KnownType {
    match &member.type_name {
        Some(name) => KnownType::from_type_name(name, ctx.symbols),
        None => KnownType::Unknown,
    }
}

// ============================================================
// Expression inference
// ============================================================

pub fn infer_expr(ctx: &InferenceContext, expr: &IrExpr) -> KnownType {
    match &expr.kind {
        IrExprKind::Primitive(literal) => match literal {
            IrLiteral::Null => KnownType::Object,
            IrLiteral::Bool(_) => KnownType::Bool,
            IrLiteral::Int(value) => {
                if i32::try_from(*value).is_ok() {
                    KnownType::Int
                } else {
                    KnownType::Long
                }
            }
            IrLiteral::Float(_) => KnownType::Double,
            IrLiteral::Str(_) => KnownType::Str,
        },

        IrExprKind::VariableRef(name) => ctx.locals.local_type(name),
        IrExprKind::ThisRef => KnownType::Own,
        IrExprKind::TypeRef(_) => KnownType::Unknown,

        IrExprKind::Binary { op, left, right } => match op {
            IrBinaryOp::Add
            | IrBinaryOp::Subtract
            | IrBinaryOp::Multiply
            | IrBinaryOp::Divide
            | IrBinaryOp::Modulus
            | IrBinaryOp::BitwiseAnd
            | IrBinaryOp::BitwiseOr
            | IrBinaryOp::BitwiseXor
            | IrBinaryOp::ShiftLeft
            | IrBinaryOp::ShiftRight => {
                promote_numeric(&infer_expr(ctx, left), &infer_expr(ctx, right))
            }
            IrBinaryOp::Concatenate => KnownType::Str,
            IrBinaryOp::BooleanAnd
            | IrBinaryOp::BooleanOr
            | IrBinaryOp::ValueEquality
            | IrBinaryOp::ValueInequality
            | IrBinaryOp::IdentityEquality
            | IrBinaryOp::IdentityInequality
            | IrBinaryOp::LessThan
            | IrBinaryOp::LessThanOrEqual
            | IrBinaryOp::GreaterThan
            | IrBinaryOp::GreaterThanOrEqual => KnownType::Bool,
        },

        IrExprKind::Unary { op, operand } => match op {
            IrUnaryOp::Not => KnownType::Bool,
            IrUnaryOp::Negate | IrUnaryOp::BitwiseNot => infer_expr(ctx, operand),
        },

        IrExprKind::MethodCall {
            target,
            method,
            args,
        } => {
            let target_type = infer_member_target(ctx, target);
            match member_walk(ctx, &target_type, method, Some(args.len())) {
                Some(member) => member_result_type(ctx, member),
                None => KnownType::Unknown,
            }
        }

        IrExprKind::FieldRef { target, name } | IrExprKind::PropertyRef { target, name } => {
            let target_type = infer_member_target(ctx, target);
            match member_walk(ctx, &target_type, name, None) {
                Some(member) => member_result_type(ctx, member),
                None => KnownType::Unknown,
            }
        }

        IrExprKind::ObjectCreate { ty, .. } => KnownType::from_ir_type_ref(ty, ctx.symbols),
        IrExprKind::ArrayCreate { element_type, .. } => KnownType::Array(Box::new(
            KnownType::from_ir_type_ref(element_type, ctx.symbols),
        )),
        IrExprKind::ArrayIndex { .. } => KnownType::Object,
        IrExprKind::Cast { ty, .. } => KnownType::from_ir_type_ref(ty, ctx.symbols),
        IrExprKind::TypeOf(_) => KnownType::from_type_name("System.Type", ctx.symbols),
        IrExprKind::DelegateCreate { delegate_type, .. } => {
            KnownType::from_ir_type_ref(delegate_type, ctx.symbols)
        }
    }
}

/// The type a member access target has: static targets (type refs) map
/// to the named type, everything else is inferred normally.
fn infer_member_target(ctx: &InferenceContext, target: &IrExpr) -> KnownType {
    match &target.kind {
        IrExprKind::TypeRef(IrTypeRef::Named(name)) => {
            if ctx.own_type_name == Some(name.as_str()) {
                KnownType::Own
            } else {
                KnownType::from_type_name(name, ctx.symbols)
            }
        }
        _ => infer_expr(ctx, target),
    }
}

// ============================================================
// Array element typing
// ============================================================

/// Common type of a non-keyed array literal's elements: pairwise
/// equality, else a common-base walk over the class hierarchy, else a
/// shared interface, else the generic object type.
pub fn common_element_type(ctx: &InferenceContext, elements: &[KnownType]) -> KnownType {
    let Some(first) = elements.first() else {
        return KnownType::Object;
    };

    if elements.iter().all(|ty| ty == first) {
        return first.clone();
    }

    let handles: Vec<TypeHandle> = elements
        .iter()
        .filter_map(|ty| match ty {
            KnownType::Class(handle) => Some(*handle),
            _ => None,
        })
        .collect();
    if handles.len() != elements.len() {
        return KnownType::Object;
    }

    if let Some(base) = common_base_class(ctx, &handles) {
        return KnownType::Class(base);
    }
    if let Some(shared) = shared_interface(ctx, &handles) {
        return KnownType::Class(shared);
    }

    KnownType::Object
}

fn class_chain(ctx: &InferenceContext, start: TypeHandle) -> Vec<TypeHandle> {
    let mut chain = vec![start];
    let mut current = start;
    while let Some(info) = ctx.symbols.type_info(current) {
        let Some(base) = info.base.as_deref() else {
            break;
        };
        let Some(handle) = ctx.symbols.lookup_type(base) else {
            break;
        };
        chain.push(handle);
        current = handle;
    }
    chain
}

fn common_base_class(ctx: &InferenceContext, handles: &[TypeHandle]) -> Option<TypeHandle> {
    let (first, rest) = handles.split_first()?;

    // The first element's own type qualifies only if every other chain
    // contains it too.
    class_chain(ctx, *first).into_iter().find(|candidate| {
        rest.iter()
            .all(|other| class_chain(ctx, *other).contains(candidate))
    })
}

fn interfaces_of(ctx: &InferenceContext, handle: TypeHandle) -> Vec<String> {
    let mut names = Vec::new();
    for link in class_chain(ctx, handle) {
        if let Some(info) = ctx.symbols.type_info(link) {
            for interface in &info.interfaces {
                if !names.contains(interface) {
                    names.push(interface.clone());
                }
            }
        }
    }
    names
}

fn shared_interface(ctx: &InferenceContext, handles: &[TypeHandle]) -> Option<TypeHandle> {
    let (first, rest) = handles.split_first()?;
    let candidates = interfaces_of(ctx, *first);

    candidates
        .into_iter()
        .find(|candidate| {
            rest.iter()
                .all(|other| interfaces_of(ctx, *other).contains(candidate))
        })
        .and_then(|name| ctx.symbols.lookup_type(&name))
}
