//! Translation state
//!
//! One [`TranslationState`] exists per translation of one source program.
//! It owns the scope chain and the name allocator, and borrows the
//! immutable configuration and host environment. Everything it creates is
//! either handed out in the produced IR tree or dropped with it — no
//! state survives into the next translation.

use crate::TranslationEnv;
use crate::ir::ir_nodes::{IrExpr, IrExprKind, IrTypeRef};
use crate::settings::{self, TranslatorConfig};
use crate::source_ast::locations::TextLocation;
use crate::source_ast::source_nodes::QualifiedName;
use crate::lowering::label_allocator::NameAllocator;
use crate::lowering::scope_chain::ScopeArena;
use crate::types::inference::{InferenceContext, KnownType, infer_expr};
use crate::types::resolver::TypeResolver;
use crate::types::symbols::{SymbolProvider, TypeHandle};

pub(crate) struct TranslationState<'a> {
    pub(crate) config: &'a TranslatorConfig,
    pub(crate) resolver: TypeResolver<'a>,
    pub(crate) scopes: ScopeArena,
    pub(crate) names: NameAllocator,
    pub(crate) source_name: Option<&'a str>,
}

impl<'a> TranslationState<'a> {
    pub(crate) fn new(
        config: &'a TranslatorConfig,
        env: &'a TranslationEnv<'a>,
        source_name: Option<&'a str>,
    ) -> TranslationState<'a> {
        TranslationState {
            config,
            resolver: TypeResolver::new(&env.aliases, &env.imports, env.symbols),
            scopes: ScopeArena::new(),
            names: NameAllocator::new(),
            source_name,
        }
    }

    pub(crate) fn symbols(&self) -> &'a dyn SymbolProvider {
        self.resolver.symbols()
    }

    // =========================================================
    // Inference bridge
    // =========================================================

    pub(crate) fn with_inference<R>(&self, f: impl FnOnce(&InferenceContext) -> R) -> R {
        let (own_type_name, own_base, own_members) = self.scopes.enclosing_type_view();
        let ctx = InferenceContext {
            symbols: self.resolver.symbols(),
            resolver: &self.resolver,
            own_type_name,
            own_base,
            own_members,
            locals: &self.scopes,
        };
        f(&ctx)
    }

    pub(crate) fn infer(&self, expr: &IrExpr) -> KnownType {
        self.with_inference(|ctx| infer_expr(ctx, expr))
    }

    // =========================================================
    // Type references
    // =========================================================

    pub(crate) fn own_type_name(&self) -> Option<String> {
        let (name, _, _) = self.scopes.enclosing_type_view();
        name.map(str::to_string)
    }

    /// IR type reference for a source class name, with `self`/`parent`
    /// resolved against the enclosing type.
    pub(crate) fn class_type_ref(&self, name: &QualifiedName) -> IrTypeRef {
        if !name.is_qualified() {
            let (own_name, own_base, _) = self.scopes.enclosing_type_view();
            match name.short_name() {
                "self" | "static" => {
                    if let Some(own) = own_name {
                        return IrTypeRef::named(own);
                    }
                }
                "parent" => {
                    if let Some(base) = own_base {
                        return IrTypeRef::named(self.resolver.resolve_display_name(base));
                    }
                }
                _ => {}
            }
        }

        IrTypeRef::named(self.resolver.resolve_display_name(name))
    }

    pub(crate) fn class_handle(&self, name: &QualifiedName) -> Option<TypeHandle> {
        self.resolver.resolve(name)
    }
}

// =============================================================
// Runtime helper shapes
// =============================================================

/// A static call on one of the runtime support classes.
pub(crate) fn runtime_call(
    class: &str,
    method: &str,
    args: Vec<IrExpr>,
    location: TextLocation,
) -> IrExpr {
    IrExpr::method_call(
        IrExpr::type_ref(IrTypeRef::named(class), location),
        method,
        args,
        location,
    )
}

pub(crate) fn operators_call(method: &str, args: Vec<IrExpr>, location: TextLocation) -> IrExpr {
    runtime_call(settings::RUNTIME_OPERATORS_CLASS, method, args, location)
}

/// The distinguished "unset" value. Assigning it approximates removal.
pub(crate) fn unset_sentinel(location: TextLocation) -> IrExpr {
    IrExpr::new(
        IrExprKind::FieldRef {
            target: Box::new(IrExpr::type_ref(
                IrTypeRef::named(settings::RUNTIME_OPERATORS_CLASS),
                location,
            )),
            name: settings::UNSET_SENTINEL_FIELD.to_string(),
        },
        location,
    )
}
