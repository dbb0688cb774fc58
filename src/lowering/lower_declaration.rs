//! Declaration Lowering
//!
//! Drives a whole translation: namespace, type declarations, members.
//! Method bodies go through statement lowering; everything a member needs
//! beyond that (visibility mapping, parameter registration, promoted
//! static fields) happens here.

use crate::TranslationEnv;
use crate::ir::ir_nodes::{
    IrAttribute, IrConstant, IrConstructor, IrExpr, IrField, IrMember, IrMethod, IrNamespace,
    IrParam, IrTypeDecl, IrTypeRef, IrVisibility,
};
use crate::lowering::builder::TranslationState;
use crate::lowering::scope_chain::ScopeKind;
use crate::messages::translate_errors::TranslateError;
use crate::settings::{CONSTRUCTOR_METHOD_NAME, TranslatorConfig};
use crate::source_ast::source_nodes::{
    SourceAttribute, SourceClass, SourceConstant, SourceExpr, SourceField, SourceMember,
    SourceMethod, SourceProgram, SourceStmt, SourceStmtKind, Visibility,
};
use crate::types::inference::KnownType;
use crate::types::symbols::{MemberInfo, MemberKind};
use crate::{lowering_log, return_unsupported};
use rustc_hash::FxHashMap;

/// Entry point: one call translates one source program into one IR
/// namespace tree, or fails with the first unsupported construct.
pub(crate) fn translate_program(
    config: &TranslatorConfig,
    env: &TranslationEnv,
    program: &SourceProgram,
) -> Result<IrNamespace, TranslateError> {
    let mut state = TranslationState::new(config, env, program.source_name.as_deref());
    state.lower_program(program, env.imports.clone())
}

fn map_visibility(visibility: Visibility) -> IrVisibility {
    match visibility {
        Visibility::Public => IrVisibility::Public,
        Visibility::Protected => IrVisibility::Family,
        Visibility::Private => IrVisibility::Private,
    }
}

/// Pre-registration pass: every member of the class, so method bodies and
/// sibling initializers can resolve them before their own lowering runs.
fn member_registry(class: &SourceClass) -> Vec<MemberInfo> {
    class
        .members
        .iter()
        .map(|member| match member {
            SourceMember::Field(field) => MemberInfo {
                name: field.name.clone(),
                kind: MemberKind::Field,
                type_name: None,
                is_public: field.visibility == Visibility::Public,
                is_static: field.is_static,
            },
            SourceMember::Constant(constant) => MemberInfo {
                name: constant.name.clone(),
                kind: MemberKind::Field,
                type_name: None,
                is_public: true,
                is_static: true,
            },
            SourceMember::Method(method) => MemberInfo {
                name: method.name.clone(),
                kind: MemberKind::Method {
                    param_count: method.params.len(),
                },
                type_name: None,
                is_public: method.visibility == Visibility::Public,
                is_static: method.is_static,
            },
        })
        .collect()
}

fn has_valued_return(stmts: &[SourceStmt]) -> bool {
    stmts.iter().any(|stmt| match &stmt.kind {
        SourceStmtKind::Return(value) => value.is_some(),
        SourceStmtKind::Block(body) => has_valued_return(body),
        SourceStmtKind::If { clauses } => {
            clauses.iter().any(|clause| has_valued_return(&clause.body))
        }
        SourceStmtKind::While { body, .. }
        | SourceStmtKind::DoWhile { body, .. }
        | SourceStmtKind::For { body, .. }
        | SourceStmtKind::Foreach { body, .. } => has_valued_return(body),
        SourceStmtKind::Switch { cases, .. } => {
            cases.iter().any(|case| has_valued_return(&case.body))
        }
        SourceStmtKind::Try { body, catches } => {
            has_valued_return(body)
                || catches.iter().any(|catch| has_valued_return(&catch.body))
        }
        _ => false,
    })
}

impl<'a> TranslationState<'a> {
    fn lower_program(
        &mut self,
        program: &SourceProgram,
        imports: Vec<String>,
    ) -> Result<IrNamespace, TranslateError> {
        let name = program.namespace.as_ref().map(|n| n.to_dotted());
        self.scopes.push(ScopeKind::Namespace { name: name.clone() });

        let mut types = Vec::with_capacity(program.types.len());
        for class in &program.types {
            types.push(self.lower_class(class)?);
        }

        self.scopes.pop();
        Ok(IrNamespace {
            name,
            imports,
            types,
        })
    }

    fn lower_class(&mut self, class: &SourceClass) -> Result<IrTypeDecl, TranslateError> {
        lowering_log!("lowering class {}", class.name);

        self.scopes.push(ScopeKind::Type {
            name: class.name.clone(),
            base: class.base.clone(),
            members: member_registry(class),
            promoted: Vec::new(),
        });

        let result = (|| -> Result<IrTypeDecl, TranslateError> {
            let mut base_types = Vec::new();
            if let Some(base) = &class.base {
                base_types.push(IrTypeRef::named(self.resolver.resolve_display_name(base)));
            }
            for interface in &class.interfaces {
                base_types.push(IrTypeRef::named(
                    self.resolver.resolve_display_name(interface),
                ));
            }

            let mut attributes = Vec::with_capacity(class.attributes.len());
            for attribute in &class.attributes {
                attributes.push(self.lower_attribute(attribute)?);
            }

            let mut members = Vec::with_capacity(class.members.len());
            for member in &class.members {
                members.push(match member {
                    SourceMember::Field(field) => self.lower_field(field)?,
                    SourceMember::Constant(constant) => self.lower_class_constant(constant)?,
                    SourceMember::Method(method) => self.lower_method(method)?,
                });
            }

            Ok(IrTypeDecl {
                name: class.name.clone(),
                base_types,
                attributes,
                members,
            })
        })();

        let scope = self.scopes.pop();
        let mut decl = result?;

        // Promoted static fields accumulated while lowering method bodies
        // append after the declared members.
        if let Some(scope) = scope {
            if let ScopeKind::Type { promoted, .. } = scope.kind {
                for field in promoted {
                    decl.members.push(IrMember::Field(field));
                }
            }
        }

        Ok(decl)
    }

    fn lower_attribute(
        &mut self,
        attribute: &SourceAttribute,
    ) -> Result<IrAttribute, TranslateError> {
        let mut args = Vec::with_capacity(attribute.args.len());
        for arg in &attribute.args {
            args.push(self.lower_expression_no_hoist(arg, "attribute argument")?);
        }
        Ok(IrAttribute {
            name: self.resolver.resolve_display_name(&attribute.name),
            args,
        })
    }

    fn lower_field(&mut self, field: &SourceField) -> Result<IrMember, TranslateError> {
        let initializer = match &field.initializer {
            Some(expr) => Some(self.lower_expression_no_hoist(expr, &field.name)?),
            None => None,
        };

        Ok(IrMember::Field(IrField {
            name: field.name.clone(),
            ty: IrTypeRef::object(),
            visibility: map_visibility(field.visibility),
            is_static: field.is_static,
            initializer,
        }))
    }

    fn lower_class_constant(
        &mut self,
        constant: &SourceConstant,
    ) -> Result<IrMember, TranslateError> {
        let value = self.lower_expression_no_hoist(&constant.value, &constant.name)?;
        Ok(IrMember::Constant(IrConstant {
            name: constant.name.clone(),
            visibility: IrVisibility::Public,
            value,
        }))
    }

    fn lower_method(&mut self, method: &SourceMethod) -> Result<IrMember, TranslateError> {
        lowering_log!("lowering method {}", method.name);

        self.scopes.push(ScopeKind::Method {
            name: method.name.clone(),
            is_static: method.is_static,
            locals: FxHashMap::default(),
            statics: FxHashMap::default(),
        });

        let result = (|| -> Result<Vec<IrParam>, TranslateError> {
            let mut params = Vec::with_capacity(method.params.len());
            for param in &method.params {
                let (ty, known) = match &param.type_hint {
                    Some(hint) => {
                        let display = self.resolver.resolve_display_name(hint);
                        let known = KnownType::from_type_name(&display, self.symbols());
                        (IrTypeRef::named(display), known)
                    }
                    None => (IrTypeRef::object(), KnownType::Object),
                };

                let name = self
                    .scopes
                    .declare_local(&param.name, known)
                    .unwrap_or_else(|| param.name.clone());
                params.push(IrParam {
                    name,
                    ty,
                    by_ref: param.by_ref,
                });
            }

            for stmt in &method.body {
                self.lower_statement(stmt)?;
            }
            Ok(params)
        })();

        let scope = self.scopes.pop();
        let params = result?;
        let body = scope.map(|scope| scope.statements).unwrap_or_default();

        let mut attributes = Vec::with_capacity(method.attributes.len());
        for attribute in &method.attributes {
            attributes.push(self.lower_attribute(attribute)?);
        }

        if method.name == CONSTRUCTOR_METHOD_NAME {
            return Ok(IrMember::Constructor(IrConstructor {
                visibility: map_visibility(method.visibility),
                params,
                body,
            }));
        }

        let return_type = if has_valued_return(&method.body) {
            Some(IrTypeRef::object())
        } else {
            None
        };

        Ok(IrMember::Method(IrMethod {
            name: method.name.clone(),
            visibility: map_visibility(method.visibility),
            is_static: method.is_static,
            params,
            return_type,
            attributes,
            body,
        }))
    }

    /// Lowers an expression that must not need synthesized statements
    /// (member initializers, attribute arguments).
    fn lower_expression_no_hoist(
        &mut self,
        expr: &SourceExpr,
        what: &str,
    ) -> Result<IrExpr, TranslateError> {
        self.scopes.push(ScopeKind::Block);
        let result = self.lower_expression(expr);
        let scope = self.scopes.pop();
        let lowered = result?;

        let needs_statements = scope
            .map(|scope| !scope.statements.is_empty())
            .unwrap_or(false);
        if needs_statements {
            return_unsupported!(
                "initializer",
                format!("the initializer of '{}' needs statements and cannot be translated here", what),
                expr.location
            );
        }
        Ok(lowered)
    }
}
