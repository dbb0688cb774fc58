//! Expression Lowering
//!
//! Translates every PHP expression shape into the IR's small expression
//! set. Shapes with no inline IR counterpart (keyed array literals, list
//! destructuring, assignment in expression position, ...) hoist
//! synthesized statements into the current scope at its insertion cursor
//! and evaluate to a reference to the synthesized temporary.
//!
//! Constructs with no lowering at all fail here with the offending node's
//! kind and position; nothing is partially emitted.

use crate::ir::ir_nodes::{IrBinaryOp, IrExpr, IrExprKind, IrLiteral, IrStmt, IrStmtKind, IrTypeRef, IrUnaryOp};
use crate::lowering::builder::{TranslationState, operators_call, runtime_call};
use crate::messages::translate_errors::TranslateError;
use crate::settings;
use crate::source_ast::locations::TextLocation;
use crate::source_ast::source_nodes::{
    ArrayItem, BinaryOp, CastKind, IncDecOp, PseudoConstKind, QualifiedName, SourceExpr,
    SourceExprKind, UnaryOp,
};
use crate::types::inference::{KnownType, common_element_type, infer_expr, probe_member_kind};
use crate::types::symbols::MemberKind;
use crate::{lowering_log, return_unsupported};

/// Where an assignment lands once its target is lowered.
pub(crate) enum LoweredTarget {
    /// First assignment to a not-yet-declared local; the caller emits the
    /// variable declaration.
    NewLocal { name: String },
    /// An assignable place expression.
    Place(IrExpr),
    /// `$a[]` — becomes an Add call on the lowered array.
    Append(IrExpr),
}

fn ir_binary_op(op: BinaryOp) -> Option<IrBinaryOp> {
    match op {
        BinaryOp::Add => Some(IrBinaryOp::Add),
        BinaryOp::Sub => Some(IrBinaryOp::Subtract),
        BinaryOp::Mul => Some(IrBinaryOp::Multiply),
        BinaryOp::Div => Some(IrBinaryOp::Divide),
        BinaryOp::Mod => Some(IrBinaryOp::Modulus),
        BinaryOp::Concat => Some(IrBinaryOp::Concatenate),
        BinaryOp::BitAnd => Some(IrBinaryOp::BitwiseAnd),
        BinaryOp::BitOr => Some(IrBinaryOp::BitwiseOr),
        BinaryOp::BitXor => Some(IrBinaryOp::BitwiseXor),
        BinaryOp::ShiftLeft => Some(IrBinaryOp::ShiftLeft),
        BinaryOp::ShiftRight => Some(IrBinaryOp::ShiftRight),
        BinaryOp::And => Some(IrBinaryOp::BooleanAnd),
        BinaryOp::Or => Some(IrBinaryOp::BooleanOr),
        // Logical xor has no IR operator; it goes through the runtime.
        BinaryOp::Xor => None,
        BinaryOp::Equal => Some(IrBinaryOp::ValueEquality),
        BinaryOp::NotEqual => Some(IrBinaryOp::ValueInequality),
        BinaryOp::Identical => Some(IrBinaryOp::IdentityEquality),
        BinaryOp::NotIdentical => Some(IrBinaryOp::IdentityInequality),
        BinaryOp::Less => Some(IrBinaryOp::LessThan),
        BinaryOp::LessOrEqual => Some(IrBinaryOp::LessThanOrEqual),
        BinaryOp::Greater => Some(IrBinaryOp::GreaterThan),
        BinaryOp::GreaterOrEqual => Some(IrBinaryOp::GreaterThanOrEqual),
    }
}

fn cast_type_ref(kind: CastKind) -> IrTypeRef {
    match kind {
        CastKind::Int => IrTypeRef::named(settings::INT_TYPE),
        CastKind::Float => IrTypeRef::named(settings::DOUBLE_TYPE),
        CastKind::Str => IrTypeRef::named(settings::STRING_TYPE),
        CastKind::Bool => IrTypeRef::named(settings::BOOL_TYPE),
        CastKind::Array => IrTypeRef::named(settings::RUNTIME_ARRAY_CLASS),
        CastKind::Object => IrTypeRef::object(),
    }
}

impl<'a> TranslationState<'a> {
    pub(crate) fn lower_expression(
        &mut self,
        expr: &SourceExpr,
    ) -> Result<IrExpr, TranslateError> {
        let location = expr.location;

        match &expr.kind {
            SourceExprKind::Null => Ok(IrExpr::null(location)),
            SourceExprKind::Bool(value) => Ok(IrExpr::bool_value(*value, location)),
            SourceExprKind::Int(value) => Ok(IrExpr::int_value(*value, location)),
            SourceExprKind::Float(value) => {
                Ok(IrExpr::primitive(IrLiteral::Float(*value), location))
            }
            SourceExprKind::Str(value) => Ok(IrExpr::str_value(value.clone(), location)),

            SourceExprKind::Variable(name) => Ok(self.lower_variable_read(name, location)),

            SourceExprKind::IndirectVariable(name_expr) => {
                let name = self.lower_expression(name_expr)?;
                Ok(self.indirect_reference(vec![name], location))
            }

            SourceExprKind::Assign { target, op, value } => {
                self.lower_assignment_expression(target, *op, value, location)
            }

            SourceExprKind::RefAssign { .. } => {
                return_unsupported!(
                    expr.kind.describe(),
                    "assignment by reference cannot be translated",
                    location
                )
            }

            SourceExprKind::ListAssign { targets, value } => {
                self.lower_list_assign(targets, value, location)
            }

            SourceExprKind::Binary { op, left, right } => {
                let left = self.lower_expression(left)?;
                let right = self.lower_expression(right)?;
                Ok(self.lower_binary(*op, left, right, location))
            }

            SourceExprKind::Unary { op, operand } => {
                let operand = self.lower_expression(operand)?;
                Ok(match op {
                    UnaryOp::Plus => operand,
                    UnaryOp::Minus => IrExpr::new(
                        IrExprKind::Unary {
                            op: IrUnaryOp::Negate,
                            operand: Box::new(operand),
                        },
                        location,
                    ),
                    UnaryOp::Not => IrExpr::new(
                        IrExprKind::Unary {
                            op: IrUnaryOp::Not,
                            operand: Box::new(operand),
                        },
                        location,
                    ),
                    UnaryOp::BitNot => IrExpr::new(
                        IrExprKind::Unary {
                            op: IrUnaryOp::BitwiseNot,
                            operand: Box::new(operand),
                        },
                        location,
                    ),
                })
            }

            SourceExprKind::IncDec { op, target } => {
                match self.lower_incdec(*op, target, location, false)? {
                    Some(value) => Ok(value),
                    None => crate::return_translator_bug!(
                        "expression-position inc/dec produced no value",
                        location
                    ),
                }
            }

            // Eager in both arms: Select evaluates its second and third
            // argument regardless of the condition. A known fidelity gap
            // against PHP's short-circuit ternary, kept as-is.
            SourceExprKind::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                let condition = self.lower_expression(condition)?;
                let if_true = self.lower_expression(if_true)?;
                let if_false = self.lower_expression(if_false)?;
                Ok(operators_call(
                    settings::SELECT_HELPER,
                    vec![condition, if_true, if_false],
                    location,
                ))
            }

            SourceExprKind::Concat(parts) => self.lower_concat_chain(parts, location),

            SourceExprKind::FunctionCall { name, args } => {
                self.lower_function_call(name, args, location)
            }

            SourceExprKind::MethodCall { target, name, args } => {
                let target = self.lower_expression(target)?;
                let args = self.lower_expression_list(args)?;
                Ok(IrExpr::method_call(target, name.clone(), args, location))
            }

            SourceExprKind::StaticCall { class, name, args } => {
                let target = IrExpr::type_ref(self.class_type_ref(class), location);
                let args = self.lower_expression_list(args)?;
                Ok(IrExpr::method_call(target, name.clone(), args, location))
            }

            SourceExprKind::PropertyAccess { target, name } => {
                let target = self.lower_expression(target)?;
                Ok(self.member_reference(target, name, location))
            }

            SourceExprKind::IndirectPropertyAccess { target, name } => {
                let target = self.lower_expression(target)?;
                let name = self.lower_expression(name)?;
                Ok(self.indirect_reference(vec![target, name], location))
            }

            SourceExprKind::StaticPropertyAccess { class, name } => {
                let target = IrExpr::type_ref(self.class_type_ref(class), location);
                Ok(self.member_reference(target, name, location))
            }

            SourceExprKind::IndirectStaticPropertyAccess { class, name } => {
                let target = IrExpr::type_ref(self.class_type_ref(class), location);
                let name = self.lower_expression(name)?;
                Ok(self.indirect_reference(vec![target, name], location))
            }

            SourceExprKind::ClassConstant { class, name } => {
                let target = IrExpr::type_ref(self.class_type_ref(class), location);
                Ok(IrExpr::new(
                    IrExprKind::FieldRef {
                        target: Box::new(target),
                        name: name.clone(),
                    },
                    location,
                ))
            }

            SourceExprKind::Constant(name) => {
                let target = IrExpr::type_ref(
                    IrTypeRef::named(settings::RUNTIME_CONSTANTS_CLASS),
                    location,
                );
                Ok(IrExpr::new(
                    IrExprKind::FieldRef {
                        target: Box::new(target),
                        name: name.short_name().to_string(),
                    },
                    location,
                ))
            }

            SourceExprKind::PseudoConstant(kind) => Ok(self.lower_pseudo_constant(*kind, location)),

            SourceExprKind::ArrayLiteral(items) => self.lower_array_literal(items, location),

            SourceExprKind::Index { target, index } => match index {
                Some(index) => {
                    let target = self.lower_expression(target)?;
                    let index = self.lower_expression(index)?;
                    Ok(IrExpr::new(
                        IrExprKind::ArrayIndex {
                            target: Box::new(target),
                            index: Box::new(index),
                        },
                        location,
                    ))
                }
                None => return_unsupported!(
                    expr.kind.describe(),
                    "array append is only valid as an assignment target",
                    location
                ),
            },

            SourceExprKind::New { class, args } => self.lower_new(class, args, location),

            SourceExprKind::Clone(operand) => {
                let operand = self.lower_expression(operand)?;
                Ok(operators_call(
                    settings::CLONE_HELPER,
                    vec![operand],
                    location,
                ))
            }

            SourceExprKind::Print(operand) => {
                let operand = self.lower_expression(operand)?;
                Ok(operators_call(
                    settings::PRINT_HELPER,
                    vec![operand],
                    location,
                ))
            }

            SourceExprKind::ErrorSuppress(operand) => {
                let operand = self.lower_expression(operand)?;
                Ok(operators_call(
                    settings::SUPPRESS_HELPER,
                    vec![operand],
                    location,
                ))
            }

            SourceExprKind::Isset(operands) => self.lower_isset(operands, location),

            SourceExprKind::InstanceOf { expr: operand, class } => {
                let operand = self.lower_expression(operand)?;
                let ty = IrExpr::new(
                    IrExprKind::TypeOf(self.class_type_ref(class)),
                    location,
                );
                Ok(operators_call(
                    settings::INSTANCE_OF_HELPER,
                    vec![operand, ty],
                    location,
                ))
            }

            SourceExprKind::TypeOfName(class) => Ok(IrExpr::new(
                IrExprKind::TypeOf(self.class_type_ref(class)),
                location,
            )),

            SourceExprKind::ShellExec(parts) => {
                let command = self.lower_concat_chain(parts, location)?;
                Ok(operators_call(
                    settings::SHELL_EXEC_HELPER,
                    vec![command],
                    location,
                ))
            }

            SourceExprKind::Cast { target, expr: operand } => {
                let operand = self.lower_expression(operand)?;
                Ok(IrExpr::new(
                    IrExprKind::Cast {
                        ty: cast_type_ref(*target),
                        expr: Box::new(operand),
                    },
                    location,
                ))
            }

            SourceExprKind::Empty(_) => return_unsupported!(
                expr.kind.describe(),
                "empty() cannot be translated",
                location
            ),
            SourceExprKind::Eval(_) => return_unsupported!(
                expr.kind.describe(),
                "eval cannot be translated",
                location
            ),
            SourceExprKind::Include { .. } => return_unsupported!(
                expr.kind.describe(),
                "include/require cannot be translated",
                location
            ),
            SourceExprKind::QueryComprehension => return_unsupported!(
                expr.kind.describe(),
                "query comprehensions cannot be translated",
                location
            ),
        }
    }

    pub(crate) fn lower_expression_list(
        &mut self,
        exprs: &[SourceExpr],
    ) -> Result<Vec<IrExpr>, TranslateError> {
        exprs.iter().map(|e| self.lower_expression(e)).collect()
    }

    // =========================================================
    // Variables and members
    // =========================================================

    fn lower_variable_read(&mut self, name: &str, location: TextLocation) -> IrExpr {
        if name == "this" {
            return IrExpr::new(IrExprKind::ThisRef, location);
        }

        // A method-static variable reads from its promoted field.
        if let Some(field) = self.scopes.static_field_for(name) {
            return self.own_static_field_ref(&field, location);
        }

        IrExpr::variable(self.scopes.effective_local_name(name), location)
    }

    pub(crate) fn own_static_field_ref(&self, field: &str, location: TextLocation) -> IrExpr {
        let owner = self
            .own_type_name()
            .unwrap_or_else(|| settings::GENERIC_OBJECT_TYPE.to_string());
        IrExpr::new(
            IrExprKind::FieldRef {
                target: Box::new(IrExpr::type_ref(IrTypeRef::named(owner), location)),
                name: field.to_string(),
            },
            location,
        )
    }

    /// Field-vs-property disambiguation for `target->name` and
    /// `T::$name`: probe for a property first, fall back to a field, and
    /// treat an unresolved target type as a field access.
    pub(crate) fn member_reference(&self, target: IrExpr, name: &str, location: TextLocation) -> IrExpr {
        let is_property = self.with_inference(|ctx| {
            let target_type = match &target.kind {
                IrExprKind::TypeRef(IrTypeRef::Named(type_name)) => {
                    if ctx.own_type_name == Some(type_name.as_str()) {
                        KnownType::Own
                    } else {
                        KnownType::from_type_name(type_name, ctx.symbols)
                    }
                }
                _ => infer_expr(ctx, &target),
            };
            matches!(
                probe_member_kind(ctx, &target_type, name),
                Some(MemberKind::Property)
            )
        });

        let kind = if is_property {
            IrExprKind::PropertyRef {
                target: Box::new(target),
                name: name.to_string(),
            }
        } else {
            IrExprKind::FieldRef {
                target: Box::new(target),
                name: name.to_string(),
            }
        };
        IrExpr::new(kind, location)
    }

    fn indirect_reference(&self, args: Vec<IrExpr>, location: TextLocation) -> IrExpr {
        // Translation-only: carries enough to display the access, but is
        // not executable by the runtime.
        IrExpr::new(
            IrExprKind::ObjectCreate {
                ty: IrTypeRef::named(settings::RUNTIME_INDIRECT_CLASS),
                args,
            },
            location,
        )
    }

    fn lower_pseudo_constant(&self, kind: PseudoConstKind, location: TextLocation) -> IrExpr {
        match kind {
            PseudoConstKind::Line => {
                IrExpr::int_value(i64::from(location.start.line), location)
            }
            PseudoConstKind::File => {
                IrExpr::str_value(self.source_name.unwrap_or("").to_string(), location)
            }
            PseudoConstKind::Class => {
                IrExpr::str_value(self.own_type_name().unwrap_or_default(), location)
            }
            PseudoConstKind::Function | PseudoConstKind::Method => {
                let name = self
                    .scopes
                    .enclosing_method()
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default();
                IrExpr::str_value(name, location)
            }
        }
    }

    // =========================================================
    // Operators
    // =========================================================

    pub(crate) fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: IrExpr,
        right: IrExpr,
        location: TextLocation,
    ) -> IrExpr {
        match ir_binary_op(op) {
            Some(op) => IrExpr::binary(op, left, right, location),
            None => operators_call(settings::XOR_HELPER, vec![left, right], location),
        }
    }

    /// `isset(a, b, ...)`: right-associated AND chain of not-identical-
    /// to-null tests.
    fn lower_isset(
        &mut self,
        operands: &[SourceExpr],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let mut tests = Vec::with_capacity(operands.len());
        for operand in operands {
            let lowered = self.lower_expression(operand)?;
            tests.push(IrExpr::binary(
                IrBinaryOp::IdentityInequality,
                lowered,
                IrExpr::null(location),
                location,
            ));
        }

        let Some(mut result) = tests.pop() else {
            return Ok(IrExpr::bool_value(true, location));
        };
        while let Some(test) = tests.pop() {
            result = IrExpr::binary(IrBinaryOp::BooleanAnd, test, result, location);
        }
        Ok(result)
    }

    /// Right-fold of binary concatenation over interpolation parts.
    fn lower_concat_chain(
        &mut self,
        parts: &[SourceExpr],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let mut lowered = self.lower_expression_list(parts)?;
        let Some(mut result) = lowered.pop() else {
            return Ok(IrExpr::str_value("", location));
        };
        while let Some(part) = lowered.pop() {
            result = IrExpr::binary(IrBinaryOp::Concatenate, part, result, location);
        }
        Ok(result)
    }

    // =========================================================
    // Assignment
    // =========================================================

    pub(crate) fn lower_assignment_target(
        &mut self,
        target: &SourceExpr,
    ) -> Result<LoweredTarget, TranslateError> {
        let location = target.location;

        match &target.kind {
            SourceExprKind::Variable(name) => {
                if name == "this" {
                    return_unsupported!(
                        "assignment",
                        "cannot assign to $this",
                        location
                    );
                }
                if let Some(field) = self.scopes.static_field_for(name) {
                    return Ok(LoweredTarget::Place(
                        self.own_static_field_ref(&field, location),
                    ));
                }
                if self.scopes.local_info(name).is_some() {
                    return Ok(LoweredTarget::Place(IrExpr::variable(
                        self.scopes.effective_local_name(name),
                        location,
                    )));
                }
                match self.scopes.declare_local(name, KnownType::Object) {
                    Some(effective) => Ok(LoweredTarget::NewLocal { name: effective }),
                    // No method scope (e.g. member initializer): treat as
                    // a plain place and let the emitter sort it out.
                    None => Ok(LoweredTarget::Place(IrExpr::variable(
                        name.clone(),
                        location,
                    ))),
                }
            }

            SourceExprKind::PropertyAccess { target, name } => {
                let target = self.lower_expression(target)?;
                Ok(LoweredTarget::Place(
                    self.member_reference(target, name, location),
                ))
            }

            SourceExprKind::StaticPropertyAccess { class, name } => {
                let target = IrExpr::type_ref(self.class_type_ref(class), location);
                Ok(LoweredTarget::Place(
                    self.member_reference(target, name, location),
                ))
            }

            SourceExprKind::Index {
                target: array,
                index,
            } => {
                let array = self.lower_expression(array)?;
                match index {
                    Some(index) => {
                        let index = self.lower_expression(index)?;
                        Ok(LoweredTarget::Place(IrExpr::new(
                            IrExprKind::ArrayIndex {
                                target: Box::new(array),
                                index: Box::new(index),
                            },
                            location,
                        )))
                    }
                    None => Ok(LoweredTarget::Append(array)),
                }
            }

            SourceExprKind::IndirectVariable(name_expr) => {
                let name = self.lower_expression(name_expr)?;
                Ok(LoweredTarget::Place(
                    self.indirect_reference(vec![name], location),
                ))
            }

            SourceExprKind::IndirectPropertyAccess { target, name } => {
                let target = self.lower_expression(target)?;
                let name = self.lower_expression(name)?;
                Ok(LoweredTarget::Place(
                    self.indirect_reference(vec![target, name], location),
                ))
            }

            SourceExprKind::IndirectStaticPropertyAccess { .. } => {
                return_unsupported!(
                    "indirect static property access",
                    "an indirect static field is not a supported assignment target",
                    location
                )
            }

            other => return_unsupported!(
                other.describe(),
                "not a supported assignment target",
                location
            ),
        }
    }

    /// The value stored by an assignment, with compound operators folded
    /// in against a read of the target.
    fn assignment_value(
        &mut self,
        target_read: Option<IrExpr>,
        op: Option<BinaryOp>,
        value: IrExpr,
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        match op {
            None => Ok(value),
            Some(op) => {
                let Some(read) = target_read else {
                    return_unsupported!(
                        "assignment",
                        "compound assignment needs a readable target",
                        location
                    );
                };
                Ok(self.lower_binary(op, read, value, location))
            }
        }
    }

    /// Assignment used as a statement: lands directly in the current
    /// buffer, declaring a fresh local in place when the target is one.
    pub(crate) fn emit_assignment(
        &mut self,
        target: &SourceExpr,
        op: Option<BinaryOp>,
        value: &SourceExpr,
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let target = self.lower_assignment_target(target)?;
        let value = self.lower_expression(value)?;

        match target {
            LoweredTarget::NewLocal { name } => {
                if op.is_none() {
                    self.scopes.emit(IrStmt::new(
                        IrStmtKind::VariableDeclaration {
                            name,
                            ty: IrTypeRef::object(),
                            initializer: Some(value),
                        },
                        location,
                    ));
                } else {
                    self.scopes.emit(IrStmt::new(
                        IrStmtKind::VariableDeclaration {
                            name: name.clone(),
                            ty: IrTypeRef::object(),
                            initializer: None,
                        },
                        location,
                    ));
                    let read = IrExpr::variable(name.clone(), location);
                    let value = self.assignment_value(Some(read), op, value, location)?;
                    self.scopes.emit(IrStmt::new(
                        IrStmtKind::Assign {
                            target: IrExpr::variable(name, location),
                            value,
                        },
                        location,
                    ));
                }
            }
            LoweredTarget::Place(place) => {
                let value = self.assignment_value(Some(place.clone()), op, value, location)?;
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Assign {
                        target: place,
                        value,
                    },
                    location,
                ));
            }
            LoweredTarget::Append(array) => {
                let value = self.assignment_value(None, op, value, location)?;
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Expression(IrExpr::method_call(
                        array,
                        settings::ARRAY_ADD,
                        vec![value],
                        location,
                    )),
                    location,
                ));
            }
        }
        Ok(())
    }

    /// Assignment in expression position: the statement is hoisted and
    /// the expression evaluates to a re-read of the target.
    fn lower_assignment_expression(
        &mut self,
        target: &SourceExpr,
        op: Option<BinaryOp>,
        value: &SourceExpr,
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let target = self.lower_assignment_target(target)?;
        let value = self.lower_expression(value)?;

        match target {
            LoweredTarget::NewLocal { name } => {
                if op.is_none() {
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::VariableDeclaration {
                            name: name.clone(),
                            ty: IrTypeRef::object(),
                            initializer: Some(value),
                        },
                        location,
                    ));
                } else {
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::VariableDeclaration {
                            name: name.clone(),
                            ty: IrTypeRef::object(),
                            initializer: None,
                        },
                        location,
                    ));
                    let read = IrExpr::variable(name.clone(), location);
                    let value = self.assignment_value(Some(read), op, value, location)?;
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::Assign {
                            target: IrExpr::variable(name.clone(), location),
                            value,
                        },
                        location,
                    ));
                }
                Ok(IrExpr::variable(name, location))
            }
            LoweredTarget::Place(place) => {
                let value = self.assignment_value(Some(place.clone()), op, value, location)?;
                self.scopes.hoist(IrStmt::new(
                    IrStmtKind::Assign {
                        target: place.clone(),
                        value,
                    },
                    location,
                ));
                Ok(place)
            }
            LoweredTarget::Append(array) => {
                let value = self.assignment_value(None, op, value, location)?;
                self.scopes.hoist(IrStmt::new(
                    IrStmtKind::Expression(IrExpr::method_call(
                        array,
                        settings::ARRAY_ADD,
                        vec![value.clone()],
                        location,
                    )),
                    location,
                ));
                Ok(value)
            }
        }
    }

    /// `list(a, , b) = expr`: a hoisted temp holding the source value,
    /// one hoisted indexed extraction per target, value = the temp.
    fn lower_list_assign(
        &mut self,
        targets: &[Option<SourceExpr>],
        value: &SourceExpr,
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let value = self.lower_expression(value)?;

        let temp = self.names.next_list_temp();
        self.scopes.declare_local(&temp, KnownType::Object);
        self.scopes.hoist(IrStmt::new(
            IrStmtKind::VariableDeclaration {
                name: temp.clone(),
                ty: IrTypeRef::object(),
                initializer: Some(value),
            },
            location,
        ));

        for (position, target) in targets.iter().enumerate() {
            let Some(target) = target else {
                continue;
            };

            let extraction = IrExpr::new(
                IrExprKind::ArrayIndex {
                    target: Box::new(IrExpr::variable(temp.clone(), location)),
                    index: Box::new(IrExpr::int_value(position as i64, location)),
                },
                location,
            );

            match self.lower_assignment_target(target)? {
                LoweredTarget::NewLocal { name } => {
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::VariableDeclaration {
                            name,
                            ty: IrTypeRef::object(),
                            initializer: Some(extraction),
                        },
                        location,
                    ));
                }
                LoweredTarget::Place(place) => {
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::Assign {
                            target: place,
                            value: extraction,
                        },
                        location,
                    ));
                }
                LoweredTarget::Append(array) => {
                    self.scopes.hoist(IrStmt::new(
                        IrStmtKind::Expression(IrExpr::method_call(
                            array,
                            settings::ARRAY_ADD,
                            vec![extraction],
                            location,
                        )),
                        location,
                    ));
                }
            }
        }

        Ok(IrExpr::variable(temp, location))
    }

    /// `$a++` and friends. Statement position emits the compound assign
    /// directly; expression position hoists it and reconstructs the
    /// pre-step value for the postfix forms.
    pub(crate) fn lower_incdec(
        &mut self,
        op: IncDecOp,
        target: &SourceExpr,
        location: TextLocation,
        as_statement: bool,
    ) -> Result<Option<IrExpr>, TranslateError> {
        let place = match self.lower_assignment_target(target)? {
            LoweredTarget::Place(place) => place,
            LoweredTarget::NewLocal { name } => {
                let declaration = IrStmt::new(
                    IrStmtKind::VariableDeclaration {
                        name: name.clone(),
                        ty: IrTypeRef::object(),
                        initializer: None,
                    },
                    location,
                );
                if as_statement {
                    self.scopes.emit(declaration);
                } else {
                    self.scopes.hoist(declaration);
                }
                IrExpr::variable(name, location)
            }
            LoweredTarget::Append(_) => {
                return_unsupported!(
                    "increment/decrement",
                    "array append is not a supported increment target",
                    location
                )
            }
        };

        let step_op = match op {
            IncDecOp::PreIncrement | IncDecOp::PostIncrement => IrBinaryOp::Add,
            IncDecOp::PreDecrement | IncDecOp::PostDecrement => IrBinaryOp::Subtract,
        };
        let assign = IrStmt::new(
            IrStmtKind::Assign {
                target: place.clone(),
                value: IrExpr::binary(
                    step_op,
                    place.clone(),
                    IrExpr::int_value(1, location),
                    location,
                ),
            },
            location,
        );

        if as_statement {
            self.scopes.emit(assign);
            return Ok(None);
        }
        self.scopes.hoist(assign);

        let value = match op {
            IncDecOp::PreIncrement | IncDecOp::PreDecrement => place,
            // The assignment already ran; PreviousValue undoes the step
            // arithmetically so the expression sees the old value.
            IncDecOp::PostIncrement => operators_call(
                settings::PREVIOUS_VALUE_HELPER,
                vec![place, IrExpr::int_value(1, location)],
                location,
            ),
            IncDecOp::PostDecrement => operators_call(
                settings::PREVIOUS_VALUE_HELPER,
                vec![place, IrExpr::int_value(-1, location)],
                location,
            ),
        };
        Ok(Some(value))
    }

    // =========================================================
    // Array literals
    // =========================================================

    fn lower_array_literal(
        &mut self,
        items: &[ArrayItem],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        if let Some(item) = items.iter().find(|item| item.by_ref) {
            return_unsupported!(
                "array literal",
                "array item passed by reference cannot be translated",
                item.value.location
            );
        }

        if items.iter().any(|item| item.key.is_some()) {
            return self.lower_keyed_array_literal(items, location);
        }

        let mut initializers = Vec::with_capacity(items.len());
        for item in items {
            initializers.push(self.lower_expression(&item.value)?);
        }

        let element_types: Vec<KnownType> = initializers
            .iter()
            .map(|value| self.infer(value))
            .collect();
        let element_name = self.with_inference(|ctx| {
            common_element_type(ctx, &element_types).display_name(ctx)
        });

        lowering_log!("array literal lowered inline, element type {}", element_name);

        Ok(IrExpr::new(
            IrExprKind::ArrayCreate {
                element_type: IrTypeRef::named(element_name),
                initializers,
            },
            location,
        ))
    }

    /// Any keyed item forces the hoisted-temp form: a fresh runtime
    /// array, one hoisted item call per element, value = the temp.
    fn lower_keyed_array_literal(
        &mut self,
        items: &[ArrayItem],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let temp = self.names.next_array_temp();
        let array_type = KnownType::from_type_name(settings::RUNTIME_ARRAY_CLASS, self.symbols());
        self.scopes.declare_local(&temp, array_type);
        self.scopes.hoist(IrStmt::new(
            IrStmtKind::VariableDeclaration {
                name: temp.clone(),
                ty: IrTypeRef::named(settings::RUNTIME_ARRAY_CLASS),
                initializer: Some(IrExpr::new(
                    IrExprKind::ObjectCreate {
                        ty: IrTypeRef::named(settings::RUNTIME_ARRAY_CLASS),
                        args: Vec::new(),
                    },
                    location,
                )),
            },
            location,
        ));

        for item in items {
            let value = self.lower_expression(&item.value)?;
            let call = match &item.key {
                Some(key) => {
                    let key = self.lower_expression(key)?;
                    IrExpr::method_call(
                        IrExpr::variable(temp.clone(), location),
                        settings::ARRAY_SET_ITEM,
                        vec![key, value],
                        location,
                    )
                }
                None => IrExpr::method_call(
                    IrExpr::variable(temp.clone(), location),
                    settings::ARRAY_ADD,
                    vec![value],
                    location,
                ),
            };
            self.scopes
                .hoist(IrStmt::new(IrStmtKind::Expression(call), location));
        }

        Ok(IrExpr::variable(temp, location))
    }

    // =========================================================
    // Calls and construction
    // =========================================================

    fn lower_function_call(
        &mut self,
        name: &QualifiedName,
        args: &[SourceExpr],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        let args = self.lower_expression_list(args)?;

        // A call to one of the enclosing type's own methods keeps its
        // receiver; anything else goes to the runtime function library.
        if !name.is_qualified() {
            let own_method = {
                let (own_name, _, members) = self.scopes.enclosing_type_view();
                members
                    .iter()
                    .find(|m| {
                        m.name == name.short_name()
                            && matches!(m.kind, MemberKind::Method { .. })
                    })
                    .and_then(|m| own_name.map(|own| (own.to_string(), m.is_static)))
            };

            if let Some((own_name, is_static)) = own_method {
                let target = if is_static {
                    IrExpr::type_ref(IrTypeRef::named(own_name), location)
                } else {
                    IrExpr::new(IrExprKind::ThisRef, location)
                };
                return Ok(IrExpr::method_call(
                    target,
                    name.short_name().to_string(),
                    args,
                    location,
                ));
            }
        }

        Ok(runtime_call(
            settings::RUNTIME_FUNCTIONS_CLASS,
            name.short_name(),
            args,
            location,
        ))
    }

    fn lower_new(
        &mut self,
        class: &QualifiedName,
        args: &[SourceExpr],
        location: TextLocation,
    ) -> Result<IrExpr, TranslateError> {
        if let Some(delegate) = self.try_delegate_create(class, args, location)? {
            return Ok(delegate);
        }

        let args = self.lower_expression_list(args)?;
        Ok(IrExpr::new(
            IrExprKind::ObjectCreate {
                ty: self.class_type_ref(class),
                args,
            },
            location,
        ))
    }

    /// Delegate-construction heuristic: `new T(array($obj, 'method'))`.
    /// The decision is made once here and never revisited.
    fn try_delegate_create(
        &mut self,
        class: &QualifiedName,
        args: &[SourceExpr],
        location: TextLocation,
    ) -> Result<Option<IrExpr>, TranslateError> {
        let [only_arg] = args else {
            return Ok(None);
        };
        let SourceExprKind::ArrayLiteral(items) = &only_arg.kind else {
            return Ok(None);
        };
        let [receiver, method] = items.as_slice() else {
            return Ok(None);
        };
        if receiver.key.is_some() || method.key.is_some() || receiver.by_ref || method.by_ref {
            return Ok(None);
        }
        let SourceExprKind::Str(method_name) = &method.value.kind else {
            return Ok(None);
        };

        use crate::settings::DelegateDetection;
        let matches = match self.config.delegate_detection {
            DelegateDetection::Disabled => false,
            DelegateDetection::AnySyntacticMatch => true,
            DelegateDetection::ByResolvedType => match self.class_handle(class) {
                Some(handle) => {
                    let is_delegate = self
                        .symbols()
                        .type_info(handle)
                        .map(|info| info.is_delegate)
                        .unwrap_or(false);
                    is_delegate && self.symbols().constructors_with_arity(handle, 2)
                }
                None => false,
            },
        };
        if !matches {
            return Ok(None);
        }

        let target = self.lower_expression(&receiver.value)?;
        Ok(Some(IrExpr::new(
            IrExprKind::DelegateCreate {
                delegate_type: self.class_type_ref(class),
                target: Box::new(target),
                method_name: method_name.clone(),
            },
            location,
        )))
    }
}
