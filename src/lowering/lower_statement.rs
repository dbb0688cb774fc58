//! Statement Lowering
//!
//! Translates every PHP statement shape into the IR statement primitives,
//! driving the scope chain, the label allocator, and expression lowering.
//!
//! The IR has no native elseif chain, no do-while, no foreach, no switch
//! and no break/continue — all of those are rewritten here into the
//! block/conditional/iteration/label/goto set. The shapes are documented
//! per construct below; label placement differs by loop kind so that
//! `continue` lands where the loop's re-test actually happens.

use crate::ir::ir_nodes::{
    IrBinaryOp, IrCatchClause, IrExpr, IrExprKind, IrField, IrStmt, IrStmtKind, IrTypeRef,
    IrVisibility,
};
use crate::lowering::builder::{TranslationState, operators_call, unset_sentinel};
use crate::lowering::label_allocator::{LoopKind, NameAllocator};
use crate::lowering::scope_chain::{BreakKind, BreakTargetRequest, ScopeKind};
use crate::lowering::lower_expression::LoweredTarget;
use crate::messages::translate_errors::TranslateError;
use crate::settings::{self, EventRecognition};
use crate::source_ast::locations::TextLocation;
use crate::source_ast::source_nodes::{
    CatchClause, IfClause, SourceExpr, SourceExprKind, SourceStmt, SourceStmtKind, StaticVar,
    SwitchCase,
};
use crate::types::inference::KnownType;
use crate::{lowering_log, return_unsupported};

impl<'a> TranslationState<'a> {
    pub(crate) fn lower_statement(&mut self, stmt: &SourceStmt) -> Result<(), TranslateError> {
        let location = stmt.location;

        match &stmt.kind {
            SourceStmtKind::Block(body) => {
                let body = self.lower_statement_list(body, ScopeKind::Block)?;
                self.scopes.emit(IrStmt::new(IrStmtKind::Block(body), location));
                Ok(())
            }

            SourceStmtKind::Expression(expr) => self.lower_expression_statement(expr),

            SourceStmtKind::Echo(operands) => {
                for operand in operands {
                    let lowered = self.lower_expression(operand)?;
                    self.scopes.emit(IrStmt::new(
                        IrStmtKind::Expression(operators_call(
                            settings::ECHO_HELPER,
                            vec![lowered],
                            operand.location,
                        )),
                        location,
                    ));
                }
                Ok(())
            }

            SourceStmtKind::If { clauses } => self.lower_if(clauses, location),

            SourceStmtKind::While { condition, body } => {
                self.lower_while(condition, body, location)
            }

            SourceStmtKind::DoWhile { body, condition } => {
                self.lower_do_while(body, condition, location)
            }

            SourceStmtKind::For {
                init,
                condition,
                step,
                body,
            } => self.lower_for(init, condition, step, body, location),

            SourceStmtKind::Foreach {
                array,
                key,
                value,
                body,
            } => self.lower_foreach(array, key.as_ref(), value, body, location),

            SourceStmtKind::Switch { subject, cases } => {
                self.lower_switch(subject, cases, location)
            }

            SourceStmtKind::Break { levels } => {
                self.lower_break_continue(BreakKind::Break, *levels, "break", location)
            }
            SourceStmtKind::Continue { levels } => {
                self.lower_break_continue(BreakKind::Continue, *levels, "continue", location)
            }

            SourceStmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => Some(self.lower_expression(expr)?),
                    None => None,
                };
                self.scopes
                    .emit(IrStmt::new(IrStmtKind::Return(value), location));
                Ok(())
            }

            SourceStmtKind::Throw(expr) => {
                let lowered = self.lower_expression(expr)?;
                self.scopes
                    .emit(IrStmt::new(IrStmtKind::Throw(lowered), location));
                Ok(())
            }

            SourceStmtKind::Try { body, catches } => self.lower_try(body, catches, location),

            SourceStmtKind::Goto(label) => {
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Goto {
                        label: label.clone(),
                    },
                    location,
                ));
                Ok(())
            }

            SourceStmtKind::Label(label) => {
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Labeled {
                        label: label.clone(),
                        statement: None,
                    },
                    location,
                ));
                Ok(())
            }

            SourceStmtKind::StaticDecl(vars) => self.lower_static_decl(vars, location),

            SourceStmtKind::Unset(targets) => self.lower_unset(targets, location),

            SourceStmtKind::Global(_) => return_unsupported!(
                "global",
                "the global statement cannot be translated",
                location
            ),
            SourceStmtKind::FunctionDecl { name } => return_unsupported!(
                "function declaration",
                format!("function '{}' cannot be declared inside a method body", name),
                location
            ),
            SourceStmtKind::ConstDecl { name } => return_unsupported!(
                "constant declaration",
                format!("global constant '{}' cannot be translated", name),
                location
            ),

            SourceStmtKind::Nop => Ok(()),
        }
    }

    /// Lowers a statement list inside a fresh scope and hands back the
    /// scope's buffer for the caller's IR container.
    pub(crate) fn lower_statement_list(
        &mut self,
        stmts: &[SourceStmt],
        kind: ScopeKind,
    ) -> Result<Vec<IrStmt>, TranslateError> {
        self.scopes.push(kind);
        let result = stmts.iter().try_for_each(|stmt| self.lower_statement(stmt));
        let scope = self.scopes.pop();
        result?;
        Ok(scope.map(|scope| scope.statements).unwrap_or_default())
    }

    // =========================================================
    // Expression statements
    // =========================================================

    fn lower_expression_statement(&mut self, expr: &SourceExpr) -> Result<(), TranslateError> {
        let location = expr.location;

        match &expr.kind {
            SourceExprKind::Assign { target, op, value } => {
                self.emit_assignment(target, *op, value, location)
            }

            SourceExprKind::IncDec { op, target } => {
                self.lower_incdec(*op, target, location, true)?;
                Ok(())
            }

            // The hoisted extraction statements are the whole effect; the
            // temp's value is not re-emitted.
            SourceExprKind::ListAssign { .. } => {
                self.lower_expression(expr)?;
                Ok(())
            }

            SourceExprKind::MethodCall { .. } => {
                if self.try_lower_event_statement(expr)? {
                    return Ok(());
                }
                let lowered = self.lower_expression(expr)?;
                self.scopes
                    .emit(IrStmt::new(IrStmtKind::Expression(lowered), location));
                Ok(())
            }

            _ => {
                let lowered = self.lower_expression(expr)?;
                self.scopes
                    .emit(IrStmt::new(IrStmtKind::Expression(lowered), location));
                Ok(())
            }
        }
    }

    /// `$expr->Event->Add($h)` / `->Remove($h)` at statement level. Only
    /// reachable here — nested occurrences lower as plain calls.
    fn try_lower_event_statement(&mut self, expr: &SourceExpr) -> Result<bool, TranslateError> {
        if self.config.event_recognition == EventRecognition::Disabled {
            return Ok(false);
        }

        let SourceExprKind::MethodCall { target, name, args } = &expr.kind else {
            return Ok(false);
        };
        let attach = match name.as_str() {
            "Add" => true,
            "Remove" => false,
            _ => return Ok(false),
        };
        let [handler_src] = args.as_slice() else {
            return Ok(false);
        };
        let SourceExprKind::PropertyAccess {
            target: receiver,
            name: event,
        } = &target.kind
        else {
            return Ok(false);
        };

        let location = expr.location;
        let receiver_ir = self.lower_expression(receiver)?;
        let handler = self.lower_expression(handler_src)?;

        let recognized = match self.config.event_recognition {
            EventRecognition::AnySyntacticMatch => true,
            EventRecognition::DelegateArgumentOnly => {
                matches!(handler.kind, IrExprKind::DelegateCreate { .. })
            }
            EventRecognition::Disabled => false,
        };

        if recognized {
            lowering_log!("recognized event {} on '{}'", name, event);
            let kind = if attach {
                IrStmtKind::AttachEvent {
                    target: receiver_ir,
                    event: event.clone(),
                    handler,
                }
            } else {
                IrStmtKind::DetachEvent {
                    target: receiver_ir,
                    event: event.clone(),
                    handler,
                }
            };
            self.scopes.emit(IrStmt::new(kind, location));
        } else {
            // Not an event after all; keep the ordinary call shape using
            // the pieces already lowered.
            let member = self.member_reference(receiver_ir, event, target.location);
            self.scopes.emit(IrStmt::new(
                IrStmtKind::Expression(IrExpr::method_call(
                    member,
                    name.clone(),
                    vec![handler],
                    location,
                )),
                location,
            ));
        }
        Ok(true)
    }

    // =========================================================
    // Conditionals
    // =========================================================

    /// Flat `if`/`elseif`/`else` clause list -> right-nested
    /// conditionals: clause k becomes the else-branch of clause k-1, and
    /// the else body (legal only in final position) attaches innermost.
    fn lower_if(
        &mut self,
        clauses: &[IfClause],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let mut conditional_clauses = Vec::new();
        let mut else_clause = None;

        for (index, clause) in clauses.iter().enumerate() {
            match &clause.condition {
                Some(condition) => conditional_clauses.push((condition, clause)),
                None => {
                    if index + 1 != clauses.len() {
                        return_unsupported!(
                            "else",
                            "an else clause is only legal as the final clause",
                            clause.location
                        );
                    }
                    else_clause = Some(clause);
                }
            }
        }

        if conditional_clauses.is_empty() {
            crate::return_translator_bug!("if statement with no conditional clause", location);
        }

        // Conditions lower in source order so their hoisted statements
        // keep PHP's evaluation order.
        let mut conditions = Vec::with_capacity(conditional_clauses.len());
        for (condition, _) in &conditional_clauses {
            conditions.push(self.lower_expression(condition)?);
        }

        let mut else_branch = match else_clause {
            Some(clause) => self.lower_statement_list(&clause.body, ScopeKind::Block)?,
            None => Vec::new(),
        };

        for (condition, (_, clause)) in conditions
            .into_iter()
            .zip(conditional_clauses.iter())
            .rev()
        {
            let then_branch = self.lower_statement_list(&clause.body, ScopeKind::Block)?;
            else_branch = vec![IrStmt::new(
                IrStmtKind::If {
                    condition,
                    then_branch,
                    else_branch,
                },
                clause.location,
            )];
        }

        if let Some(outer) = else_branch.pop() {
            self.scopes.emit(outer);
        }
        Ok(())
    }

    // =========================================================
    // Loops
    // =========================================================

    /// `while`: start label sits immediately before the iteration
    /// statement, so `continue` re-enters through the test.
    fn lower_while(
        &mut self,
        condition: &SourceExpr,
        body: &[SourceStmt],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let test = self.lower_expression(condition)?;
        let labels = self.names.next_loop_labels(LoopKind::While);

        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: labels.start.clone(),
                statement: None,
            },
            location,
        ));

        let end_label = labels.end.clone();
        let body = self.lower_statement_list(body, ScopeKind::Loop { labels })?;

        self.scopes.emit(IrStmt::new(
            IrStmtKind::Iteration {
                init: None,
                test: Some(test),
                step: None,
                body,
            },
            location,
        ));
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: end_label,
                statement: None,
            },
            location,
        ));
        Ok(())
    }

    /// `do-while`: body first, then the bottom test as a conditional
    /// goto back to the start label at the body top.
    fn lower_do_while(
        &mut self,
        body: &[SourceStmt],
        condition: &SourceExpr,
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let labels = self.names.next_loop_labels(LoopKind::DoWhile);
        let start_label = labels.start.clone();
        let end_label = labels.end.clone();

        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: start_label.clone(),
                statement: None,
            },
            location,
        ));

        let body_stmts = self.lower_statement_list(body, ScopeKind::Loop { labels })?;
        for stmt in body_stmts {
            self.scopes.emit(stmt);
        }

        let test = self.lower_expression(condition)?;
        self.scopes.emit(IrStmt::new(
            IrStmtKind::If {
                condition: test,
                then_branch: vec![IrStmt::new(
                    IrStmtKind::Goto { label: start_label },
                    location,
                )],
                else_branch: Vec::new(),
            },
            location,
        ));
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: end_label,
                statement: None,
            },
            location,
        ));
        Ok(())
    }

    /// `for` with comma groups: the first item of each group takes the
    /// header's single slot; remaining init/condition items become
    /// standalone statements before the header, remaining step items run
    /// at the bottom of the body after the start label so `continue`
    /// still executes them.
    fn lower_for(
        &mut self,
        init: &[SourceExpr],
        condition: &[SourceExpr],
        step: &[SourceExpr],
        body: &[SourceStmt],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let (init_slot_src, init_rest) = match init.split_first() {
            Some((first, rest)) => (Some(first), rest),
            None => (None, &[] as &[SourceExpr]),
        };
        for extra in init_rest {
            self.lower_expression_statement(extra)?;
        }
        let init_slot = match init_slot_src {
            Some(expr) => self.lower_header_item(expr)?,
            None => None,
        };

        let (test_src, condition_rest) = match condition.split_first() {
            Some((first, rest)) => (Some(first), rest),
            None => (None, &[] as &[SourceExpr]),
        };
        for extra in condition_rest {
            self.lower_expression_statement(extra)?;
        }
        let test = match test_src {
            Some(expr) => Some(self.lower_expression(expr)?),
            None => None,
        };

        let labels = self.names.next_loop_labels(LoopKind::For);
        let start_label = labels.start.clone();
        let end_label = labels.end.clone();

        let body_stmts = {
            self.scopes.push(ScopeKind::Loop { labels });
            let result = (|| -> Result<(), TranslateError> {
                for stmt in body {
                    self.lower_statement(stmt)?;
                }
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Labeled {
                        label: start_label,
                        statement: None,
                    },
                    location,
                ));
                for extra in &step[1.min(step.len())..] {
                    self.lower_expression_statement(extra)?;
                }
                Ok(())
            })();
            let scope = self.scopes.pop();
            result?;
            scope.map(|scope| scope.statements).unwrap_or_default()
        };

        let step_slot = match step.first() {
            Some(expr) => self.lower_header_item(expr)?,
            None => None,
        };

        self.scopes.emit(IrStmt::new(
            IrStmtKind::Iteration {
                init: init_slot.map(Box::new),
                test,
                step: step_slot.map(Box::new),
                body: body_stmts,
            },
            location,
        ));
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: end_label,
                statement: None,
            },
            location,
        ));
        Ok(())
    }

    /// Lowers one comma-group item into a single statement for a header
    /// slot. Hoisted extras spill into the current buffer before the
    /// loop.
    fn lower_header_item(
        &mut self,
        expr: &SourceExpr,
    ) -> Result<Option<IrStmt>, TranslateError> {
        self.scopes.push(ScopeKind::Block);
        let result = self.lower_expression_statement(expr);
        let scope = self.scopes.pop();
        result?;

        let mut stmts = scope.map(|scope| scope.statements).unwrap_or_default();
        let slot = stmts.pop();
        for extra in stmts {
            self.scopes.emit(extra);
        }
        Ok(slot)
    }

    /// `foreach`: an explicit while-style loop over a snapshot and a
    /// continuation flag using reset/next/key/current calls. The advance
    /// is eager — flag and key/value are read at the top of each body —
    /// so `continue` (start label before the loop) re-tests correctly.
    fn lower_foreach(
        &mut self,
        array: &SourceExpr,
        key: Option<&SourceExpr>,
        value: &SourceExpr,
        body: &[SourceStmt],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let array_ir = self.lower_expression(array)?;

        let (snapshot, flag) = self.names.next_foreach_temps();
        let array_type = KnownType::from_type_name(settings::RUNTIME_ARRAY_CLASS, self.symbols());
        self.scopes.declare_local(&snapshot, array_type);
        self.scopes.declare_local(&flag, KnownType::Bool);

        self.scopes.emit(IrStmt::new(
            IrStmtKind::VariableDeclaration {
                name: snapshot.clone(),
                ty: IrTypeRef::named(settings::RUNTIME_ARRAY_CLASS),
                initializer: Some(IrExpr::new(
                    IrExprKind::Cast {
                        ty: IrTypeRef::named(settings::RUNTIME_ARRAY_CLASS),
                        expr: Box::new(array_ir),
                    },
                    location,
                )),
            },
            location,
        ));
        self.scopes.emit(IrStmt::new(
            IrStmtKind::VariableDeclaration {
                name: flag.clone(),
                ty: IrTypeRef::named(settings::BOOL_TYPE),
                initializer: Some(IrExpr::method_call(
                    IrExpr::variable(snapshot.clone(), location),
                    settings::ARRAY_RESET,
                    Vec::new(),
                    location,
                )),
            },
            location,
        ));

        let labels = self.names.next_loop_labels(LoopKind::Foreach);
        let end_label = labels.end.clone();
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: labels.start.clone(),
                statement: None,
            },
            location,
        ));

        let body_stmts = {
            self.scopes.push(ScopeKind::Loop { labels });
            let result = (|| -> Result<(), TranslateError> {
                let current = IrExpr::method_call(
                    IrExpr::variable(snapshot.clone(), location),
                    settings::ARRAY_CURRENT,
                    Vec::new(),
                    location,
                );
                self.emit_target_assignment(value, current, location)?;

                if let Some(key_target) = key {
                    let key_value = IrExpr::method_call(
                        IrExpr::variable(snapshot.clone(), location),
                        settings::ARRAY_KEY,
                        Vec::new(),
                        location,
                    );
                    self.emit_target_assignment(key_target, key_value, location)?;
                }

                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Assign {
                        target: IrExpr::variable(flag.clone(), location),
                        value: IrExpr::method_call(
                            IrExpr::variable(snapshot.clone(), location),
                            settings::ARRAY_NEXT,
                            Vec::new(),
                            location,
                        ),
                    },
                    location,
                ));

                for stmt in body {
                    self.lower_statement(stmt)?;
                }
                Ok(())
            })();
            let scope = self.scopes.pop();
            result?;
            scope.map(|scope| scope.statements).unwrap_or_default()
        };

        self.scopes.emit(IrStmt::new(
            IrStmtKind::Iteration {
                init: None,
                test: Some(IrExpr::variable(flag, location)),
                step: None,
                body: body_stmts,
            },
            location,
        ));
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: end_label,
                statement: None,
            },
            location,
        ));
        Ok(())
    }

    fn emit_target_assignment(
        &mut self,
        target: &SourceExpr,
        value: IrExpr,
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        match self.lower_assignment_target(target)? {
            LoweredTarget::NewLocal { name } => {
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::VariableDeclaration {
                        name,
                        ty: IrTypeRef::object(),
                        initializer: Some(value),
                    },
                    location,
                ));
            }
            LoweredTarget::Place(place) => {
                self.scopes.emit(IrStmt::new(
                    IrStmtKind::Assign {
                        target: place,
                        value,
                    },
                    location,
                ));
            }
            LoweredTarget::Append(array) => {
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

    // =========================================================
    // Switch
    // =========================================================

    /// `switch`: hoisted subject temp, one independent conditional per
    /// case (default tests true), each case body starting with its own
    /// label, and fallthrough emulated by a goto into the next case's
    /// label. No native switch construct exists in the IR.
    fn lower_switch(
        &mut self,
        subject: &SourceExpr,
        cases: &[SwitchCase],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let subject_ir = self.lower_expression(subject)?;

        let temp = self.names.next_switch_temp();
        self.scopes.declare_local(&temp, KnownType::Object);
        self.scopes.emit(IrStmt::new(
            IrStmtKind::VariableDeclaration {
                name: temp.clone(),
                ty: IrTypeRef::object(),
                initializer: Some(subject_ir),
            },
            location,
        ));

        let labels = self.names.next_loop_labels(LoopKind::Switch);
        let end_label = labels.end.clone();
        let case_labels: Vec<String> =
            cases.iter().map(|_| self.names.next_case_label()).collect();

        self.scopes.push(ScopeKind::Switch {
            end_label: end_label.clone(),
        });
        let result = (|| -> Result<(), TranslateError> {
            for (index, case) in cases.iter().enumerate() {
                let test = match &case.test {
                    Some(expr) => {
                        let value = self.lower_expression(expr)?;
                        IrExpr::binary(
                            IrBinaryOp::ValueEquality,
                            IrExpr::variable(temp.clone(), case.location),
                            value,
                            case.location,
                        )
                    }
                    None => IrExpr::bool_value(true, case.location),
                };

                let then_branch = {
                    self.scopes.push(ScopeKind::Block);
                    let inner = (|| -> Result<(), TranslateError> {
                        self.scopes.emit(IrStmt::new(
                            IrStmtKind::Labeled {
                                label: case_labels[index].clone(),
                                statement: None,
                            },
                            case.location,
                        ));
                        for stmt in &case.body {
                            self.lower_statement(stmt)?;
                        }
                        if index + 1 < cases.len() {
                            self.scopes.emit(IrStmt::new(
                                IrStmtKind::Goto {
                                    label: case_labels[index + 1].clone(),
                                },
                                case.location,
                            ));
                        }
                        Ok(())
                    })();
                    let scope = self.scopes.pop();
                    inner?;
                    scope.map(|scope| scope.statements).unwrap_or_default()
                };

                self.scopes.emit(IrStmt::new(
                    IrStmtKind::If {
                        condition: test,
                        then_branch,
                        else_branch: Vec::new(),
                    },
                    case.location,
                ));
            }
            Ok(())
        })();
        let switch_scope = self.scopes.pop();
        result?;

        for stmt in switch_scope.map(|scope| scope.statements).unwrap_or_default() {
            self.scopes.emit(stmt);
        }
        self.scopes.emit(IrStmt::new(
            IrStmtKind::Labeled {
                label: end_label,
                statement: None,
            },
            location,
        ));
        Ok(())
    }

    // =========================================================
    // Break / continue
    // =========================================================

    fn lower_break_continue(
        &mut self,
        kind: BreakKind,
        levels: u32,
        construct: &'static str,
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        if levels == 0 {
            return_unsupported!(construct, "level count must be at least 1", location);
        }

        let request = BreakTargetRequest { levels, kind };
        match self.scopes.resolve_break_target(request) {
            Some(label) => {
                self.scopes
                    .emit(IrStmt::new(IrStmtKind::Goto { label }, location));
                Ok(())
            }
            None => return_unsupported!(
                construct,
                format!("{} {} escapes every enclosing loop", construct, levels),
                location
            ),
        }
    }

    // =========================================================
    // Try / catch
    // =========================================================

    fn lower_try(
        &mut self,
        body: &[SourceStmt],
        catches: &[CatchClause],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let body = self.lower_statement_list(body, ScopeKind::Block)?;

        let mut lowered_catches = Vec::with_capacity(catches.len());
        for catch in catches {
            let exception_type = self.class_type_ref(&catch.class);
            let known = match self.class_handle(&catch.class) {
                Some(handle) => KnownType::Class(handle),
                None => KnownType::Unknown,
            };
            self.scopes.declare_local(&catch.variable, known);

            let body = self.lower_statement_list(&catch.body, ScopeKind::Block)?;
            lowered_catches.push(IrCatchClause {
                exception_type,
                variable: self.scopes.effective_local_name(&catch.variable),
                body,
            });
        }

        self.scopes.emit(IrStmt::new(
            IrStmtKind::TryCatch {
                body,
                catches: lowered_catches,
            },
            location,
        ));
        Ok(())
    }

    // =========================================================
    // Static variable promotion
    // =========================================================

    /// `static $x = init;` promotes to a uniquely named private static
    /// field on the enclosing type. A second declaration of the same
    /// name in one method is a translation error. The statement itself
    /// vanishes — later references read the field.
    fn lower_static_decl(
        &mut self,
        vars: &[StaticVar],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        let Some((method_name, _)) = self.scopes.enclosing_method() else {
            return_unsupported!(
                "static declaration",
                "static variables are only supported inside methods",
                location
            );
        };
        let method_name = method_name.to_string();

        for var in vars {
            let field_name = NameAllocator::static_field_name(&method_name, &var.name);
            if !self.scopes.register_static(&var.name, field_name.clone()) {
                return_unsupported!(
                    "static declaration",
                    format!(
                        "static variable '{}' is declared twice in method '{}'",
                        var.name, method_name
                    ),
                    var.location
                );
            }

            let initializer = match &var.initializer {
                Some(expr) => Some(self.lower_expression(expr)?),
                None => None,
            };

            self.scopes.add_promoted_field(IrField {
                name: field_name,
                ty: IrTypeRef::object(),
                visibility: IrVisibility::Private,
                is_static: true,
                initializer,
            });
        }
        Ok(())
    }

    // =========================================================
    // Unset
    // =========================================================

    /// `unset($x)` assigns null to plain locals. Member and indexed
    /// targets get the runtime's distinguished unset value instead —
    /// an acknowledged approximation of removal.
    fn lower_unset(
        &mut self,
        targets: &[SourceExpr],
        location: TextLocation,
    ) -> Result<(), TranslateError> {
        for target in targets {
            match &target.kind {
                SourceExprKind::Variable(name) => {
                    if name == "this" {
                        return_unsupported!("unset", "cannot unset $this", target.location);
                    }
                    let (place, value) = match self.scopes.static_field_for(name) {
                        Some(field) => (
                            self.own_static_field_ref(&field, target.location),
                            unset_sentinel(target.location),
                        ),
                        None => (
                            IrExpr::variable(
                                self.scopes.effective_local_name(name),
                                target.location,
                            ),
                            IrExpr::null(target.location),
                        ),
                    };
                    self.scopes.emit(IrStmt::new(
                        IrStmtKind::Assign {
                            target: place,
                            value,
                        },
                        location,
                    ));
                }

                SourceExprKind::PropertyAccess { .. }
                | SourceExprKind::StaticPropertyAccess { .. }
                | SourceExprKind::Index { index: Some(_), .. } => {
                    match self.lower_assignment_target(target)? {
                        LoweredTarget::Place(place) => {
                            self.scopes.emit(IrStmt::new(
                                IrStmtKind::Assign {
                                    target: place,
                                    value: unset_sentinel(target.location),
                                },
                                location,
                            ));
                        }
                        _ => return_unsupported!(
                            "unset",
                            "not a supported unset target",
                            target.location
                        ),
                    }
                }

                other => return_unsupported!(
                    other.describe(),
                    "not a supported unset target",
                    target.location
                ),
            }
        }
        Ok(())
    }
}
