//! IR pretty printing
//!
//! Indented tree rendering of a lowered namespace, for the `show_ir`
//! feature and for eyeballing translator output in tests. This is a
//! debugging surface — the real rendering of the IR belongs to the
//! external emitter.

use crate::ir::ir_nodes::*;
use std::fmt;

struct IrPrinter<'a, 'b> {
    out: &'a mut fmt::Formatter<'b>,
    indent: usize,
}

impl<'a, 'b> IrPrinter<'a, 'b> {
    fn line(&mut self, text: &str) -> fmt::Result {
        for _ in 0..self.indent {
            write!(self.out, "  ")?;
        }
        writeln!(self.out, "{}", text)
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    fn namespace(&mut self, ns: &IrNamespace) -> fmt::Result {
        match &ns.name {
            Some(name) => self.line(&format!("namespace {}", name))?,
            None => self.line("namespace <global>")?,
        }
        for import in &ns.imports {
            self.line(&format!("import {}", import))?;
        }
        for ty in &ns.types {
            self.type_decl(ty)?;
        }
        Ok(())
    }

    fn type_decl(&mut self, ty: &IrTypeDecl) -> fmt::Result {
        let bases: Vec<String> = ty.base_types.iter().map(|b| b.display_name()).collect();
        if bases.is_empty() {
            self.line(&format!("class {}", ty.name))?;
        } else {
            self.line(&format!("class {} : {}", ty.name, bases.join(", ")))?;
        }
        self.nested(|p| {
            for attribute in &ty.attributes {
                p.line(&format!("[{}]", attribute.name))?;
            }
            for member in &ty.members {
                p.member(member)?;
            }
            Ok(())
        })
    }

    fn member(&mut self, member: &IrMember) -> fmt::Result {
        match member {
            IrMember::Field(field) => {
                let storage = if field.is_static { "static field" } else { "field" };
                match &field.initializer {
                    Some(init) => self.line(&format!(
                        "{} {} : {} = {}",
                        storage,
                        field.name,
                        field.ty.display_name(),
                        expr_text(init)
                    )),
                    None => self.line(&format!(
                        "{} {} : {}",
                        storage,
                        field.name,
                        field.ty.display_name()
                    )),
                }
            }
            IrMember::Property(property) => {
                self.line(&format!(
                    "property {} : {}",
                    property.name,
                    property.ty.display_name()
                ))?;
                self.nested(|p| {
                    for stmt in &property.getter {
                        p.stmt(stmt)?;
                    }
                    for stmt in &property.setter {
                        p.stmt(stmt)?;
                    }
                    Ok(())
                })
            }
            IrMember::Constant(constant) => self.line(&format!(
                "const {} = {}",
                constant.name,
                expr_text(&constant.value)
            )),
            IrMember::Method(method) => {
                let params: Vec<String> = method
                    .params
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty.display_name()))
                    .collect();
                self.line(&format!("method {}({})", method.name, params.join(", ")))?;
                self.nested(|p| {
                    for stmt in &method.body {
                        p.stmt(stmt)?;
                    }
                    Ok(())
                })
            }
            IrMember::Constructor(ctor) => {
                let params: Vec<String> = ctor
                    .params
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty.display_name()))
                    .collect();
                self.line(&format!("constructor({})", params.join(", ")))?;
                self.nested(|p| {
                    for stmt in &ctor.body {
                        p.stmt(stmt)?;
                    }
                    Ok(())
                })
            }
        }
    }

    fn stmt(&mut self, stmt: &IrStmt) -> fmt::Result {
        match &stmt.kind {
            IrStmtKind::Block(body) => {
                self.line("block")?;
                self.nested(|p| body.iter().try_for_each(|s| p.stmt(s)))
            }
            IrStmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if {}", expr_text(condition)))?;
                self.nested(|p| then_branch.iter().try_for_each(|s| p.stmt(s)))?;
                if !else_branch.is_empty() {
                    self.line("else")?;
                    self.nested(|p| else_branch.iter().try_for_each(|s| p.stmt(s)))?;
                }
                Ok(())
            }
            IrStmtKind::Iteration {
                init,
                test,
                step,
                body,
            } => {
                let test_text = test.as_ref().map(expr_text).unwrap_or_default();
                self.line(&format!("loop (test: {})", test_text))?;
                self.nested(|p| {
                    if let Some(init) = init {
                        p.line("init:")?;
                        p.nested(|p| p.stmt(init))?;
                    }
                    if let Some(step) = step {
                        p.line("step:")?;
                        p.nested(|p| p.stmt(step))?;
                    }
                    body.iter().try_for_each(|s| p.stmt(s))
                })
            }
            IrStmtKind::Labeled { label, statement } => {
                self.line(&format!("label {}:", label))?;
                match statement {
                    Some(inner) => self.nested(|p| p.stmt(inner)),
                    None => Ok(()),
                }
            }
            IrStmtKind::Goto { label } => self.line(&format!("goto {}", label)),
            IrStmtKind::Return(value) => match value {
                Some(value) => self.line(&format!("return {}", expr_text(value))),
                None => self.line("return"),
            },
            IrStmtKind::Throw(value) => self.line(&format!("throw {}", expr_text(value))),
            IrStmtKind::TryCatch { body, catches } => {
                self.line("try")?;
                self.nested(|p| body.iter().try_for_each(|s| p.stmt(s)))?;
                for catch in catches {
                    self.line(&format!(
                        "catch ({} {})",
                        catch.exception_type.display_name(),
                        catch.variable
                    ))?;
                    self.nested(|p| catch.body.iter().try_for_each(|s| p.stmt(s)))?;
                }
                Ok(())
            }
            IrStmtKind::Assign { target, value } => {
                self.line(&format!("{} = {}", expr_text(target), expr_text(value)))
            }
            IrStmtKind::Expression(expr) => self.line(&expr_text(expr)),
            IrStmtKind::VariableDeclaration {
                name,
                ty,
                initializer,
            } => match initializer {
                Some(init) => self.line(&format!(
                    "var {} : {} = {}",
                    name,
                    ty.display_name(),
                    expr_text(init)
                )),
                None => self.line(&format!("var {} : {}", name, ty.display_name())),
            },
            IrStmtKind::AttachEvent {
                target,
                event,
                handler,
            } => self.line(&format!(
                "{}.{} += {}",
                expr_text(target),
                event,
                expr_text(handler)
            )),
            IrStmtKind::DetachEvent {
                target,
                event,
                handler,
            } => self.line(&format!(
                "{}.{} -= {}",
                expr_text(target),
                event,
                expr_text(handler)
            )),
        }
    }
}

fn binary_op_text(op: IrBinaryOp) -> &'static str {
    match op {
        IrBinaryOp::Add => "+",
        IrBinaryOp::Subtract => "-",
        IrBinaryOp::Multiply => "*",
        IrBinaryOp::Divide => "/",
        IrBinaryOp::Modulus => "%",
        IrBinaryOp::Concatenate => "~",
        IrBinaryOp::BitwiseAnd => "&",
        IrBinaryOp::BitwiseOr => "|",
        IrBinaryOp::BitwiseXor => "^",
        IrBinaryOp::ShiftLeft => "<<",
        IrBinaryOp::ShiftRight => ">>",
        IrBinaryOp::BooleanAnd => "&&",
        IrBinaryOp::BooleanOr => "||",
        IrBinaryOp::ValueEquality => "==",
        IrBinaryOp::ValueInequality => "!=",
        IrBinaryOp::IdentityEquality => "===",
        IrBinaryOp::IdentityInequality => "!==",
        IrBinaryOp::LessThan => "<",
        IrBinaryOp::LessThanOrEqual => "<=",
        IrBinaryOp::GreaterThan => ">",
        IrBinaryOp::GreaterThanOrEqual => ">=",
    }
}

fn expr_text(expr: &IrExpr) -> String {
    match &expr.kind {
        IrExprKind::Binary { op, left, right } => format!(
            "({} {} {})",
            expr_text(left),
            binary_op_text(*op),
            expr_text(right)
        ),
        IrExprKind::Unary { op, operand } => {
            let symbol = match op {
                IrUnaryOp::Negate => "-",
                IrUnaryOp::Not => "!",
                IrUnaryOp::BitwiseNot => "~",
            };
            format!("{}{}", symbol, expr_text(operand))
        }
        IrExprKind::MethodCall {
            target,
            method,
            args,
        } => {
            let args: Vec<String> = args.iter().map(expr_text).collect();
            format!("{}.{}({})", expr_text(target), method, args.join(", "))
        }
        IrExprKind::FieldRef { target, name } => format!("{}.{}", expr_text(target), name),
        IrExprKind::PropertyRef { target, name } => {
            format!("{}.{}{{prop}}", expr_text(target), name)
        }
        IrExprKind::VariableRef(name) => name.clone(),
        IrExprKind::ThisRef => "this".to_string(),
        IrExprKind::TypeRef(ty) => ty.display_name(),
        IrExprKind::Primitive(literal) => match literal {
            IrLiteral::Null => "null".to_string(),
            IrLiteral::Bool(value) => value.to_string(),
            IrLiteral::Int(value) => value.to_string(),
            IrLiteral::Float(value) => value.to_string(),
            IrLiteral::Str(value) => format!("{:?}", value),
        },
        IrExprKind::ObjectCreate { ty, args } => {
            let args: Vec<String> = args.iter().map(expr_text).collect();
            format!("new {}({})", ty.display_name(), args.join(", "))
        }
        IrExprKind::ArrayCreate {
            element_type,
            initializers,
        } => {
            let items: Vec<String> = initializers.iter().map(expr_text).collect();
            format!("new {}[] {{{}}}", element_type.display_name(), items.join(", "))
        }
        IrExprKind::ArrayIndex { target, index } => {
            format!("{}[{}]", expr_text(target), expr_text(index))
        }
        IrExprKind::Cast { ty, expr } => format!("({}){}", ty.display_name(), expr_text(expr)),
        IrExprKind::TypeOf(ty) => format!("typeof({})", ty.display_name()),
        IrExprKind::DelegateCreate {
            delegate_type,
            target,
            method_name,
        } => format!(
            "new {}({}.{})",
            delegate_type.display_name(),
            expr_text(target),
            method_name
        ),
    }
}

impl fmt::Display for IrNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = IrPrinter { out: f, indent: 0 };
        printer.namespace(self)
    }
}
