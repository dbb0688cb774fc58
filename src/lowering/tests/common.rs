//! Shared constructors for lowering tests. Building source trees by hand
//! is noisy; these keep the actual tests readable.

use crate::ir::ir_nodes::{IrMember, IrNamespace, IrStmt, IrStmtKind};
use crate::messages::translate_errors::TranslateError;
use crate::settings::TranslatorConfig;
use crate::source_ast::locations::TextLocation;
use crate::source_ast::source_nodes::*;
use crate::types::symbols::FixedSymbolTable;
use crate::{TranslationEnv, Translator};

pub(super) fn loc(line: i32) -> TextLocation {
    TextLocation::new_just_line(line)
}

pub(super) fn expr(kind: SourceExprKind) -> SourceExpr {
    SourceExpr::new(kind, loc(1))
}

pub(super) fn expr_at(kind: SourceExprKind, line: i32) -> SourceExpr {
    SourceExpr::new(kind, loc(line))
}

pub(super) fn stmt(kind: SourceStmtKind) -> SourceStmt {
    SourceStmt::new(kind, loc(1))
}

pub(super) fn var(name: &str) -> SourceExpr {
    expr(SourceExprKind::Variable(name.to_string()))
}

pub(super) fn int(value: i64) -> SourceExpr {
    expr(SourceExprKind::Int(value))
}

pub(super) fn str_lit(value: &str) -> SourceExpr {
    expr(SourceExprKind::Str(value.to_string()))
}

pub(super) fn assign(target: SourceExpr, value: SourceExpr) -> SourceStmt {
    stmt(SourceStmtKind::Expression(expr(SourceExprKind::Assign {
        target: Box::new(target),
        op: None,
        value: Box::new(value),
    })))
}

pub(super) fn echo(operand: SourceExpr) -> SourceStmt {
    stmt(SourceStmtKind::Echo(vec![operand]))
}

pub(super) fn call(name: &str, args: Vec<SourceExpr>) -> SourceExpr {
    expr(SourceExprKind::FunctionCall {
        name: QualifiedName::single(name),
        args,
    })
}

pub(super) fn method(name: &str, body: Vec<SourceStmt>) -> SourceMethod {
    SourceMethod {
        name: name.to_string(),
        visibility: Visibility::Public,
        is_static: false,
        params: vec![],
        attributes: vec![],
        body,
        location: loc(1),
    }
}

pub(super) fn method_with_params(
    name: &str,
    params: Vec<SourceParam>,
    body: Vec<SourceStmt>,
) -> SourceMethod {
    SourceMethod {
        params,
        ..method(name, body)
    }
}

pub(super) fn param(name: &str, type_hint: Option<&str>) -> SourceParam {
    SourceParam {
        name: name.to_string(),
        type_hint: type_hint.map(QualifiedName::from_php),
        by_ref: false,
        default: None,
        location: loc(1),
    }
}

pub(super) fn class_with_methods(name: &str, methods: Vec<SourceMethod>) -> SourceClass {
    SourceClass {
        name: name.to_string(),
        base: None,
        interfaces: vec![],
        attributes: vec![],
        members: methods.into_iter().map(SourceMember::Method).collect(),
        location: loc(1),
    }
}

pub(super) fn program_with_class(class: SourceClass) -> SourceProgram {
    SourceProgram {
        source_name: Some("unit.php".to_string()),
        namespace: None,
        types: vec![class],
    }
}

/// Wraps a method body into a one-class program.
pub(super) fn program_with_body(body: Vec<SourceStmt>) -> SourceProgram {
    program_with_class(class_with_methods("Page", vec![method("run", body)]))
}

pub(super) fn translate(program: &SourceProgram) -> Result<IrNamespace, TranslateError> {
    let symbols = FixedSymbolTable::new();
    let env = TranslationEnv::new(&symbols);
    Translator::default().translate(program, &env)
}

pub(super) fn translate_with(
    config: TranslatorConfig,
    symbols: &FixedSymbolTable,
    program: &SourceProgram,
) -> Result<IrNamespace, TranslateError> {
    let env = TranslationEnv::new(symbols);
    Translator::new(config).translate(program, &env)
}

/// The body of the first method of the first type.
pub(super) fn first_method_body(ir: &IrNamespace) -> &[IrStmt] {
    for member in &ir.types[0].members {
        if let IrMember::Method(method) = member {
            return &method.body;
        }
    }
    panic!("expected the translated type to contain a method");
}

/// Every label name defined anywhere under the given statements.
pub(super) fn collect_labels(stmts: &[IrStmt]) -> Vec<String> {
    let mut labels = Vec::new();
    collect_labels_into(stmts, &mut labels);
    labels
}

fn collect_labels_into(stmts: &[IrStmt], labels: &mut Vec<String>) {
    for stmt in stmts {
        match &stmt.kind {
            IrStmtKind::Labeled { label, statement } => {
                labels.push(label.clone());
                if let Some(inner) = statement {
                    collect_labels_into(std::slice::from_ref(inner), labels);
                }
            }
            IrStmtKind::Block(body) => collect_labels_into(body, labels),
            IrStmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                collect_labels_into(then_branch, labels);
                collect_labels_into(else_branch, labels);
            }
            IrStmtKind::Iteration {
                init, step, body, ..
            } => {
                if let Some(init) = init {
                    collect_labels_into(std::slice::from_ref(init), labels);
                }
                if let Some(step) = step {
                    collect_labels_into(std::slice::from_ref(step), labels);
                }
                collect_labels_into(body, labels);
            }
            IrStmtKind::TryCatch { body, catches } => {
                collect_labels_into(body, labels);
                for catch in catches {
                    collect_labels_into(&catch.body, labels);
                }
            }
            _ => {}
        }
    }
}

/// Every goto target anywhere under the given statements.
pub(super) fn collect_gotos(stmts: &[IrStmt]) -> Vec<String> {
    let mut targets = Vec::new();
    collect_gotos_into(stmts, &mut targets);
    targets
}

fn collect_gotos_into(stmts: &[IrStmt], targets: &mut Vec<String>) {
    for stmt in stmts {
        match &stmt.kind {
            IrStmtKind::Goto { label } => targets.push(label.clone()),
            IrStmtKind::Block(body) => collect_gotos_into(body, targets),
            IrStmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                collect_gotos_into(then_branch, targets);
                collect_gotos_into(else_branch, targets);
            }
            IrStmtKind::Iteration {
                init, step, body, ..
            } => {
                if let Some(init) = init {
                    collect_gotos_into(std::slice::from_ref(init), targets);
                }
                if let Some(step) = step {
                    collect_gotos_into(std::slice::from_ref(step), targets);
                }
                collect_gotos_into(body, targets);
            }
            IrStmtKind::TryCatch { body, catches } => {
                collect_gotos_into(body, targets);
                for catch in catches {
                    collect_gotos_into(&catch.body, targets);
                }
            }
            IrStmtKind::Labeled {
                statement: Some(inner),
                ..
            } => collect_gotos_into(std::slice::from_ref(inner), targets),
            _ => {}
        }
    }
}
