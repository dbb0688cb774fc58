#![cfg(test)]

use crate::ir::ir_nodes::{
    IrBinaryOp, IrExpr, IrExprKind, IrLiteral, IrMember, IrStmt, IrStmtKind, IrTypeRef,
};
use crate::lowering::tests::common::*;
use crate::messages::translate_errors::ErrorKind;
use crate::settings;
use crate::source_ast::source_nodes::*;

fn if_clause(condition: Option<SourceExpr>, body: Vec<SourceStmt>) -> IfClause {
    IfClause {
        condition,
        body,
        location: loc(1),
    }
}

fn is_echo_of_str(stmt: &IrStmt, text: &str) -> bool {
    let IrStmtKind::Expression(IrExpr {
        kind: IrExprKind::MethodCall { method, args, .. },
        ..
    }) = &stmt.kind
    else {
        return false;
    };
    method == settings::ECHO_HELPER
        && matches!(
            args.as_slice(),
            [IrExpr { kind: IrExprKind::Primitive(IrLiteral::Str(s)), .. }] if s == text
        )
}

fn is_variable(expr: &IrExpr, name: &str) -> bool {
    matches!(&expr.kind, IrExprKind::VariableRef(n) if n == name)
}

// ============================================================
// If chains
// ============================================================

#[test]
fn if_elseif_else_right_nests() {
    // if ($a) { echo "x"; } elseif ($b) { echo "y"; } else { echo "z"; }
    let program = program_with_body(vec![stmt(SourceStmtKind::If {
        clauses: vec![
            if_clause(Some(var("a")), vec![echo(str_lit("x"))]),
            if_clause(Some(var("b")), vec![echo(str_lit("y"))]),
            if_clause(None, vec![echo(str_lit("z"))]),
        ],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 1);

    let IrStmtKind::If {
        condition,
        then_branch,
        else_branch,
    } = &body[0].kind
    else {
        panic!("expected outer conditional, got {:?}", body[0].kind);
    };
    assert!(is_variable(condition, "a"));
    assert_eq!(then_branch.len(), 1);
    assert!(is_echo_of_str(&then_branch[0], "x"));

    assert_eq!(else_branch.len(), 1);
    let IrStmtKind::If {
        condition: inner_condition,
        then_branch: inner_then,
        else_branch: inner_else,
    } = &else_branch[0].kind
    else {
        panic!("expected nested conditional in else branch");
    };
    assert!(is_variable(inner_condition, "b"));
    assert!(is_echo_of_str(&inner_then[0], "y"));
    assert_eq!(inner_else.len(), 1);
    assert!(is_echo_of_str(&inner_else[0], "z"));
}

#[test]
fn if_chain_produces_one_conditional_per_conditional_clause() {
    fn count_conditionals(stmts: &[IrStmt]) -> usize {
        stmts
            .iter()
            .map(|stmt| match &stmt.kind {
                IrStmtKind::If {
                    then_branch,
                    else_branch,
                    ..
                } => 1 + count_conditionals(then_branch) + count_conditionals(else_branch),
                _ => 0,
            })
            .sum()
    }

    for clause_count in 1..=4 {
        let mut clauses: Vec<IfClause> = (0..clause_count)
            .map(|i| if_clause(Some(var(&format!("c{}", i))), vec![echo(str_lit("b"))]))
            .collect();
        clauses.push(if_clause(None, vec![echo(str_lit("e"))]));

        let program = program_with_body(vec![stmt(SourceStmtKind::If { clauses })]);
        let ir = translate(&program).expect("translation should succeed");
        assert_eq!(count_conditionals(first_method_body(&ir)), clause_count);
    }
}

#[test]
fn else_clause_not_in_final_position_is_an_error() {
    let program = program_with_body(vec![stmt(SourceStmtKind::If {
        clauses: vec![
            if_clause(Some(var("a")), vec![]),
            if_clause(None, vec![]),
            if_clause(Some(var("b")), vec![]),
        ],
    })]);

    let error = translate(&program).expect_err("misplaced else must fail");
    assert_eq!(error.kind, ErrorKind::UnsupportedConstruct);
    assert_eq!(error.construct, "else");
}

// ============================================================
// Loops
// ============================================================

#[test]
fn while_loop_registers_labels_around_iteration() {
    let program = program_with_body(vec![stmt(SourceStmtKind::While {
        condition: var("c"),
        body: vec![echo(str_lit("b"))],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 3);

    assert!(matches!(
        &body[0].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "while_begin_0"
    ));
    let IrStmtKind::Iteration {
        init, test, step, ..
    } = &body[1].kind
    else {
        panic!("expected iteration statement");
    };
    assert!(init.is_none() && step.is_none());
    assert!(is_variable(test.as_ref().expect("while keeps its test"), "c"));
    assert!(matches!(
        &body[2].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "while_end_0"
    ));
}

#[test]
fn do_while_tests_at_the_bottom_with_goto_back_to_start() {
    let program = program_with_body(vec![stmt(SourceStmtKind::DoWhile {
        body: vec![echo(str_lit("b"))],
        condition: var("c"),
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 4);

    assert!(matches!(
        &body[0].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "do_begin_0"
    ));
    assert!(is_echo_of_str(&body[1], "b"));

    let IrStmtKind::If {
        condition,
        then_branch,
        else_branch,
    } = &body[2].kind
    else {
        panic!("expected bottom conditional");
    };
    assert!(is_variable(condition, "c"));
    assert!(else_branch.is_empty());
    assert!(matches!(
        &then_branch[0].kind,
        IrStmtKind::Goto { label } if label == "do_begin_0"
    ));

    assert!(matches!(
        &body[3].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "do_end_0"
    ));
}

#[test]
fn for_comma_groups_fill_header_slots_and_spill_the_rest() {
    // for ($i=0, $j=1; $i<10; $i++, $j--) { echo "b"; }
    let inc = SourceExprKind::IncDec {
        op: IncDecOp::PostIncrement,
        target: Box::new(var("i")),
    };
    let dec = SourceExprKind::IncDec {
        op: IncDecOp::PostDecrement,
        target: Box::new(var("j")),
    };
    let program = program_with_body(vec![stmt(SourceStmtKind::For {
        init: vec![
            expr(SourceExprKind::Assign {
                target: Box::new(var("i")),
                op: None,
                value: Box::new(int(0)),
            }),
            expr(SourceExprKind::Assign {
                target: Box::new(var("j")),
                op: None,
                value: Box::new(int(1)),
            }),
        ],
        condition: vec![expr(SourceExprKind::Binary {
            op: BinaryOp::Less,
            left: Box::new(var("i")),
            right: Box::new(int(10)),
        })],
        step: vec![expr(inc), expr(dec)],
        body: vec![echo(str_lit("b"))],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 3);

    // Standalone statement for $j = 1 before the header.
    assert!(matches!(
        &body[0].kind,
        IrStmtKind::VariableDeclaration { name, initializer: Some(IrExpr { kind: IrExprKind::Primitive(IrLiteral::Int(1)), .. }), .. }
            if name == "j"
    ));

    let IrStmtKind::Iteration {
        init,
        test,
        step,
        body: loop_body,
    } = &body[1].kind
    else {
        panic!("expected for-loop iteration statement");
    };

    // Header init: $i = 0.
    assert!(matches!(
        &init.as_ref().expect("for header keeps an init slot").kind,
        IrStmtKind::VariableDeclaration { name, .. } if name == "i"
    ));
    // Header test: $i < 10.
    assert!(matches!(
        &test.as_ref().expect("for header keeps its test").kind,
        IrExprKind::Binary { op: IrBinaryOp::LessThan, .. }
    ));
    // Header step: $i = $i + 1.
    assert!(matches!(
        &step.as_ref().expect("for header keeps a step slot").kind,
        IrStmtKind::Assign { target, .. } if is_variable(target, "i")
    ));

    // Body: translated body, then the start label, then the spilled
    // step item $j = $j - 1.
    assert!(is_echo_of_str(&loop_body[0], "b"));
    assert!(matches!(
        &loop_body[1].kind,
        IrStmtKind::Labeled { label, .. } if label == "for_begin_0"
    ));
    assert!(matches!(
        &loop_body[2].kind,
        IrStmtKind::Assign { target, value: IrExpr { kind: IrExprKind::Binary { op: IrBinaryOp::Subtract, .. }, .. } }
            if is_variable(target, "j")
    ));

    assert!(matches!(
        &body[2].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "for_end_0"
    ));
}

#[test]
fn foreach_desugars_to_snapshot_flag_and_explicit_cursor_calls() {
    // foreach ($arr as $k => $v) { echo "b"; }
    let program = program_with_body(vec![stmt(SourceStmtKind::Foreach {
        array: var("arr"),
        key: Some(var("k")),
        value: var("v"),
        body: vec![echo(str_lit("b"))],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 5);

    // Snapshot temp, typed as the runtime array.
    assert!(matches!(
        &body[0].kind,
        IrStmtKind::VariableDeclaration { name, ty: IrTypeRef::Named(ty), .. }
            if name == "foreach_src_0" && ty == settings::RUNTIME_ARRAY_CLASS
    ));
    // Continuation flag initialized from Reset().
    let IrStmtKind::VariableDeclaration {
        name: flag_name,
        initializer: Some(flag_init),
        ..
    } = &body[1].kind
    else {
        panic!("expected continuation flag declaration");
    };
    assert_eq!(flag_name, "foreach_more_0");
    assert!(matches!(
        &flag_init.kind,
        IrExprKind::MethodCall { method, .. } if method == settings::ARRAY_RESET
    ));

    assert!(matches!(
        &body[2].kind,
        IrStmtKind::Labeled { label, .. } if label == "foreach_begin_0"
    ));

    let IrStmtKind::Iteration {
        test,
        body: loop_body,
        ..
    } = &body[3].kind
    else {
        panic!("expected foreach iteration statement");
    };
    assert!(is_variable(
        test.as_ref().expect("foreach tests its flag"),
        "foreach_more_0"
    ));

    // Top of body: value from Current, key from Key, eager advance.
    assert!(matches!(
        &loop_body[0].kind,
        IrStmtKind::VariableDeclaration { name, initializer: Some(IrExpr { kind: IrExprKind::MethodCall { method, .. }, .. }), .. }
            if name == "v" && method == settings::ARRAY_CURRENT
    ));
    assert!(matches!(
        &loop_body[1].kind,
        IrStmtKind::VariableDeclaration { name, initializer: Some(IrExpr { kind: IrExprKind::MethodCall { method, .. }, .. }), .. }
            if name == "k" && method == settings::ARRAY_KEY
    ));
    assert!(matches!(
        &loop_body[2].kind,
        IrStmtKind::Assign { target, value: IrExpr { kind: IrExprKind::MethodCall { method, .. }, .. } }
            if is_variable(target, "foreach_more_0") && method == settings::ARRAY_NEXT
    ));
    assert!(is_echo_of_str(&loop_body[3], "b"));

    assert!(matches!(
        &body[4].kind,
        IrStmtKind::Labeled { label, .. } if label == "foreach_end_0"
    ));
}

// ============================================================
// Switch
// ============================================================

fn switch_case(test: Option<SourceExpr>, body: Vec<SourceStmt>) -> SwitchCase {
    SwitchCase {
        test,
        body,
        location: loc(1),
    }
}

#[test]
fn switch_lowers_to_conditional_chain_with_fallthrough_gotos() {
    // switch ($x) { case 1: echo "one"; break; default: echo "d"; }
    let program = program_with_body(vec![stmt(SourceStmtKind::Switch {
        subject: var("x"),
        cases: vec![
            switch_case(
                Some(int(1)),
                vec![echo(str_lit("one")), stmt(SourceStmtKind::Break { levels: 1 })],
            ),
            switch_case(None, vec![echo(str_lit("d"))]),
        ],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 4);

    // Hoisted subject temp: evaluated once.
    assert!(matches!(
        &body[0].kind,
        IrStmtKind::VariableDeclaration { name, .. } if name == "switch_tmp_0"
    ));

    // Case 1: equality test against the temp, label first, fallthrough
    // goto last (break jumps to the end label before it).
    let IrStmtKind::If {
        condition,
        then_branch,
        ..
    } = &body[1].kind
    else {
        panic!("expected first case conditional");
    };
    assert!(matches!(
        &condition.kind,
        IrExprKind::Binary { op: IrBinaryOp::ValueEquality, left, .. }
            if is_variable(left, "switch_tmp_0")
    ));
    assert!(matches!(
        &then_branch[0].kind,
        IrStmtKind::Labeled { label, .. } if label == "case_0"
    ));
    assert!(is_echo_of_str(&then_branch[1], "one"));
    assert!(matches!(
        &then_branch[2].kind,
        IrStmtKind::Goto { label } if label == "switch_end_0"
    ));
    assert!(matches!(
        &then_branch[3].kind,
        IrStmtKind::Goto { label } if label == "case_1"
    ));

    // Default: always-true test, no trailing fallthrough goto.
    let IrStmtKind::If {
        condition: default_test,
        then_branch: default_body,
        ..
    } = &body[2].kind
    else {
        panic!("expected default case conditional");
    };
    assert!(matches!(
        &default_test.kind,
        IrExprKind::Primitive(IrLiteral::Bool(true))
    ));
    assert!(matches!(
        &default_body[0].kind,
        IrStmtKind::Labeled { label, .. } if label == "case_1"
    ));
    assert!(is_echo_of_str(&default_body[1], "d"));
    assert_eq!(default_body.len(), 2);

    assert!(matches!(
        &body[3].kind,
        IrStmtKind::Labeled { label, .. } if label == "switch_end_0"
    ));
}

// ============================================================
// Break / continue resolution
// ============================================================

fn while_stmt(condition: SourceExpr, body: Vec<SourceStmt>) -> SourceStmt {
    stmt(SourceStmtKind::While { condition, body })
}

#[test]
fn break_two_levels_resolves_to_the_outer_loop_end() {
    let program = program_with_body(vec![while_stmt(
        var("a"),
        vec![while_stmt(
            var("b"),
            vec![stmt(SourceStmtKind::Break { levels: 2 })],
        )],
    )]);

    let ir = translate(&program).expect("translation should succeed");
    let gotos = collect_gotos(first_method_body(&ir));
    assert_eq!(gotos, vec!["while_end_0".to_string()]);
}

#[test]
fn continue_resolves_to_the_innermost_loop_start() {
    let program = program_with_body(vec![while_stmt(
        var("a"),
        vec![while_stmt(
            var("b"),
            vec![stmt(SourceStmtKind::Continue { levels: 1 })],
        )],
    )]);

    let ir = translate(&program).expect("translation should succeed");
    let gotos = collect_gotos(first_method_body(&ir));
    assert_eq!(gotos, vec!["while_begin_1".to_string()]);
}

#[test]
fn continue_passes_through_switch_scopes() {
    let program = program_with_body(vec![while_stmt(
        var("a"),
        vec![stmt(SourceStmtKind::Switch {
            subject: var("x"),
            cases: vec![switch_case(
                None,
                vec![stmt(SourceStmtKind::Continue { levels: 1 })],
            )],
        })],
    )]);

    let ir = translate(&program).expect("translation should succeed");
    let gotos = collect_gotos(first_method_body(&ir));
    assert_eq!(gotos, vec!["while_begin_0".to_string()]);
}

#[test]
fn break_inside_switch_targets_the_switch_end() {
    let program = program_with_body(vec![while_stmt(
        var("a"),
        vec![stmt(SourceStmtKind::Switch {
            subject: var("x"),
            cases: vec![switch_case(
                None,
                vec![stmt(SourceStmtKind::Break { levels: 1 })],
            )],
        })],
    )]);

    let ir = translate(&program).expect("translation should succeed");
    let gotos = collect_gotos(first_method_body(&ir));
    assert_eq!(gotos, vec!["switch_end_0".to_string()]);
}

#[test]
fn break_escaping_every_loop_is_an_error() {
    let program = program_with_body(vec![while_stmt(
        var("a"),
        vec![while_stmt(
            var("b"),
            vec![stmt(SourceStmtKind::Break { levels: 3 })],
        )],
    )]);

    let error = translate(&program).expect_err("break past all loops must fail");
    assert_eq!(error.kind, ErrorKind::UnsupportedConstruct);
    assert_eq!(error.construct, "break");
}

#[test]
fn break_outside_any_loop_is_an_error() {
    let program = program_with_body(vec![stmt(SourceStmtKind::Break { levels: 1 })]);
    let error = translate(&program).expect_err("break without a loop must fail");
    assert_eq!(error.kind, ErrorKind::UnsupportedConstruct);
}

// ============================================================
// Try / catch, goto, labels
// ============================================================

#[test]
fn try_catch_maps_structurally() {
    let program = program_with_body(vec![stmt(SourceStmtKind::Try {
        body: vec![echo(str_lit("t"))],
        catches: vec![CatchClause {
            class: QualifiedName::single("Exception"),
            variable: "e".to_string(),
            body: vec![echo(str_lit("c"))],
            location: loc(2),
        }],
    })]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);

    let IrStmtKind::TryCatch { body: try_body, catches } = &body[0].kind else {
        panic!("expected try/catch statement");
    };
    assert!(is_echo_of_str(&try_body[0], "t"));
    assert_eq!(catches.len(), 1);
    assert_eq!(catches[0].variable, "e");
    assert!(matches!(
        &catches[0].exception_type,
        IrTypeRef::Named(name) if name == "Exception"
    ));
    assert!(is_echo_of_str(&catches[0].body[0], "c"));
}

#[test]
fn goto_and_label_pass_through() {
    let program = program_with_body(vec![
        stmt(SourceStmtKind::Label("retry".to_string())),
        stmt(SourceStmtKind::Goto("retry".to_string())),
    ]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert!(matches!(
        &body[0].kind,
        IrStmtKind::Labeled { label, statement: None } if label == "retry"
    ));
    assert!(matches!(
        &body[1].kind,
        IrStmtKind::Goto { label } if label == "retry"
    ));
}

// ============================================================
// Static variable promotion
// ============================================================

fn static_decl(name: &str, initializer: Option<SourceExpr>) -> SourceStmt {
    stmt(SourceStmtKind::StaticDecl(vec![StaticVar {
        name: name.to_string(),
        initializer,
        location: loc(1),
    }]))
}

#[test]
fn static_variable_promotes_to_private_static_field() {
    let program = program_with_body(vec![
        static_decl("x", Some(int(1))),
        echo(var("x")),
    ]);

    let ir = translate(&program).expect("translation should succeed");

    let field = ir.types[0]
        .members
        .iter()
        .find_map(|member| match member {
            IrMember::Field(field) => Some(field),
            _ => None,
        })
        .expect("expected a promoted field");
    assert_eq!(field.name, "static_run_x");
    assert!(field.is_static);
    assert!(matches!(
        &field.initializer,
        Some(IrExpr { kind: IrExprKind::Primitive(IrLiteral::Int(1)), .. })
    ));

    // The declaration statement vanishes; the reference reads the field.
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 1);
    let IrStmtKind::Expression(IrExpr {
        kind: IrExprKind::MethodCall { args, .. },
        ..
    }) = &body[0].kind
    else {
        panic!("expected echo call");
    };
    assert!(matches!(
        &args[0].kind,
        IrExprKind::FieldRef { name, .. } if name == "static_run_x"
    ));
}

#[test]
fn static_promotion_is_deterministic_across_translator_instances() {
    let program = program_with_body(vec![static_decl("x", Some(int(1)))]);

    let first = translate(&program).expect("first translation should succeed");
    let second = translate(&program).expect("second translation should succeed");
    assert_eq!(first, second);
}

#[test]
fn redeclaring_a_static_variable_in_one_method_is_an_error() {
    let program = program_with_body(vec![
        static_decl("x", Some(int(1))),
        static_decl("x", Some(int(2))),
    ]);

    let error = translate(&program).expect_err("duplicate static must fail");
    assert_eq!(error.kind, ErrorKind::UnsupportedConstruct);
    assert!(error.msg.contains("declared twice"));
}

// ============================================================
// Unset
// ============================================================

#[test]
fn unset_assigns_null_to_plain_locals() {
    let program = program_with_body(vec![
        assign(var("a"), int(1)),
        stmt(SourceStmtKind::Unset(vec![var("a")])),
    ]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert!(matches!(
        &body[1].kind,
        IrStmtKind::Assign { target, value: IrExpr { kind: IrExprKind::Primitive(IrLiteral::Null), .. } }
            if is_variable(target, "a")
    ));
}

#[test]
fn unset_assigns_the_sentinel_to_member_targets() {
    let target = expr(SourceExprKind::PropertyAccess {
        target: Box::new(var("this")),
        name: "p".to_string(),
    });
    let program = program_with_body(vec![stmt(SourceStmtKind::Unset(vec![target]))]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);

    let IrStmtKind::Assign { target, value } = &body[0].kind else {
        panic!("expected sentinel assignment");
    };
    assert!(matches!(
        &target.kind,
        IrExprKind::FieldRef { name, .. } if name == "p"
    ));
    assert!(matches!(
        &value.kind,
        IrExprKind::FieldRef { name, .. } if name == settings::UNSET_SENTINEL_FIELD
    ));
}

// ============================================================
// Unsupported statements
// ============================================================

#[test]
fn global_nested_function_and_const_statements_are_errors() {
    let cases = vec![
        stmt(SourceStmtKind::Global(vec!["g".to_string()])),
        stmt(SourceStmtKind::FunctionDecl {
            name: "f".to_string(),
        }),
        stmt(SourceStmtKind::ConstDecl {
            name: "C".to_string(),
        }),
    ];

    for case in cases {
        let program = program_with_body(vec![case]);
        let error = translate(&program).expect_err("statement must fail");
        assert_eq!(error.kind, ErrorKind::UnsupportedConstruct);
    }
}

// ============================================================
// Misc statements
// ============================================================

#[test]
fn echo_emits_one_runtime_call_per_operand() {
    let program = program_with_body(vec![stmt(SourceStmtKind::Echo(vec![
        str_lit("a"),
        str_lit("b"),
    ]))]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    assert_eq!(body.len(), 2);
    assert!(is_echo_of_str(&body[0], "a"));
    assert!(is_echo_of_str(&body[1], "b"));
}

#[test]
fn source_blocks_keep_their_own_ir_block() {
    let program = program_with_body(vec![stmt(SourceStmtKind::Block(vec![echo(str_lit(
        "inner",
    ))]))]);

    let ir = translate(&program).expect("translation should succeed");
    let body = first_method_body(&ir);
    let IrStmtKind::Block(inner) = &body[0].kind else {
        panic!("expected a block statement");
    };
    assert!(is_echo_of_str(&inner[0], "inner"));
}

#[test]
fn loop_labels_are_pairwise_distinct_within_a_translation() {
    let program = program_with_body(vec![
        while_stmt(var("a"), vec![]),
        while_stmt(var("b"), vec![]),
        stmt(SourceStmtKind::DoWhile {
            body: vec![],
            condition: var("c"),
        }),
        stmt(SourceStmtKind::Foreach {
            array: var("arr"),
            key: None,
            value: var("v"),
            body: vec![],
        }),
        stmt(SourceStmtKind::Switch {
            subject: var("x"),
            cases: vec![switch_case(None, vec![])],
        }),
    ]);

    let ir = translate(&program).expect("translation should succeed");
    let labels = collect_labels(first_method_body(&ir));

    let mut deduped = labels.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(labels.len(), deduped.len(), "labels must be unique: {:?}", labels);
}
