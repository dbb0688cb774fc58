#![cfg(test)]

use crate::ir::ir_nodes::{IrStmt, IrStmtKind};
use crate::lowering::label_allocator::{LoopKind, NameAllocator};
use crate::lowering::scope_chain::{BreakKind, BreakTargetRequest, ScopeArena, ScopeKind};
use crate::settings::{DESIGNER_RESERVED_LOCAL, DESIGNER_RESERVED_RENAME};
use crate::source_ast::locations::TextLocation;
use crate::types::inference::{KnownType, LocalTypeLookup};
use rustc_hash::FxHashMap;

fn method_scope(name: &str) -> ScopeKind {
    ScopeKind::Method {
        name: name.to_string(),
        is_static: false,
        locals: FxHashMap::default(),
        statics: FxHashMap::default(),
    }
}

fn marker(label: &str) -> IrStmt {
    IrStmt::new(
        IrStmtKind::Goto {
            label: label.to_string(),
        },
        TextLocation::default(),
    )
}

fn marker_labels(arena: &ScopeArena) -> Vec<String> {
    arena
        .current()
        .statements
        .iter()
        .map(|stmt| match &stmt.kind {
            IrStmtKind::Goto { label } => label.clone(),
            other => panic!("unexpected statement {:?}", other),
        })
        .collect()
}

// ============================================================
// Locals
// ============================================================

#[test]
fn declaring_a_local_twice_returns_none_the_second_time() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    assert_eq!(
        arena.declare_local("x", KnownType::Object),
        Some("x".to_string())
    );
    assert_eq!(arena.declare_local("x", KnownType::Object), None);
}

#[test]
fn the_designer_reserved_local_gets_its_stable_rename() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    assert_eq!(
        arena.declare_local(DESIGNER_RESERVED_LOCAL, KnownType::Bool),
        Some(DESIGNER_RESERVED_RENAME.to_string())
    );
    assert_eq!(
        arena.effective_local_name(DESIGNER_RESERVED_LOCAL),
        DESIGNER_RESERVED_RENAME
    );

    // Type lookup works through both the source and the effective name.
    assert_eq!(arena.local_type(DESIGNER_RESERVED_LOCAL), KnownType::Bool);
    assert_eq!(arena.local_type(DESIGNER_RESERVED_RENAME), KnownType::Bool);
}

#[test]
fn locals_declare_into_the_enclosing_method_scope_through_blocks() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));
    arena.push(ScopeKind::Block);

    assert!(arena.declare_local("x", KnownType::Object).is_some());
    arena.pop();

    // Still visible after the block closes: the method owns it.
    assert!(arena.local_info("x").is_some());
}

// ============================================================
// Insertion cursor
// ============================================================

#[test]
fn hoisting_inserts_at_the_cursor_and_emitting_appends() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    arena.emit(marker("a"));
    arena.emit(marker("b"));

    arena.set_cursor_before(1);
    arena.hoist(marker("x"));
    arena.hoist(marker("y"));
    assert_eq!(marker_labels(&arena), vec!["a", "x", "y", "b"]);

    arena.reset_cursor_to_end();
    arena.emit(marker("c"));
    assert_eq!(marker_labels(&arena), vec!["a", "x", "y", "b", "c"]);

    arena.set_cursor_after(0);
    arena.hoist(marker("z"));
    assert_eq!(marker_labels(&arena), vec!["a", "z", "x", "y", "b", "c"]);

    arena.reset_cursor_to_start();
    arena.hoist(marker("w"));
    assert_eq!(
        marker_labels(&arena),
        vec!["w", "a", "z", "x", "y", "b", "c"]
    );
}

#[test]
fn default_cursor_sits_before_the_statement_being_lowered() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    arena.emit(marker("first"));
    // Lowering of the next statement hoists before appending it.
    arena.hoist(marker("hoisted"));
    arena.emit(marker("second"));

    assert_eq!(marker_labels(&arena), vec!["first", "hoisted", "second"]);
}

// ============================================================
// Static variable table
// ============================================================

#[test]
fn static_registration_rejects_duplicates_per_method() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    assert!(arena.register_static("x", "static_run_x".to_string()));
    assert!(!arena.register_static("x", "static_run_x".to_string()));
    assert_eq!(arena.static_field_for("x").as_deref(), Some("static_run_x"));
}

// ============================================================
// Break target resolution
// ============================================================

struct NestedScopes {
    arena: ScopeArena,
    outer: crate::lowering::label_allocator::LoopLabels,
    switch_end: String,
    inner: crate::lowering::label_allocator::LoopLabels,
}

/// method { loop L0 { switch { loop L1 { <here> } } } }
fn nested_scopes() -> NestedScopes {
    let mut names = NameAllocator::new();
    let outer = names.next_loop_labels(LoopKind::While);
    let switch = names.next_loop_labels(LoopKind::Switch);
    let inner = names.next_loop_labels(LoopKind::While);

    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));
    arena.push(ScopeKind::Loop {
        labels: outer.clone(),
    });
    arena.push(ScopeKind::Switch {
        end_label: switch.end.clone(),
    });
    arena.push(ScopeKind::Loop {
        labels: inner.clone(),
    });

    NestedScopes {
        arena,
        outer,
        switch_end: switch.end,
        inner,
    }
}

fn resolve(arena: &ScopeArena, kind: BreakKind, levels: u32) -> Option<String> {
    arena.resolve_break_target(BreakTargetRequest { levels, kind })
}

#[test]
fn break_counts_loops_and_switches() {
    let scopes = nested_scopes();

    assert_eq!(
        resolve(&scopes.arena, BreakKind::Break, 1),
        Some(scopes.inner.end.clone())
    );
    assert_eq!(
        resolve(&scopes.arena, BreakKind::Break, 2),
        Some(scopes.switch_end.clone())
    );
    assert_eq!(
        resolve(&scopes.arena, BreakKind::Break, 3),
        Some(scopes.outer.end.clone())
    );
    assert_eq!(resolve(&scopes.arena, BreakKind::Break, 4), None);
}

#[test]
fn continue_skips_switch_scopes() {
    let scopes = nested_scopes();

    assert_eq!(
        resolve(&scopes.arena, BreakKind::Continue, 1),
        Some(scopes.inner.start.clone())
    );
    assert_eq!(
        resolve(&scopes.arena, BreakKind::Continue, 2),
        Some(scopes.outer.start.clone())
    );
    assert_eq!(resolve(&scopes.arena, BreakKind::Continue, 3), None);
}

#[test]
fn requests_never_cross_the_method_boundary() {
    let mut arena = ScopeArena::new();
    arena.push(method_scope("run"));

    assert_eq!(resolve(&arena, BreakKind::Break, 1), None);
    assert_eq!(resolve(&arena, BreakKind::Continue, 1), None);
}

// ============================================================
// Enclosing context
// ============================================================

#[test]
fn promoted_fields_collect_on_the_enclosing_type_scope() {
    use crate::ir::ir_nodes::{IrField, IrTypeRef, IrVisibility};

    let mut arena = ScopeArena::new();
    arena.push(ScopeKind::Type {
        name: "Page".to_string(),
        base: None,
        members: vec![],
        promoted: vec![],
    });
    arena.push(method_scope("run"));

    arena.add_promoted_field(IrField {
        name: "static_run_x".to_string(),
        ty: IrTypeRef::object(),
        visibility: IrVisibility::Private,
        is_static: true,
        initializer: None,
    });

    arena.pop();
    let type_scope = arena.pop().expect("type scope should pop");
    let ScopeKind::Type { promoted, .. } = type_scope.kind else {
        panic!("expected type scope");
    };
    assert_eq!(promoted.len(), 1);
    assert_eq!(promoted[0].name, "static_run_x");
}
