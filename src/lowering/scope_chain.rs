//! ============================================================
//!                        Scope Chain
//! ============================================================
//! Nested translation contexts: file, namespace, type, method, and the
//! per-construct block scopes inside method bodies.
//!
//! Scopes live in an arena with parent indices and strict stack
//! discipline — a scope is always popped before its parent, within one
//! translation. Statement-bearing scopes own the statement buffer the
//! lowering writes into, plus an insertion cursor for hoisted statements
//! (default position: end). Popping a scope hands its buffer to whichever
//! IR container the caller is assembling.
//!
//! Loop scopes carry their label pair; switch scopes carry only a break
//! label and are transparent to `continue`.

use crate::ir::ir_nodes::{IrField, IrStmt};
use crate::lowering::label_allocator::LoopLabels;
use crate::source_ast::source_nodes::QualifiedName;
use crate::settings::{DESIGNER_RESERVED_LOCAL, DESIGNER_RESERVED_RENAME};
use crate::types::inference::{KnownType, LocalTypeLookup};
use crate::types::symbols::MemberInfo;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Break,
    Continue,
}

/// Bubbles outward from the innermost scope until a loop-like scope
/// consumes it (level 1) or no scope remains.
#[derive(Debug, Clone, Copy)]
pub struct BreakTargetRequest {
    pub levels: u32,
    pub kind: BreakKind,
}

#[derive(Debug, Clone)]
pub struct LocalInfo {
    /// The name actually written into the IR. Differs from the source
    /// name only for the designer-reserved rename.
    pub effective_name: String,
    pub known: KnownType,
}

#[derive(Debug)]
pub enum ScopeKind {
    File,
    Namespace {
        name: Option<String>,
    },
    Type {
        name: String,
        base: Option<QualifiedName>,
        /// All declared members, pre-registered before bodies are
        /// lowered so sibling members are visible to inference.
        members: Vec<MemberInfo>,
        /// Fields synthesized by static-variable promotion; drained into
        /// the type declaration when the scope pops.
        promoted: Vec<IrField>,
    },
    Method {
        name: String,
        is_static: bool,
        locals: FxHashMap<String, LocalInfo>,
        /// Source static-variable name -> promoted field name.
        statics: FxHashMap<String, String>,
    },
    Block,
    Loop {
        labels: LoopLabels,
    },
    Switch {
        end_label: String,
    },
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub statements: Vec<IrStmt>,
    pub cursor: usize,
}

#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> ScopeArena {
        ScopeArena {
            scopes: vec![Scope {
                kind: ScopeKind::File,
                parent: None,
                statements: Vec::new(),
                cursor: 0,
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = Some(ScopeId(self.scopes.len() - 1));
        self.scopes.push(Scope {
            kind,
            parent,
            statements: Vec::new(),
            cursor: 0,
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Pops the innermost scope and hands back its buffer and kind.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() == 1 {
            return None;
        }
        self.scopes.pop()
    }

    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("scope arena is never empty")
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope arena is never empty")
    }

    // =========================================================
    // Statement buffer and insertion cursor
    // =========================================================

    /// Appends at the end of the current buffer and parks the cursor
    /// after it.
    pub fn emit(&mut self, stmt: IrStmt) {
        let scope = self.current_mut();
        scope.statements.push(stmt);
        scope.cursor = scope.statements.len();
    }

    /// Inserts at the cursor — i.e. immediately before the statement
    /// currently being lowered.
    pub fn hoist(&mut self, stmt: IrStmt) {
        let scope = self.current_mut();
        let cursor = scope.cursor.min(scope.statements.len());
        scope.statements.insert(cursor, stmt);
        scope.cursor = cursor + 1;
    }

    pub fn set_cursor_before(&mut self, index: usize) {
        let scope = self.current_mut();
        scope.cursor = index.min(scope.statements.len());
    }

    pub fn set_cursor_after(&mut self, index: usize) {
        let scope = self.current_mut();
        scope.cursor = (index + 1).min(scope.statements.len());
    }

    pub fn reset_cursor_to_start(&mut self) {
        self.current_mut().cursor = 0;
    }

    pub fn reset_cursor_to_end(&mut self) {
        let scope = self.current_mut();
        scope.cursor = scope.statements.len();
    }

    // =========================================================
    // Locals
    // =========================================================

    /// Adds a new local to the enclosing method scope. Returns the name
    /// the IR should use, or None when the local already exists and the
    /// caller must reuse the existing binding.
    ///
    /// One hard-coded exception: a local named like the identifier the
    /// designer tooling reserves gets a stable rename instead of its own
    /// name.
    pub fn declare_local(&mut self, name: &str, known: KnownType) -> Option<String> {
        let index = self.find_method_scope()?;
        let ScopeKind::Method { locals, .. } = &mut self.scopes[index].kind else {
            return None;
        };

        if locals.contains_key(name) {
            return None;
        }

        let effective_name = if name == DESIGNER_RESERVED_LOCAL {
            DESIGNER_RESERVED_RENAME.to_string()
        } else {
            name.to_string()
        };

        locals.insert(
            name.to_string(),
            LocalInfo {
                effective_name: effective_name.clone(),
                known,
            },
        );
        Some(effective_name)
    }

    pub fn local_info(&self, name: &str) -> Option<&LocalInfo> {
        let index = self.find_method_scope()?;
        let ScopeKind::Method { locals, .. } = &self.scopes[index].kind else {
            return None;
        };
        locals.get(name)
    }

    /// The name the IR uses for a source variable, applying the reserved
    /// rename when the local is declared.
    pub fn effective_local_name(&self, name: &str) -> String {
        match self.local_info(name) {
            Some(info) => info.effective_name.clone(),
            None => name.to_string(),
        }
    }

    // =========================================================
    // Static variable promotion
    // =========================================================

    /// Records the promoted field for a `static $name`. Returns false
    /// when the method already promoted a static of that name.
    pub fn register_static(&mut self, name: &str, field_name: String) -> bool {
        let Some(index) = self.find_method_scope() else {
            return false;
        };
        let ScopeKind::Method { statics, .. } = &mut self.scopes[index].kind else {
            return false;
        };
        if statics.contains_key(name) {
            return false;
        }
        statics.insert(name.to_string(), field_name);
        true
    }

    pub fn static_field_for(&self, name: &str) -> Option<String> {
        let index = self.find_method_scope()?;
        let ScopeKind::Method { statics, .. } = &self.scopes[index].kind else {
            return None;
        };
        statics.get(name).cloned()
    }

    pub fn add_promoted_field(&mut self, field: IrField) {
        if let Some(index) = self.find_type_scope() {
            if let ScopeKind::Type { promoted, .. } = &mut self.scopes[index].kind {
                promoted.push(field);
            }
        }
    }

    // =========================================================
    // Enclosing context queries
    // =========================================================

    pub fn enclosing_method(&self) -> Option<(&str, bool)> {
        let index = self.find_method_scope()?;
        match &self.scopes[index].kind {
            ScopeKind::Method {
                name, is_static, ..
            } => Some((name.as_str(), *is_static)),
            _ => None,
        }
    }

    /// Name, base, and member registry of the type currently being
    /// lowered, for the inference context.
    pub fn enclosing_type_view(&self) -> (Option<&str>, Option<&QualifiedName>, &[MemberInfo]) {
        match self.find_type_scope() {
            Some(index) => match &self.scopes[index].kind {
                ScopeKind::Type {
                    name,
                    base,
                    members,
                    ..
                } => (Some(name.as_str()), base.as_ref(), members.as_slice()),
                _ => (None, None, &[]),
            },
            None => (None, None, &[]),
        }
    }

    fn find_method_scope(&self) -> Option<usize> {
        self.walk_up(|kind| matches!(kind, ScopeKind::Method { .. }))
    }

    fn find_type_scope(&self) -> Option<usize> {
        self.walk_up(|kind| matches!(kind, ScopeKind::Type { .. }))
    }

    fn walk_up(&self, matches: impl Fn(&ScopeKind) -> bool) -> Option<usize> {
        let mut current = Some(ScopeId(self.scopes.len() - 1));
        while let Some(ScopeId(index)) = current {
            if matches(&self.scopes[index].kind) {
                return Some(index);
            }
            current = self.scopes[index].parent;
        }
        None
    }

    // =========================================================
    // Break / continue resolution
    // =========================================================

    /// Walks outward: loop scopes consume a level (and supply the label
    /// at level 1), switch scopes consume levels for `break` only, block
    /// scopes pass through. Hitting the method boundary means the
    /// request escaped every loop — the caller reports that.
    pub fn resolve_break_target(&self, mut request: BreakTargetRequest) -> Option<String> {
        let mut current = Some(ScopeId(self.scopes.len() - 1));
        while let Some(ScopeId(index)) = current {
            let scope = &self.scopes[index];
            match &scope.kind {
                ScopeKind::Loop { labels } => {
                    if request.levels <= 1 {
                        return Some(match request.kind {
                            BreakKind::Break => labels.end.clone(),
                            BreakKind::Continue => labels.start.clone(),
                        });
                    }
                    request.levels -= 1;
                }
                ScopeKind::Switch { end_label } => {
                    if request.kind == BreakKind::Break {
                        if request.levels <= 1 {
                            return Some(end_label.clone());
                        }
                        request.levels -= 1;
                    }
                }
                ScopeKind::Block => {}
                ScopeKind::Method { .. }
                | ScopeKind::Type { .. }
                | ScopeKind::Namespace { .. }
                | ScopeKind::File => return None,
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        ScopeArena::new()
    }
}

impl LocalTypeLookup for ScopeArena {
    fn local_type(&self, name: &str) -> KnownType {
        if let Some(info) = self.local_info(name) {
            return info.known.clone();
        }

        // The IR carries effective names; the reserved rename only
        // matches through its declared entry.
        if let Some(index) = self.find_method_scope() {
            if let ScopeKind::Method { locals, .. } = &self.scopes[index].kind {
                if let Some(info) = locals.values().find(|info| info.effective_name == name) {
                    return info.known.clone();
                }
            }
        }

        KnownType::Unknown
    }
}
