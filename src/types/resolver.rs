//! Type name resolution
//!
//! Resolves a possibly-qualified PHP name against the translation unit's
//! alias table, its import list, and the referenced binaries. An unknown
//! type is not an error here: the caller's heuristic falls back to its
//! conservative answer.

use crate::source_ast::source_nodes::QualifiedName;
use crate::types::symbols::{SymbolProvider, TypeHandle};
use rustc_hash::FxHashMap;

pub struct TypeResolver<'a> {
    /// Short alias -> dotted namespace-qualified replacement.
    aliases: &'a FxHashMap<String, String>,
    /// Dotted namespace names whose types are visible unqualified.
    imports: &'a [String],
    symbols: &'a dyn SymbolProvider,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        aliases: &'a FxHashMap<String, String>,
        imports: &'a [String],
        symbols: &'a dyn SymbolProvider,
    ) -> TypeResolver<'a> {
        TypeResolver {
            aliases,
            imports,
            symbols,
        }
    }

    pub fn symbols(&self) -> &'a dyn SymbolProvider {
        self.symbols
    }

    /// Resolves to a handle in the referenced binaries, or None.
    pub fn resolve(&self, name: &QualifiedName) -> Option<TypeHandle> {
        for candidate in self.candidates(name) {
            if let Some(handle) = self.symbols.lookup_type(&candidate) {
                return Some(handle);
            }
        }
        None
    }

    /// The dotted name the IR should carry for this reference: the
    /// resolved full name when the type is known, otherwise the
    /// alias-expanded spelling as written.
    pub fn resolve_display_name(&self, name: &QualifiedName) -> String {
        if let Some(handle) = self.resolve(name) {
            if let Some(info) = self.symbols.type_info(handle) {
                return info.full_name.clone();
            }
        }
        self.alias_expanded(name)
    }

    fn alias_expanded(&self, name: &QualifiedName) -> String {
        if let Some(first) = name.parts.first() {
            if let Some(replacement) = self.aliases.get(first) {
                let rest = &name.parts[1..];
                return if rest.is_empty() {
                    replacement.clone()
                } else {
                    format!("{}.{}", replacement, rest.join("."))
                };
            }
        }
        name.to_dotted()
    }

    fn candidates(&self, name: &QualifiedName) -> Vec<String> {
        let expanded = self.alias_expanded(name);
        let mut candidates = vec![expanded.clone()];

        if expanded == name.to_dotted() && !name.is_qualified() {
            // Unqualified and unaliased: try each imported namespace.
            for import in self.imports {
                candidates.push(format!("{}.{}", import, name.short_name()));
            }
        }

        candidates
    }
}
