//! ============================================================
//!                          phpnet
//! ============================================================
//! The AST-lowering core of a PHP-to-.NET ahead-of-time compiler.
//!
//! One [`Translator`] turns one parsed PHP program (a read-only source
//! AST produced by an external parser) into a language-agnostic target IR
//! tree consumed by an external emitter and by design-time tooling.
//!
//! Out of scope here, by contract: parsing, emission, orchestration, and
//! any I/O. The translator is synchronous and single-threaded; all
//! synthesized names come from per-translation allocators, so identical
//! inputs produce identical IR run-to-run.

pub mod settings;

pub mod source_ast;

pub mod ir;

pub mod types;

pub mod lowering;

pub mod messages {
    pub mod dev_logging;
    pub mod translate_errors;
}

pub use crate::ir::ir_nodes::IrNamespace;
pub use crate::messages::translate_errors::{ErrorKind, TranslateError};
pub use crate::settings::{DelegateDetection, EventRecognition, TranslatorConfig};
pub use crate::source_ast::source_nodes::SourceProgram;
pub use crate::types::symbols::{FixedSymbolTable, SymbolProvider};

use crate::source_ast::source_nodes::QualifiedName;
use rustc_hash::FxHashMap;

/// Everything the host supplies alongside the program itself: the alias
/// table, the namespaces visible unqualified, and the referenced
/// binaries. All of it is consumed read-only.
pub struct TranslationEnv<'a> {
    /// Short alias -> dotted namespace-qualified replacement.
    pub aliases: FxHashMap<String, String>,
    /// Dotted namespace names whose types resolve unqualified.
    pub imports: Vec<String>,
    pub symbols: &'a dyn SymbolProvider,
}

impl<'a> TranslationEnv<'a> {
    pub fn new(symbols: &'a dyn SymbolProvider) -> TranslationEnv<'a> {
        TranslationEnv {
            aliases: FxHashMap::default(),
            imports: Vec::new(),
            symbols,
        }
    }

    pub fn with_alias(
        mut self,
        short: impl Into<String>,
        replacement: impl Into<String>,
    ) -> TranslationEnv<'a> {
        self.aliases.insert(short.into(), replacement.into());
        self
    }

    pub fn with_import(mut self, namespace: impl Into<String>) -> TranslationEnv<'a> {
        self.imports.push(namespace.into());
        self
    }

    /// Convenience for hosts holding PHP-style alias targets.
    pub fn with_php_alias(self, short: impl Into<String>, target: &str) -> TranslationEnv<'a> {
        let dotted = QualifiedName::from_php(target).to_dotted();
        self.with_alias(short, dotted)
    }
}

/// The translator. Configuration is fixed at construction; each
/// [`Translator::translate`] call is an independent translation with its
/// own scope chain and name counters.
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Translator {
        Translator { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates one program into one IR namespace tree. The first
    /// unsupported construct aborts the translation; nothing partial is
    /// returned.
    pub fn translate(
        &self,
        program: &SourceProgram,
        env: &TranslationEnv,
    ) -> Result<IrNamespace, TranslateError> {
        crate::ast_log!(
            "translating program with {} type declaration(s)",
            program.types.len()
        );

        let ir = lowering::lower_declaration::translate_program(&self.config, env, program)?;

        crate::ir_log!("{}", ir);

        Ok(ir)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Translator::new(TranslatorConfig::default())
    }
}
