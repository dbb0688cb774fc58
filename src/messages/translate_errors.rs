use crate::source_ast::locations::TextLocation;
use std::fmt;

// The single error currency of the translator. The first error aborts the
// whole translation of a unit; nothing partial is ever handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateError {
    /// Short name of the offending construct ("reference assignment",
    /// "break", ...). Mirrors the source node kind.
    pub construct: String,
    pub msg: String,
    pub location: TextLocation,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source construct or combination with no lowering. The normal
    /// failure mode of the translator.
    UnsupportedConstruct,
    /// An internal invariant broke. Not the user's fault.
    TranslatorBug,
}

impl TranslateError {
    pub fn unsupported(
        construct: impl Into<String>,
        msg: impl Into<String>,
        location: TextLocation,
    ) -> TranslateError {
        TranslateError {
            construct: construct.into(),
            msg: msg.into(),
            location,
            kind: ErrorKind::UnsupportedConstruct,
        }
    }

    pub fn translator_bug(msg: impl Into<String>, location: TextLocation) -> TranslateError {
        TranslateError {
            construct: String::new(),
            msg: msg.into(),
            location,
            kind: ErrorKind::TranslatorBug,
        }
    }
}

pub fn error_kind_to_str(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnsupportedConstruct => "Unsupported Construct",
        ErrorKind::TranslatorBug => "Translator Bug",
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.construct.is_empty() {
            write!(
                f,
                "{} ({}): {}",
                error_kind_to_str(self.kind),
                self.location,
                self.msg
            )
        } else {
            write!(
                f,
                "{} '{}' ({}): {}",
                error_kind_to_str(self.kind),
                self.construct,
                self.location,
                self.msg
            )
        }
    }
}

impl std::error::Error for TranslateError {}

/// Returns a new TranslateError for a source construct with no lowering.
///
/// Usage: `return_unsupported!("reference assignment", "message", location);`
#[macro_export]
macro_rules! return_unsupported {
    ($construct:expr, $msg:expr, $loc:expr) => {
        return Err(
            $crate::messages::translate_errors::TranslateError::unsupported(
                $construct, $msg, $loc,
            ),
        )
    };
    ($construct:expr, $fmt:expr, $($arg:expr),+ ; $loc:expr) => {
        return Err(
            $crate::messages::translate_errors::TranslateError::unsupported(
                $construct,
                format!($fmt, $($arg),+),
                $loc,
            ),
        )
    };
}

/// Returns a new TranslateError for a broken internal invariant.
///
/// These point at translator defects, not at the PHP program.
#[macro_export]
macro_rules! return_translator_bug {
    ($msg:expr, $loc:expr) => {
        return Err(
            $crate::messages::translate_errors::TranslateError::translator_bug($msg, $loc),
        )
    };
    ($fmt:expr, $($arg:expr),+ ; $loc:expr) => {
        return Err(
            $crate::messages::translate_errors::TranslateError::translator_bug(
                format!($fmt, $($arg),+),
                $loc,
            ),
        )
    };
}
