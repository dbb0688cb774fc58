//! Source positions
//!
//! Every source node carries the span it came from so translation errors
//! can point back at the offending PHP construct. The external parser fills
//! these in; the translator only ever reads them.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourcePosition {
    pub line: i32,
    pub column: i32,
}

impl SourcePosition {
    pub fn new(line: i32, column: i32) -> SourcePosition {
        SourcePosition { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextLocation {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl TextLocation {
    pub fn new(start: SourcePosition, end: SourcePosition) -> TextLocation {
        TextLocation { start, end }
    }

    /// Handy for tests and for synthesized nodes that only know their line.
    pub fn new_just_line(line: i32) -> TextLocation {
        TextLocation {
            start: SourcePosition::new(line, 0),
            end: SourcePosition::new(line, 0),
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}",
            self.start.line, self.start.column
        )
    }
}
