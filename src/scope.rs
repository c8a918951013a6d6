//! Scope tracking for the parser.
//!
//! A scope is identified by its label alone. Blocks get a label
//! derived from the position of their opening brace, so two sibling
//! blocks never share a namespace even at the same depth. A block
//! whose brace is missing has no position to name it by and falls
//! back to [`UNNAMED_BLOCK`].

use crate::token::Span;

/// Label of the outermost scope.
pub const GLOBAL_SCOPE: &str = "global";

/// Label of a block entered without an opening brace.
pub const UNNAMED_BLOCK: &str = "block";

/// Label for the block whose opening brace sits at `span`.
#[must_use]
pub fn block_label(span: Span) -> String {
    format!("block@{}:{}", span.line, span.column)
}

/// Stack of scope labels; the top is the scope new declarations
/// are registered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack {
    labels: Vec<String>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            labels: vec![GLOBAL_SCOPE.to_string()],
        }
    }

    #[must_use]
    pub fn current(&self) -> &str {
        self.labels.last().map_or(GLOBAL_SCOPE, String::as_str)
    }

    pub fn enter(&mut self, label: String) {
        self.labels.push(label);
    }

    /// Leave the innermost block. The global scope is never popped.
    pub fn exit(&mut self) {
        if self.labels.len() > 1 {
            self.labels.pop();
        }
    }

    /// Number of open blocks above the global scope.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }
}
