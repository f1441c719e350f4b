//! Per-call inputs shared by every rule.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::semantic::SymbolFacts;
use crate::syntax::{SyntaxNode, TextSpan};

/// What a rule may read besides the node itself.
#[derive(Clone, Copy)]
pub struct RuleContext<'c> {
    pub facts: &'c dyn SymbolFacts,
    /// Caller's query span.
    pub query: TextSpan,
    /// Regions no rewrite may touch (generated code, caller-marked spans).
    pub protected: &'c [TextSpan],
    cancel: Option<&'c AtomicBool>,
}

impl<'c> RuleContext<'c> {
    pub fn new(facts: &'c dyn SymbolFacts, query: TextSpan) -> Self {
        Self {
            facts,
            query,
            protected: &[],
            cancel: None,
        }
    }

    pub fn with_protected(mut self, protected: &'c [TextSpan]) -> Self {
        self.protected = protected;
        self
    }

    pub fn with_cancel(mut self, cancel: &'c AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }

    pub fn is_protected(&self, span: TextSpan) -> bool {
        self.protected.iter().any(|p| p.overlaps(span) || p.contains_span(span))
    }

    /// Whether a rewrite of `node` could be unsafe for reasons unrelated to
    /// the rule: malformed input or a protected region.
    pub fn rejects(&self, node: SyntaxNode<'_>) -> bool {
        node.contains_error() || self.is_protected(node.full_span())
    }
}
