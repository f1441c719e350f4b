//! Error types for rewriting and dispatch.
//!
//! Rules never fail: a rule that cannot prove a rewrite safe reports
//! nothing. Errors only arise when applying an action.

use thiserror::Error;

use crate::rules::RuleId;
use crate::syntax::{NodeId, SyntaxKind, TextSpan};

/// Failure to apply an [`Edit`](crate::rewrite::Edit) to a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("overlapping changes at {0}")]
    OverlappingChanges(TextSpan),
    #[error("cannot splice {count} nodes into a {parent:?} slot")]
    InvalidSplice { parent: SyntaxKind, count: usize },
    #[error("node {0:?} is not part of this snapshot")]
    UnknownTarget(NodeId),
    #[error("unexpected {kind:?} shape: {reason}")]
    UnexpectedShape { kind: SyntaxKind, reason: &'static str },
}

/// Failure to select or commit a candidate action.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no candidate action for rule {0}")]
    NotFound(RuleId),
    #[error("action {rule} at {span} no longer matches the snapshot")]
    StaleAction { rule: RuleId, span: TextSpan },
    #[error("collection was cancelled")]
    Cancelled,
    #[error("rewrite failed: {0}")]
    Rewrite(#[from] RewriteError),
}
