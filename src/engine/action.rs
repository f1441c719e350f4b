//! Candidate actions and diagnostics.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::rules::{Classification, Highlight, Producer, RuleId, Severity};
use crate::syntax::{GreenNode, NodeId, SyntaxKind, SyntaxNode, SyntaxTree, TextSpan};

/// Identity used to collapse competing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EquivalenceKey {
    pub rule: RuleId,
    pub span: TextSpan,
    pub discriminator: Option<&'static str>,
}

/// The node a producer was bound to, in the snapshot it was collected from.
#[derive(Clone)]
pub(crate) struct Anchor {
    root: Arc<GreenNode>,
    node: NodeId,
    kind: SyntaxKind,
    span: TextSpan,
}

impl Anchor {
    pub(crate) fn new(node: SyntaxNode<'_>) -> Self {
        Self {
            root: node.tree().root_green().clone(),
            node: node.id(),
            kind: node.kind(),
            span: node.full_span(),
        }
    }

    /// The anchored node, if `tree` is still the snapshot it came from.
    pub(crate) fn resolve<'t>(&self, tree: &'t SyntaxTree) -> Option<SyntaxNode<'t>> {
        if !tree.is_snapshot_of(&self.root) {
            return None;
        }
        tree.get(self.node)
            .filter(|n| n.kind() == self.kind && n.full_span() == self.span)
    }
}

/// A proposed rewrite, ready to be shown to a caller and committed.
#[derive(Clone)]
pub struct CandidateAction {
    pub rule: RuleId,
    pub title: String,
    pub span: TextSpan,
    pub severity: Severity,
    /// Primary span first, then fade-out spans.
    pub highlights: Vec<Highlight>,
    pub key: EquivalenceKey,
    pub(crate) anchor: Anchor,
    pub(crate) producer: Producer,
}

impl CandidateAction {
    /// Spans of text the rewrite removes.
    pub fn fade_spans(&self) -> impl Iterator<Item = TextSpan> + '_ {
        self.highlights
            .iter()
            .filter(|h| h.classification == Classification::FadeOut)
            .map(|h| h.span)
    }

    /// Whether `tree` is the snapshot this action was collected from.
    pub fn is_valid_for(&self, tree: &SyntaxTree) -> bool {
        self.anchor.resolve(tree).is_some()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            rule: self.rule,
            severity: self.severity,
            title: self.title.clone(),
            span: self.span,
            highlights: self.highlights.clone(),
        }
    }
}

impl fmt::Debug for CandidateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateAction")
            .field("rule", &self.rule)
            .field("title", &self.title)
            .field("span", &self.span)
            .field("severity", &self.severity)
            .field("highlights", &self.highlights)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// A finding reported over a whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    pub title: String,
    pub span: TextSpan,
    pub highlights: Vec<Highlight>,
}
