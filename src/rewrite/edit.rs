//! Structural changes against one snapshot.

use std::sync::Arc;

use crate::error::RewriteError;
use crate::syntax::ast::{Invocation, MemberAccess};
use crate::syntax::{GreenNode, GreenToken, NodeId, SyntaxKind, SyntaxNode, SyntaxToken, TextSpan};

use super::trivia::carry_trivia;

/// One change. Node changes replace a node with zero (removal), one, or
/// several (split, only inside a `List`) nodes.
#[derive(Debug, Clone)]
pub enum Change {
    Node {
        target: NodeId,
        span: TextSpan,
        replacement: Vec<Arc<GreenNode>>,
    },
    Token {
        parent: NodeId,
        slot: usize,
        span: TextSpan,
        replacement: Arc<GreenToken>,
    },
}

impl Change {
    pub fn full_span(&self) -> TextSpan {
        match self {
            Change::Node { span, .. } | Change::Token { span, .. } => *span,
        }
    }
}

/// A set of non-overlapping changes, applied by [`Rewriter`](super::Rewriter).
///
/// Every replacement node is tagged for reformatting.
#[derive(Debug, Clone, Default)]
pub struct Edit {
    changes: Vec<Change>,
}

impl Edit {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_change(node: SyntaxNode<'_>, replacement: Vec<GreenNode>) -> Self {
        Self {
            changes: vec![Change::Node {
                target: node.id(),
                span: node.full_span(),
                replacement: replacement
                    .into_iter()
                    .map(|n| Arc::new(n.with_formatting()))
                    .collect(),
            }],
        }
    }

    /// Replace `node`, moving its outer trivia onto `replacement`.
    pub fn replace(node: SyntaxNode<'_>, replacement: GreenNode) -> Self {
        Self::node_change(node, vec![carry_trivia(node.green(), replacement)])
    }

    /// Replace `node` with `replacement` exactly as given, trivia included.
    pub fn replace_exact(node: SyntaxNode<'_>, replacement: GreenNode) -> Self {
        Self::node_change(node, vec![replacement])
    }

    /// Replace `node` with several siblings. The first part takes the
    /// original leading trivia and the last part the original trailing
    /// trivia; interior boundaries keep the trivia the parts carry.
    pub fn split(node: SyntaxNode<'_>, mut parts: Vec<GreenNode>) -> Self {
        let green = node.green();
        if let Some(first) = parts.first_mut() {
            *first = first.with_leading_trivia(green.leading_trivia().to_vec());
        }
        if let Some(last) = parts.last_mut() {
            *last = last.with_trailing_trivia(green.trailing_trivia().to_vec());
        }
        Self::node_change(node, parts)
    }

    /// Remove `node` together with its trivia.
    pub fn remove(node: SyntaxNode<'_>) -> Self {
        Self::node_change(node, Vec::new())
    }

    pub fn replace_token(token: SyntaxToken<'_>, replacement: GreenToken) -> Self {
        Self {
            changes: vec![Change::Token {
                parent: token.parent().id(),
                slot: token.slot(),
                span: token.full_span(),
                replacement: Arc::new(replacement),
            }],
        }
    }

    /// Fuse a chained call `x.Inner(args).Outer()` into `x.Outer(args)`.
    ///
    /// The outer member name takes the place (and trivia) of the inner one.
    pub fn merge_chained_call(outer: SyntaxNode<'_>) -> Result<Self, RewriteError> {
        let shape = |reason| RewriteError::UnexpectedShape {
            kind: outer.kind(),
            reason,
        };

        let outer_access = Invocation::cast(outer)
            .and_then(|i| i.member_access())
            .ok_or_else(|| shape("callee is not a member access"))?;
        let outer_name = outer_access
            .name()
            .ok_or_else(|| shape("missing outer member name"))?;
        let inner = outer_access
            .expression()
            .and_then(Invocation::cast)
            .ok_or_else(|| shape("receiver is not an invocation"))?;
        let inner_access = inner
            .member_access()
            .ok_or_else(|| shape("inner callee is not a member access"))?;
        let inner_name = inner_access
            .name()
            .ok_or_else(|| shape("missing inner member name"))?;

        let name = carry_trivia(inner_name.syntax().green(), outer_name.syntax().green().without_trivia());
        let access = inner_access
            .syntax()
            .green()
            .with_slot(2, Some(name.into()));
        let call = inner.syntax().green().with_slot(0, Some(access.into()));

        Ok(Self::replace(outer, call))
    }

    /// Combine two edits against the same snapshot.
    pub fn and(mut self, other: Edit) -> Self {
        self.changes.extend(other.changes);
        self
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Kinds of the nodes this edit produces, in order.
    pub fn replacement_kinds(&self) -> Vec<SyntaxKind> {
        self.changes
            .iter()
            .flat_map(|c| match c {
                Change::Node { replacement, .. } => replacement.iter().map(|n| n.kind()).collect(),
                Change::Token { .. } => Vec::new(),
            })
            .collect()
    }
}
