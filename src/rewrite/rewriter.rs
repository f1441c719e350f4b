//! Applies an [`Edit`] by rebuilding the spine above each change.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::RewriteError;
use crate::syntax::{GreenElement, GreenNode, GreenToken, NodeId, SyntaxKind, SyntaxNode, SyntaxTree};

use super::edit::{Change, Edit};

/// Stateless tree rewriter.
pub struct Rewriter;

struct Plan<'e> {
    nodes: HashMap<NodeId, &'e [Arc<GreenNode>]>,
    tokens: HashMap<(NodeId, usize), &'e Arc<GreenToken>>,
    /// Nodes with a change somewhere strictly below them.
    dirty: HashSet<NodeId>,
}

impl Rewriter {
    /// Produce a new snapshot with `edit` applied. `tree` is left untouched
    /// and every subtree the edit does not reach is shared with it.
    pub fn apply(tree: &SyntaxTree, edit: &Edit) -> Result<SyntaxTree, RewriteError> {
        let plan = Plan::new(tree, edit)?;
        let root = tree.root();
        let mut rebuilt = rebuild(root, &plan)?;

        match (rebuilt.pop(), rebuilt.is_empty()) {
            (Some(new_root), true) => Ok(SyntaxTree::new(new_root)),
            (last, _) => Err(RewriteError::InvalidSplice {
                parent: root.kind(),
                count: rebuilt.len() + usize::from(last.is_some()),
            }),
        }
    }
}

impl<'e> Plan<'e> {
    fn new(tree: &SyntaxTree, edit: &'e Edit) -> Result<Self, RewriteError> {
        let mut plan = Plan {
            nodes: HashMap::new(),
            tokens: HashMap::new(),
            dirty: HashSet::new(),
        };
        let mut targets: Vec<SyntaxNode<'_>> = Vec::new();

        for change in edit.changes() {
            match change {
                Change::Node {
                    target,
                    replacement,
                    span,
                } => {
                    let node = tree
                        .get(*target)
                        .ok_or(RewriteError::UnknownTarget(*target))?;
                    if targets
                        .iter()
                        .any(|t| t.is_ancestor_or_self_of(node.id()) || node.is_ancestor_or_self_of(t.id()))
                    {
                        return Err(RewriteError::OverlappingChanges(*span));
                    }
                    targets.push(node);
                    plan.nodes.insert(*target, replacement.as_slice());
                    plan.dirty.extend(node.ancestors().map(|a| a.id()));
                }
                Change::Token {
                    parent,
                    slot,
                    replacement,
                    span,
                } => {
                    let node = tree
                        .get(*parent)
                        .ok_or(RewriteError::UnknownTarget(*parent))?;
                    if node.child_token(*slot).is_none() {
                        return Err(RewriteError::UnknownTarget(*parent));
                    }
                    if plan.tokens.insert((*parent, *slot), replacement).is_some() {
                        return Err(RewriteError::OverlappingChanges(*span));
                    }
                    plan.dirty.extend(node.ancestors_and_self().map(|a| a.id()));
                }
            }
        }

        // A token change may not sit inside a replaced subtree.
        for (parent, _) in plan.tokens.keys() {
            if let Some(t) = targets.iter().find(|t| t.is_ancestor_or_self_of(*parent)) {
                return Err(RewriteError::OverlappingChanges(t.full_span()));
            }
        }

        Ok(plan)
    }
}

fn rebuild(node: SyntaxNode<'_>, plan: &Plan<'_>) -> Result<Vec<Arc<GreenNode>>, RewriteError> {
    let id = node.id();
    if let Some(replacement) = plan.nodes.get(&id) {
        return Ok(replacement.to_vec());
    }
    if !plan.dirty.contains(&id) {
        return Ok(vec![Arc::clone(node.green())]);
    }

    let green = node.green();
    let is_list = green.kind() == SyntaxKind::List;
    let mut slots = Vec::with_capacity(green.slots().len());

    for (i, slot) in green.slots().iter().enumerate() {
        match slot {
            None => slots.push(None),
            Some(GreenElement::Token(token)) => {
                let token = plan
                    .tokens
                    .get(&(id, i))
                    .map(|t| Arc::clone(t))
                    .unwrap_or_else(|| Arc::clone(token));
                slots.push(Some(GreenElement::Token(token)));
            }
            Some(GreenElement::Node(_)) => {
                let child = node.child_node(i).ok_or(RewriteError::UnknownTarget(id))?;
                let parts = rebuild(child, plan)?;
                if is_list {
                    slots.extend(parts.into_iter().map(|p| Some(GreenElement::Node(p))));
                    continue;
                }
                let count = parts.len();
                let mut parts = parts.into_iter();
                match (parts.next(), count) {
                    (None, _) => slots.push(None),
                    (Some(part), 1) => slots.push(Some(GreenElement::Node(part))),
                    _ => {
                        return Err(RewriteError::InvalidSplice {
                            parent: green.kind(),
                            count,
                        })
                    }
                }
            }
        }
    }

    let mut rebuilt = GreenNode::new(green.kind(), slots);
    if green.needs_formatting() {
        rebuilt = rebuilt.with_formatting();
    }
    Ok(vec![Arc::new(rebuilt)])
}
