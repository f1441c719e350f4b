//! Positioned views over a green tree.
//!
//! A [`SyntaxTree`] owns one snapshot: the green root plus a preorder table
//! giving every node its parent, absolute offset and child ids. The table is
//! built once per snapshot and is never used for ownership; a rewrite builds
//! a new tree and a new table.

use std::fmt;
use std::sync::Arc;

use super::green::{GreenElement, GreenNode, GreenToken, Trivia};
use super::kind::SyntaxKind;
use super::span::TextSpan;

/// Preorder index of a node within one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    green: Arc<GreenNode>,
    parent: Option<NodeId>,
    /// Slot index within the parent.
    slot: usize,
    /// Absolute offset of the full span.
    offset: usize,
    slot_children: Vec<Option<NodeId>>,
    /// Exclusive end of this node's preorder range.
    subtree_end: u32,
}

/// An immutable, indexed snapshot of a parsed document.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: Arc<GreenNode>,
    entries: Vec<NodeEntry>,
}

impl SyntaxTree {
    pub fn new(root: impl Into<Arc<GreenNode>>) -> Self {
        let root = root.into();
        let mut entries = Vec::new();
        index_node(&root, None, 0, 0, &mut entries);
        Self { root, entries }
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(NodeId(0))
    }

    pub fn root_green(&self) -> &Arc<GreenNode> {
        &self.root
    }

    /// Whether `root` is the green root of this exact snapshot.
    pub fn is_snapshot_of(&self, root: &Arc<GreenNode>) -> bool {
        Arc::ptr_eq(&self.root, root)
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    pub fn get(&self, id: NodeId) -> Option<SyntaxNode<'_>> {
        (id.index() < self.entries.len()).then(|| self.node(id))
    }

    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.root.full_width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nodes in preorder.
    pub fn nodes(&self) -> impl Iterator<Item = SyntaxNode<'_>> + '_ {
        (0..self.entries.len() as u32).map(move |i| self.node(NodeId(i)))
    }

    /// The source text, byte for byte.
    pub fn render(&self) -> String {
        self.root.to_full_string()
    }

    /// Innermost node whose full span covers `span`.
    ///
    /// For an empty span sitting on a boundary between two siblings the
    /// node to the right wins, unless the caret is at the very end.
    pub fn covering_node(&self, span: TextSpan) -> SyntaxNode<'_> {
        let mut current = self.root();
        loop {
            let next = if span.is_empty() {
                current
                    .children()
                    .find(|c| c.full_span().contains(span.start))
                    .or_else(|| current.children().find(|c| c.full_span().end == span.start))
            } else {
                current
                    .children()
                    .find(|c| c.full_span().contains_span(span))
            };
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Spans of nodes tagged for the external formatter.
    pub fn formatting_spans(&self) -> Vec<TextSpan> {
        self.nodes()
            .filter(|n| n.green().needs_formatting())
            .map(|n| n.full_span())
            .collect()
    }

    /// Find the node with the given kind and span, if it still exists.
    pub fn find_node(&self, kind: SyntaxKind, span: TextSpan) -> Option<SyntaxNode<'_>> {
        let mut node = Some(self.covering_node(span));
        while let Some(n) = node {
            if n.kind() == kind && n.span() == span {
                return Some(n);
            }
            if !n.full_span().contains_span(span) {
                break;
            }
            node = n.parent();
        }
        // Zero-width nodes are not reachable through the covering chain.
        self.nodes().find(|n| n.kind() == kind && n.span() == span)
    }
}

fn index_node(
    green: &Arc<GreenNode>,
    parent: Option<NodeId>,
    slot: usize,
    offset: usize,
    entries: &mut Vec<NodeEntry>,
) -> NodeId {
    let id = NodeId(entries.len() as u32);
    entries.push(NodeEntry {
        green: Arc::clone(green),
        parent,
        slot,
        offset,
        slot_children: vec![None; green.slots().len()],
        subtree_end: 0,
    });

    let mut child_offset = offset;
    for (i, element) in green.slots().iter().enumerate() {
        let Some(element) = element else { continue };
        if let GreenElement::Node(child) = element {
            let child_id = index_node(child, Some(id), i, child_offset, entries);
            entries[id.index()].slot_children[i] = Some(child_id);
        }
        child_offset += element.full_width();
    }

    entries[id.index()].subtree_end = entries.len() as u32;
    id
}

/// A node positioned within a snapshot.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.span())
    }
}

impl<'a> SyntaxNode<'a> {
    fn entry(&self) -> &'a NodeEntry {
        &self.tree.entries[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.entry().green.kind()
    }

    pub fn green(&self) -> &'a Arc<GreenNode> {
        &self.entry().green
    }

    /// Span including leading and trailing trivia.
    pub fn full_span(&self) -> TextSpan {
        let offset = self.entry().offset;
        TextSpan::new(offset, offset + self.green().full_width())
    }

    /// Span excluding the outer trivia.
    pub fn span(&self) -> TextSpan {
        let full = self.full_span();
        let green = self.green();
        let start = full.start + green.leading_width();
        let end = (full.end - green.trailing_width()).max(start);
        TextSpan::new(start, end)
    }

    pub fn text(&self) -> String {
        self.green().to_text()
    }

    pub fn full_text(&self) -> String {
        self.green().to_full_string()
    }

    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        self.entry().parent.map(|id| self.tree.node(id))
    }

    /// Slot this node occupies in its parent.
    pub fn slot_in_parent(&self) -> usize {
        self.entry().slot
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    pub fn ancestors_and_self(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        std::iter::successors(Some(*self), |n| n.parent())
    }

    /// Closest ancestor that is not a `List` wrapper.
    pub fn structural_parent(&self) -> Option<SyntaxNode<'a>> {
        self.ancestors().find(|n| n.kind() != SyntaxKind::List)
    }

    pub fn children(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        let tree = self.tree;
        self.entry()
            .slot_children
            .iter()
            .flatten()
            .map(move |id| tree.node(*id))
    }

    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        let tree = self.tree;
        (self.id.0 + 1..self.entry().subtree_end).map(move |i| tree.node(NodeId(i)))
    }

    pub fn descendants_and_self(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        let tree = self.tree;
        (self.id.0..self.entry().subtree_end).map(move |i| tree.node(NodeId(i)))
    }

    /// Whether `other` is this node or lies beneath it.
    pub fn is_ancestor_or_self_of(&self, other: NodeId) -> bool {
        self.id.0 <= other.0 && other.0 < self.entry().subtree_end
    }

    pub(crate) fn subtree_range(&self) -> (NodeId, NodeId) {
        (self.id, NodeId(self.entry().subtree_end))
    }

    /// Absolute full-span start of the given slot.
    pub fn slot_offset(&self, slot: usize) -> usize {
        self.entry().offset
            + self.green().slots()[..slot]
                .iter()
                .flatten()
                .map(GreenElement::full_width)
                .sum::<usize>()
    }

    pub fn child_node(&self, slot: usize) -> Option<SyntaxNode<'a>> {
        self.entry()
            .slot_children
            .get(slot)
            .copied()
            .flatten()
            .map(|id| self.tree.node(id))
    }

    pub fn child_token(&self, slot: usize) -> Option<SyntaxToken<'a>> {
        let token = self.green().slot(slot)?.as_token()?;
        Some(SyntaxToken {
            tree: self.tree,
            parent: self.id,
            slot,
            offset: self.slot_offset(slot),
            green: token,
        })
    }

    /// Node children of the `List` in `slot`, skipping separators.
    pub fn list_nodes(&self, slot: usize) -> Vec<SyntaxNode<'a>> {
        self.child_node(slot)
            .map(|list| list.children().collect())
            .unwrap_or_default()
    }

    /// Separator tokens of the `List` in `slot`.
    pub fn list_tokens(&self, slot: usize) -> Vec<SyntaxToken<'a>> {
        let Some(list) = self.child_node(slot) else {
            return Vec::new();
        };
        (0..list.green().slots().len())
            .filter_map(|i| list.child_token(i))
            .collect()
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'a>> {
        let parent = self.parent()?;
        let slot = self.slot_in_parent();
        parent.entry().slot_children[slot + 1..]
            .iter()
            .flatten()
            .next()
            .map(|id| self.tree.node(*id))
    }

    pub fn previous_sibling(&self) -> Option<SyntaxNode<'a>> {
        let parent = self.parent()?;
        let slot = self.slot_in_parent();
        parent.entry().slot_children[..slot]
            .iter()
            .rev()
            .flatten()
            .next()
            .map(|id| self.tree.node(*id))
    }

    /// All tokens of the subtree in source order.
    pub fn tokens(&self) -> Vec<SyntaxToken<'a>> {
        self.token_iter().collect()
    }

    /// Lazy walk over the subtree's tokens in source order.
    pub fn token_iter(&self) -> TokenIter<'a> {
        TokenIter { stack: vec![(*self, 0)] }
    }

    pub fn first_token(&self) -> Option<SyntaxToken<'a>> {
        self.token_iter().next()
    }

    pub fn last_token(&self) -> Option<SyntaxToken<'a>> {
        for slot in (0..self.green().slots().len()).rev() {
            if let Some(child) = self.child_node(slot) {
                if let Some(token) = child.last_token() {
                    return Some(token);
                }
            } else if let Some(token) = self.child_token(slot) {
                return Some(token);
            }
        }
        None
    }

    /// Every trivia fragment of the subtree, with absolute spans.
    pub fn trivia(&self) -> Vec<TriviaRef<'a>> {
        self.trivia_iter().collect()
    }

    /// Lazy form of [`SyntaxNode::trivia`].
    pub fn trivia_iter(&self) -> impl Iterator<Item = TriviaRef<'a>> {
        self.token_iter().flat_map(|t| {
            let mut all = t.leading_trivia();
            all.extend(t.trailing_trivia());
            all
        })
    }

    /// Trivia between the first and last token, excluding the outer trivia.
    pub fn inner_trivia(&self) -> Vec<TriviaRef<'a>> {
        let span = self.span();
        self.trivia()
            .into_iter()
            .filter(|t| span.contains_span(t.span) && !t.span.is_empty())
            .collect()
    }

    pub fn contains_error(&self) -> bool {
        self.green().contains_error()
    }

    pub fn contains_comments(&self) -> bool {
        self.green().contains_comments()
    }

    pub fn contains_directives(&self) -> bool {
        self.green().contains_directives()
    }

    /// Whether a directive sits strictly inside the node's span.
    pub fn span_contains_directives(&self) -> bool {
        self.contains_directives_in(self.span())
    }

    /// Whether a directive trivia of this subtree overlaps `span`.
    pub fn contains_directives_in(&self, span: TextSpan) -> bool {
        self.contains_directives()
            && self
                .trivia_iter()
                .any(|t| t.trivia.kind.is_directive() && t.span.overlaps(span))
    }

    /// Whether a comment trivia of this subtree overlaps `span`.
    pub fn contains_comments_in(&self, span: TextSpan) -> bool {
        self.contains_comments()
            && self
                .trivia_iter()
                .any(|t| t.trivia.kind.is_comment() && t.span.overlaps(span))
    }
}

/// Depth-first token walk; see [`SyntaxNode::token_iter`].
pub struct TokenIter<'a> {
    stack: Vec<(SyntaxNode<'a>, usize)>,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = SyntaxToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, slot)) = self.stack.pop() {
            if slot >= node.green().slots().len() {
                continue;
            }
            self.stack.push((node, slot + 1));
            if let Some(child) = node.child_node(slot) {
                self.stack.push((child, 0));
            } else if let Some(token) = node.child_token(slot) {
                return Some(token);
            }
        }
        None
    }
}

/// A token positioned within a snapshot.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a SyntaxTree,
    parent: NodeId,
    slot: usize,
    offset: usize,
    green: &'a Arc<GreenToken>,
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind(), self.text(), self.span())
    }
}

impl<'a> SyntaxToken<'a> {
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    pub fn text(&self) -> &'a str {
        self.green.text()
    }

    pub fn green(&self) -> &'a Arc<GreenToken> {
        self.green
    }

    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    pub fn parent(&self) -> SyntaxNode<'a> {
        self.tree.node(self.parent)
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.offset + self.green.full_width())
    }

    pub fn span(&self) -> TextSpan {
        let start = self.offset + self.green.leading_width();
        TextSpan::new(start, start + self.green.width())
    }

    pub fn leading_trivia(&self) -> Vec<TriviaRef<'a>> {
        self.trivia_refs(self.green.leading(), self.offset, true)
    }

    pub fn trailing_trivia(&self) -> Vec<TriviaRef<'a>> {
        self.trivia_refs(self.green.trailing(), self.span().end, false)
    }

    fn trivia_refs(&self, list: &'a [Trivia], start: usize, leading: bool) -> Vec<TriviaRef<'a>> {
        let mut offset = start;
        list.iter()
            .enumerate()
            .map(|(index, trivia)| {
                let span = TextSpan::new(offset, offset + trivia.width());
                offset = span.end;
                TriviaRef {
                    token: *self,
                    leading,
                    index,
                    span,
                    trivia,
                }
            })
            .collect()
    }
}

/// A trivia fragment positioned within a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TriviaRef<'a> {
    pub token: SyntaxToken<'a>,
    /// Leading (true) or trailing (false) list of the token.
    pub leading: bool,
    /// Index within that list.
    pub index: usize,
    pub span: TextSpan,
    pub trivia: &'a Trivia,
}

impl TriviaRef<'_> {
    /// The list this fragment belongs to.
    pub fn siblings(&self) -> &[Trivia] {
        if self.leading {
            self.token.green().leading()
        } else {
            self.token.green().trailing()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::factory as f;
    use crate::syntax::kind::TriviaKind;

    fn tree() -> SyntaxTree {
        // string s2 = s as string;
        let decl = f::local_declaration(f::variable_declaration(
            f::predefined_type("string"),
            vec![f::variable_declarator(
                "s2",
                Some(f::binary(
                    SyntaxKind::AsExpression,
                    f::identifier_name("s"),
                    f::predefined_type("string"),
                )),
            )],
        ));
        SyntaxTree::new(f::compilation_unit(vec![decl
            .with_leading_trivia(vec![f::comment("// lead"), f::eol()])
            .with_trailing_trivia(vec![f::eol()])]))
    }

    #[test]
    fn test_render_round_trips() {
        let tree = tree();
        assert_eq!(tree.render(), "// lead\nstring s2 = s as string;\n");
    }

    #[test]
    fn test_spans_exclude_outer_trivia() {
        let tree = tree();
        let decl = tree
            .nodes()
            .find(|n| n.kind() == SyntaxKind::LocalDeclarationStatement)
            .unwrap();
        assert_eq!(decl.full_span(), TextSpan::new(0, 33));
        assert_eq!(decl.span(), TextSpan::new(8, 32));
        assert_eq!(decl.text(), "string s2 = s as string;");
    }

    #[test]
    fn test_children_are_contained_and_ordered() {
        let tree = tree();
        for node in tree.nodes() {
            let mut last_end = node.full_span().start;
            for child in node.children() {
                assert!(node.full_span().contains_span(child.full_span()));
                assert!(child.full_span().start >= last_end);
                last_end = child.full_span().end;
                assert_eq!(child.parent(), Some(node));
            }
        }
    }

    #[test]
    fn test_covering_node_finds_innermost() {
        let tree = tree();
        let source = tree.render();
        let start = source.find("s as").unwrap();
        let node = tree.covering_node(TextSpan::new(start, start + 1));
        assert_eq!(node.kind(), SyntaxKind::IdentifierName);
        assert_eq!(node.parent().unwrap().kind(), SyntaxKind::AsExpression);

        let caret = tree.covering_node(TextSpan::empty(start + 2));
        assert_eq!(caret.kind(), SyntaxKind::AsExpression);
    }

    #[test]
    fn test_trivia_spans() {
        let tree = tree();
        let trivia = tree.root().trivia();
        let comment = trivia
            .iter()
            .find(|t| t.trivia.kind == TriviaKind::SingleLineComment)
            .unwrap();
        assert_eq!(comment.span, TextSpan::new(0, 7));
        assert!(comment.leading);
        assert!(tree
            .root()
            .inner_trivia()
            .iter()
            .all(|t| t.trivia.kind.is_whitespace_or_end_of_line()));
    }

    #[test]
    fn test_descendants_are_preorder_range() {
        let tree = tree();
        let root = tree.root();
        assert_eq!(root.descendants().count(), tree.node_count() - 1);
        let decl = root.descendants().find(|n| n.kind() == SyntaxKind::VariableDeclaration).unwrap();
        assert!(decl.descendants().all(|d| decl.is_ancestor_or_self_of(d.id())));
    }

    #[test]
    fn test_find_node_by_kind_and_span() {
        let tree = tree();
        let as_expr = tree.nodes().find(|n| n.kind() == SyntaxKind::AsExpression).unwrap();
        let found = tree.find_node(SyntaxKind::AsExpression, as_expr.span()).unwrap();
        assert_eq!(found, as_expr);
        assert!(tree.find_node(SyntaxKind::CastExpression, as_expr.span()).is_none());
    }

    #[test]
    fn test_first_and_last_token() {
        let tree = tree();
        let decl = tree
            .nodes()
            .find(|n| n.kind() == SyntaxKind::LocalDeclarationStatement)
            .unwrap();
        assert_eq!(decl.first_token().unwrap().text(), "string");
        assert_eq!(decl.last_token().unwrap().text(), ";");
        let texts: Vec<_> = decl.token_iter().map(|t| t.text()).collect();
        assert_eq!(texts, ["string", "s2", "=", "s", "as", "string", ";"]);
    }

    #[test]
    fn test_comments_in_span() {
        let tree = tree();
        let root = tree.root();
        assert!(root.contains_comments_in(TextSpan::new(0, 7)));
        assert!(!root.contains_comments_in(TextSpan::new(8, 32)));
    }
}
