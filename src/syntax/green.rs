//! Immutable, position-independent tree storage.
//!
//! Green nodes know their kind, their children and their total width, but
//! not their absolute offset or parent. That makes them cheap to share
//! between snapshots: a rewrite rebuilds the spine above a change and reuses
//! every untouched subtree by `Arc`.

use std::sync::Arc;

use super::kind::{SyntaxKind, TriviaKind};

/// A formatting or comment fragment attached to a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: String,
}

impl Trivia {
    pub fn new(kind: TriviaKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn width(&self) -> usize {
        self.text.len()
    }
}

fn trivia_width(trivia: &[Trivia]) -> usize {
    trivia.iter().map(Trivia::width).sum()
}

/// A leaf: identifier, keyword, punctuation or literal, plus its trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenToken {
    kind: SyntaxKind,
    text: String,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
    missing: bool,
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: Vec::new(),
            trailing: Vec::new(),
            missing: false,
        }
    }

    /// A zero-width token the parser inserted where one was expected.
    pub fn missing(kind: SyntaxKind) -> Self {
        Self {
            missing: true,
            ..Self::new(kind, "")
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leading(&self) -> &[Trivia] {
        &self.leading
    }

    pub fn trailing(&self) -> &[Trivia] {
        &self.trailing
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn width(&self) -> usize {
        self.text.len()
    }

    pub fn leading_width(&self) -> usize {
        trivia_width(&self.leading)
    }

    pub fn trailing_width(&self) -> usize {
        trivia_width(&self.trailing)
    }

    pub fn full_width(&self) -> usize {
        self.leading_width() + self.width() + self.trailing_width()
    }

    pub fn with_leading(mut self, leading: Vec<Trivia>) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: Vec<Trivia>) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn all_trivia(&self) -> impl Iterator<Item = &Trivia> {
        self.leading.iter().chain(self.trailing.iter())
    }

    pub fn contains_comments(&self) -> bool {
        self.all_trivia().any(|t| t.kind.is_comment())
    }

    pub fn contains_directives(&self) -> bool {
        self.all_trivia().any(|t| t.kind.is_directive())
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for trivia in &self.leading {
            out.push_str(&trivia.text);
        }
        out.push_str(&self.text);
        for trivia in &self.trailing {
            out.push_str(&trivia.text);
        }
    }
}

/// Child of a green node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreenElement {
    Node(Arc<GreenNode>),
    Token(Arc<GreenToken>),
}

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Node(n) => n.kind(),
            GreenElement::Token(t) => t.kind(),
        }
    }

    pub fn full_width(&self) -> usize {
        match self {
            GreenElement::Node(n) => n.full_width(),
            GreenElement::Token(t) => t.full_width(),
        }
    }

    pub fn as_node(&self) -> Option<&Arc<GreenNode>> {
        match self {
            GreenElement::Node(n) => Some(n),
            GreenElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Arc<GreenToken>> {
        match self {
            GreenElement::Token(t) => Some(t),
            GreenElement::Node(_) => None,
        }
    }

    pub fn first_token(&self) -> Option<&GreenToken> {
        match self {
            GreenElement::Node(n) => n.first_token(),
            GreenElement::Token(t) => Some(t),
        }
    }

    pub fn last_token(&self) -> Option<&GreenToken> {
        match self {
            GreenElement::Node(n) => n.last_token(),
            GreenElement::Token(t) => Some(t),
        }
    }

    pub fn with_leading_trivia(&self, trivia: Vec<Trivia>) -> GreenElement {
        match self {
            GreenElement::Node(n) => GreenElement::Node(Arc::new(n.with_leading_trivia(trivia))),
            GreenElement::Token(t) => {
                GreenElement::Token(Arc::new(t.as_ref().clone().with_leading(trivia)))
            }
        }
    }

    pub fn with_trailing_trivia(&self, trivia: Vec<Trivia>) -> GreenElement {
        match self {
            GreenElement::Node(n) => GreenElement::Node(Arc::new(n.with_trailing_trivia(trivia))),
            GreenElement::Token(t) => {
                GreenElement::Token(Arc::new(t.as_ref().clone().with_trailing(trivia)))
            }
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            GreenElement::Node(n) => n.write_to(out),
            GreenElement::Token(t) => t.write_to(out),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        GreenElement::Node(Arc::new(node))
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        GreenElement::Token(Arc::new(token))
    }
}

impl From<Arc<GreenNode>> for GreenElement {
    fn from(node: Arc<GreenNode>) -> Self {
        GreenElement::Node(node)
    }
}

/// Summary facts cached on every node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NodeFlags {
    contains_error: bool,
    contains_comments: bool,
    contains_directives: bool,
}

/// An interior node with a fixed slot layout for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenNode {
    kind: SyntaxKind,
    slots: Vec<Option<GreenElement>>,
    full_width: usize,
    flags: NodeFlags,
    formatting: bool,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, slots: Vec<Option<GreenElement>>) -> Self {
        let mut full_width = 0;
        let mut flags = NodeFlags {
            contains_error: kind == SyntaxKind::Error,
            ..NodeFlags::default()
        };

        for element in slots.iter().flatten() {
            full_width += element.full_width();
            match element {
                GreenElement::Token(t) => {
                    flags.contains_error |= t.is_missing();
                    flags.contains_comments |= t.contains_comments();
                    flags.contains_directives |= t.contains_directives();
                }
                GreenElement::Node(n) => {
                    flags.contains_error |= n.flags.contains_error;
                    flags.contains_comments |= n.flags.contains_comments;
                    flags.contains_directives |= n.flags.contains_directives;
                }
            }
        }

        Self {
            kind,
            slots,
            full_width,
            flags,
            formatting: false,
        }
    }

    /// A `List` node holding `elements` in order.
    pub fn list(elements: Vec<GreenElement>) -> Self {
        Self::new(SyntaxKind::List, elements.into_iter().map(Some).collect())
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn slots(&self) -> &[Option<GreenElement>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&GreenElement> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn full_width(&self) -> usize {
        self.full_width
    }

    /// True if this subtree holds a missing token or an error node.
    pub fn contains_error(&self) -> bool {
        self.flags.contains_error
    }

    pub fn contains_comments(&self) -> bool {
        self.flags.contains_comments
    }

    pub fn contains_directives(&self) -> bool {
        self.flags.contains_directives
    }

    /// Whether this node was produced by a rewrite and should be reformatted.
    pub fn needs_formatting(&self) -> bool {
        self.formatting
    }

    pub fn with_formatting(mut self) -> Self {
        self.formatting = true;
        self
    }

    pub fn with_slot(&self, index: usize, element: Option<GreenElement>) -> Self {
        let mut slots = self.slots.clone();
        slots[index] = element;
        let mut node = GreenNode::new(self.kind, slots);
        node.formatting = self.formatting;
        node
    }

    pub fn first_token(&self) -> Option<&GreenToken> {
        self.slots.iter().flatten().find_map(GreenElement::first_token)
    }

    pub fn last_token(&self) -> Option<&GreenToken> {
        self.slots
            .iter()
            .rev()
            .flatten()
            .find_map(GreenElement::last_token)
    }

    pub fn leading_trivia(&self) -> &[Trivia] {
        self.first_token().map(GreenToken::leading).unwrap_or(&[])
    }

    pub fn trailing_trivia(&self) -> &[Trivia] {
        self.last_token().map(GreenToken::trailing).unwrap_or(&[])
    }

    pub fn leading_width(&self) -> usize {
        trivia_width(self.leading_trivia())
    }

    pub fn trailing_width(&self) -> usize {
        trivia_width(self.trailing_trivia())
    }

    /// Copy of this node whose first token carries `trivia` as leading trivia.
    pub fn with_leading_trivia(&self, trivia: Vec<Trivia>) -> Self {
        let index = self
            .slots
            .iter()
            .position(|s| s.as_ref().and_then(GreenElement::first_token).is_some());

        match index {
            Some(i) => {
                let element = self.slots[i].as_ref().map(|e| e.with_leading_trivia(trivia));
                self.with_slot(i, element)
            }
            None => self.clone(),
        }
    }

    /// Copy of this node whose last token carries `trivia` as trailing trivia.
    pub fn with_trailing_trivia(&self, trivia: Vec<Trivia>) -> Self {
        let index = self
            .slots
            .iter()
            .rposition(|s| s.as_ref().and_then(GreenElement::last_token).is_some());

        match index {
            Some(i) => {
                let element = self.slots[i]
                    .as_ref()
                    .map(|e| e.with_trailing_trivia(trivia));
                self.with_slot(i, element)
            }
            None => self.clone(),
        }
    }

    /// Copy with the outer leading and trailing trivia removed.
    pub fn without_trivia(&self) -> Self {
        self.with_leading_trivia(Vec::new())
            .with_trailing_trivia(Vec::new())
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for element in self.slots.iter().flatten() {
            element.write_to(out);
        }
    }

    /// Text including the outer trivia.
    pub fn to_full_string(&self) -> String {
        let mut out = String::with_capacity(self.full_width);
        self.write_to(&mut out);
        out
    }

    /// Text without the outer trivia.
    pub fn to_text(&self) -> String {
        let full = self.to_full_string();
        let start = self.leading_width();
        let end = self.full_width - self.trailing_width();
        if start >= end {
            return String::new();
        }
        full[start..end].to_string()
    }

    /// All tokens of the subtree in source order.
    pub fn tokens(&self) -> Vec<&GreenToken> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a GreenToken>) {
        for element in self.slots.iter().flatten() {
            match element {
                GreenElement::Token(t) => out.push(t),
                GreenElement::Node(n) => n.collect_tokens(out),
            }
        }
    }
}
