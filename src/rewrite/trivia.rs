//! Trivia carry-over shared by every rewrite.

use crate::syntax::{GreenNode, Trivia, TriviaKind};

pub fn is_whitespace_or_end_of_line(trivia: &[Trivia]) -> bool {
    trivia.iter().all(|t| t.kind.is_whitespace_or_end_of_line())
}

/// `to` with the outer trivia of `from`.
pub fn carry_trivia(from: &GreenNode, to: GreenNode) -> GreenNode {
    to.with_leading_trivia(from.leading_trivia().to_vec())
        .with_trailing_trivia(from.trailing_trivia().to_vec())
}

/// Whitespace that indents the line a node starts on.
pub fn indentation(leading: &[Trivia]) -> Vec<Trivia> {
    let start = leading
        .iter()
        .rposition(|t| t.kind == TriviaKind::EndOfLine)
        .map(|i| i + 1)
        .unwrap_or(0);
    leading[start..]
        .iter()
        .filter(|t| t.kind == TriviaKind::Whitespace)
        .cloned()
        .collect()
}

/// The first line break in `trivia`, or `\n`.
pub fn end_of_line(trivia: &[Trivia]) -> Trivia {
    trivia
        .iter()
        .find(|t| t.kind == TriviaKind::EndOfLine)
        .cloned()
        .unwrap_or_else(|| Trivia::new(TriviaKind::EndOfLine, "\n"))
}

/// Drop whitespace and line breaks, keeping comments and directives.
pub fn without_whitespace(trivia: &[Trivia]) -> Vec<Trivia> {
    trivia
        .iter()
        .filter(|t| !t.kind.is_whitespace_or_end_of_line())
        .cloned()
        .collect()
}

/// Drop trailing whitespace (not line breaks) from the end of `trivia`.
pub fn trim_end_whitespace(mut trivia: Vec<Trivia>) -> Vec<Trivia> {
    while trivia.last().map(|t| t.kind) == Some(TriviaKind::Whitespace) {
        trivia.pop();
    }
    trivia
}
