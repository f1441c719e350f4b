//! Checks and node builders shared by several rules.

use crate::syntax::ast::{BinaryExpression, LogicalNot};
use crate::syntax::factory as f;
use crate::syntax::{GreenNode, GreenToken, SyntaxKind, SyntaxNode, TextSpan, TriviaRef};

/// `Some(value)` for a `true`/`false` literal.
pub fn bool_literal_value(node: SyntaxNode<'_>) -> Option<bool> {
    match node.kind() {
        SyntaxKind::TrueLiteralExpression => Some(true),
        SyntaxKind::FalseLiteralExpression => Some(false),
        _ => None,
    }
}

/// Whether every trivia fragment is whitespace or a line break.
pub fn is_blank(trivia: &[TriviaRef<'_>]) -> bool {
    trivia.iter().all(|t| t.trivia.kind.is_whitespace_or_end_of_line())
}

/// Whether a comment inside `node` lies outside the `kept` part of it.
///
/// Rewrites that keep only `kept` would drop such a comment.
pub fn has_comments_outside(node: SyntaxNode<'_>, kept: TextSpan) -> bool {
    let span = node.span();
    node.contains_comments_in(TextSpan::new(span.start, kept.start.max(span.start)))
        || node.contains_comments_in(TextSpan::new(kept.end.min(span.end), span.end))
}

pub fn is_single_line(node: SyntaxNode<'_>) -> bool {
    !node.text().contains('\n')
}

/// `expression`, parenthesized unless it is a primary expression.
pub fn parenthesize_if_needed(expression: GreenNode) -> GreenNode {
    if expression.kind().is_primary_expression() {
        expression
    } else {
        f::parenthesized(expression)
    }
}

/// The logical negation of a boolean expression, without outer trivia.
///
/// `!x` becomes `x`, `a == b` becomes `a != b` (and back), `true` becomes
/// `false`; anything else is wrapped as `!x` or `!(x)`.
pub fn negate(expression: SyntaxNode<'_>) -> GreenNode {
    let green = expression.green().without_trivia();

    if let Some(not) = LogicalNot::cast(expression) {
        if let Some(operand) = not.operand() {
            return operand.green().without_trivia();
        }
    }

    if let Some(value) = bool_literal_value(expression) {
        return f::bool_literal(!value);
    }

    let flipped = match expression.kind() {
        SyntaxKind::EqualsExpression => Some((SyntaxKind::NotEqualsExpression, SyntaxKind::ExclamationEqualsToken)),
        SyntaxKind::NotEqualsExpression => Some((SyntaxKind::EqualsExpression, SyntaxKind::EqualsEqualsToken)),
        _ => None,
    };
    if let Some((kind, op_kind)) = flipped {
        if let Some(op) = BinaryExpression::cast(expression).and_then(|b| b.operator()) {
            let token = GreenToken::new(op_kind, op_kind.fixed_text().unwrap_or_default())
                .with_leading(op.green().leading().to_vec())
                .with_trailing(op.green().trailing().to_vec());
            let slots = green
                .slots()
                .iter()
                .enumerate()
                .map(|(i, s)| if i == 1 { Some(token.clone().into()) } else { s.clone() })
                .collect();
            return GreenNode::new(kind, slots);
        }
    }

    f::logical_not(parenthesize_if_needed(green))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;

    fn negated(expr: GreenNode) -> String {
        let tree = SyntaxTree::new(expr);
        negate(tree.root()).to_full_string()
    }

    #[test]
    fn test_negate_shapes() {
        assert_eq!(negated(f::identifier_name("x")), "!x");
        assert_eq!(negated(f::logical_not(f::identifier_name("x"))), "x");
        assert_eq!(negated(f::true_literal()), "false");
        assert_eq!(
            negated(f::binary(
                SyntaxKind::EqualsExpression,
                f::identifier_name("a"),
                f::identifier_name("b")
            )),
            "a != b"
        );
        assert_eq!(
            negated(f::binary(
                SyntaxKind::LogicalAndExpression,
                f::identifier_name("a"),
                f::identifier_name("b")
            )),
            "!(a && b)"
        );
    }

    #[test]
    fn test_negated_comparison_keeps_kind_consistent() {
        let tree = SyntaxTree::new(f::binary(
            SyntaxKind::NotEqualsExpression,
            f::identifier_name("a"),
            f::null_literal(),
        ));
        let node = negate(tree.root());
        assert_eq!(node.kind(), SyntaxKind::EqualsExpression);
        assert_eq!(node.to_full_string(), "a == null");
    }
}
