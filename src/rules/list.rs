//! Argument and parameter lists.

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::syntax::{SyntaxKind, SyntaxNode};

use super::context::RuleContext;
use super::types::{Proposal, RuleId, Severity};
use super::Rule;

/// `M(a, )` becomes `M(a, a)`: an empty slot after a comma is filled with a
/// copy of the item before it.
pub struct DuplicateArgumentOrParameter;

fn title(list: SyntaxKind) -> Option<&'static str> {
    match list {
        SyntaxKind::ArgumentList | SyntaxKind::BracketedArgumentList => Some("Duplicate argument"),
        SyntaxKind::ParameterList | SyntaxKind::BracketedParameterList => Some("Duplicate parameter"),
        _ => None,
    }
}

/// Nothing was typed for this item.
fn is_missing(item: SyntaxNode<'_>) -> bool {
    item.span().is_empty() && item.contains_error()
}

impl Rule for DuplicateArgumentOrParameter {
    fn id(&self) -> RuleId {
        RuleId::DuplicateArgumentOrParameter
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[
            SyntaxKind::ArgumentList,
            SyntaxKind::BracketedArgumentList,
            SyntaxKind::ParameterList,
            SyntaxKind::BracketedParameterList,
        ]
    }

    fn default_severity(&self) -> Severity {
        Severity::Hidden
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(title) = title(node.kind()) else {
            return;
        };
        // The list holds the missing item, so only protection is checked.
        if ctx.is_protected(node.full_span()) || node.span_contains_directives() {
            return;
        }
        let items = node.list_nodes(1);
        let Some(index) = items
            .iter()
            .position(|item| is_missing(*item) && item.full_span().intersects(ctx.query))
        else {
            return;
        };
        let Some(previous) = index.checked_sub(1).map(|i| items[i]) else {
            return;
        };
        if previous.contains_error() || previous.span().is_empty() {
            return;
        }

        let span = previous.span().cover(items[index].span());
        out.push(Proposal::new(title, span, move |n| duplicate(n, index)));
    }
}

fn duplicate(node: SyntaxNode<'_>, index: usize) -> Result<Edit, RewriteError> {
    let items = node.list_nodes(1);
    let (Some(previous), Some(item)) = (index.checked_sub(1).and_then(|i| items.get(i)), items.get(index)) else {
        return Err(RewriteError::UnexpectedShape {
            kind: node.kind(),
            reason: "list item moved",
        });
    };
    Ok(Edit::replace(*item, previous.green().without_trivia()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::Rewriter;
    use crate::semantic::FactTable;
    use crate::syntax::factory as f;
    use crate::syntax::{GreenNode, SyntaxTree, TextSpan};
    use pretty_assertions::assert_eq;

    fn missing_name() -> GreenNode {
        GreenNode::new(
            SyntaxKind::IdentifierName,
            vec![Some(f::missing(SyntaxKind::IdentifierToken).into())],
        )
    }

    fn run(tree: &SyntaxTree, kind: SyntaxKind, query: TextSpan) -> (Vec<Proposal>, SyntaxNode<'_>) {
        let facts = FactTable::new();
        let ctx = RuleContext::new(&facts, query);
        let node = tree.nodes().find(|n| n.kind() == kind).unwrap();
        let mut out = Vec::new();
        DuplicateArgumentOrParameter.detect(node, &ctx, &mut out);
        (out, node)
    }

    fn apply(tree: &SyntaxTree, proposal: &Proposal, node: SyntaxNode<'_>) -> String {
        let edit = (proposal.producer)(node).unwrap();
        Rewriter::apply(tree, &edit).unwrap().render()
    }

    #[test]
    fn test_duplicate_argument() {
        // M(first.Name, )
        let tree = SyntaxTree::new(f::invocation(
            f::identifier_name("M"),
            vec![
                f::member_access(f::identifier_name("first"), f::identifier_name("Name")),
                missing_name(),
            ],
        ));
        assert_eq!(tree.render(), "M(first.Name, )");

        let (found, node) = run(&tree, SyntaxKind::ArgumentList, TextSpan::empty(14));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Duplicate argument");
        assert_eq!(found[0].span, TextSpan::new(2, 14));
        assert_eq!(apply(&tree, &found[0], node), "M(first.Name, first.Name)");
    }

    #[test]
    fn test_duplicate_parameter() {
        // (int a, )
        let missing = GreenNode::new(
            SyntaxKind::Parameter,
            vec![None, None, None, Some(f::missing(SyntaxKind::IdentifierToken).into())],
        );
        let tree = SyntaxTree::new(f::parameter_list(vec![
            f::parameter(Some(f::predefined_type("int")), "a"),
            missing,
        ]));
        let end = tree.render().len() - 1;

        let (found, node) = run(&tree, SyntaxKind::ParameterList, TextSpan::empty(end));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Duplicate parameter");
        assert!(apply(&tree, &found[0], node).contains("int a, int a"));
    }

    #[test]
    fn test_first_or_complete_item_abstains() {
        // M(, b): nothing precedes the gap.
        let tree = SyntaxTree::new(f::invocation(
            f::identifier_name("M"),
            vec![missing_name(), f::identifier_name("b")],
        ));
        assert!(run(&tree, SyntaxKind::ArgumentList, TextSpan::empty(2)).0.is_empty());

        let tree = SyntaxTree::new(f::invocation(
            f::identifier_name("M"),
            vec![f::identifier_name("a"), f::identifier_name("b")],
        ));
        assert!(run(&tree, SyntaxKind::ArgumentList, TextSpan::new(0, tree.len())).0.is_empty());
    }

    #[test]
    fn test_query_elsewhere_abstains() {
        let tree = SyntaxTree::new(f::invocation(
            f::identifier_name("M"),
            vec![f::identifier_name("a"), missing_name()],
        ));
        assert!(run(&tree, SyntaxKind::ArgumentList, TextSpan::empty(0)).0.is_empty());
    }
}
