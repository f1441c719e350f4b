//! Lambda parameter lists.

use crate::error::RewriteError;
use crate::rewrite::trivia::carry_trivia;
use crate::rewrite::Edit;
use crate::syntax::ast::ParenthesizedLambda;
use crate::syntax::{GreenNode, SyntaxKind, SyntaxNode};

use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

/// `(x) => body` becomes `x => body`.
pub struct SimplifyLambdaParameterList;

impl Rule for SimplifyLambdaParameterList {
    fn id(&self) -> RuleId {
        RuleId::SimplifyLambdaParameterList
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ParenthesizedLambdaExpression]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(lambda) = ParenthesizedLambda::cast(node) else {
            return;
        };
        let Some(list) = lambda.parameter_list() else {
            return;
        };
        if ctx.rejects(node) {
            return;
        }
        let parameters = lambda.parameters();
        let [parameter] = parameters.as_slice() else {
            return;
        };
        if parameter.type_syntax().is_some() || parameter.has_modifiers() || parameter.has_attributes() {
            return;
        }
        let has_comments = list.inner_trivia().iter().any(|t| !t.trivia.kind.is_whitespace_or_end_of_line());
        if has_comments {
            return;
        }

        out.push(
            Proposal::new("Simplify lambda expression parameter list", list.span(), remove_parentheses)
                .fade_token(list.child_token(0))
                .fade_token(list.child_token(2)),
        );
    }
}

fn remove_parentheses(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let lambda = ParenthesizedLambda::cast(node).ok_or_else(|| shape("not a parenthesized lambda"))?;
    let list = lambda.parameter_list().ok_or_else(|| shape("missing parameter list"))?;
    let parameter = lambda
        .parameters()
        .first()
        .copied()
        .ok_or_else(|| shape("no parameter"))?;

    let parameter = carry_trivia(list.green(), parameter.syntax().green().without_trivia());
    let mut slots = vec![Some(parameter.into())];
    slots.extend(node.green().slots().iter().skip(1).cloned());
    let simple = GreenNode::new(SyntaxKind::SimpleLambdaExpression, slots);
    Ok(Edit::replace(node, simple))
}
