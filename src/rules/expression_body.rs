//! Block bodies that can become `=> expression;`.

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::syntax::ast::{AccessorList, Block, BodyOwner, ExpressionStatement, PropertyLike, ReturnStatement};
use crate::syntax::factory as f;
use crate::syntax::{GreenNode, SyntaxKind, SyntaxNode, SyntaxToken};

use super::common::{is_blank, is_single_line};
use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

const TITLE: &str = "Use expression-bodied member";

pub struct UseExpressionBody;

impl Rule for UseExpressionBody {
    fn id(&self) -> RuleId {
        RuleId::UseExpressionBody
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[
            SyntaxKind::MethodDeclaration,
            SyntaxKind::ConstructorDeclaration,
            SyntaxKind::DestructorDeclaration,
            SyntaxKind::OperatorDeclaration,
            SyntaxKind::ConversionOperatorDeclaration,
            SyntaxKind::GetAccessorDeclaration,
            SyntaxKind::SetAccessorDeclaration,
        ]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(owner) = BodyOwner::cast(node) else {
            return;
        };
        if ctx.rejects(node) || owner.expression_body().is_some() {
            return;
        }
        let Some(body) = owner.body() else {
            return;
        };

        if node.kind().is_accessor() {
            detect_accessor(owner, body, out);
            return;
        }

        let expression = match node.kind() {
            SyntaxKind::OperatorDeclaration | SyntaxKind::ConversionOperatorDeclaration => return_expression(body),
            _ => single_expression(body),
        };
        let Some(expression) = expression else {
            return;
        };
        if is_blank(&body.syntax().trivia()) && is_single_line(expression) {
            out.push(block_proposal(body, expression));
        }
    }
}

fn detect_accessor(accessor: BodyOwner<'_>, body: Block<'_>, out: &mut Vec<Proposal>) {
    if !accessor.attribute_lists().is_empty() {
        return;
    }
    let Some(expression) = single_expression(body) else {
        return;
    };
    if !is_single_line(expression) {
        return;
    }

    let list = accessor.syntax().structural_parent().and_then(AccessorList::cast);
    let owner = list
        .and_then(|l| l.syntax().parent())
        .and_then(PropertyLike::cast);

    if let (Some(list), Some(_)) = (list, owner) {
        let accessors = list.accessors();
        if accessors.len() == 1 && accessor.syntax().kind() == SyntaxKind::GetAccessorDeclaration {
            // A lone getter collapses the whole property.
            if return_expression(body).is_some() && is_blank(&list.syntax().trivia()) {
                out.push(lone_getter_proposal(list, accessor, body, expression));
            }
            return;
        }
    }

    if is_blank(&accessor.syntax().trivia()) {
        out.push(block_proposal(body, expression));
    }
}

/// Expression of a block holding only `return e;` or `e;`.
fn single_expression(block: Block<'_>) -> Option<SyntaxNode<'_>> {
    let statements = block.statements();
    let [statement] = statements.as_slice() else {
        return None;
    };
    ReturnStatement::cast(*statement)
        .and_then(|r| r.expression())
        .or_else(|| ExpressionStatement::cast(*statement).and_then(|s| s.expression()))
}

/// Expression of a block holding only `return e;`.
fn return_expression(block: Block<'_>) -> Option<SyntaxNode<'_>> {
    let statements = block.statements();
    let [statement] = statements.as_slice() else {
        return None;
    };
    ReturnStatement::cast(*statement).and_then(|r| r.expression())
}

fn return_keyword_of(expression: SyntaxNode<'_>) -> Option<SyntaxToken<'_>> {
    expression
        .parent()
        .and_then(ReturnStatement::cast)
        .and_then(|r| r.return_keyword())
}

fn block_proposal(body: Block<'_>, expression: SyntaxNode<'_>) -> Proposal {
    Proposal::new(TITLE, body.syntax().span(), collapse_member)
        .fade_token(return_keyword_of(expression))
        .fade_token(body.open_brace())
        .fade_token(body.close_brace())
}

fn lone_getter_proposal(
    list: AccessorList<'_>,
    accessor: BodyOwner<'_>,
    body: Block<'_>,
    expression: SyntaxNode<'_>,
) -> Proposal {
    Proposal::new(TITLE, list.syntax().span(), collapse_property)
        .fade_token(accessor.accessor_keyword())
        .fade_token(body.open_brace())
        .fade_token(body.close_brace())
        .fade_token(return_keyword_of(expression))
        .fade_token(list.open_brace())
        .fade_token(list.close_brace())
}

fn shape(kind: SyntaxKind, reason: &'static str) -> RewriteError {
    RewriteError::UnexpectedShape { kind, reason }
}

fn arrow(expression: SyntaxNode<'_>) -> GreenNode {
    f::arrow_expression_clause(expression.green().without_trivia())
}

/// `M() { return e; }` to `M() => e;`, and the same for accessors.
fn collapse_member(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let owner = BodyOwner::cast(node).ok_or_else(|| shape(node.kind(), "not a body owner"))?;
    let body = owner.body().ok_or_else(|| shape(node.kind(), "missing body"))?;
    let expression = single_expression(body).ok_or_else(|| shape(node.kind(), "body is not a single expression"))?;

    let collapsed = node
        .green()
        .with_slot(owner.body_slot(), None)
        .with_slot(owner.expression_body_slot(), Some(arrow(expression).into()))
        .with_slot(owner.semicolon_slot(), Some(f::token(SyntaxKind::SemicolonToken).into()));
    Ok(Edit::replace(node, collapsed))
}

/// `int P { get { return e; } }` to `int P => e;`. Runs on the getter.
fn collapse_property(accessor: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let property = accessor
        .ancestors()
        .find_map(PropertyLike::cast)
        .ok_or_else(|| shape(accessor.kind(), "getter outside a property"))?;
    let body = BodyOwner::cast(accessor)
        .and_then(|a| a.body())
        .ok_or_else(|| shape(accessor.kind(), "missing body"))?;
    let expression = return_expression(body).ok_or_else(|| shape(accessor.kind(), "getter does not return"))?;

    let node = property.syntax();
    let collapsed = node
        .green()
        .with_slot(property.accessor_list_slot(), None)
        .with_slot(property.expression_body_slot(), Some(arrow(expression).into()))
        .with_slot(property.semicolon_slot(), Some(f::token(SyntaxKind::SemicolonToken).into()));
    Ok(Edit::replace(node, collapsed))
}
