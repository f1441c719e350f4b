//! `if` statements and the blocks they own.

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::syntax::ast::{Block, IfStatement, ReturnStatement};
use crate::syntax::factory as f;
use crate::syntax::{GreenNode, SyntaxKind, SyntaxNode};

use super::common::{bool_literal_value, is_blank, negate};
use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

/// `if (c) return true; else return false;` becomes `return c;`.
///
/// The `else` may also be implicit: an `if` without `else` followed in the
/// same block by the complementary `return`.
pub struct SimplifyIfToReturn;

/// Literal returned by `return true;`, `{ return true; }` and so on.
fn returned_bool(statement: SyntaxNode<'_>) -> Option<bool> {
    if let Some(block) = Block::cast(statement) {
        let statements = block.statements();
        let [single] = statements.as_slice() else {
            return None;
        };
        return returned_bool(*single);
    }
    ReturnStatement::cast(statement)
        .and_then(|r| r.expression())
        .and_then(bool_literal_value)
}

/// The statement holding the implicit `else`, for an `if` without one.
fn following_return<'a>(node: SyntaxNode<'a>) -> Option<SyntaxNode<'a>> {
    let list = node.parent().filter(|p| p.kind() == SyntaxKind::List)?;
    list.parent().filter(|p| p.kind() == SyntaxKind::Block)?;
    node.next_sibling()
        .filter(|n| n.kind() == SyntaxKind::ReturnStatement)
}

impl Rule for SimplifyIfToReturn {
    fn id(&self) -> RuleId {
        RuleId::SimplifyIfToReturn
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStatement]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(stmt) = IfStatement::cast(node) else {
            return;
        };
        if ctx.rejects(node) {
            return;
        }
        let (Some(condition), Some(then_branch)) = (stmt.condition(), stmt.statement()) else {
            return;
        };
        let Some(when_true) = returned_bool(then_branch) else {
            return;
        };

        let (otherwise, region) = match stmt.else_clause() {
            Some(clause) => (
                clause.statement().and_then(returned_bool),
                node.span(),
            ),
            None => match following_return(node) {
                Some(next) => {
                    if ctx.rejects(next) {
                        return;
                    }
                    (returned_bool(next), node.span().cover(next.span()))
                }
                None => return,
            },
        };
        if otherwise != Some(!when_true) {
            return;
        }

        let is_boolean = ctx
            .facts
            .type_of(condition)
            .is_some_and(|t| t.converted.is_boolean());
        if !is_boolean {
            return;
        }
        let root = node.tree().root();
        if root.contains_comments_in(region) || root.contains_directives_in(region) {
            return;
        }

        let title = if when_true {
            "Replace if statement with 'return condition;'"
        } else {
            "Replace if statement with 'return !condition;'"
        };
        out.push(Proposal::new(title, region, if_to_return));
    }
}

fn if_to_return(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let stmt = IfStatement::cast(node).ok_or_else(|| shape("not an if statement"))?;
    let condition = stmt.condition().ok_or_else(|| shape("missing condition"))?;
    let when_true = stmt
        .statement()
        .and_then(returned_bool)
        .ok_or_else(|| shape("branch does not return a boolean literal"))?;

    let value: GreenNode = if when_true {
        condition.green().without_trivia()
    } else {
        negate(condition)
    };
    let replacement = f::return_statement(Some(value));

    if stmt.else_clause().is_some() {
        return Ok(Edit::replace(node, replacement));
    }

    let next = following_return(node).ok_or_else(|| shape("no return after the if statement"))?;
    let merged = replacement
        .with_leading_trivia(node.green().leading_trivia().to_vec())
        .with_trailing_trivia(next.green().trailing_trivia().to_vec());
    Ok(Edit::remove(node).and(Edit::replace_exact(next, merged)))
}

/// `if (c) { x(); }` becomes `if (c) x();`.
pub struct RemoveBraces;

impl Rule for RemoveBraces {
    fn id(&self) -> RuleId {
        RuleId::RemoveBraces
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::Block]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(block) = Block::cast(node) else {
            return;
        };
        let Some(owner) = node.parent() else {
            return;
        };
        let owning_if = match owner.kind() {
            SyntaxKind::IfStatement => IfStatement::cast(owner),
            SyntaxKind::ElseClause => None,
            _ => return,
        };
        if ctx.rejects(node) {
            return;
        }

        let statements = block.statements();
        let [statement] = statements.as_slice() else {
            return;
        };
        match statement.kind() {
            SyntaxKind::LocalDeclarationStatement => return,
            // The braces decide which `if` a following `else` binds to.
            SyntaxKind::IfStatement if owning_if.is_some_and(|i| i.else_clause().is_some()) => return,
            _ => {}
        }
        if !is_blank(&node.inner_trivia()) {
            return;
        }

        out.push(
            Proposal::new("Remove braces", node.span(), remove_braces)
                .fade_token(block.open_brace())
                .fade_token(block.close_brace()),
        );
    }
}

fn remove_braces(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let statement = Block::cast(node)
        .and_then(|b| b.statements().first().copied())
        .ok_or(RewriteError::UnexpectedShape {
            kind: node.kind(),
            reason: "block without a statement",
        })?;
    Ok(Edit::replace(node, statement.green().without_trivia()))
}
