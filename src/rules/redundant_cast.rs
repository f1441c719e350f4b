//! Casts that do not change what an expression means.
//!
//! Three shapes are recognised:
//!
//! - `((T)x).Member`, where `x` already exposes the same `Member` through
//!   its own type. Either `T` is an interface `x` implements implicitly, or
//!   `T` and `x`'s type are related by inheritance (in either direction),
//!   `Member` is declared on `x`'s type or one of its bases, and member
//!   lookup on `x` finds the same symbol;
//! - `xs.Cast<T>()` on an `IEnumerable<T>`;
//! - `x as T` where `x` is already a `T`.
//!
//! Every check is semantic; a missing fact means no proposal.

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::semantic::{Symbol, SymbolKind, TypeSymbol, IENUMERABLE_OF_T};
use crate::syntax::ast::{BinaryExpression, CastExpression, ConditionalAccess, Invocation, MemberAccess, SimpleName};
use crate::syntax::{SyntaxKind, SyntaxNode, TextSpan, Trivia};

use super::common::has_comments_outside;
use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

const TITLE: &str = "Remove redundant cast";

/// Member name used to look up indexers.
const INDEXER_NAME: &str = "this[]";

pub struct RemoveRedundantCast;

impl Rule for RemoveRedundantCast {
    fn id(&self) -> RuleId {
        RuleId::RemoveRedundantCast
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CastExpression, SyntaxKind::InvocationExpression]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        if ctx.rejects(node) {
            return;
        }
        match node.kind() {
            SyntaxKind::CastExpression => detect_cast(node, ctx, out),
            SyntaxKind::InvocationExpression => detect_linq_cast(node, ctx, out),
            _ => {}
        }
    }
}

fn detect_cast(node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
    let Some(cast) = CastExpression::cast(node) else {
        return;
    };
    let Some(parenthesized) = node.parent().filter(|p| p.kind() == SyntaxKind::ParenthesizedExpression) else {
        return;
    };
    let Some(accessed) = parenthesized.parent().and_then(accessed_expression) else {
        return;
    };
    let (Some(type_syntax), Some(operand)) = (cast.type_syntax(), cast.expression()) else {
        return;
    };
    if parenthesized.span_contains_directives() || has_comments_outside(parenthesized, operand.span()) {
        return;
    }
    if !is_redundant(ctx, type_syntax, operand, accessed) {
        return;
    }
    let (Some(open), Some(close)) = (cast.open_paren(), cast.close_paren()) else {
        return;
    };

    let span = TextSpan::new(open.span().start, close.span().end);
    out.push(Proposal::new(TITLE, span, remove_cast));
}

/// The expression whose symbol the cast feeds into.
fn accessed_expression(parent: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    match parent.kind() {
        SyntaxKind::SimpleMemberAccessExpression | SyntaxKind::ElementAccessExpression => Some(parent),
        SyntaxKind::ConditionalAccessExpression => ConditionalAccess::cast(parent)?.when_not_null(),
        _ => None,
    }
}

/// Name the accessed member is looked up by.
fn accessed_name(accessed: SyntaxNode<'_>) -> Option<String> {
    match accessed.kind() {
        SyntaxKind::SimpleMemberAccessExpression => Some(MemberAccess::cast(accessed)?.name()?.name().to_string()),
        SyntaxKind::MemberBindingExpression => Some(accessed.child_node(1).and_then(SimpleName::cast)?.name().to_string()),
        SyntaxKind::ElementAccessExpression => Some(INDEXER_NAME.to_string()),
        _ => None,
    }
}

fn is_redundant(ctx: &RuleContext<'_>, type_syntax: SyntaxNode<'_>, operand: SyntaxNode<'_>, accessed: SyntaxNode<'_>) -> bool {
    let facts = ctx.facts;
    let Some(cast_type) = facts.type_of(type_syntax).map(|t| t.ty).filter(|t| !t.is_error()) else {
        return false;
    };
    let Some(source) = facts.type_of(operand).map(|t| t.ty).filter(|t| !t.is_error()) else {
        return false;
    };
    // Casting a value type boxes it; member calls on the box may differ.
    if source.is_interface() || source.is_value_type() {
        return false;
    }
    let Some(symbol) = facts.symbol_of(accessed) else {
        return false;
    };
    let Some(containing) = symbol.containing_type.clone() else {
        return false;
    };

    if cast_type.is_interface() {
        if !facts.is_subtype_or_implements(&source, &cast_type, true) {
            return false;
        }
        return match facts.find_implementation_for_interface_member(&source, &symbol) {
            Some(implementation) if matches!(implementation.kind, SymbolKind::Property | SymbolKind::Method) => {
                !implementation
                    .explicit_interface_implementations
                    .iter()
                    .any(|m| facts.symbols_equal(m, &symbol))
            }
            _ => false,
        };
    }

    let related = facts.equals_or_inherits_from(&source, &cast_type, true)
        || facts.equals_or_inherits_from(&cast_type, &source, true);
    related
        && facts.equals_or_inherits_from(&source, &containing, true)
        && resolves_identically(ctx, &source, accessed, &symbol)
}

/// Whether looking the member up on `source` yields `symbol`.
fn resolves_identically(ctx: &RuleContext<'_>, source: &TypeSymbol, accessed: SyntaxNode<'_>, symbol: &Symbol) -> bool {
    accessed_name(accessed)
        .and_then(|name| ctx.facts.lookup_member(source, &name))
        .is_some_and(|found| ctx.facts.symbols_equal(&found, symbol))
}

fn remove_cast(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let parenthesized = node
        .parent()
        .filter(|p| p.kind() == SyntaxKind::ParenthesizedExpression)
        .ok_or_else(|| shape("cast is not parenthesized"))?;
    let operand = CastExpression::cast(node)
        .and_then(|c| c.expression())
        .ok_or_else(|| shape("missing cast operand"))?;

    Ok(Edit::replace(parenthesized, operand.green().without_trivia()))
}

fn detect_linq_cast(node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
    let Some(invocation) = Invocation::cast(node) else {
        return;
    };
    let Some(access) = invocation.member_access() else {
        return;
    };
    let (Some(name), Some(receiver), Some(arguments)) = (access.name(), access.expression(), invocation.argument_list()) else {
        return;
    };
    if name.name() != "Cast" || !invocation.arguments().is_empty() {
        return;
    }

    let facts = ctx.facts;
    let Some(method) = facts.symbol_of(node) else {
        return;
    };
    if !method.is_linq_extension("Cast") || !facts.is_extension_method(&method) {
        return;
    }
    let [target] = method.type_arguments.as_slice() else {
        return;
    };
    let Some(sequence) = facts.type_of(receiver).map(|t| t.ty) else {
        return;
    };
    if !sequence.is_constructed_from(IENUMERABLE_OF_T) || sequence.type_arguments.first() != Some(target) {
        return;
    }
    if node.contains_directives_in(TextSpan::new(receiver.span().end, node.span().end)) {
        return;
    }

    let span = TextSpan::new(name.syntax().span().start, arguments.span().end);
    out.push(Proposal::new(TITLE, span, remove_linq_cast));
}

/// `xs.Cast<T>()` to `xs`, keeping comments found after `xs`.
fn remove_linq_cast(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let receiver = Invocation::cast(node)
        .and_then(|i| i.member_access())
        .and_then(|a| a.expression())
        .ok_or(RewriteError::UnexpectedShape {
            kind: node.kind(),
            reason: "callee is not a member access",
        })?;

    let region = TextSpan::new(receiver.span().end, node.span().end);
    let dropped: Vec<Trivia> = node
        .trivia()
        .into_iter()
        .filter(|t| region.contains_span(t.span) && !t.span.is_empty())
        .map(|t| t.trivia.clone())
        .collect();

    let mut trailing = Vec::new();
    if dropped.iter().any(|t| !t.kind.is_whitespace_or_end_of_line()) {
        trailing.extend(dropped);
    }
    trailing.extend(node.green().trailing_trivia().iter().cloned());

    let replacement = receiver
        .green()
        .with_leading_trivia(node.green().leading_trivia().to_vec())
        .with_trailing_trivia(trailing);
    Ok(Edit::replace_exact(node, replacement))
}

pub struct RemoveRedundantAsOperator;

impl Rule for RemoveRedundantAsOperator {
    fn id(&self) -> RuleId {
        RuleId::RemoveRedundantAsOperator
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::AsExpression]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(binary) = BinaryExpression::cast(node) else {
            return;
        };
        let (Some(left), Some(right)) = (binary.left(), binary.right()) else {
            return;
        };
        if ctx.rejects(node) || node.span_contains_directives() {
            return;
        }
        let Some(source) = ctx.facts.type_of(left).map(|t| t.ty) else {
            return;
        };
        let Some(target) = ctx.facts.type_of(right).map(|t| t.ty) else {
            return;
        };
        if source.is_error() || source != target {
            return;
        }
        if has_comments_outside(node, left.span()) {
            return;
        }

        let mut proposal = Proposal::new(TITLE, node.span(), remove_as_operator);
        if let Some(op) = binary.operator() {
            proposal = proposal.fade(TextSpan::new(op.span().start, right.span().end));
        }
        out.push(proposal);
    }
}

fn remove_as_operator(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let left = BinaryExpression::cast(node)
        .and_then(|b| b.left())
        .ok_or(RewriteError::UnexpectedShape {
            kind: node.kind(),
            reason: "missing left operand",
        })?;
    Ok(Edit::replace(node, left.green().without_trivia()))
}
