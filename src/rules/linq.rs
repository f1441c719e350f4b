//! `Where(predicate)` followed by a parameterless LINQ call.

use crate::rewrite::Edit;
use crate::semantic::{Symbol, SymbolFacts, FUNC_OF_T_RESULT, IMMUTABLE_ARRAY_EXTENSIONS, LINQ_ENUMERABLE};
use crate::syntax::ast::Invocation;
use crate::syntax::{SyntaxKind, SyntaxNode, TextSpan};

use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

/// Calls that accept the `Where` predicate directly.
const FUSABLE: &[&str] = &[
    "Any",
    "Count",
    "LongCount",
    "First",
    "FirstOrDefault",
    "Last",
    "LastOrDefault",
    "Single",
    "SingleOrDefault",
];

pub struct SimplifyLinqChain;

impl Rule for SimplifyLinqChain {
    fn id(&self) -> RuleId {
        RuleId::SimplifyLinqChain
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::InvocationExpression]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(outer) = Invocation::cast(node) else {
            return;
        };
        if ctx.rejects(node) {
            return;
        }
        let Some(access) = outer.member_access() else {
            return;
        };
        let Some(name) = access.name() else {
            return;
        };
        if !FUSABLE.contains(&name.name()) || !outer.arguments().is_empty() {
            return;
        }

        let Some(inner) = access.expression().and_then(Invocation::cast) else {
            return;
        };
        if inner.arguments().len() != 1 {
            return;
        }
        let Some(where_name) = inner.member_access().and_then(|a| a.name()) else {
            return;
        };
        if where_name.name() != "Where" {
            return;
        }

        let facts = ctx.facts;
        let outer_is_linq = facts
            .symbol_of(node)
            .is_some_and(|s| is_parameterless_linq(facts, &s, name.name()));
        let inner_is_where = facts
            .symbol_of(inner.syntax())
            .is_some_and(|s| is_linq_where(facts, &s));
        if !outer_is_linq || !inner_is_where {
            return;
        }

        let span = TextSpan::new(where_name.syntax().span().start, node.span().end);
        // Everything after the inner call is dropped by the merge.
        let dropped = TextSpan::new(inner.syntax().span().end, node.span().end);
        if node.contains_directives_in(span) || node.contains_comments_in(dropped) {
            return;
        }
        out.push(Proposal::new("Simplify method chain", span, Edit::merge_chained_call));
    }
}

fn is_parameterless_linq(facts: &dyn SymbolFacts, symbol: &Symbol, name: &str) -> bool {
    symbol.is_linq_extension(name) && facts.is_extension_method(symbol) && symbol.parameters.is_empty()
}

/// `Enumerable.Where(Func<T, bool>)`, or the `ImmutableArray` counterpart.
fn is_linq_where(facts: &dyn SymbolFacts, symbol: &Symbol) -> bool {
    let declared_on_linq = matches!(
        symbol.containing_type_name(),
        Some(LINQ_ENUMERABLE) | Some(IMMUTABLE_ARRAY_EXTENSIONS)
    );
    let predicate = match symbol.parameters.as_slice() {
        [p] => p.is_constructed_from(FUNC_OF_T_RESULT) && p.type_arguments.get(1).is_some_and(|r| r.is_boolean()),
        _ => false,
    };
    symbol.name == "Where" && facts.is_extension_method(symbol) && declared_on_linq && predicate
}
