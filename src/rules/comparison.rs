//! Equality comparisons against literals.

use crate::error::RewriteError;
use crate::rewrite::trivia::carry_trivia;
use crate::rewrite::Edit;
use crate::semantic::{Symbol, SymbolFacts, SymbolKind};
use crate::syntax::ast::{BinaryExpression, Invocation, LogicalNot, MemberAccess};
use crate::syntax::factory as f;
use crate::syntax::{GreenNode, SyntaxKind, SyntaxNode};

use super::common::{bool_literal_value, has_comments_outside, negate, parenthesize_if_needed};
use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

const SYSTEM_STRING: &str = "System.String";

const EQUALITY: &[SyntaxKind] = &[SyntaxKind::EqualsExpression, SyntaxKind::NotEqualsExpression];

/// Which operand of a comparison is the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn operands<'a>(node: SyntaxNode<'a>) -> Option<(BinaryExpression<'a>, SyntaxNode<'a>, SyntaxNode<'a>)> {
    let binary = BinaryExpression::cast(node)?;
    Some((binary, binary.left()?, binary.right()?))
}

/// `""`, `@""`, or an access that binds to the `string.Empty` field.
fn is_empty_string(node: SyntaxNode<'_>, facts: &dyn SymbolFacts) -> bool {
    match node.kind() {
        SyntaxKind::StringLiteralExpression => matches!(node.text().as_str(), "\"\"" | "@\"\""),
        SyntaxKind::SimpleMemberAccessExpression => {
            let named_empty = MemberAccess::cast(node)
                .and_then(|a| a.name())
                .is_some_and(|n| n.name() == "Empty");
            named_empty && facts.symbol_of(node).is_some_and(|s| is_string_empty_field(facts, &s))
        }
        _ => false,
    }
}

fn is_string_empty_field(facts: &dyn SymbolFacts, symbol: &Symbol) -> bool {
    symbol.name == "Empty" && symbol.kind == SymbolKind::Field && is_declared_on_string(facts, symbol)
}

pub struct UseStringLength;

impl Rule for UseStringLength {
    fn id(&self) -> RuleId {
        RuleId::UseStringLength
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        EQUALITY
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some((_, left, right)) = operands(node) else {
            return;
        };
        if ctx.rejects(node) {
            return;
        }
        let facts = ctx.facts;
        let (empty, other, side) = if is_empty_string(left, facts) {
            (left, right, Side::Left)
        } else if is_empty_string(right, facts) {
            (right, left, Side::Right)
        } else {
            return;
        };
        if other.kind().is_literal_expression() || is_empty_string(other, facts) {
            return;
        }
        let is_string = ctx
            .facts
            .type_of(other)
            .is_some_and(|t| t.converted.is_string());
        if !is_string || node.span_contains_directives() {
            return;
        }
        // Only the outer trivia of the empty operand survives.
        if node.contains_comments_in(empty.span()) {
            return;
        }

        out.push(Proposal::new("Use string.Length", node.span(), move |n| use_length(n, side)));
    }
}

/// `x == ""` to `x?.Length == 0`, keeping operand order.
fn use_length(node: SyntaxNode<'_>, side: Side) -> Result<Edit, RewriteError> {
    let (_, left, right) = operands(node).ok_or(RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason: "incomplete comparison",
    })?;
    let (empty, other) = match side {
        Side::Left => (left, right),
        Side::Right => (right, left),
    };

    let zero = carry_trivia(empty.green(), f::numeric_literal("0"));
    let length = carry_trivia(
        other.green(),
        f::conditional_access(
            parenthesize_if_needed(other.green().without_trivia()),
            f::member_binding(f::identifier_name("Length")),
        ),
    );

    let (new_left, new_right) = match side {
        Side::Left => (zero, length),
        Side::Right => (length, zero),
    };
    let rebuilt = node
        .green()
        .with_slot(0, Some(new_left.into()))
        .with_slot(2, Some(new_right.into()));
    Ok(Edit::replace(node, rebuilt))
}

pub struct SimplifyBooleanComparison;

impl Rule for SimplifyBooleanComparison {
    fn id(&self) -> RuleId {
        RuleId::SimplifyBooleanComparison
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        EQUALITY
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some((binary, left, right)) = operands(node) else {
            return;
        };
        if ctx.rejects(node) || node.span_contains_directives() {
            return;
        }
        let (literal, other, value) = match (bool_literal_value(left), bool_literal_value(right)) {
            (Some(v), None) => (left, right, v),
            (None, Some(v)) => (right, left, v),
            _ => return,
        };
        // `bool?` compares differently against `true` and `false`.
        let is_boolean = ctx
            .facts
            .type_of(other)
            .is_some_and(|t| t.converted.is_boolean());
        if !is_boolean {
            return;
        }
        // Negating `!x` keeps only `x`.
        let keeps_polarity = (node.kind() == SyntaxKind::EqualsExpression) == value;
        let kept = match LogicalNot::cast(other).and_then(|n| n.operand()) {
            Some(operand) if !keeps_polarity => operand.span(),
            _ => other.span(),
        };
        if has_comments_outside(node, kept) {
            return;
        }

        let mut proposal = Proposal::new("Simplify boolean comparison", node.span(), simplify_comparison);
        if let Some(op) = binary.operator() {
            proposal = proposal.fade(op.span().cover(literal.span()));
        }
        out.push(proposal);
    }
}

fn simplify_comparison(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let (_, left, right) = operands(node).ok_or_else(|| shape("incomplete comparison"))?;
    let (value, other) = match (bool_literal_value(left), bool_literal_value(right)) {
        (Some(v), _) => (v, right),
        (None, Some(v)) => (v, left),
        (None, None) => return Err(shape("no boolean literal operand")),
    };

    let keeps_polarity = (node.kind() == SyntaxKind::EqualsExpression) == value;
    let replacement: GreenNode = if keeps_polarity {
        other.green().without_trivia()
    } else {
        negate(other)
    };
    Ok(Edit::replace(node, replacement))
}

/// Case conversions that make a comparison case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Folding {
    Lower,
    Upper,
}

fn folding_of(method: &str) -> Option<Folding> {
    match method {
        "ToLower" | "ToLowerInvariant" => Some(Folding::Lower),
        "ToUpper" | "ToUpperInvariant" => Some(Folding::Upper),
        _ => None,
    }
}

/// `x.ToLower()` and friends, syntactically: the receiver and the folding.
fn case_conversion(node: SyntaxNode<'_>) -> Option<(SyntaxNode<'_>, Folding)> {
    let invocation = Invocation::cast(node)?;
    let access = invocation.member_access()?;
    let folding = folding_of(access.name()?.name())?;
    if !invocation.arguments().is_empty() {
        return None;
    }
    Some((access.expression()?, folding))
}

/// A case conversion that binds to the `string` method.
fn string_case_conversion<'a>(node: SyntaxNode<'a>, facts: &dyn SymbolFacts) -> Option<(SyntaxNode<'a>, Folding)> {
    let conversion = case_conversion(node)?;
    let symbol = facts.symbol_of(node)?;
    (symbol.kind == SymbolKind::Method && is_declared_on_string(facts, &symbol)).then_some(conversion)
}

/// A literal that the folding would leave unchanged.
fn is_folded_literal(node: SyntaxNode<'_>, folding: Folding) -> bool {
    if node.kind() != SyntaxKind::StringLiteralExpression {
        return false;
    }
    let text = node.text();
    match folding {
        Folding::Lower => text == text.to_lowercase(),
        Folding::Upper => text == text.to_uppercase(),
    }
}

/// Both operands of a case-folded comparison, if they agree on the folding.
fn folded_operands(left: SyntaxNode<'_>, right: SyntaxNode<'_>, facts: &dyn SymbolFacts) -> bool {
    match (string_case_conversion(left, facts), string_case_conversion(right, facts)) {
        (Some((_, a)), Some((_, b))) => a == b,
        (Some((_, folding)), None) => is_folded_literal(right, folding),
        (None, Some((_, folding))) => is_folded_literal(left, folding),
        (None, None) => false,
    }
}

fn is_declared_on_string(facts: &dyn SymbolFacts, symbol: &Symbol) -> bool {
    facts
        .well_known_type(SYSTEM_STRING)
        .is_some_and(|string| symbol.containing_type.as_ref() == Some(&string))
}

/// `a.ToLower() == b.ToLower()` becomes `string.Equals(a, b, StringComparison.OrdinalIgnoreCase)`.
///
/// `a.ToLower().Equals(b.ToLower())` is handled the same way, and either
/// side may be a literal already in the folded case.
pub struct UseStringComparison;

impl Rule for UseStringComparison {
    fn id(&self) -> RuleId {
        RuleId::UseStringComparison
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[
            SyntaxKind::EqualsExpression,
            SyntaxKind::NotEqualsExpression,
            SyntaxKind::InvocationExpression,
        ]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some((left, right)) = compared_strings(node) else {
            return;
        };
        if ctx.rejects(node) || node.span_contains_directives() {
            return;
        }
        if node.kind() == SyntaxKind::InvocationExpression {
            let is_string_equals = ctx
                .facts
                .symbol_of(node)
                .is_some_and(|s| s.name == "Equals" && is_declared_on_string(ctx.facts, &s));
            if !is_string_equals {
                return;
            }
        }
        if !folded_operands(left, right, ctx.facts) {
            return;
        }
        // The conversion calls are dropped.
        if node.contains_comments_in(node.span()) {
            return;
        }

        out.push(Proposal::new(
            "Use StringComparison when comparing strings",
            node.span(),
            use_string_comparison,
        ));
    }
}

/// The two strings compared by `a == b`, `a != b` or `a.Equals(b)`.
fn compared_strings(node: SyntaxNode<'_>) -> Option<(SyntaxNode<'_>, SyntaxNode<'_>)> {
    match node.kind() {
        SyntaxKind::EqualsExpression | SyntaxKind::NotEqualsExpression => {
            let (_, left, right) = operands(node)?;
            Some((left, right))
        }
        SyntaxKind::InvocationExpression => {
            let invocation = Invocation::cast(node)?;
            let access = invocation.member_access()?;
            if access.name()?.name() != "Equals" {
                return None;
            }
            let arguments = invocation.arguments();
            let [argument] = arguments.as_slice() else {
                return None;
            };
            Some((access.expression()?, *argument))
        }
        _ => None,
    }
}

fn use_string_comparison(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let (left, right) = compared_strings(node).ok_or(RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason: "not a string comparison",
    })?;
    let unfolded = |operand: SyntaxNode<'_>| {
        case_conversion(operand)
            .map(|(receiver, _)| receiver)
            .unwrap_or(operand)
            .green()
            .without_trivia()
    };

    let call = f::invocation(
        f::member_access(f::predefined_type("string"), f::identifier_name("Equals")),
        vec![
            unfolded(left),
            unfolded(right),
            f::member_access(f::identifier_name("StringComparison"), f::identifier_name("OrdinalIgnoreCase")),
        ],
    );
    let replacement = if node.kind() == SyntaxKind::NotEqualsExpression {
        f::logical_not(call)
    } else {
        call
    };
    Ok(Edit::replace(node, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::Rewriter;
    use crate::semantic::{FactTable, TypeInfo, TypeSymbol};
    use pretty_assertions::assert_eq;
    use crate::syntax::{SyntaxTree, TextSpan};

    fn run(rule: &dyn Rule, tree: &SyntaxTree, facts: &FactTable) -> Vec<Proposal> {
        let ctx = RuleContext::new(facts, TextSpan::new(0, tree.len()));
        let mut out = Vec::new();
        rule.detect(tree.root(), &ctx, &mut out);
        out
    }

    fn fix(tree: &SyntaxTree, proposal: &Proposal) -> String {
        let edit = (proposal.producer)(tree.root()).unwrap();
        Rewriter::apply(tree, &edit).unwrap().render()
    }

    fn compare(kind: SyntaxKind, left: GreenNode, right: GreenNode) -> SyntaxTree {
        SyntaxTree::new(f::binary(kind, left, right))
    }

    fn string_facts() -> FactTable {
        FactTable::new()
            .with_type("x", TypeSymbol::string())
            .with_symbol("string.Empty", Symbol::field("Empty", TypeSymbol::string()))
    }

    #[test]
    fn test_empty_string_on_either_side() {
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("x"), f::string_literal(""));
        let found = run(&UseStringLength, &tree, &string_facts());
        assert_eq!(found.len(), 1);
        assert_eq!(fix(&tree, &found[0]), "x?.Length == 0");

        let tree = compare(SyntaxKind::NotEqualsExpression, f::string_literal(""), f::identifier_name("x"));
        let found = run(&UseStringLength, &tree, &string_facts());
        assert_eq!(fix(&tree, &found[0]), "0 != x?.Length");
    }

    #[test]
    fn test_string_empty_member() {
        let tree = compare(
            SyntaxKind::EqualsExpression,
            f::identifier_name("x"),
            f::member_access(f::predefined_type("string"), f::identifier_name("Empty")),
        );
        let found = run(&UseStringLength, &tree, &string_facts());
        assert_eq!(found.len(), 1);
        assert_eq!(fix(&tree, &found[0]), "x?.Length == 0");
    }

    #[test]
    fn test_member_named_empty_on_other_type_abstains() {
        let tree = compare(
            SyntaxKind::EqualsExpression,
            f::identifier_name("x"),
            f::member_access(f::identifier_name("Defaults"), f::identifier_name("Empty")),
        );
        let facts = string_facts().with_symbol(
            "Defaults.Empty",
            Symbol::field("Empty", TypeSymbol::class("Defaults")),
        );
        assert!(run(&UseStringLength, &tree, &facts).is_empty());
        // Unresolved accesses do not count either.
        assert!(run(&UseStringLength, &tree, &string_facts()).is_empty());
    }

    #[test]
    fn test_empty_side_is_decided_by_symbols() {
        // string.Empty == name.Empty, where only the left side is string.Empty
        let tree = compare(
            SyntaxKind::EqualsExpression,
            f::member_access(f::predefined_type("string"), f::identifier_name("Empty")),
            f::member_access(f::identifier_name("name"), f::identifier_name("Empty")),
        );
        let facts = string_facts()
            .with_type("name.Empty", TypeSymbol::string())
            .with_symbol("name.Empty", Symbol::property("Empty", TypeSymbol::class("Name")));
        let found = run(&UseStringLength, &tree, &facts);
        assert_eq!(found.len(), 1);
        assert_eq!(fix(&tree, &found[0]), "0 == name.Empty?.Length");
    }

    #[test]
    fn test_non_string_operand_abstains() {
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("x"), f::string_literal(""));
        let facts = FactTable::new().with_type("x", TypeSymbol::object());
        assert!(run(&UseStringLength, &tree, &facts).is_empty());
        assert!(run(&UseStringLength, &tree, &FactTable::new()).is_empty());
    }

    #[test]
    fn test_non_primary_operand_is_parenthesized() {
        let sum = f::binary(SyntaxKind::AddExpression, f::identifier_name("a"), f::identifier_name("b"));
        let tree = compare(SyntaxKind::EqualsExpression, sum, f::string_literal(""));
        let facts = FactTable::new().with_type("a + b", TypeSymbol::string());
        let found = run(&UseStringLength, &tree, &facts);
        assert_eq!(fix(&tree, &found[0]), "(a + b)?.Length == 0");
    }

    fn bool_facts() -> FactTable {
        FactTable::new().with_type("flag", TypeSymbol::boolean())
    }

    #[test]
    fn test_boolean_comparisons() {
        let cases = [
            (SyntaxKind::EqualsExpression, true, "flag"),
            (SyntaxKind::EqualsExpression, false, "!flag"),
            (SyntaxKind::NotEqualsExpression, true, "!flag"),
            (SyntaxKind::NotEqualsExpression, false, "flag"),
        ];
        for (kind, value, expected) in cases {
            let tree = compare(kind, f::identifier_name("flag"), f::bool_literal(value));
            let found = run(&SimplifyBooleanComparison, &tree, &bool_facts());
            assert_eq!(found.len(), 1);
            assert_eq!(fix(&tree, &found[0]), expected);
        }
    }

    #[test]
    fn test_negated_operand_unwraps() {
        let tree = compare(
            SyntaxKind::EqualsExpression,
            f::false_literal(),
            f::logical_not(f::identifier_name("flag")),
        );
        let facts = FactTable::new().with_type("!flag", TypeSymbol::boolean());
        let found = run(&SimplifyBooleanComparison, &tree, &facts);
        assert_eq!(fix(&tree, &found[0]), "flag");
    }

    #[test]
    fn test_nullable_boolean_abstains() {
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("flag"), f::true_literal());
        let facts = FactTable::new().with_type_info(
            "flag",
            TypeInfo::new(TypeSymbol::boolean().nullable()),
        );
        assert!(run(&SimplifyBooleanComparison, &tree, &facts).is_empty());
    }

    #[test]
    fn test_comment_on_dropped_literal_abstains() {
        let literal = f::true_literal().with_leading_trivia(vec![f::comment("/* keep */"), f::space()]);
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("flag"), literal);
        assert_eq!(tree.render(), "flag == /* keep */ true");
        assert!(run(&SimplifyBooleanComparison, &tree, &bool_facts()).is_empty());
    }

    #[test]
    fn test_comment_inside_kept_operand_survives() {
        let call = f::invocation(
            f::identifier_name("Check"),
            vec![f::identifier_name("a").with_leading_trivia(vec![f::comment("/* keep */"), f::space()])],
        );
        let tree = compare(SyntaxKind::EqualsExpression, call, f::true_literal());
        let facts = FactTable::new().with_type("Check(/* keep */ a)", TypeSymbol::boolean());
        let found = run(&SimplifyBooleanComparison, &tree, &facts);
        assert_eq!(found.len(), 1);
        assert_eq!(fix(&tree, &found[0]), "Check(/* keep */ a)");
    }

    #[test]
    fn test_comment_inside_string_empty_abstains() {
        let empty = f::member_access(
            f::predefined_type("string"),
            f::identifier_name("Empty").with_leading_trivia(vec![f::comment("/* keep */")]),
        );
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("x"), empty);
        let facts = string_facts().with_symbol("string./* keep */Empty", Symbol::field("Empty", TypeSymbol::string()));
        assert!(run(&UseStringLength, &tree, &facts).is_empty());
    }

    fn to_lower(receiver: &str, method: &str) -> GreenNode {
        f::invocation(
            f::member_access(f::identifier_name(receiver), f::identifier_name(method)),
            Vec::new(),
        )
    }

    fn folding_facts() -> FactTable {
        let string = TypeSymbol::string();
        FactTable::new()
            .with_symbol("a.ToLower()", Symbol::method("ToLower", string.clone()))
            .with_symbol("b.ToLower()", Symbol::method("ToLower", string.clone()))
            .with_symbol("b.ToUpper()", Symbol::method("ToUpper", string.clone()))
            .with_symbol("a.ToUpperInvariant()", Symbol::method("ToUpperInvariant", string))
    }

    #[test]
    fn test_case_folded_equality() {
        let tree = compare(SyntaxKind::EqualsExpression, to_lower("a", "ToLower"), to_lower("b", "ToLower"));
        let found = run(&UseStringComparison, &tree, &folding_facts());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Use StringComparison when comparing strings");
        assert_eq!(
            fix(&tree, &found[0]),
            "string.Equals(a, b, StringComparison.OrdinalIgnoreCase)"
        );
    }

    #[test]
    fn test_case_folded_inequality_with_literal() {
        let tree = compare(
            SyntaxKind::NotEqualsExpression,
            to_lower("a", "ToUpperInvariant"),
            f::string_literal("ABC"),
        );
        let found = run(&UseStringComparison, &tree, &folding_facts());
        assert_eq!(found.len(), 1);
        assert_eq!(
            fix(&tree, &found[0]),
            "!string.Equals(a, \"ABC\", StringComparison.OrdinalIgnoreCase)"
        );
    }

    #[test]
    fn test_mismatched_folding_abstains() {
        let tree = compare(SyntaxKind::EqualsExpression, to_lower("a", "ToLower"), to_lower("b", "ToUpper"));
        assert!(run(&UseStringComparison, &tree, &folding_facts()).is_empty());

        // A literal that lowercasing would change never equals a lowered string.
        let tree = compare(SyntaxKind::EqualsExpression, to_lower("a", "ToLower"), f::string_literal("Abc"));
        assert!(run(&UseStringComparison, &tree, &folding_facts()).is_empty());

        // Plain strings have nothing to replace.
        let tree = compare(SyntaxKind::EqualsExpression, f::identifier_name("a"), f::string_literal("abc"));
        assert!(run(&UseStringComparison, &tree, &folding_facts()).is_empty());
    }

    #[test]
    fn test_folding_method_on_other_type_abstains() {
        let tree = compare(SyntaxKind::EqualsExpression, to_lower("a", "ToLower"), to_lower("b", "ToLower"));
        let facts = FactTable::new()
            .with_symbol("a.ToLower()", Symbol::method("ToLower", TypeSymbol::class("Text")))
            .with_symbol("b.ToLower()", Symbol::method("ToLower", TypeSymbol::class("Text")));
        assert!(run(&UseStringComparison, &tree, &facts).is_empty());
    }

    #[test]
    fn test_case_folded_equals_call() {
        // a.ToLower().Equals(b.ToLower())
        let tree = SyntaxTree::new(f::invocation(
            f::member_access(to_lower("a", "ToLower"), f::identifier_name("Equals")),
            vec![to_lower("b", "ToLower")],
        ));
        let facts = folding_facts().with_symbol(
            "a.ToLower().Equals(b.ToLower())",
            Symbol::method("Equals", TypeSymbol::string()),
        );
        let found = run(&UseStringComparison, &tree, &facts);
        assert_eq!(found.len(), 1);
        assert_eq!(
            fix(&tree, &found[0]),
            "string.Equals(a, b, StringComparison.OrdinalIgnoreCase)"
        );

        // Without the binding the call may be any Equals overload.
        assert!(run(&UseStringComparison, &tree, &folding_facts()).is_empty());
    }
}
