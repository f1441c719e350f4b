//! Properties every snapshot and every collected action must satisfy.

use pretty_assertions::assert_eq;

use shapefix::semantic::{FactTable, Symbol, TypeSymbol};
use shapefix::syntax::factory as f;
use shapefix::syntax::{SyntaxKind, SyntaxTree, TextSpan};
use shapefix::{DispatchError, Engine, RuleId, Settings};

fn engine() -> Engine<'static> {
    Engine::new(Settings::default())
}

/// A file with comments, a region, tabs and an expression-bodied candidate.
fn sample() -> SyntaxTree {
    let method = f::method_declaration(
        &["public"],
        f::predefined_type("int"),
        "Count",
        Vec::new(),
        f::block(vec![f::return_statement(Some(f::numeric_literal("1")))]),
    )
    .with_leading_trivia(vec![
        f::whitespace("\t"),
        f::comment("/// <summary>Count.</summary>"),
        f::eol(),
        f::whitespace("\t"),
    ])
    .with_trailing_trivia(vec![f::eol()]);
    let class = f::class_declaration(&["public"], "Counter", vec![method])
        .with_leading_trivia(vec![f::directive("#region Types"), f::eol()])
        .with_trailing_trivia(vec![f::eol()]);
    SyntaxTree::new(f::compilation_unit_with_eof_trivia(
        vec![class],
        vec![f::directive("#endregion"), f::eol(), f::comment("// end")],
    ))
}

/// Span of the first occurrence of `needle` in the rendered tree.
fn span_of(tree: &SyntaxTree, needle: &str) -> TextSpan {
    let start = tree.render().find(needle).expect("needle should be in the source");
    TextSpan::new(start, start + needle.len())
}

fn token_text(tree: &SyntaxTree) -> String {
    let mut text = String::new();
    for token in tree.root().tokens() {
        for t in token.leading_trivia() {
            text.push_str(&t.trivia.text);
        }
        text.push_str(token.text());
        for t in token.trailing_trivia() {
            text.push_str(&t.trivia.text);
        }
    }
    text
}

#[test]
fn test_round_trip_is_lossless() {
    let tree = sample();
    let text = tree.render();
    assert!(text.starts_with("#region Types\n"));
    assert!(text.ends_with("#endregion\n// end"));
    assert_eq!(token_text(&tree), text);
    assert_eq!(tree.root().full_text(), text);
    assert_eq!(tree.len(), text.len());

    // Rebuilding over the same green root renders the same text.
    let again = SyntaxTree::new(tree.root_green().clone());
    assert_eq!(again.render(), text);
}

#[test]
fn test_committed_action_is_not_offered_again() {
    let tree = sample();
    let engine = engine();
    let facts = FactTable::new();

    for (rule, needle) in [
        (RuleId::UseExpressionBody, "return"),
        (RuleId::RemoveComment, "/// <summary>"),
        (RuleId::UseSpacesInsteadOfTab, "\t"),
    ] {
        let actions = engine.collect(&tree, &facts, span_of(&tree, needle)).unwrap();
        let action = actions
            .iter()
            .find(|a| a.rule == rule)
            .unwrap_or_else(|| panic!("{} should be offered", rule));
        let rewritten = engine.commit(&tree, action).unwrap();

        let again = engine.collect(&rewritten, &facts, action.span).unwrap();
        assert!(
            again.iter().all(|a| a.key != action.key),
            "{} offered again after commit",
            rule
        );
    }
}

#[test]
fn test_expression_body_keeps_formatting_marker() {
    let tree = sample();
    let engine = engine();
    let actions = engine
        .collect(&tree, &FactTable::new(), span_of(&tree, "return"))
        .unwrap();
    let action = actions
        .iter()
        .find(|a| a.rule == RuleId::UseExpressionBody)
        .unwrap();
    let rewritten = engine.commit(&tree, action).unwrap();

    assert!(rewritten.render().contains("public int Count() => 1;"));
    assert!(rewritten.render().contains("/// <summary>Count.</summary>"));
    assert!(!rewritten.formatting_spans().is_empty());
    assert!(tree.formatting_spans().is_empty());
}

#[test]
fn test_member_resolving_elsewhere_blocks_cast_removal() {
    // ((Base)derived).Name, where Derived hides Name
    let tree = SyntaxTree::new(f::member_access(
        f::parenthesized(f::cast(f::identifier_name("Base"), f::identifier_name("derived"))),
        f::identifier_name("Name"),
    ));
    let base = TypeSymbol::class("Base");
    let derived = TypeSymbol::class("Derived");
    let name = Symbol::property("Name", base.clone());
    let facts = FactTable::new()
        .with_type("Base", base.clone())
        .with_type("derived", derived.clone())
        .with_symbol("((Base)derived).Name", name.clone())
        .with_supertype(&derived, base.clone())
        .with_member(&base, name);

    let engine = engine();
    let query = TextSpan::new(1, 7);
    let offered = engine.collect(&tree, &facts, query).unwrap();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].rule, RuleId::RemoveRedundantCast);

    let hiding = facts.with_member(&derived, Symbol::property("Name", derived.clone()));
    let offered = engine.collect(&tree, &hiding, query).unwrap();
    assert!(offered.is_empty());
}

#[test]
fn test_action_spans_stay_within_query_ancestry() {
    let tree = sample();
    let engine = engine();
    let facts = FactTable::new();

    for offset in (0..tree.len()).step_by(3) {
        let query = TextSpan::empty(offset);
        let covering = tree.covering_node(query);
        for action in engine.collect(&tree, &facts, query).unwrap() {
            assert!(
                covering
                    .ancestors_and_self()
                    .any(|n| n.full_span().contains_span(action.span)),
                "{} at {} escapes the ancestry of {}",
                action.rule,
                action.span,
                offset
            );
            assert!(action.span.intersects(query));
        }
    }
}

#[test]
fn test_commit_after_another_commit_is_stale() {
    let tree = sample();
    let engine = engine();
    let actions = engine
        .collect(&tree, &FactTable::new(), TextSpan::new(0, tree.len()))
        .unwrap();
    assert!(actions.len() >= 2);

    let first = engine.commit(&tree, &actions[0]).unwrap();
    let err = engine.commit(&first, &actions[1]).unwrap_err();
    assert!(matches!(err, DispatchError::StaleAction { .. }));

    // The original snapshot is untouched and still accepts the action.
    assert!(engine.commit(&tree, &actions[1]).is_ok());
}

#[test]
fn test_malformed_input_abstains() {
    let tree = SyntaxTree::new(f::binary(
        SyntaxKind::EqualsExpression,
        f::error_node("x"),
        f::string_literal(""),
    ));
    let facts = FactTable::new().with_type("x", TypeSymbol::string());
    let actions = engine()
        .collect(&tree, &facts, TextSpan::new(0, tree.len()))
        .unwrap();
    assert!(actions.is_empty());
}

#[test]
fn test_analyze_in_parallel_matches_collect() {
    let tree = sample();
    let engine = engine();
    let facts = FactTable::new();
    let diagnostics = engine.analyze(&tree, &facts);

    // Hidden refactorings are not diagnostics.
    assert!(diagnostics.iter().all(|d| d.rule != RuleId::RemoveComment));
    assert!(diagnostics.iter().any(|d| d.rule == RuleId::UseSpacesInsteadOfTab));
    assert!(diagnostics.iter().any(|d| d.rule == RuleId::UseExpressionBody));

    let mut sorted = diagnostics.clone();
    sorted.sort_by_key(|d| (d.span.start, d.span.end, d.rule));
    assert_eq!(diagnostics, sorted);
}

#[test]
fn test_comments_in_dropped_text_are_never_lost() {
    let keep = || f::comment("/* keep */");
    let string = TypeSymbol::string();

    // s as /* keep */ string
    let as_operator = f::binary(
        SyntaxKind::AsExpression,
        f::identifier_name("s"),
        f::predefined_type("string").with_leading_trivia(vec![keep(), f::space()]),
    );
    let as_facts = FactTable::new()
        .with_type("s", string.clone())
        .with_type("string", string.clone());

    // items.Where(p => p.Ok) /* keep */.Any()
    let where_call = f::invocation(
        f::member_access(f::identifier_name("items"), f::identifier_name("Where")),
        vec![f::simple_lambda(
            "p",
            f::member_access(f::identifier_name("p"), f::identifier_name("Ok")),
        )],
    )
    .with_trailing_trivia(vec![f::space(), keep()]);
    let chain = f::invocation(f::member_access(where_call, f::identifier_name("Any")), Vec::new());
    let item = TypeSymbol::class("Item");
    let chain_facts = FactTable::new()
        .with_symbol(
            "items.Where(p => p.Ok)",
            Symbol::linq(
                "Where",
                vec![TypeSymbol::func(item.clone(), TypeSymbol::boolean())],
                vec![item],
            ),
        )
        .with_symbol(
            "items.Where(p => p.Ok) /* keep */.Any()",
            Symbol::linq("Any", Vec::new(), Vec::new()),
        );

    // flag == /* keep */ true
    let boolean = f::binary(
        SyntaxKind::EqualsExpression,
        f::identifier_name("flag"),
        f::true_literal().with_leading_trivia(vec![keep(), f::space()]),
    );
    let boolean_facts = FactTable::new().with_type("flag", TypeSymbol::boolean());

    // x == /* keep */ ""
    let empty = f::binary(
        SyntaxKind::EqualsExpression,
        f::identifier_name("x"),
        f::string_literal("").with_leading_trivia(vec![keep(), f::space()]),
    );
    let empty_facts = FactTable::new().with_type("x", string);

    let engine = engine();
    for (root, facts, rule) in [
        (as_operator, as_facts, RuleId::RemoveRedundantAsOperator),
        (chain, chain_facts, RuleId::SimplifyLinqChain),
        (boolean, boolean_facts, RuleId::SimplifyBooleanComparison),
        (empty, empty_facts, RuleId::UseStringLength),
    ] {
        let tree = SyntaxTree::new(root);
        assert!(tree.render().contains("/* keep */"));
        let actions = engine.collect(&tree, &facts, TextSpan::new(0, tree.len())).unwrap();
        assert!(
            actions.iter().all(|a| a.rule != rule),
            "{} offered on {:?}",
            rule,
            tree.render()
        );
        for action in actions.iter().filter(|a| a.rule != RuleId::RemoveComment) {
            if let Ok(rewritten) = engine.commit(&tree, action) {
                assert!(
                    rewritten.render().contains("/* keep */"),
                    "{} dropped the comment",
                    action.rule
                );
            }
        }
    }
}
