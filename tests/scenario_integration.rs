//! Integration tests for the collect / select / commit pipeline.
//!
//! Each test builds a snapshot, collects candidates at a caller's query
//! span and commits the chosen action.

use pretty_assertions::assert_eq;

use shapefix::semantic::{FactTable, Symbol, TypeSymbol};
use shapefix::syntax::factory as f;
use shapefix::syntax::{SyntaxKind, SyntaxTree, TextSpan};
use shapefix::{Engine, RuleId, Settings};

fn engine() -> Engine<'static> {
    Engine::new(Settings::default())
}

/// Span of the first occurrence of `needle` in the rendered tree.
fn span_of(tree: &SyntaxTree, needle: &str) -> TextSpan {
    let start = tree.render().find(needle).expect("needle should be in the source");
    TextSpan::new(start, start + needle.len())
}

#[test]
fn test_redundant_as_operator() {
    // string s2 = s as string;
    let tree = SyntaxTree::new(f::compilation_unit(vec![f::local_declaration(
        f::variable_declaration(
            f::predefined_type("string"),
            vec![f::variable_declarator(
                "s2",
                Some(f::binary(
                    SyntaxKind::AsExpression,
                    f::identifier_name("s"),
                    f::predefined_type("string"),
                )),
            )],
        ),
    )]));
    let facts = FactTable::new()
        .with_type("s", TypeSymbol::string())
        .with_type("string", TypeSymbol::string());

    let engine = engine();
    let actions = engine
        .collect(&tree, &facts, span_of(&tree, "as"))
        .expect("collection should succeed");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule, RuleId::RemoveRedundantAsOperator);
    assert_eq!(actions[0].title, "Remove redundant cast");

    let rewritten = engine.commit(&tree, &actions[0]).expect("commit should succeed");
    assert_eq!(rewritten.render(), "string s2 = s;");
}

#[test]
fn test_empty_string_comparison() {
    // if (x == "") { Run(); }
    let body = f::block(vec![f::expression_statement(f::invocation(
        f::identifier_name("Run"),
        Vec::new(),
    ))]);
    let condition = f::binary(
        SyntaxKind::EqualsExpression,
        f::identifier_name("x"),
        f::string_literal(""),
    );
    let tree = SyntaxTree::new(f::compilation_unit(vec![f::if_statement(condition, body, None)]));
    let facts = FactTable::new().with_type("x", TypeSymbol::string());

    let engine = engine();
    let actions = engine
        .collect(&tree, &facts, span_of(&tree, "x"))
        .expect("collection should succeed");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule, RuleId::UseStringLength);

    let before = tree.render();
    let rewritten = engine.commit(&tree, &actions[0]).expect("commit should succeed");
    assert_eq!(rewritten.render(), before.replace("x == \"\"", "x?.Length == 0"));
}

fn where_any() -> (SyntaxTree, FactTable) {
    let where_call = f::invocation(
        f::member_access(f::identifier_name("items"), f::identifier_name("Where")),
        vec![f::simple_lambda(
            "p",
            f::member_access(f::identifier_name("p"), f::identifier_name("Ok")),
        )],
    );
    let tree = SyntaxTree::new(f::invocation(
        f::member_access(where_call, f::identifier_name("Any")),
        Vec::new(),
    ));

    let item = TypeSymbol::class("Item");
    let where_symbol = Symbol::linq(
        "Where",
        vec![TypeSymbol::func(item.clone(), TypeSymbol::boolean())],
        vec![item],
    );
    let facts = FactTable::new()
        .with_symbol("items.Where(p => p.Ok)", where_symbol)
        .with_symbol("items.Where(p => p.Ok).Any()", Symbol::linq("Any", Vec::new(), Vec::new()));
    (tree, facts)
}

#[test]
fn test_where_any_chain() {
    let (tree, facts) = where_any();
    assert_eq!(tree.render(), "items.Where(p => p.Ok).Any()");

    let engine = engine();
    let actions = engine
        .collect(&tree, &facts, span_of(&tree, "Any"))
        .expect("collection should succeed");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule, RuleId::SimplifyLinqChain);
    // From the `Where` name to the end of the outer call.
    assert_eq!(actions[0].span, TextSpan::new(6, 28));

    let rewritten = engine.commit(&tree, &actions[0]).expect("commit should succeed");
    assert_eq!(rewritten.render(), "items.Any(p => p.Ok)");
}

#[test]
fn test_where_any_chain_from_inner_call() {
    let (tree, facts) = where_any();
    let actions = engine()
        .collect(&tree, &facts, span_of(&tree, "Where"))
        .expect("collection should succeed");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule, RuleId::SimplifyLinqChain);
}

#[test]
fn test_split_field_declaration() {
    let field = f::field_declaration(
        &["private"],
        f::variable_declaration(
            f::predefined_type("int"),
            vec![
                f::variable_declarator("a", None),
                f::variable_declarator("b", None),
                f::variable_declarator("c", None),
            ],
        ),
    )
    .with_leading_trivia(vec![
        f::whitespace("    "),
        f::comment("// counters"),
        f::eol(),
        f::whitespace("    "),
    ])
    .with_trailing_trivia(vec![f::eol()]);
    let tree = SyntaxTree::new(f::compilation_unit(vec![field]));
    assert_eq!(tree.render(), "    // counters\n    private int a, b, c;\n");

    let engine = engine();
    let query = TextSpan::empty(span_of(&tree, "b").start);
    let actions = engine
        .collect(&tree, &FactTable::new(), query)
        .expect("collection should succeed");
    let split = actions
        .iter()
        .find(|a| a.rule == RuleId::SplitVariableDeclaration)
        .expect("split should be offered");
    assert_eq!(split.title, "Split field declaration");

    let rewritten = engine.commit(&tree, split).expect("commit should succeed");
    assert_eq!(
        rewritten.render(),
        "    // counters\n    private int a;\n    private int b;\n    private int c;\n"
    );
    // Only the first declaration keeps the comment.
    let fields: Vec<_> = rewritten
        .nodes()
        .filter(|n| n.kind() == SyntaxKind::FieldDeclaration)
        .collect();
    assert_eq!(fields.len(), 3);
    assert!(fields[0].full_text().contains("// counters"));
    assert!(fields[1..].iter().all(|n| !n.full_text().contains("//")));
}

#[test]
fn test_if_to_return_then_remove_comment() {
    // if (c) return true; else return false; // done
    let statement = f::if_statement(
        f::identifier_name("c"),
        f::return_statement(Some(f::true_literal())),
        Some(f::return_statement(Some(f::false_literal()))),
    )
    .with_trailing_trivia(vec![f::space(), f::comment("// done"), f::eol()]);
    let method = f::method_declaration(
        &[],
        f::predefined_type("bool"),
        "IsOn",
        Vec::new(),
        f::block(vec![statement]),
    );
    let tree = SyntaxTree::new(f::compilation_unit(vec![method]));
    let facts = FactTable::new().with_type("c", TypeSymbol::boolean());

    let engine = engine();
    let actions = engine
        .collect(&tree, &facts, span_of(&tree, "if"))
        .expect("collection should succeed");
    let action = actions
        .iter()
        .find(|a| a.rule == RuleId::SimplifyIfToReturn)
        .expect("if-to-return should be offered");

    let rewritten = engine.commit(&tree, action).expect("commit should succeed");
    let text = rewritten.render();
    assert!(text.contains("return c; // done\n"));
    assert!(!text.contains("if"));

    // The comment is still removable in the new snapshot.
    let actions = engine
        .collect(&rewritten, &facts, span_of(&rewritten, "// done"))
        .expect("collection should succeed");
    let remove = actions
        .iter()
        .find(|a| a.rule == RuleId::RemoveComment)
        .expect("comment removal should be offered");
    let cleaned = engine.commit(&rewritten, remove).expect("commit should succeed");
    assert!(cleaned.render().contains("return c;\n"));
    assert!(!cleaned.render().contains("//"));
}
