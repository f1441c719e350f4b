//! Local, field and event declarations.

use std::collections::HashSet;

use crate::error::RewriteError;
use crate::rewrite::trivia::{end_of_line, indentation};
use crate::rewrite::Edit;
use crate::semantic::{SymbolKind, TypeSymbol};
use crate::syntax::ast::{ExpressionStatement, Parameter, VariableDeclaration};
use crate::syntax::factory as f;
use crate::syntax::{GreenNode, GreenToken, SyntaxKind, SyntaxNode, SyntaxToken, TextSpan, TriviaKind};

use super::context::RuleContext;
use super::types::{Proposal, RuleId, Severity};
use super::Rule;

/// `int a, b;` becomes `int a;` and `int b;` on separate lines.
pub struct SplitVariableDeclaration;

fn describe(owner: SyntaxKind) -> Option<&'static str> {
    match owner {
        SyntaxKind::LocalDeclarationStatement => Some("Split local declaration"),
        SyntaxKind::FieldDeclaration => Some("Split field declaration"),
        SyntaxKind::EventFieldDeclaration => Some("Split event declaration"),
        _ => None,
    }
}

impl Rule for SplitVariableDeclaration {
    fn id(&self) -> RuleId {
        RuleId::SplitVariableDeclaration
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::VariableDeclaration]
    }

    fn default_severity(&self) -> Severity {
        Severity::Hidden
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let Some(declaration) = VariableDeclaration::cast(node) else {
            return;
        };
        let Some(owner) = node.parent() else {
            return;
        };
        let Some(title) = describe(owner.kind()) else {
            return;
        };
        // Siblings can only be spliced into a list.
        if owner.parent().map(|p| p.kind()) != Some(SyntaxKind::List) {
            return;
        }
        if ctx.rejects(owner) || declaration.variables().len() < 2 {
            return;
        }
        let has_inner_comments = node.inner_trivia().iter().any(|t| t.trivia.kind.is_comment());
        if has_inner_comments || node.span_contains_directives() {
            return;
        }

        out.push(Proposal::new(title, node.span(), split_declaration));
    }
}

fn split_declaration(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let declaration = VariableDeclaration::cast(node).ok_or_else(|| shape("not a variable declaration"))?;
    let owner = node.parent().ok_or_else(|| shape("declaration without owner"))?;
    let slot = node.slot_in_parent();

    let owner_green = owner.green();
    let eol = end_of_line(owner_green.trailing_trivia());
    let indent = indentation(owner_green.leading_trivia());

    let variables = declaration.variables();
    let last = variables.len().saturating_sub(1);
    let parts: Vec<GreenNode> = variables
        .iter()
        .enumerate()
        .map(|(i, variable)| {
            let single = GreenNode::list(vec![variable.green().without_trivia().into()]);
            let part_declaration = node.green().with_slot(1, Some(single.into()));
            let mut part = owner_green
                .with_slot(slot, Some(part_declaration.into()))
                .without_trivia();
            if i > 0 {
                part = part.with_leading_trivia(indent.clone());
            }
            if i < last {
                part = part.with_trailing_trivia(vec![eol.clone()]);
            }
            part
        })
        .collect();

    Ok(Edit::split(owner, parts))
}

/// A type with no name after it, `Foo` or `Foo` followed by a line break,
/// gets a local name derived from the type: `Foo foo;`.
pub struct AddIdentifierToLocalDeclaration;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

fn is_type_syntax(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IdentifierName | SyntaxKind::GenericName | SyntaxKind::PredefinedType
    )
}

/// `List<Item>` gives `list`, `IService` gives `service`.
fn local_name(ty: &TypeSymbol) -> Option<String> {
    let name = ty.name.split('<').next().unwrap_or_default();
    let name = name.rsplit('.').next().unwrap_or_default();
    let name = match name.strip_prefix('I') {
        Some(rest) if ty.is_interface() && rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => name,
    };
    let mut chars = name.chars();
    let first = chars.next()?;
    let name: String = first.to_lowercase().chain(chars).collect();
    (!KEYWORDS.contains(&name.as_str())).then_some(name)
}

/// `name`, or `name2`, `name3`, ... if the enclosing member already uses it.
fn unique_local_name(node: SyntaxNode<'_>, name: String) -> String {
    let scope = node
        .ancestors()
        .find(|n| n.kind().is_body_owner())
        .unwrap_or_else(|| node.tree().root());
    let taken: HashSet<&str> = scope
        .descendants()
        .filter_map(|n| match n.kind() {
            SyntaxKind::VariableDeclarator => n.child_token(0),
            SyntaxKind::Parameter => Parameter::cast(n).and_then(|p| p.identifier()),
            _ => None,
        })
        .map(|t| t.text())
        .collect();
    if !taken.contains(name.as_str()) {
        return name;
    }
    (2..)
        .map(|i| format!("{}{}", name, i))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_default()
}

/// The type's trailing whitespace and the line break after it.
fn line_break_after(ty: SyntaxNode<'_>) -> Option<(SyntaxToken<'_>, usize)> {
    let last = ty.last_token()?;
    let trailing = last.green().trailing();
    let index = trailing.iter().position(|t| t.kind != TriviaKind::Whitespace)?;
    (trailing[index].kind == TriviaKind::EndOfLine).then_some((last, index))
}

impl Rule for AddIdentifierToLocalDeclaration {
    fn id(&self) -> RuleId {
        RuleId::AddIdentifierToLocalDeclaration
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ExpressionStatement, SyntaxKind::LocalDeclarationStatement]
    }

    fn default_severity(&self) -> Severity {
        Severity::Hidden
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        if ctx.is_protected(node.full_span()) || node.span_contains_directives() {
            return;
        }
        let (ty, anchor) = match node.kind() {
            SyntaxKind::ExpressionStatement => {
                let Some(expression) = ExpressionStatement::cast(node).and_then(|s| s.expression()) else {
                    return;
                };
                if !is_type_syntax(expression.kind()) || expression.contains_error() {
                    return;
                }
                let names_type = ctx
                    .facts
                    .symbol_of(expression)
                    .is_some_and(|s| s.kind == SymbolKind::Type);
                if !names_type {
                    return;
                }
                (expression, expression)
            }
            _ => {
                let Some(ty) = missing_name_type(node, ctx.query) else {
                    return;
                };
                (ty, node)
            }
        };
        let Some(info) = ctx.facts.type_of(ty) else {
            return;
        };
        if info.ty.is_error() {
            return;
        }
        let Some(name) = local_name(&info.ty) else {
            return;
        };
        let name = unique_local_name(anchor, name);

        let title = format!("Add identifier '{}'", name);
        let producer: fn(SyntaxNode<'_>, &str) -> Result<Edit, RewriteError> = match node.kind() {
            SyntaxKind::ExpressionStatement => declare_from_statement,
            _ => name_declaration,
        };
        out.push(Proposal::new(title, ty.span(), move |n| producer(n, &name)));
    }
}

/// The type of `Foo⏎` whose declarator has no name yet, when the query sits
/// on the type line.
fn missing_name_type(node: SyntaxNode<'_>, query: TextSpan) -> Option<SyntaxNode<'_>> {
    let declaration = node.child_node(1).and_then(VariableDeclaration::cast)?;
    let ty = declaration.type_syntax()?;
    if ty.text() == "var" || ty.contains_error() {
        return None;
    }
    let first = declaration.variables().into_iter().next()?;
    if !first.child_token(0)?.is_missing() {
        return None;
    }
    let (last, index) = line_break_after(ty)?;
    let line_break = last.trailing_trivia().get(index)?.span;
    (query.start >= ty.span().start && query.end <= line_break.start).then_some(ty)
}

fn declare_from_statement(node: SyntaxNode<'_>, name: &str) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let statement = ExpressionStatement::cast(node).ok_or_else(|| shape("not an expression statement"))?;
    let expression = statement.expression().ok_or_else(|| shape("statement without expression"))?;

    let declaration = f::local_declaration(f::variable_declaration(
        expression.green().without_trivia(),
        vec![f::variable_declarator(name, None)],
    ));
    let semicolon = node.child_token(1).filter(|t| !t.is_missing());
    let declaration = match semicolon {
        Some(_) => declaration,
        None => declaration.with_slot(2, Some(f::missing(SyntaxKind::SemicolonToken).into())),
    };
    Ok(Edit::replace(node, declaration))
}

fn name_declaration(node: SyntaxNode<'_>, name: &str) -> Result<Edit, RewriteError> {
    let shape = |reason| RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason,
    };
    let declaration = node
        .child_node(1)
        .and_then(VariableDeclaration::cast)
        .ok_or_else(|| shape("local without declaration"))?;
    let ty = declaration.type_syntax().ok_or_else(|| shape("declaration without type"))?;
    let identifier = declaration
        .variables()
        .into_iter()
        .next()
        .and_then(|v| v.child_token(0))
        .ok_or_else(|| shape("declaration without declarator"))?;
    let (last, index) = line_break_after(ty).ok_or_else(|| shape("type not followed by a line break"))?;

    // `Foo   ⏎` becomes `Foo name⏎`: the line break moves behind the name.
    let type_trailing = last.green().trailing();
    let mut trailing = type_trailing[index..].to_vec();
    trailing.extend(identifier.green().trailing().iter().cloned());
    let named = GreenToken::new(SyntaxKind::IdentifierToken, name)
        .with_leading(vec![f::space()])
        .with_trailing(trailing);

    Ok(Edit::replace_token(last, (**last.green()).clone().with_trailing(Vec::new()))
        .and(Edit::replace_token(identifier, named)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::Rewriter;
    use crate::semantic::{FactTable, Symbol};
    use crate::syntax::{NodeId, SyntaxTree};
    use pretty_assertions::assert_eq;

    fn detect(tree: &SyntaxTree) -> Vec<Proposal> {
        let facts = FactTable::new();
        let ctx = RuleContext::new(&facts, TextSpan::new(0, tree.len()));
        let node = tree
            .nodes()
            .find(|n| n.kind() == SyntaxKind::VariableDeclaration)
            .unwrap();
        let mut out = Vec::new();
        SplitVariableDeclaration.detect(node, &ctx, &mut out);
        out
    }

    fn apply(tree: &SyntaxTree, proposal: &Proposal) -> String {
        let node = tree
            .nodes()
            .find(|n| n.kind() == SyntaxKind::VariableDeclaration)
            .unwrap();
        let edit = (proposal.producer)(node).unwrap();
        Rewriter::apply(tree, &edit).unwrap().render()
    }

    fn declarators(names: &[&str]) -> GreenNode {
        f::variable_declaration(
            f::predefined_type("int"),
            names.iter().map(|n| f::variable_declarator(n, None)).collect(),
        )
    }

    #[test]
    fn test_split_field_keeps_leading_comment_on_first() {
        let field = f::field_declaration(&["private"], declarators(&["a", "b", "c"]))
            .with_leading_trivia(vec![
                f::whitespace("    "),
                f::comment("// counters"),
                f::eol(),
                f::whitespace("    "),
            ])
            .with_trailing_trivia(vec![f::eol()]);
        let tree = SyntaxTree::new(f::compilation_unit(vec![field]));

        let found = detect(&tree);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Split field declaration");
        assert_eq!(
            apply(&tree, &found[0]),
            "    // counters\n    private int a;\n    private int b;\n    private int c;\n"
        );
    }

    #[test]
    fn test_split_local_keeps_initializers() {
        let local = f::local_declaration(f::variable_declaration(
            f::predefined_type("var"),
            vec![
                f::variable_declarator("x", Some(f::numeric_literal("1"))),
                f::variable_declarator("y", Some(f::numeric_literal("2"))),
            ],
        ))
        .with_trailing_trivia(vec![f::eol()]);
        let tree = SyntaxTree::new(f::compilation_unit(vec![local]));

        let found = detect(&tree);
        assert_eq!(found[0].title, "Split local declaration");
        assert_eq!(apply(&tree, &found[0]), "var x = 1;\nvar y = 2;\n");
    }

    #[test]
    fn test_split_event_field() {
        let event = f::event_field_declaration(
            &["public"],
            f::variable_declaration(
                f::identifier_name("EventHandler"),
                vec![f::variable_declarator("A", None), f::variable_declarator("B", None)],
            ),
        );
        let tree = SyntaxTree::new(f::compilation_unit(vec![event]));
        let found = detect(&tree);
        assert_eq!(found[0].title, "Split event declaration");
        assert_eq!(
            apply(&tree, &found[0]),
            "public event EventHandler A;\npublic event EventHandler B;"
        );
    }

    #[test]
    fn test_single_declarator_abstains() {
        let tree = SyntaxTree::new(f::compilation_unit(vec![f::field_declaration(
            &[],
            declarators(&["a"]),
        )]));
        assert!(detect(&tree).is_empty());
    }

    #[test]
    fn test_comment_between_declarators_abstains() {
        let declaration = f::variable_declaration(
            f::predefined_type("int"),
            vec![
                f::variable_declarator("a", None),
                f::variable_declarator("b", None)
                    .with_leading_trivia(vec![f::comment("/* b */"), f::space()]),
            ],
        );
        let tree = SyntaxTree::new(f::compilation_unit(vec![f::field_declaration(&[], declaration)]));
        assert!(detect(&tree).is_empty());
    }

    #[test]
    fn test_declaration_outside_list_abstains() {
        let tree = SyntaxTree::new(f::field_declaration(&[], declarators(&["a", "b"])));
        assert!(detect(&tree).is_empty());
    }


    fn run_add(tree: &SyntaxTree, facts: &FactTable, kind: SyntaxKind, query: TextSpan) -> Vec<(Proposal, NodeId)> {
        let ctx = RuleContext::new(facts, query);
        let node = tree.nodes().find(|n| n.kind() == kind).unwrap();
        let mut out = Vec::new();
        AddIdentifierToLocalDeclaration.detect(node, &ctx, &mut out);
        out.into_iter().map(|p| (p, node.id())).collect()
    }

    fn apply_at(tree: &SyntaxTree, proposal: &Proposal, id: NodeId) -> String {
        let edit = (proposal.producer)(tree.node(id)).unwrap();
        Rewriter::apply(tree, &edit).unwrap().render()
    }

    fn service_facts() -> FactTable {
        FactTable::new()
            .with_type("Service", TypeSymbol::class("App.Service"))
            .with_symbol("Service", Symbol::new("Service", SymbolKind::Type))
            .with_type("IStore", TypeSymbol::interface("IStore"))
            .with_symbol("IStore", Symbol::new("IStore", SymbolKind::Type))
    }

    #[test]
    fn test_type_statement_becomes_declaration() {
        // void Run(Service service) { Service; }
        let method = f::method_declaration(
            &[],
            f::predefined_type("void"),
            "Run",
            vec![f::parameter(Some(f::identifier_name("Service")), "service")],
            f::block(vec![f::expression_statement(f::identifier_name("Service"))]),
        );
        let tree = SyntaxTree::new(f::compilation_unit(vec![method]));
        let found = run_add(&tree, &service_facts(), SyntaxKind::ExpressionStatement, TextSpan::new(0, tree.len()));
        assert_eq!(found.len(), 1);
        // The parameter already takes the plain name.
        assert_eq!(found[0].0.title, "Add identifier 'service2'");
        let text = apply_at(&tree, &found[0].0, found[0].1);
        assert!(text.contains("Service service2;"), "{}", text);
    }

    #[test]
    fn test_interface_prefix_is_dropped() {
        let statement = GreenNode::new(
            SyntaxKind::ExpressionStatement,
            vec![
                Some(f::identifier_name("IStore").into()),
                Some(f::missing(SyntaxKind::SemicolonToken).into()),
            ],
        );
        let tree = SyntaxTree::new(f::compilation_unit(vec![statement]));
        let found = run_add(&tree, &service_facts(), SyntaxKind::ExpressionStatement, TextSpan::new(0, tree.len()));
        assert_eq!(found.len(), 1);
        // The semicolon stays missing.
        assert_eq!(apply_at(&tree, &found[0].0, found[0].1), "IStore store");
    }

    #[test]
    fn test_non_type_statement_abstains() {
        let tree = SyntaxTree::new(f::compilation_unit(vec![f::expression_statement(f::identifier_name("count"))]));
        let facts = FactTable::new()
            .with_type("count", TypeSymbol::int32())
            .with_symbol("count", Symbol::new("count", SymbolKind::Local));
        assert!(run_add(&tree, &facts, SyntaxKind::ExpressionStatement, TextSpan::new(0, tree.len())).is_empty());
        // Unresolved names do not count as types.
        let tree = SyntaxTree::new(f::compilation_unit(vec![f::expression_statement(f::identifier_name("Service"))]));
        assert!(run_add(&tree, &FactTable::new(), SyntaxKind::ExpressionStatement, TextSpan::new(0, tree.len())).is_empty());
    }

    /// `Service  ⏎Run();` where the declarator has no name yet.
    fn unnamed_local() -> SyntaxTree {
        let declarator = GreenNode::new(
            SyntaxKind::VariableDeclarator,
            vec![Some(f::missing(SyntaxKind::IdentifierToken).into()), None],
        );
        let declaration = GreenNode::new(
            SyntaxKind::VariableDeclaration,
            vec![
                Some(
                    f::identifier_name("Service")
                        .with_trailing_trivia(vec![f::whitespace("  "), f::eol()])
                        .into(),
                ),
                Some(GreenNode::list(vec![declarator.into()]).into()),
            ],
        );
        let local = GreenNode::new(
            SyntaxKind::LocalDeclarationStatement,
            vec![
                None,
                Some(declaration.into()),
                Some(f::missing(SyntaxKind::SemicolonToken).into()),
            ],
        );
        SyntaxTree::new(f::compilation_unit(vec![
            local,
            f::expression_statement(f::invocation(f::identifier_name("Run"), Vec::new())),
        ]))
    }

    #[test]
    fn test_name_added_before_line_break() {
        let tree = unnamed_local();
        assert_eq!(tree.render(), "Service  \nRun();");
        let found = run_add(&tree, &service_facts(), SyntaxKind::LocalDeclarationStatement, TextSpan::new(0, 7));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.span, TextSpan::new(0, 7));
        assert_eq!(apply_at(&tree, &found[0].0, found[0].1), "Service service\nRun();");
    }

    #[test]
    fn test_query_after_line_break_abstains() {
        let tree = unnamed_local();
        let found = run_add(&tree, &service_facts(), SyntaxKind::LocalDeclarationStatement, TextSpan::empty(12));
        assert!(found.is_empty());
    }
}
