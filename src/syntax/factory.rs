//! Constructors for well-formed green nodes.
//!
//! Nodes come out with conventional single-space separators and no outer
//! trivia, so `binary(EqualsExpression, x, y)` renders as `x == y` and
//! `block(vec![s])` as `{ s }`. Rewrites build replacement nodes with these
//! and carry the original trivia over; callers and tests attach their own
//! line breaks with `with_leading_trivia` / `with_trailing_trivia`.

use super::green::{GreenElement, GreenNode, GreenToken, Trivia};
use super::kind::{SyntaxKind, TriviaKind};

const PREDEFINED: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object", "sbyte",
    "short", "string", "uint", "ulong", "ushort", "void", "var",
];

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "const", "abstract",
    "virtual", "override", "sealed", "extern", "unsafe", "async", "new", "partial", "volatile",
    "ref", "out", "in", "params",
];

pub fn space() -> Trivia {
    Trivia::new(TriviaKind::Whitespace, " ")
}

pub fn whitespace(text: &str) -> Trivia {
    Trivia::new(TriviaKind::Whitespace, text)
}

pub fn eol() -> Trivia {
    Trivia::new(TriviaKind::EndOfLine, "\n")
}

/// A comment; `/*`-prefixed text is a multi-line comment, `///` a doc comment.
pub fn comment(text: &str) -> Trivia {
    let kind = if text.starts_with("///") {
        TriviaKind::DocumentationComment
    } else if text.starts_with("/*") {
        TriviaKind::MultiLineComment
    } else {
        TriviaKind::SingleLineComment
    };
    Trivia::new(kind, text)
}

/// A directive line; `#region` and `#endregion` get their own kinds.
pub fn directive(text: &str) -> Trivia {
    let kind = if text.starts_with("#region") {
        TriviaKind::RegionDirective
    } else if text.starts_with("#endregion") {
        TriviaKind::EndRegionDirective
    } else {
        TriviaKind::Directive
    };
    Trivia::new(kind, text)
}

/// Token with the fixed spelling of `kind`.
pub fn token(kind: SyntaxKind) -> GreenToken {
    GreenToken::new(kind, kind.fixed_text().unwrap_or_default())
}

fn spaced(kind: SyntaxKind) -> GreenToken {
    token(kind)
        .with_leading(vec![space()])
        .with_trailing(vec![space()])
}

fn trailing_space(kind: SyntaxKind) -> GreenToken {
    token(kind).with_trailing(vec![space()])
}

pub fn identifier(name: &str) -> GreenToken {
    GreenToken::new(SyntaxKind::IdentifierToken, name)
}

/// Keyword token for `text`, classified as predefined type, modifier or
/// one of the fixed keywords.
pub fn keyword(text: &str) -> GreenToken {
    let kind = if PREDEFINED.contains(&text) {
        SyntaxKind::PredefinedKeyword
    } else if MODIFIERS.contains(&text) {
        SyntaxKind::ModifierKeyword
    } else {
        fixed_keyword(text).unwrap_or(SyntaxKind::IdentifierToken)
    };
    GreenToken::new(kind, text)
}

fn fixed_keyword(text: &str) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    [
        ReturnKeyword,
        IfKeyword,
        ElseKeyword,
        GetKeyword,
        SetKeyword,
        AddKeyword,
        RemoveKeyword,
        TrueKeyword,
        FalseKeyword,
        NullKeyword,
        AsKeyword,
        IsKeyword,
        ThisKeyword,
        OperatorKeyword,
        ImplicitKeyword,
        ExplicitKeyword,
        EventKeyword,
        ClassKeyword,
        StructKeyword,
        InterfaceKeyword,
    ]
    .into_iter()
    .find(|k| k.fixed_text() == Some(text))
}

fn node(kind: SyntaxKind, slots: Vec<Option<GreenElement>>) -> GreenNode {
    GreenNode::new(kind, slots)
}

fn some(element: impl Into<GreenElement>) -> Option<GreenElement> {
    Some(element.into())
}

fn with_trailing_space(node: GreenNode) -> GreenNode {
    node.with_trailing_trivia(vec![space()])
}

/// `List` of `items` separated by `, `.
pub fn separated_list(items: Vec<GreenNode>) -> GreenNode {
    let mut elements = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            elements.push(trailing_space(SyntaxKind::CommaToken).into());
        }
        elements.push(item.into());
    }
    GreenNode::list(elements)
}

/// `List` of `items`, each followed by a single space.
fn spaced_list(items: Vec<GreenNode>) -> GreenNode {
    GreenNode::list(
        items
            .into_iter()
            .map(|i| {
                if i.trailing_trivia().is_empty() {
                    with_trailing_space(i).into()
                } else {
                    i.into()
                }
            })
            .collect(),
    )
}

fn modifier_list(modifiers: &[&str]) -> Option<GreenElement> {
    if modifiers.is_empty() {
        return None;
    }
    some(GreenNode::list(
        modifiers
            .iter()
            .map(|m| keyword(m).with_trailing(vec![space()]).into())
            .collect(),
    ))
}

// Names, types and literals

pub fn identifier_name(name: &str) -> GreenNode {
    node(SyntaxKind::IdentifierName, vec![some(identifier(name))])
}

pub fn generic_name(name: &str, type_arguments: Vec<GreenNode>) -> GreenNode {
    let list = node(
        SyntaxKind::TypeArgumentList,
        vec![
            some(token(SyntaxKind::LessThanToken)),
            some(separated_list(type_arguments)),
            some(token(SyntaxKind::GreaterThanToken)),
        ],
    );
    node(SyntaxKind::GenericName, vec![some(identifier(name)), some(list)])
}

pub fn predefined_type(name: &str) -> GreenNode {
    node(SyntaxKind::PredefinedType, vec![some(keyword(name))])
}

/// String literal with the given (unquoted) value.
pub fn string_literal(value: &str) -> GreenNode {
    node(
        SyntaxKind::StringLiteralExpression,
        vec![some(GreenToken::new(
            SyntaxKind::StringLiteralToken,
            format!("\"{}\"", value),
        ))],
    )
}

pub fn numeric_literal(text: &str) -> GreenNode {
    node(
        SyntaxKind::NumericLiteralExpression,
        vec![some(GreenToken::new(SyntaxKind::NumericLiteralToken, text))],
    )
}

pub fn true_literal() -> GreenNode {
    node(SyntaxKind::TrueLiteralExpression, vec![some(token(SyntaxKind::TrueKeyword))])
}

pub fn false_literal() -> GreenNode {
    node(SyntaxKind::FalseLiteralExpression, vec![some(token(SyntaxKind::FalseKeyword))])
}

pub fn bool_literal(value: bool) -> GreenNode {
    if value {
        true_literal()
    } else {
        false_literal()
    }
}

pub fn null_literal() -> GreenNode {
    node(SyntaxKind::NullLiteralExpression, vec![some(token(SyntaxKind::NullKeyword))])
}

// Expressions

pub fn parenthesized(expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ParenthesizedExpression,
        vec![
            some(token(SyntaxKind::OpenParenToken)),
            some(expression),
            some(token(SyntaxKind::CloseParenToken)),
        ],
    )
}

/// `(type)expression`
pub fn cast(type_syntax: GreenNode, expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::CastExpression,
        vec![
            some(token(SyntaxKind::OpenParenToken)),
            some(type_syntax),
            some(token(SyntaxKind::CloseParenToken)),
            some(expression),
        ],
    )
}

/// `left op right` for any binary expression kind.
pub fn binary(kind: SyntaxKind, left: GreenNode, right: GreenNode) -> GreenNode {
    let op = kind.binary_operator().unwrap_or(SyntaxKind::EqualsEqualsToken);
    node(kind, vec![some(left), some(spaced(op)), some(right)])
}

pub fn logical_not(operand: GreenNode) -> GreenNode {
    node(
        SyntaxKind::LogicalNotExpression,
        vec![some(token(SyntaxKind::ExclamationToken)), some(operand)],
    )
}

pub fn member_access(expression: GreenNode, name: GreenNode) -> GreenNode {
    node(
        SyntaxKind::SimpleMemberAccessExpression,
        vec![some(expression), some(token(SyntaxKind::DotToken)), some(name)],
    )
}

pub fn element_access(expression: GreenNode, arguments: Vec<GreenNode>) -> GreenNode {
    let list = node(
        SyntaxKind::BracketedArgumentList,
        vec![
            some(token(SyntaxKind::OpenBracketToken)),
            some(separated_list(arguments.into_iter().map(argument).collect())),
            some(token(SyntaxKind::CloseBracketToken)),
        ],
    );
    node(SyntaxKind::ElementAccessExpression, vec![some(expression), some(list)])
}

/// `expression?` followed by `when_not_null` (a member binding or element binding).
pub fn conditional_access(expression: GreenNode, when_not_null: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ConditionalAccessExpression,
        vec![
            some(expression),
            some(token(SyntaxKind::QuestionToken)),
            some(when_not_null),
        ],
    )
}

/// `.name` inside a conditional access.
pub fn member_binding(name: GreenNode) -> GreenNode {
    node(
        SyntaxKind::MemberBindingExpression,
        vec![some(token(SyntaxKind::DotToken)), some(name)],
    )
}

pub fn argument(expression: GreenNode) -> GreenNode {
    node(SyntaxKind::Argument, vec![some(expression)])
}

/// `(a, b)` wrapping each expression in an argument.
pub fn argument_list(arguments: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::ArgumentList,
        vec![
            some(token(SyntaxKind::OpenParenToken)),
            some(separated_list(arguments.into_iter().map(argument).collect())),
            some(token(SyntaxKind::CloseParenToken)),
        ],
    )
}

pub fn invocation(expression: GreenNode, arguments: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::InvocationExpression,
        vec![some(expression), some(argument_list(arguments))],
    )
}

/// `p => body`
pub fn simple_lambda(parameter_name: &str, body: GreenNode) -> GreenNode {
    node(
        SyntaxKind::SimpleLambdaExpression,
        vec![
            some(parameter(None, parameter_name)),
            some(spaced(SyntaxKind::EqualsGreaterThanToken)),
            some(body),
        ],
    )
}

/// `(p, q) => body`
pub fn parenthesized_lambda(parameters: Vec<GreenNode>, body: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ParenthesizedLambdaExpression,
        vec![
            some(parameter_list(parameters)),
            some(spaced(SyntaxKind::EqualsGreaterThanToken)),
            some(body),
        ],
    )
}

// Parameters and attributes

/// `type name`, or just `name` for an implicitly typed lambda parameter.
pub fn parameter(type_syntax: Option<GreenNode>, name: &str) -> GreenNode {
    node(
        SyntaxKind::Parameter,
        vec![
            None,
            None,
            type_syntax.map(|t| with_trailing_space(t).into()),
            some(identifier(name)),
        ],
    )
}

pub fn parameter_list(parameters: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::ParameterList,
        vec![
            some(token(SyntaxKind::OpenParenToken)),
            some(separated_list(parameters)),
            some(token(SyntaxKind::CloseParenToken)),
        ],
    )
}

pub fn bracketed_parameter_list(parameters: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::BracketedParameterList,
        vec![
            some(token(SyntaxKind::OpenBracketToken)),
            some(separated_list(parameters)),
            some(token(SyntaxKind::CloseBracketToken)),
        ],
    )
}

/// `[Name] ` with a trailing space.
pub fn attribute_list(names: &[&str]) -> GreenNode {
    let attributes = names
        .iter()
        .map(|n| node(SyntaxKind::Attribute, vec![some(identifier_name(n))]))
        .collect();
    node(
        SyntaxKind::AttributeList,
        vec![
            some(token(SyntaxKind::OpenBracketToken)),
            some(separated_list(attributes)),
            some(trailing_space(SyntaxKind::CloseBracketToken)),
        ],
    )
}

fn attribute_lists(lists: Vec<GreenNode>) -> Option<GreenElement> {
    if lists.is_empty() {
        return None;
    }
    some(GreenNode::list(lists.into_iter().map(Into::into).collect()))
}

// Statements

/// `{ a; b; }`, or `{ }` when empty.
pub fn block(statements: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::Block,
        vec![
            some(trailing_space(SyntaxKind::OpenBraceToken)),
            some(spaced_list(statements)),
            some(token(SyntaxKind::CloseBraceToken)),
        ],
    )
}

/// `return expression;` or `return;`
pub fn return_statement(expression: Option<GreenNode>) -> GreenNode {
    let keyword = if expression.is_some() {
        trailing_space(SyntaxKind::ReturnKeyword)
    } else {
        token(SyntaxKind::ReturnKeyword)
    };
    node(
        SyntaxKind::ReturnStatement,
        vec![
            some(keyword),
            expression.map(Into::into),
            some(token(SyntaxKind::SemicolonToken)),
        ],
    )
}

pub fn expression_statement(expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ExpressionStatement,
        vec![some(expression), some(token(SyntaxKind::SemicolonToken))],
    )
}

/// `if (condition) statement` with an optional ` else statement`.
pub fn if_statement(
    condition: GreenNode,
    statement: GreenNode,
    else_statement: Option<GreenNode>,
) -> GreenNode {
    node(
        SyntaxKind::IfStatement,
        vec![
            some(trailing_space(SyntaxKind::IfKeyword)),
            some(token(SyntaxKind::OpenParenToken)),
            some(condition),
            some(trailing_space(SyntaxKind::CloseParenToken)),
            some(statement),
            else_statement.map(|s| else_clause(s).into()),
        ],
    )
}

/// ` else statement`
pub fn else_clause(statement: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ElseClause,
        vec![some(spaced(SyntaxKind::ElseKeyword)), some(statement)],
    )
}

// Declarations

/// `type a = 1, b`
pub fn variable_declaration(type_syntax: GreenNode, declarators: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::VariableDeclaration,
        vec![
            some(with_trailing_space(type_syntax)),
            some(separated_list(declarators)),
        ],
    )
}

/// `name` or `name = value`
pub fn variable_declarator(name: &str, value: Option<GreenNode>) -> GreenNode {
    let initializer = value.map(|v| {
        node(
            SyntaxKind::EqualsValueClause,
            vec![some(spaced(SyntaxKind::EqualsToken)), some(v)],
        )
        .into()
    });
    node(
        SyntaxKind::VariableDeclarator,
        vec![some(identifier(name)), initializer],
    )
}

/// `type a, b;` as a statement.
pub fn local_declaration(declaration: GreenNode) -> GreenNode {
    node(
        SyntaxKind::LocalDeclarationStatement,
        vec![
            None,
            some(declaration),
            some(token(SyntaxKind::SemicolonToken)),
        ],
    )
}

pub fn field_declaration(modifiers: &[&str], declaration: GreenNode) -> GreenNode {
    node(
        SyntaxKind::FieldDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(declaration),
            some(token(SyntaxKind::SemicolonToken)),
        ],
    )
}

pub fn event_field_declaration(modifiers: &[&str], declaration: GreenNode) -> GreenNode {
    node(
        SyntaxKind::EventFieldDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(trailing_space(SyntaxKind::EventKeyword)),
            some(declaration),
            some(token(SyntaxKind::SemicolonToken)),
        ],
    )
}

/// `=> expression`
pub fn arrow_expression_clause(expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ArrowExpressionClause,
        vec![
            some(trailing_space(SyntaxKind::EqualsGreaterThanToken)),
            some(expression),
        ],
    )
}

fn parameters_with_space(parameters: GreenNode) -> GreenNode {
    with_trailing_space(parameters)
}

/// `modifiers return_type name(parameters) { ... }`
pub fn method_declaration(
    modifiers: &[&str],
    return_type: GreenNode,
    name: &str,
    parameters: Vec<GreenNode>,
    body: GreenNode,
) -> GreenNode {
    node(
        SyntaxKind::MethodDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(with_trailing_space(return_type)),
            some(identifier(name)),
            some(parameters_with_space(parameter_list(parameters))),
            some(body),
            None,
            None,
        ],
    )
}

pub fn constructor_declaration(
    modifiers: &[&str],
    name: &str,
    parameters: Vec<GreenNode>,
    body: GreenNode,
) -> GreenNode {
    node(
        SyntaxKind::ConstructorDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(identifier(name)),
            some(parameters_with_space(parameter_list(parameters))),
            some(body),
            None,
            None,
        ],
    )
}

/// `~Name() { ... }`
pub fn destructor_declaration(name: &str, body: GreenNode) -> GreenNode {
    node(
        SyntaxKind::DestructorDeclaration,
        vec![
            None,
            None,
            some(token(SyntaxKind::TildeToken)),
            some(identifier(name)),
            some(parameters_with_space(parameter_list(Vec::new()))),
            some(body),
            None,
            None,
        ],
    )
}

/// `modifiers return_type operator op(parameters) { ... }`
pub fn operator_declaration(
    modifiers: &[&str],
    return_type: GreenNode,
    operator: SyntaxKind,
    parameters: Vec<GreenNode>,
    body: GreenNode,
) -> GreenNode {
    node(
        SyntaxKind::OperatorDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(with_trailing_space(return_type)),
            some(trailing_space(SyntaxKind::OperatorKeyword)),
            some(token(operator)),
            some(parameters_with_space(parameter_list(parameters))),
            some(body),
            None,
            None,
        ],
    )
}

/// `modifiers implicit operator Type(parameters) { ... }`
pub fn conversion_operator_declaration(
    modifiers: &[&str],
    implicit: bool,
    type_syntax: GreenNode,
    parameters: Vec<GreenNode>,
    body: GreenNode,
) -> GreenNode {
    let kind = if implicit {
        SyntaxKind::ImplicitKeyword
    } else {
        SyntaxKind::ExplicitKeyword
    };
    node(
        SyntaxKind::ConversionOperatorDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(trailing_space(kind)),
            some(trailing_space(SyntaxKind::OperatorKeyword)),
            some(type_syntax),
            some(parameters_with_space(parameter_list(parameters))),
            some(body),
            None,
            None,
        ],
    )
}

/// `get { ... }` or `get;` (auto accessor).
pub fn accessor(kind: SyntaxKind, body: Option<GreenNode>) -> GreenNode {
    let keyword = match kind {
        SyntaxKind::SetAccessorDeclaration => SyntaxKind::SetKeyword,
        SyntaxKind::AddAccessorDeclaration => SyntaxKind::AddKeyword,
        SyntaxKind::RemoveAccessorDeclaration => SyntaxKind::RemoveKeyword,
        _ => SyntaxKind::GetKeyword,
    };
    let (keyword, semicolon) = match body {
        Some(_) => (trailing_space(keyword), None),
        None => (token(keyword), some(token(SyntaxKind::SemicolonToken))),
    };
    node(
        kind,
        vec![None, None, some(keyword), body.map(Into::into), None, semicolon],
    )
}

/// Accessor carrying attribute lists.
pub fn accessor_with_attributes(kind: SyntaxKind, attributes: Vec<GreenNode>, body: GreenNode) -> GreenNode {
    accessor(kind, Some(body)).with_slot(0, attribute_lists(attributes))
}

/// `{ get { ... } }`
pub fn accessor_list(accessors: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::AccessorList,
        vec![
            some(trailing_space(SyntaxKind::OpenBraceToken)),
            some(spaced_list(accessors)),
            some(token(SyntaxKind::CloseBraceToken)),
        ],
    )
}

/// `modifiers type Name { accessors }`
pub fn property_declaration(
    modifiers: &[&str],
    type_syntax: GreenNode,
    name: &str,
    accessor_list: GreenNode,
) -> GreenNode {
    node(
        SyntaxKind::PropertyDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(with_trailing_space(type_syntax)),
            some(identifier(name).with_trailing(vec![space()])),
            some(accessor_list),
            None,
            None,
        ],
    )
}

/// `modifiers type this[parameters] { accessors }`
pub fn indexer_declaration(
    modifiers: &[&str],
    type_syntax: GreenNode,
    parameters: Vec<GreenNode>,
    accessor_list: GreenNode,
) -> GreenNode {
    node(
        SyntaxKind::IndexerDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(with_trailing_space(type_syntax)),
            some(token(SyntaxKind::ThisKeyword)),
            some(with_trailing_space(bracketed_parameter_list(parameters))),
            some(accessor_list),
            None,
            None,
        ],
    )
}

/// `class Name { members }`
pub fn class_declaration(modifiers: &[&str], name: &str, members: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::ClassDeclaration,
        vec![
            None,
            modifier_list(modifiers),
            some(trailing_space(SyntaxKind::ClassKeyword)),
            some(identifier(name).with_trailing(vec![space()])),
            some(trailing_space(SyntaxKind::OpenBraceToken)),
            some(spaced_list(members)),
            some(token(SyntaxKind::CloseBraceToken)),
        ],
    )
}

/// Root node holding `members` verbatim (no separators added).
pub fn compilation_unit(members: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::CompilationUnit,
        vec![
            some(GreenNode::list(members.into_iter().map(Into::into).collect())),
            some(token(SyntaxKind::EndOfFileToken)),
        ],
    )
}

/// Root whose end-of-file token carries `trivia` (e.g. a trailing comment).
pub fn compilation_unit_with_eof_trivia(members: Vec<GreenNode>, trivia: Vec<Trivia>) -> GreenNode {
    compilation_unit(members).with_slot(1, Some(token(SyntaxKind::EndOfFileToken).with_leading(trivia).into()))
}

/// Placeholder for input the parser could not make sense of.
pub fn error_node(text: &str) -> GreenNode {
    node(
        SyntaxKind::Error,
        vec![some(GreenToken::new(SyntaxKind::IdentifierToken, text))],
    )
}

/// `kind` token flagged as missing.
pub fn missing(kind: SyntaxKind) -> GreenToken {
    GreenToken::missing(kind)
}
