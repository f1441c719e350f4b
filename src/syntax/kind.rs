//! Node, token and trivia kind tags.

use serde::{Deserialize, Serialize};

/// Kind tag for every node and token in a tree.
///
/// Token kinds end in `Token` or `Keyword`; everything else is a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Tokens
    IdentifierToken,
    NumericLiteralToken,
    StringLiteralToken,
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    LessThanToken,
    GreaterThanToken,
    SemicolonToken,
    CommaToken,
    DotToken,
    EqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    ExclamationToken,
    AmpersandAmpersandToken,
    BarBarToken,
    PlusToken,
    QuestionToken,
    EqualsGreaterThanToken,
    TildeToken,
    EndOfFileToken,
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
    /// Predefined type keywords (`string`, `bool`, `int`, ...).
    PredefinedKeyword,
    /// Modifiers (`public`, `static`, `readonly`, ...).
    ModifierKeyword,

    // Declarations
    CompilationUnit,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    FieldDeclaration,
    EventFieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    DestructorDeclaration,
    OperatorDeclaration,
    ConversionOperatorDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    AccessorList,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    AddAccessorDeclaration,
    RemoveAccessorDeclaration,
    ParameterList,
    BracketedParameterList,
    Parameter,
    AttributeList,
    Attribute,
    ArrowExpressionClause,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,

    // Statements
    Block,
    LocalDeclarationStatement,
    ReturnStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,

    // Expressions
    IdentifierName,
    GenericName,
    TypeArgumentList,
    PredefinedType,
    TrueLiteralExpression,
    FalseLiteralExpression,
    NullLiteralExpression,
    StringLiteralExpression,
    NumericLiteralExpression,
    ParenthesizedExpression,
    CastExpression,
    EqualsExpression,
    NotEqualsExpression,
    LogicalAndExpression,
    LogicalOrExpression,
    AddExpression,
    AsExpression,
    IsExpression,
    LogicalNotExpression,
    SimpleMemberAccessExpression,
    ElementAccessExpression,
    BracketedArgumentList,
    ConditionalAccessExpression,
    MemberBindingExpression,
    InvocationExpression,
    ArgumentList,
    Argument,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,

    /// Variable-length sequence of elements (members, statements, separated lists).
    List,
    /// Placeholder produced by the parser for unparseable input.
    Error,
}

impl SyntaxKind {
    pub fn is_token(self) -> bool {
        (self as u16) <= (SyntaxKind::ModifierKeyword as u16)
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    pub fn is_keyword(self) -> bool {
        self.is_token() && (self as u16) >= (SyntaxKind::ReturnKeyword as u16)
    }

    /// Text of tokens whose spelling is fixed by their kind.
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;

        let text = match self {
            OpenParenToken => "(",
            CloseParenToken => ")",
            OpenBraceToken => "{",
            CloseBraceToken => "}",
            OpenBracketToken => "[",
            CloseBracketToken => "]",
            LessThanToken => "<",
            GreaterThanToken => ">",
            SemicolonToken => ";",
            CommaToken => ",",
            DotToken => ".",
            EqualsToken => "=",
            EqualsEqualsToken => "==",
            ExclamationEqualsToken => "!=",
            ExclamationToken => "!",
            AmpersandAmpersandToken => "&&",
            BarBarToken => "||",
            PlusToken => "+",
            QuestionToken => "?",
            EqualsGreaterThanToken => "=>",
            TildeToken => "~",
            EndOfFileToken => "",
            ReturnKeyword => "return",
            IfKeyword => "if",
            ElseKeyword => "else",
            GetKeyword => "get",
            SetKeyword => "set",
            AddKeyword => "add",
            RemoveKeyword => "remove",
            TrueKeyword => "true",
            FalseKeyword => "false",
            NullKeyword => "null",
            AsKeyword => "as",
            IsKeyword => "is",
            ThisKeyword => "this",
            OperatorKeyword => "operator",
            ImplicitKeyword => "implicit",
            ExplicitKeyword => "explicit",
            EventKeyword => "event",
            ClassKeyword => "class",
            StructKeyword => "struct",
            InterfaceKeyword => "interface",
            _ => return None,
        };
        Some(text)
    }

    pub fn is_binary_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqualsExpression
                | SyntaxKind::NotEqualsExpression
                | SyntaxKind::LogicalAndExpression
                | SyntaxKind::LogicalOrExpression
                | SyntaxKind::AddExpression
                | SyntaxKind::AsExpression
                | SyntaxKind::IsExpression
        )
    }

    pub fn is_literal_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::TrueLiteralExpression
                | SyntaxKind::FalseLiteralExpression
                | SyntaxKind::NullLiteralExpression
                | SyntaxKind::StringLiteralExpression
                | SyntaxKind::NumericLiteralExpression
        )
    }

    /// Operator token of a binary expression kind.
    pub fn binary_operator(self) -> Option<SyntaxKind> {
        let op = match self {
            SyntaxKind::EqualsExpression => SyntaxKind::EqualsEqualsToken,
            SyntaxKind::NotEqualsExpression => SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::LogicalAndExpression => SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::LogicalOrExpression => SyntaxKind::BarBarToken,
            SyntaxKind::AddExpression => SyntaxKind::PlusToken,
            SyntaxKind::AsExpression => SyntaxKind::AsKeyword,
            SyntaxKind::IsExpression => SyntaxKind::IsKeyword,
            _ => return None,
        };
        Some(op)
    }

    /// Expressions that never need parentheses as the left side of `.`, `?.` or `!`.
    pub fn is_primary_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::PredefinedType
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::SimpleMemberAccessExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::InvocationExpression
                | SyntaxKind::ConditionalAccessExpression
        ) || self.is_literal_expression()
    }

    /// Members and accessors whose body can be a block or an expression body.
    pub fn is_body_owner(self) -> bool {
        matches!(
            self,
            SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::DestructorDeclaration
                | SyntaxKind::OperatorDeclaration
                | SyntaxKind::ConversionOperatorDeclaration
        ) || self.is_accessor()
    }

    pub fn is_accessor(self) -> bool {
        matches!(
            self,
            SyntaxKind::GetAccessorDeclaration
                | SyntaxKind::SetAccessorDeclaration
                | SyntaxKind::AddAccessorDeclaration
                | SyntaxKind::RemoveAccessorDeclaration
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::IfStatement
        )
    }
}

/// Kind of a trivia fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    MultiLineComment,
    DocumentationComment,
    RegionDirective,
    EndRegionDirective,
    /// Any other preprocessor directive (`#if`, `#pragma`, ...).
    Directive,
    /// Text excluded by a conditional directive.
    DisabledText,
}

impl TriviaKind {
    pub fn is_whitespace_or_end_of_line(self) -> bool {
        matches!(self, TriviaKind::Whitespace | TriviaKind::EndOfLine)
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TriviaKind::SingleLineComment
                | TriviaKind::MultiLineComment
                | TriviaKind::DocumentationComment
        )
    }

    pub fn is_directive(self) -> bool {
        matches!(
            self,
            TriviaKind::RegionDirective
                | TriviaKind::EndRegionDirective
                | TriviaKind::Directive
                | TriviaKind::DisabledText
        )
    }
}
