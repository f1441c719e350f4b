//! Typed views over [`SyntaxNode`] for the constructs rules inspect.
//!
//! Each view is a checked cast: `Block::cast(node)` returns `None` unless
//! the node has a matching kind. Accessors return `None` for empty slots.

use super::kind::SyntaxKind;
use super::tree::{SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident: $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> $name<'a> {
            pub fn cast(node: SyntaxNode<'a>) -> Option<Self> {
                matches!(node.kind(), $(SyntaxKind::$kind)|+).then_some(Self(node))
            }

            pub fn syntax(&self) -> SyntaxNode<'a> {
                self.0
            }
        }
    };
}

ast_node!(
    /// Method, constructor, destructor, (conversion) operator or accessor.
    ///
    /// All of them end in `body, expression_body, ;`.
    BodyOwner: MethodDeclaration
        | ConstructorDeclaration
        | DestructorDeclaration
        | OperatorDeclaration
        | ConversionOperatorDeclaration
        | GetAccessorDeclaration
        | SetAccessorDeclaration
        | AddAccessorDeclaration
        | RemoveAccessorDeclaration
);

impl<'a> BodyOwner<'a> {
    fn tail(&self, back: usize) -> usize {
        self.0.green().slots().len() - back
    }

    pub fn body_slot(&self) -> usize {
        self.tail(3)
    }

    pub fn expression_body_slot(&self) -> usize {
        self.tail(2)
    }

    pub fn semicolon_slot(&self) -> usize {
        self.tail(1)
    }

    pub fn attribute_lists(&self) -> Vec<SyntaxNode<'a>> {
        self.0.list_nodes(0)
    }

    pub fn body(&self) -> Option<Block<'a>> {
        self.0.child_node(self.body_slot()).and_then(Block::cast)
    }

    pub fn expression_body(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(self.expression_body_slot())
    }

    pub fn semicolon(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(self.semicolon_slot())
    }

    /// Keyword of an accessor (`get`, `set`, ...).
    pub fn accessor_keyword(&self) -> Option<SyntaxToken<'a>> {
        if self.0.kind().is_accessor() {
            self.0.child_token(2)
        } else {
            None
        }
    }
}

ast_node!(
    /// Property or indexer: `accessor_list, expression_body, ;` at the end.
    PropertyLike: PropertyDeclaration | IndexerDeclaration
);

impl<'a> PropertyLike<'a> {
    fn tail(&self, back: usize) -> usize {
        self.0.green().slots().len() - back
    }

    pub fn accessor_list_slot(&self) -> usize {
        self.tail(3)
    }

    pub fn expression_body_slot(&self) -> usize {
        self.tail(2)
    }

    pub fn semicolon_slot(&self) -> usize {
        self.tail(1)
    }

    pub fn accessor_list(&self) -> Option<AccessorList<'a>> {
        self.0
            .child_node(self.accessor_list_slot())
            .and_then(AccessorList::cast)
    }

    pub fn expression_body(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(self.expression_body_slot())
    }
}

ast_node!(AccessorList: AccessorList);

impl<'a> AccessorList<'a> {
    pub fn open_brace(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(0)
    }

    pub fn accessors(&self) -> Vec<BodyOwner<'a>> {
        self.0
            .list_nodes(1)
            .into_iter()
            .filter_map(BodyOwner::cast)
            .collect()
    }

    pub fn close_brace(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(2)
    }
}

ast_node!(Block: Block);

impl<'a> Block<'a> {
    pub fn open_brace(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(0)
    }

    pub fn statements(&self) -> Vec<SyntaxNode<'a>> {
        self.0.list_nodes(1)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(2)
    }
}

ast_node!(ReturnStatement: ReturnStatement);

impl<'a> ReturnStatement<'a> {
    pub fn return_keyword(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(0)
    }

    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(2)
    }
}

ast_node!(ExpressionStatement: ExpressionStatement);

impl<'a> ExpressionStatement<'a> {
    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }
}

ast_node!(IfStatement: IfStatement);

impl<'a> IfStatement<'a> {
    pub fn condition(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(2)
    }

    pub fn statement(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(4)
    }

    pub fn else_clause(&self) -> Option<ElseClause<'a>> {
        self.0.child_node(5).and_then(ElseClause::cast)
    }
}

ast_node!(ElseClause: ElseClause);

impl<'a> ElseClause<'a> {
    pub fn statement(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }
}

ast_node!(
    /// Any binary expression: `left op right`.
    BinaryExpression: EqualsExpression
        | NotEqualsExpression
        | LogicalAndExpression
        | LogicalOrExpression
        | AddExpression
        | AsExpression
        | IsExpression
);

impl<'a> BinaryExpression<'a> {
    pub fn left(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn operator(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(1)
    }

    pub fn right(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(2)
    }
}

ast_node!(LogicalNot: LogicalNotExpression);

impl<'a> LogicalNot<'a> {
    pub fn operand(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }
}

ast_node!(ParenthesizedExpression: ParenthesizedExpression);

impl<'a> ParenthesizedExpression<'a> {
    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }
}

ast_node!(CastExpression: CastExpression);

impl<'a> CastExpression<'a> {
    pub fn open_paren(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(0)
    }

    pub fn type_syntax(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }

    pub fn close_paren(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(2)
    }

    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(3)
    }
}

ast_node!(MemberAccess: SimpleMemberAccessExpression);

impl<'a> MemberAccess<'a> {
    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn name(&self) -> Option<SimpleName<'a>> {
        self.0.child_node(2).and_then(SimpleName::cast)
    }
}

ast_node!(ConditionalAccess: ConditionalAccessExpression);

impl<'a> ConditionalAccess<'a> {
    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn when_not_null(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(2)
    }
}

ast_node!(Invocation: InvocationExpression);

impl<'a> Invocation<'a> {
    pub fn expression(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn argument_list(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(1)
    }

    /// Argument expressions, unwrapped from their `Argument` nodes.
    pub fn arguments(&self) -> Vec<SyntaxNode<'a>> {
        self.argument_list()
            .map(|list| {
                list.list_nodes(1)
                    .into_iter()
                    .filter_map(|a| a.child_node(0))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The callee as `receiver.Name`, if it has that shape.
    pub fn member_access(&self) -> Option<MemberAccess<'a>> {
        self.expression().and_then(MemberAccess::cast)
    }
}

ast_node!(
    /// `Name` or `Name<T>`.
    SimpleName: IdentifierName | GenericName
);

impl<'a> SimpleName<'a> {
    pub fn identifier(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(0)
    }

    pub fn name(&self) -> &'a str {
        self.identifier().map(|t| t.text()).unwrap_or("")
    }

    pub fn type_arguments(&self) -> Vec<SyntaxNode<'a>> {
        self.0
            .child_node(1)
            .map(|list| list.list_nodes(1))
            .unwrap_or_default()
    }
}

ast_node!(VariableDeclaration: VariableDeclaration);

impl<'a> VariableDeclaration<'a> {
    pub fn type_syntax(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn variables(&self) -> Vec<SyntaxNode<'a>> {
        self.0.list_nodes(1)
    }
}

ast_node!(ParenthesizedLambda: ParenthesizedLambdaExpression);

impl<'a> ParenthesizedLambda<'a> {
    pub fn parameter_list(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(0)
    }

    pub fn parameters(&self) -> Vec<Parameter<'a>> {
        self.parameter_list()
            .map(|list| {
                list.list_nodes(1)
                    .into_iter()
                    .filter_map(Parameter::cast)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(2)
    }
}

ast_node!(Parameter: Parameter);

impl<'a> Parameter<'a> {
    pub fn has_attributes(&self) -> bool {
        self.0.child_node(0).is_some()
    }

    pub fn has_modifiers(&self) -> bool {
        self.0.child_node(1).is_some()
    }

    pub fn type_syntax(&self) -> Option<SyntaxNode<'a>> {
        self.0.child_node(2)
    }

    pub fn identifier(&self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(3)
    }
}
