//! Rule catalog.
//!
//! Every rule recognizes one shape and decides whether rewriting it is safe.
//! Rules are pure: they read the node they are given, its neighbourhood in
//! the snapshot and the symbol facts, and push zero or more [`Proposal`]s.
//! A rule that cannot prove a rewrite safe pushes nothing.
//!
//! # Adding a Rule
//!
//! 1. Add a [`RuleId`] variant and its snake_case name in `types.rs`
//! 2. Implement [`Rule`] in the file for its family (or a new one)
//! 3. Register it in `RuleRegistry::with_defaults`

mod common;
mod comparison;
mod context;
mod declaration;
mod documentation;
mod expression_body;
mod lambda;
mod linq;
mod list;
mod redundant_cast;
mod registry;
mod statement;
mod trivia;
mod types;

pub use comparison::{SimplifyBooleanComparison, UseStringComparison, UseStringLength};
pub use context::RuleContext;
pub use declaration::{AddIdentifierToLocalDeclaration, SplitVariableDeclaration};
pub use documentation::AddParameterToDocumentationComment;
pub use expression_body::UseExpressionBody;
pub use lambda::SimplifyLambdaParameterList;
pub use linq::SimplifyLinqChain;
pub use list::DuplicateArgumentOrParameter;
pub use redundant_cast::{RemoveRedundantAsOperator, RemoveRedundantCast};
pub use registry::{default_registry, RuleRegistry};
pub use statement::{RemoveBraces, SimplifyIfToReturn};
pub use trivia::{RemoveComment, RemoveRegion, UseSpacesInsteadOfTab};
pub use types::{Classification, Highlight, Producer, Proposal, RuleId, Severity};

use crate::syntax::{SyntaxKind, SyntaxNode};

/// A single detection rule.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Node kinds the rule runs on.
    fn kinds(&self) -> &'static [SyntaxKind];

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    /// Inspect `node` and push a proposal for every safe rewrite.
    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>);
}
