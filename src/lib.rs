//! Shapefix - syntax-tree refactoring engine.
//!
//! Shapefix finds code that can be written in a simpler shape and rewrites
//! it without losing a byte of formatting: a redundant cast, a block body
//! that could be an expression body, a `Where(..).Any()` chain, an
//! `if` that only returns a boolean. Each rule proposes a candidate action
//! for a query span; committing the action produces a new tree snapshot.
//!
//! # Architecture
//!
//! - `syntax`: Lossless green/red tree, spans and trivia
//! - `semantic`: Symbol facts the rules query but never compute
//! - `rules`: Rule catalog, keyed by the node kinds each rule subscribes to
//! - `rewrite`: Edits and the rewriter that applies them to a snapshot
//! - `engine`: Collect, select and commit candidate actions
//! - `config`: YAML rule settings
//! - `report`: Output formatting (text, JSON)
//!
//! # Example
//!
//! ```
//! use shapefix::syntax::{factory as f, SyntaxKind, SyntaxTree, TextSpan};
//! use shapefix::{Engine, FactTable, Settings, TypeSymbol};
//!
//! let tree = SyntaxTree::new(f::binary(
//!     SyntaxKind::AsExpression,
//!     f::identifier_name("s"),
//!     f::predefined_type("string"),
//! ));
//! let facts = FactTable::new()
//!     .with_type("s", TypeSymbol::string())
//!     .with_type("string", TypeSymbol::string());
//!
//! let engine = Engine::new(Settings::default());
//! let actions = engine.collect(&tree, &facts, TextSpan::empty(2)).unwrap();
//! let rewritten = engine.commit(&tree, &actions[0]).unwrap();
//! assert_eq!(rewritten.render(), "s");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod rewrite;
pub mod rules;
pub mod semantic;
pub mod syntax;

pub use config::{GeneratedCode, Settings};
pub use engine::{CandidateAction, CollectOptions, Diagnostic, Engine, EquivalenceKey};
pub use error::{DispatchError, RewriteError};
pub use rewrite::{Edit, Rewriter};
pub use rules::{default_registry, Rule, RuleContext, RuleId, RuleRegistry, Severity};
pub use semantic::{FactTable, Symbol, SymbolFacts, TypeSymbol};
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxTree, TextSpan};
