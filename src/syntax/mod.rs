//! Lossless syntax tree model.
//!
//! Trees come from an external parser and are never mutated here. The model
//! has two layers:
//!
//! - `green`: shared, position-independent nodes, tokens and trivia
//! - `tree`: a snapshot that adds offsets and parent links on top
//!
//! Rendering an unmodified tree reproduces its source text exactly.

pub mod ast;
pub mod factory;
mod green;
mod kind;
mod span;
mod tree;

pub use green::{GreenElement, GreenNode, GreenToken, Trivia};
pub use kind::{SyntaxKind, TriviaKind};
pub use span::TextSpan;
pub use tree::{NodeId, SyntaxNode, SyntaxToken, SyntaxTree, TriviaRef};
