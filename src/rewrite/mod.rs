//! Tree surgery.
//!
//! Rules describe what to change as an [`Edit`]; [`Rewriter::apply`] turns
//! it into a new snapshot. Outer trivia of a replaced node moves onto its
//! replacement, and every produced node is tagged for the formatter. The
//! rewriter never computes indentation on its own.

mod edit;
mod rewriter;
pub mod trivia;

pub use edit::{Change, Edit};
pub use rewriter::Rewriter;
