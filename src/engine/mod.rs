//! Candidate dispatch.
//!
//! [`Engine::collect`] walks from the innermost node covering a query span
//! outward, running each rule on the node kinds it subscribes to. A rule
//! stops at the nearest enclosing node where it offers an action that
//! intersects the query. Actions are deduplicated by [`EquivalenceKey`] and
//! stay bound to the snapshot they were collected from:
//! [`Engine::commit`] against any other snapshot fails with
//! [`DispatchError::StaleAction`](crate::error::DispatchError::StaleAction).

mod action;
mod dispatch;

pub use action::{CandidateAction, Diagnostic, EquivalenceKey};
pub use dispatch::{CollectOptions, Engine};
