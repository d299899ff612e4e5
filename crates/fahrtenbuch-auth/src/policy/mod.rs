//! Tenant policy engine.
//!
//! - [`context`] describes what a decision is made about
//! - [`engine`] evaluates the precedence rules
//!
//! The engine performs no I/O. Callers gather [`AccessFacts`] first; see the
//! [`access`](crate::access) checkers.

pub mod context;
pub mod engine;

pub use context::{AccessFacts, GrantClass, Operation, ResourceDescriptor, ResourceKind};
pub use engine::{AccessDecision, DenyReason, authorize, decide};
