#![forbid(unsafe_code)]

//! Binding errors.
//!
//! Every handler depends on its target element, so a missing or mismatched
//! element is reported at bind time instead of being skipped.

use thiserror::Error;

use crate::document::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No connected element carries the identifier.
    #[error("required element #{id} not found")]
    MissingElement { id: String },

    /// The element exists but is not the kind the binding needs.
    #[error("element #{id} is <{found}>, expected {expected}")]
    WrongKind {
        id: String,
        expected: &'static str,
        found: Tag,
    },
}
