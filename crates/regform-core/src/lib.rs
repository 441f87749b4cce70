#![forbid(unsafe_code)]

//! Core vocabulary for the regform interaction layer.
//!
//! # Role in regform
//! `regform-core` is the shared language between the runtime, the backends,
//! and the host. It has no notion of time, scheduling, or I/O.
//!
//! # This crate provides
//! - [`element`]: identifiers for the bound elements ([`FieldId`], [`ElementIds`]).
//! - [`event`]: the canonical [`FormEvent`] values hosts push in.
//! - [`style`]: typed per-element [`ViewState`] that replaces raw style writes.
//! - [`palette`]: the concrete colors and affordances handlers apply.
//! - [`document`]: a DOM-like arena tree the controller reads and mutates,
//!   built either for the stock page or from a [`PageSnapshot`] of a live one.
//! - [`error`]: fail-fast binding errors.

pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod palette;
pub mod style;

pub use document::{
    Document, DocumentBuilder, InputType, MAX_NODES, Node, NodeId, PageElement, PageSnapshot, Tag,
    create_success_message,
};
pub use element::{ElementIds, FieldId, HoverTarget};
pub use error::BindError;
pub use event::{EventKind, FormEvent};
pub use style::{
    Color, Cursor, NamedColor, Opacity, Rgb, Rgba, Shadow, TextAlign, Transform, Transition,
    ViewState,
};
