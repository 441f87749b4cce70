#![forbid(unsafe_code)]

//! Canonical form events.
//!
//! Hosts translate DOM events into [`FormEvent`] values and push them into a
//! backend event source. All events derive `Clone`, `PartialEq`, and `Eq`
//! for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - `Input` carries the field's new value; the runtime writes it into the
//!   document before any listener runs, mirroring the DOM's default action.
//! - `TermsChanged` likewise carries the checkbox's new state.
//! - There is no "ready" event: readiness is the explicit
//!   `FormProgram::init` call.

use crate::element::{FieldId, HoverTarget};

/// Canonical form event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The form was submitted.
    Submit,

    /// A required field gained focus.
    Focus(FieldId),

    /// A required field lost focus.
    Blur(FieldId),

    /// A required field's text changed.
    Input {
        /// Field being edited.
        field: FieldId,
        /// Full new value (not a delta).
        value: String,
    },

    /// The terms checkbox changed state.
    TermsChanged {
        /// New checked state.
        checked: bool,
    },

    /// The password-visibility control was clicked.
    TogglePassword,

    /// The pointer entered a hoverable element.
    PointerEnter(HoverTarget),

    /// The pointer left a hoverable element.
    PointerLeave(HoverTarget),
}

impl FormEvent {
    /// Build an input event.
    #[must_use]
    pub fn input(field: FieldId, value: impl Into<String>) -> Self {
        Self::Input {
            field,
            value: value.into(),
        }
    }

    /// The listener kind this event dispatches to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Submit => EventKind::Submit,
            Self::Focus(_) => EventKind::Focus,
            Self::Blur(_) => EventKind::Blur,
            Self::Input { .. } => EventKind::Input,
            Self::TermsChanged { .. } => EventKind::Change,
            Self::TogglePassword => EventKind::Click,
            Self::PointerEnter(_) => EventKind::PointerEnter,
            Self::PointerLeave(_) => EventKind::PointerLeave,
        }
    }
}

/// DOM event type a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    Focus,
    Blur,
    Input,
    Change,
    Click,
    PointerEnter,
    PointerLeave,
}

impl EventKind {
    /// DOM event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Input => "input",
            Self::Change => "change",
            Self::Click => "click",
            Self::PointerEnter => "mouseover",
            Self::PointerLeave => "mouseout",
        }
    }
}
