#![forbid(unsafe_code)]

//! Ordered listener table.
//!
//! Several handlers may listen for the same event on the same element (the
//! email field has both the live validator and the generic error clearer).
//! They run in registration order, so later handlers observe earlier writes.

use regform_core::document::NodeId;
use regform_core::event::EventKind;

/// The handler a listener invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    Submit,
    FocusHighlight,
    BlurReset,
    TogglePassword,
    TermsGate,
    EmailLive,
    PasswordStrength,
    ClearSubmitError,
    SubmitHoverEnter,
    SubmitHoverLeave,
    SocialHoverEnter,
    SocialHoverLeave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: NodeId,
    pub kind: EventKind,
    pub handler: Handler,
}

#[derive(Debug, Clone, Default)]
pub struct ListenerTable {
    listeners: Vec<Listener>,
}

impl ListenerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: NodeId, kind: EventKind, handler: Handler) {
        self.listeners.push(Listener {
            target,
            kind,
            handler,
        });
    }

    /// Handlers bound to `(target, kind)`, in registration order.
    pub fn matching(&self, target: NodeId, kind: EventKind) -> impl Iterator<Item = Handler> + '_ {
        self.listeners
            .iter()
            .filter(move |l| l.target == target && l.kind == kind)
            .map(|l| l.handler)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> + '_ {
        self.listeners.iter()
    }
}
