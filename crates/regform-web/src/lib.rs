#![forbid(unsafe_code)]

//! `regform-web` provides a host-driven backend for the registration form.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes DOM events as [`FormEvent`]s.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   so the success-message timer fires exactly when the host says it does.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! Rendering produces [`DomPatch`] lists rather than touching a DOM; the
//! `regform-wasm` crate applies them to a live page.

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod patch;

use core::convert::Infallible;
use core::time::Duration;
use std::collections::VecDeque;

use regform_backend::{Backend, BackendClock, BackendEventSource, BackendPresenter};
use regform_core::document::Document;
use regform_core::event::FormEvent;

pub use patch::{DomPatch, Locator, NodeSnapshot, SnapshotMap, diff_document};

/// Web backend error type. Every operation only touches in-memory queues,
/// so none can fail.
pub type WebBackendError = Infallible;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set the current time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance by `dt`, saturating.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-fed FIFO of form events.
#[derive(Debug, Default, Clone)]
pub struct WebEventSource {
    queue: VecDeque<FormEvent>,
}

impl WebEventSource {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Push an event captured by the host.
    pub fn push_event(&mut self, event: FormEvent) {
        self.queue.push_back(event);
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = FormEvent> + '_ {
        self.queue.drain(..)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl BackendEventSource for WebEventSource {
    type Error = WebBackendError;

    fn poll_event(&mut self, _timeout: Duration) -> Result<bool, Self::Error> {
        Ok(!self.queue.is_empty())
    }

    fn read_event(&mut self) -> Result<Option<FormEvent>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Log lines written by the runtime.
    pub logs: Vec<String>,
    /// Alert messages, in the order they were raised.
    pub alerts: Vec<String>,
    /// Patches accumulated since the outputs were last taken.
    pub patches: Vec<DomPatch>,
    /// Number of presents since the outputs were last taken.
    pub present_count: u32,
    /// Whether the last present requested a full repaint.
    pub last_full_repaint_hint: bool,
}

/// Presenter that diffs the document and records patches for the host.
#[derive(Debug, Clone, Default)]
pub struct WebPresenter {
    snapshots: SnapshotMap,
    outputs: WebOutputs,
}

impl WebPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving empty defaults.
    ///
    /// The snapshot of the last present is kept, so the next present is
    /// still incremental.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }
}

impl BackendPresenter for WebPresenter {
    type Error = WebBackendError;

    fn alert(&mut self, message: &str) -> Result<(), Self::Error> {
        self.outputs.alerts.push(message.to_owned());
        Ok(())
    }

    fn write_log(&mut self, text: &str) -> Result<(), Self::Error> {
        self.outputs.logs.push(text.to_owned());
        Ok(())
    }

    fn present(&mut self, doc: &Document, full_repaint_hint: bool) -> Result<(), Self::Error> {
        let (patches, snapshots) = diff_document(&self.snapshots, doc, full_repaint_hint);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "regform.present",
            patches = patches.len(),
            full = full_repaint_hint,
            "present"
        );
        self.snapshots = snapshots;
        self.outputs.patches.extend(patches);
        self.outputs.present_count = self.outputs.present_count.saturating_add(1);
        self.outputs.last_full_repaint_hint = full_repaint_hint;
        Ok(())
    }
}

/// A minimal, host-driven web backend.
///
/// This backend is intended to be driven by a JS host:
/// - push events via [`Self::events_mut`]
/// - advance time via [`Self::clock_mut`]
/// - read patches and alerts via [`Self::presenter_mut`]
#[derive(Debug, Clone, Default)]
pub struct WebBackend {
    clock: DeterministicClock,
    events: WebEventSource,
    presenter: WebPresenter,
}

impl WebBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    /// Mutably access the event source.
    pub fn events_mut(&mut self) -> &mut WebEventSource {
        &mut self.events
    }

    /// Mutably access the presenter.
    pub fn presenter_mut(&mut self) -> &mut WebPresenter {
        &mut self.presenter
    }
}

impl Backend for WebBackend {
    type Error = WebBackendError;

    type Clock = DeterministicClock;
    type Events = WebEventSource;
    type Presenter = WebPresenter;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn events(&mut self) -> &mut Self::Events {
        &mut self.events
    }

    fn presenter(&mut self) -> &mut Self::Presenter {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regform_core::element::{ElementIds, FieldId};

    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now_mono(), Duration::ZERO);

        c.advance(Duration::from_millis(2999));
        assert_eq!(c.now_mono(), Duration::from_millis(2999));

        c.advance(Duration::from_millis(1));
        assert_eq!(c.now_mono(), Duration::from_millis(3000));

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now_mono(), Duration::MAX);
    }

    #[test]
    fn web_event_source_fifo_queue() {
        let mut ev = WebEventSource::new();
        assert_eq!(ev.poll_event(Duration::ZERO).unwrap(), false);

        ev.push_event(FormEvent::Focus(FieldId::Email));
        ev.push_event(FormEvent::Submit);
        assert_eq!(ev.pending(), 2);

        assert_eq!(ev.poll_event(Duration::ZERO).unwrap(), true);
        assert_eq!(ev.read_event().unwrap(), Some(FormEvent::Focus(FieldId::Email)));
        assert_eq!(ev.read_event().unwrap(), Some(FormEvent::Submit));
        assert_eq!(ev.read_event().unwrap(), None);
    }

    #[test]
    fn drain_empties_queue() {
        let mut ev = WebEventSource::new();
        ev.push_event(FormEvent::TogglePassword);
        ev.push_event(FormEvent::Submit);
        let drained: Vec<_> = ev.drain_events().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(ev.pending(), 0);
    }

    #[test]
    fn presenter_captures_logs_alerts_and_patches() {
        let mut p = WebPresenter::new();
        p.write_log("hello").unwrap();
        p.alert("Please fill out all fields.").unwrap();

        let doc = Document::registration_form(&ElementIds::default(), 0);
        p.present(&doc, true).unwrap();

        let outputs = p.take_outputs();
        assert_eq!(outputs.logs, vec!["hello"]);
        assert_eq!(outputs.alerts, vec!["Please fill out all fields."]);
        assert_eq!(outputs.present_count, 1);
        assert_eq!(outputs.last_full_repaint_hint, true);
        assert!(matches!(
            outputs.patches.first(),
            Some(DomPatch::Adopt {
                locator: Locator::Body,
                ..
            })
        ));
    }

    #[test]
    fn presenter_stays_incremental_after_take() {
        let mut p = WebPresenter::new();
        let mut doc = Document::registration_form(&ElementIds::default(), 0);
        p.present(&doc, true).unwrap();
        let _ = p.take_outputs();

        let email = doc.get_element_by_id("email").unwrap();
        doc.node_mut(email).unwrap().value = "a@b.c".into();
        p.present(&doc, false).unwrap();

        let outputs = p.take_outputs();
        assert_eq!(
            outputs.patches,
            vec![DomPatch::SetValue {
                node: email.get(),
                value: "a@b.c".into()
            }]
        );
    }

    #[test]
    fn backend_wires_parts() {
        let mut b = WebBackend::new();
        b.clock_mut().advance(Duration::from_millis(5));
        b.events_mut().push_event(FormEvent::Submit);
        assert_eq!(b.clock().now_mono(), Duration::from_millis(5));
        assert_eq!(b.events().read_event().unwrap(), Some(FormEvent::Submit));
        b.presenter().alert("x").unwrap();
        assert_eq!(b.presenter_mut().outputs().alerts, vec!["x"]);
    }
}
