#![forbid(unsafe_code)]
#![doc = "Backend traits for regform: platform abstraction for events, presentation, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the form runtime and the hosting"]
#![doc = "environment (a browser page via `regform-web`, or a test double)."]

use core::time::Duration;

use regform_core::document::Document;
use regform_core::event::FormEvent;

/// Monotonic clock abstraction.
///
/// The runtime never reads wall-clock time directly; deferred tasks are due
/// relative to this clock.
pub trait BackendClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Event source abstraction.
///
/// This is the input half of the backend boundary. The runtime polls it for
/// canonical [`FormEvent`] values without knowing whether they come from DOM
/// listeners or a scripted test.
pub trait BackendEventSource {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Poll for an available event, returning `true` if one is ready.
    ///
    /// Must not block longer than `timeout`. Returns `Ok(false)` on timeout.
    fn poll_event(&mut self, timeout: Duration) -> Result<bool, Self::Error>;

    /// Read the next available event, or `None` if none is ready.
    fn read_event(&mut self) -> Result<Option<FormEvent>, Self::Error>;
}

/// Presentation abstraction: rendering, blocking notifications, and logs.
pub trait BackendPresenter {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Show a blocking user-facing message (a modal alert on the web).
    fn alert(&mut self, message: &str) -> Result<(), Self::Error>;

    /// Write a diagnostic log line.
    fn write_log(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Present the current document.
    ///
    /// If `full_repaint_hint` is `true`, the backend should emit the whole
    /// document rather than changes since the previous present.
    fn present(&mut self, doc: &Document, full_repaint_hint: bool) -> Result<(), Self::Error>;
}

/// Unified backend combining clock, event source, and presenter.
pub trait Backend {
    /// Platform-specific error type shared across sub-traits.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Clock implementation.
    type Clock: BackendClock;

    /// Event source implementation.
    type Events: BackendEventSource<Error = Self::Error>;

    /// Presenter implementation.
    type Presenter: BackendPresenter<Error = Self::Error>;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Access the event source (mutable for polling/reading).
    fn events(&mut self) -> &mut Self::Events;

    /// Access the presenter (mutable for rendering).
    fn presenter(&mut self) -> &mut Self::Presenter;
}
