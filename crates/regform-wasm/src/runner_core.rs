#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `FormProgram<WebBackend>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use regform_backend::BackendPresenter;
use regform_core::document::{Document, PageSnapshot};
use regform_runtime::{FormConfig, FormProgram, ProgramError, StepResult};
use regform_web::{DomPatch, WebBackend};
use regform_web::input_parser::parse_encoded_input_to_event;

/// Platform-independent registration-form runner.
pub struct RunnerCore {
    inner: FormProgram<WebBackend>,
    /// Patches drained from the presenter but not yet taken by the host.
    pending_patches: Vec<DomPatch>,
    /// Alerts drained from the presenter but not yet taken by the host.
    pending_alerts: Vec<String>,
    /// Log lines drained from the presenter, runner diagnostics included.
    logs: Vec<String>,
}

impl Default for RunnerCore {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerCore {
    /// Create a runner for a page using the default ids and markers.
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Create a runner for a page using the ids and markers in `config`.
    /// The page itself is supplied at [`RunnerCore::init`].
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            inner: FormProgram::new(WebBackend::new(), Document::new(), config),
            pending_patches: Vec::new(),
            pending_alerts: Vec::new(),
            logs: Vec::new(),
        }
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn config(&self) -> &FormConfig {
        self.inner.config()
    }

    /// Mirror `page`, bind the form, and produce the initial patch batch.
    ///
    /// Fails if the runner is already ready or if the page lacks an element
    /// the form needs; the runner then stays unready.
    pub fn init(&mut self, page: &PageSnapshot) -> Result<(), ProgramError> {
        let document = Document::from_snapshot(&self.inner.config().ids, page);
        let bound = self
            .inner
            .load_document(document)
            .and_then(|()| self.inner.init());
        if let Err(err) = bound {
            self.log(format!("runner_init_error: {err}"));
            return Err(err);
        }
        self.drain_outputs();
        Ok(())
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes); ignore it.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let secs = (dt_ms / 1000.0).min(Duration::MAX.as_secs_f64());
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.inner.backend_mut().clock_mut().advance(duration);
    }

    /// Set the deterministic clock to absolute milliseconds.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        let millis = if !ts_ms.is_finite() || ts_ms <= 0.0 {
            0
        } else {
            ts_ms.min(u64::MAX as f64) as u64
        };
        self.inner
            .backend_mut()
            .clock_mut()
            .set(Duration::from_millis(millis));
    }

    /// Parse a JSON-encoded DOM event and push it to the event queue.
    ///
    /// Returns `true` if the event was accepted, `false` if it was
    /// malformed, aimed at an unknown element, or had no mapping.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match parse_encoded_input_to_event(json, &self.inner.config().ids) {
            Ok(Some(event)) => {
                self.inner.backend_mut().events_mut().push_event(event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.log(format!("runner_input_error: {err}"));
                false
            }
        }
    }

    /// Process pending events and due timers.
    pub fn step(&mut self) -> StepResult {
        let result = match self.inner.step() {
            Ok(result) => result,
            Err(err) => {
                self.log(format!("runner_step_error: {err}"));
                return StepResult::default();
            }
        };
        self.drain_outputs();
        result
    }

    /// Take every patch produced since the last call.
    pub fn take_patches(&mut self) -> Vec<DomPatch> {
        self.drain_outputs();
        std::mem::take(&mut self.pending_patches)
    }

    /// Take pending patches as a JSON array.
    pub fn take_patches_json(&mut self) -> String {
        let patches = self.take_patches();
        match serde_json::to_string(&patches) {
            Ok(json) => json,
            Err(err) => {
                self.log(format!("runner_patch_encode_error: {err}"));
                "[]".to_owned()
            }
        }
    }

    /// Take alert messages raised since the last call, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        self.drain_outputs();
        std::mem::take(&mut self.pending_alerts)
    }

    /// Take accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        self.drain_outputs();
        std::mem::take(&mut self.logs)
    }

    /// Number of deferred tasks still waiting on the clock.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks().len()
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn document(&self) -> &Document {
        self.inner.document()
    }

    /// Record a runner diagnostic alongside the presenter's own log lines.
    fn log(&mut self, line: String) {
        let Ok(()) = self.inner.backend_mut().presenter_mut().write_log(&line);
    }

    fn drain_outputs(&mut self) {
        let outputs = self.inner.backend_mut().presenter_mut().take_outputs();
        self.pending_patches.extend(outputs.patches);
        self.pending_alerts.extend(outputs.alerts);
        self.logs.extend(outputs.logs);
    }
}
