#![forbid(unsafe_code)]

//! Host-driven step loop.
//!
//! [`FormProgram`] owns the backend, the document, the bound controller, and
//! the deferred-task queue. It never blocks: each [`FormProgram::step`]
//! drains whatever events the host has queued, runs tasks that are due on
//! the backend clock, and presents if anything changed.
//!
//! Tasks already due run before the queued events so that an event never
//! observes state a past deadline should have cleared. A second pass after
//! the events picks up anything scheduled with zero delay.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► init() ──► step() ──► step() ...
//!            │
//!            └─ binds elements, registers listeners, initial terms check
//! ```
//!
//! `init()` is the ready signal; stepping before it is an error.

use core::time::Duration;

use thiserror::Error;

use regform_backend::{Backend, BackendClock, BackendEventSource, BackendPresenter};
use regform_core::document::Document;
use regform_core::error::BindError;
use regform_core::event::FormEvent;

use crate::config::FormConfig;
use crate::controller::{Effects, FormController, SubmitOutcome};
use crate::tasks::TaskQueue;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("bind failed: {0}")]
    Bind(#[from] BindError),
    #[error("program not initialized; call init() once the document is ready")]
    NotReady,
    #[error("program already initialized")]
    AlreadyInitialized,
    #[error("backend error: {0}")]
    Backend(String),
}

fn backend_err(err: impl core::fmt::Display) -> ProgramError {
    ProgramError::Backend(err.to_string())
}

/// Outcome of one [`FormProgram::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    pub events_processed: usize,
    pub tasks_run: usize,
    pub rendered: bool,
    /// Whether any processed event had its native default suppressed.
    pub default_prevented: bool,
    /// Outcome of the last submit processed in this step.
    pub last_submit: Option<SubmitOutcome>,
}

pub struct FormProgram<B: Backend> {
    backend: B,
    document: Document,
    config: FormConfig,
    controller: Option<FormController>,
    tasks: TaskQueue,
}

impl<B: Backend> FormProgram<B> {
    #[must_use]
    pub fn new(backend: B, document: Document, config: FormConfig) -> Self {
        Self {
            backend,
            document,
            config,
            controller: None,
            tasks: TaskQueue::new(),
        }
    }

    /// Replace the document before the ready signal, for hosts that only
    /// know their page once it has loaded.
    pub fn load_document(&mut self, document: Document) -> Result<(), ProgramError> {
        if self.controller.is_some() {
            return Err(ProgramError::AlreadyInitialized);
        }
        self.document = document;
        Ok(())
    }

    /// The ready signal: bind the document and present it once in full.
    pub fn init(&mut self) -> Result<(), ProgramError> {
        if self.controller.is_some() {
            return Err(ProgramError::AlreadyInitialized);
        }
        let controller = FormController::bind(&mut self.document, self.config.clone())?;
        self.controller = Some(controller);
        self.backend
            .presenter()
            .present(&self.document, true)
            .map_err(backend_err)?;
        Ok(())
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.controller.is_some()
    }

    /// Run overdue tasks, drain queued events, run tasks that became due, and
    /// present if anything changed.
    pub fn step(&mut self) -> Result<StepResult, ProgramError> {
        if self.controller.is_none() {
            return Err(ProgramError::NotReady);
        }
        let overdue = self.run_due_tasks();
        let mut result = StepResult {
            tasks_run: overdue,
            ..StepResult::default()
        };
        let mut changed = overdue > 0;

        while self
            .backend
            .events()
            .poll_event(Duration::ZERO)
            .map_err(backend_err)?
        {
            let Some(event) = self.backend.events().read_event().map_err(backend_err)? else {
                break;
            };
            let fx = self.dispatch(&event)?;
            result.events_processed += 1;
            result.default_prevented |= fx.default_prevented;
            if fx.submit.is_some() {
                result.last_submit = fx.submit;
            }
            changed = true;
        }

        let late = self.run_due_tasks();
        result.tasks_run += late;
        changed |= late > 0;

        if changed {
            self.backend
                .presenter()
                .present(&self.document, false)
                .map_err(backend_err)?;
            result.rendered = true;
        }
        Ok(result)
    }

    /// Dispatch one event immediately, bypassing the backend queue.
    ///
    /// Alerts go straight to the presenter and deferred work is queued; the
    /// document is not presented.
    pub fn dispatch(&mut self, event: &FormEvent) -> Result<Effects, ProgramError> {
        let controller = self.controller.as_ref().ok_or(ProgramError::NotReady)?;
        let mut fx = Effects::new();
        controller.dispatch(&mut self.document, event, &mut fx);

        let now = self.backend.clock().now_mono();
        for &(delay, task) in &fx.deferred {
            self.tasks.schedule(now, delay, task);
        }
        for message in &fx.alerts {
            self.backend.presenter().alert(message).map_err(backend_err)?;
        }
        Ok(fx)
    }

    /// Run every deferred task due on the backend clock.
    pub fn run_due_tasks(&mut self) -> usize {
        let now = self.backend.clock().now_mono();
        let due = self.tasks.take_due(now);
        for &task in &due {
            FormController::run_deferred(&mut self.document, task);
        }
        due.len()
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn controller(&self) -> Option<&FormController> {
        self.controller.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub const fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
