#![forbid(unsafe_code)]

//! regform runtime
//!
//! Ties the core vocabulary and the backend boundary into a working form
//! interaction layer.
//!
//! # Key Components
//!
//! - [`FormProgram`] - host-driven step loop; `init()` is the ready signal
//! - [`FormController`] - the bound handlers for one registration form
//! - [`FormBindings`] - element handles resolved once at bind time
//! - [`ListenerTable`] - ordered `(element, event) -> handler` registrations
//! - [`TaskQueue`] - fire-and-forget deferred work on the backend clock
//! - [`FormConfig`] - every constant the controller applies
//!
//! # How it fits in the system
//! Hosts push [`regform_core::FormEvent`] values into a backend
//! (`regform-web` in a browser), call [`FormProgram::step`], and apply what
//! the presenter emits. The controller itself never touches the backend; it
//! reports alerts and deferred work through [`Effects`].

pub mod config;
pub mod controller;
pub mod listeners;
pub mod program;
pub mod tasks;
pub mod validation;

pub use config::{ConfigError, FormConfig};
pub use controller::{Effects, FormBindings, FormController, SubmitOutcome};
pub use listeners::{Handler, Listener, ListenerTable};
pub use program::{FormProgram, ProgramError, StepResult};
pub use tasks::{Deferred, TaskQueue};
pub use validation::{EmailValidity, PasswordStrength, classify_email, classify_password};
