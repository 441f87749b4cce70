#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! [`FormConfig`] gathers every constant the controller applies: bound
//! element ids, the social-login marker classes, the fixed user-facing texts,
//! the confirmation dismiss delay, and the strong-password threshold.
//! `FormConfig::default()` reproduces the stock registration page exactly.
//!
//! With the `config` feature the host may supply overrides as JSON or TOML
//! text. Nothing is read from files or the environment.

use core::time::Duration;

#[cfg(feature = "config")]
use serde::Deserialize;
use thiserror::Error;

use regform_core::element::ElementIds;

/// Text of the confirmation element after a successful submit.
pub const DEFAULT_SUCCESS_TEXT: &str = "\u{2713} Account created successfully!";
/// Blocking notification shown when a required field is empty.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Please fill out all fields.";
/// Delay before the confirmation element is removed.
pub const DEFAULT_DISMISS_AFTER_MS: u64 = 3000;
/// Passwords at least this long are reported strong.
pub const DEFAULT_STRONG_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct FormConfig {
    /// DOM ids of the bound elements.
    pub ids: ElementIds,
    /// Any element carrying one of these classes is a social-login button.
    pub social_markers: Vec<String>,
    pub success_text: String,
    pub failure_message: String,
    pub dismiss_after_ms: u64,
    pub strong_password_len: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            ids: ElementIds::default(),
            social_markers: vec!["google-btn".to_owned(), "apple-btn".to_owned()],
            success_text: DEFAULT_SUCCESS_TEXT.to_owned(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_owned(),
            dismiss_after_ms: DEFAULT_DISMISS_AFTER_MS,
            strong_password_len: DEFAULT_STRONG_PASSWORD_LEN,
        }
    }
}

impl FormConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ids(mut self, ids: ElementIds) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn social_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.social_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn success_text(mut self, text: impl Into<String>) -> Self {
        self.success_text = text.into();
        self
    }

    #[must_use]
    pub fn failure_message(mut self, text: impl Into<String>) -> Self {
        self.failure_message = text.into();
        self
    }

    #[must_use]
    pub fn dismiss_after(mut self, delay: Duration) -> Self {
        self.dismiss_after_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn strong_password_len(mut self, len: usize) -> Self {
        self.strong_password_len = len;
        self
    }

    /// Confirmation dismiss delay.
    #[must_use]
    pub const fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    /// Marker classes as borrowed slices, for document queries.
    #[must_use]
    pub fn marker_refs(&self) -> Vec<&str> {
        self.social_markers.iter().map(String::as_str).collect()
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let ids = [
            ("form", &self.ids.form),
            ("first_name", &self.ids.first_name),
            ("last_name", &self.ids.last_name),
            ("email", &self.ids.email),
            ("password", &self.ids.password),
            ("terms", &self.ids.terms),
            ("submit", &self.ids.submit),
            ("password_toggle", &self.ids.password_toggle),
        ];
        for (idx, (name, value)) in ids.iter().enumerate() {
            if value.is_empty() {
                errors.push(format!("ids.{name} must not be empty"));
            } else if ids[..idx].iter().any(|(_, other)| other == value) {
                errors.push(format!("ids.{name} duplicates id {value:?}"));
            }
        }
        if self.social_markers.iter().any(String::is_empty) {
            errors.push("social_markers must not contain empty classes".to_owned());
        }
        if self.dismiss_after_ms == 0 {
            errors.push("dismiss_after_ms must be > 0".to_owned());
        }
        if self.strong_password_len == 0 {
            errors.push("strong_password_len must be > 0".to_owned());
        }
        errors
    }

    /// Load from a JSON string. Missing keys take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Load from a TOML string. Missing keys take their defaults.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Return `self` if [`Self::validate`] reports nothing.
    pub fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
