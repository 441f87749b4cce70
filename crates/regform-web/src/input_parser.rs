#![forbid(unsafe_code)]

//! JSON input parser for converting host-encoded DOM events to
//! [`FormEvent`] values.
//!
//! The page script serializes each DOM event it observes as a small JSON
//! object:
//!
//! ```text
//! {"kind":"submit"}
//! {"kind":"focus","target":"email"}
//! {"kind":"input","target":"email","value":"a@b.c"}
//! {"kind":"change","target":"terms","checked":true}
//! {"kind":"click","target":"togglePassword"}
//! {"kind":"pointerenter","target":"social","index":1}
//! ```
//!
//! Targets are resolved against [`ElementIds`], so a page with custom ids
//! parses with the same configuration it was bound with. Kinds with no
//! [`FormEvent`] mapping return `Ok(None)`.

use regform_core::element::{ElementIds, FieldId, HoverTarget};
use regform_core::event::FormEvent;
use serde::Deserialize;
use thiserror::Error;

/// Target name for social-login buttons in pointer events.
pub const SOCIAL_TARGET: &str = "social";

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The target does not name an element this event kind applies to.
    #[error("unknown target {target:?} for {kind} event")]
    UnknownTarget { kind: &'static str, target: String },
}

/// Internal deserialization target for the page's JSON schema.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    checked: Option<bool>,
    #[serde(default)]
    index: Option<usize>,
}

impl RawInput {
    fn target(&self) -> Result<&str, InputParseError> {
        self.target
            .as_deref()
            .ok_or(InputParseError::MissingField("target"))
    }
}

/// Parse one JSON-encoded DOM event into a [`FormEvent`].
///
/// Returns `Ok(None)` for event kinds that have no `FormEvent` equivalent.
///
/// Returns `Err` for malformed JSON, missing required fields, or targets
/// that do not match the configured element ids.
pub fn parse_encoded_input_to_event(
    json: &str,
    ids: &ElementIds,
) -> Result<Option<FormEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "submit" => Ok(Some(FormEvent::Submit)),
        "focus" => parse_field(&raw, ids, "focus").map(|f| Some(FormEvent::Focus(f))),
        "blur" => parse_field(&raw, ids, "blur").map(|f| Some(FormEvent::Blur(f))),
        "input" => parse_input_event(&raw, ids).map(Some),
        "change" => parse_change_event(&raw, ids).map(Some),
        "click" => parse_click_event(&raw, ids).map(Some),
        "pointerenter" => {
            parse_hover(&raw, ids, "pointerenter").map(|t| Some(FormEvent::PointerEnter(t)))
        }
        "pointerleave" => {
            parse_hover(&raw, ids, "pointerleave").map(|t| Some(FormEvent::PointerLeave(t)))
        }
        // Keyboard, resize, and unknown kinds have no FormEvent mapping.
        _ => Ok(None),
    }
}

fn unknown_target(kind: &'static str, target: &str) -> InputParseError {
    InputParseError::UnknownTarget {
        kind,
        target: target.to_owned(),
    }
}

fn parse_field(
    raw: &RawInput,
    ids: &ElementIds,
    kind: &'static str,
) -> Result<FieldId, InputParseError> {
    let target = raw.target()?;
    ids.field_for(target)
        .ok_or_else(|| unknown_target(kind, target))
}

fn parse_input_event(raw: &RawInput, ids: &ElementIds) -> Result<FormEvent, InputParseError> {
    let field = parse_field(raw, ids, "input")?;
    let value = raw
        .value
        .clone()
        .ok_or(InputParseError::MissingField("value"))?;
    Ok(FormEvent::Input { field, value })
}

fn parse_change_event(raw: &RawInput, ids: &ElementIds) -> Result<FormEvent, InputParseError> {
    let target = raw.target()?;
    if target != ids.terms {
        return Err(unknown_target("change", target));
    }
    let checked = raw.checked.ok_or(InputParseError::MissingField("checked"))?;
    Ok(FormEvent::TermsChanged { checked })
}

fn parse_click_event(raw: &RawInput, ids: &ElementIds) -> Result<FormEvent, InputParseError> {
    let target = raw.target()?;
    if target != ids.password_toggle {
        return Err(unknown_target("click", target));
    }
    Ok(FormEvent::TogglePassword)
}

fn parse_hover(
    raw: &RawInput,
    ids: &ElementIds,
    kind: &'static str,
) -> Result<HoverTarget, InputParseError> {
    let target = raw.target()?;
    if target == ids.submit {
        Ok(HoverTarget::SubmitButton)
    } else if target == SOCIAL_TARGET {
        raw.index
            .map(HoverTarget::Social)
            .ok_or(InputParseError::MissingField("index"))
    } else {
        Err(unknown_target(kind, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<Option<FormEvent>, InputParseError> {
        parse_encoded_input_to_event(json, &ElementIds::default())
    }

    #[test]
    fn parses_every_supported_kind() {
        let cases = [
            (r#"{"kind":"submit"}"#, FormEvent::Submit),
            (
                r#"{"kind":"focus","target":"firstName"}"#,
                FormEvent::Focus(FieldId::FirstName),
            ),
            (
                r#"{"kind":"blur","target":"password"}"#,
                FormEvent::Blur(FieldId::Password),
            ),
            (
                r#"{"kind":"input","target":"email","value":"a@b.c"}"#,
                FormEvent::input(FieldId::Email, "a@b.c"),
            ),
            (
                r#"{"kind":"change","target":"terms","checked":true}"#,
                FormEvent::TermsChanged { checked: true },
            ),
            (
                r#"{"kind":"click","target":"togglePassword"}"#,
                FormEvent::TogglePassword,
            ),
            (
                r#"{"kind":"pointerenter","target":"submitBtn"}"#,
                FormEvent::PointerEnter(HoverTarget::SubmitButton),
            ),
            (
                r#"{"kind":"pointerleave","target":"social","index":2}"#,
                FormEvent::PointerLeave(HoverTarget::Social(2)),
            ),
        ];
        for (json, expected) in cases {
            assert_eq!(parse(json), Ok(Some(expected)), "{json}");
        }
    }

    #[test]
    fn unknown_kind_is_ignored() {
        assert_eq!(parse(r#"{"kind":"keydown","key":"a"}"#), Ok(None));
        assert_eq!(parse(r#"{"kind":"resize"}"#), Ok(None));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse("{not json"), Err(InputParseError::Json(_))));
        assert!(matches!(parse(r#"{"target":"email"}"#), Err(InputParseError::Json(_))));
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(
            parse(r#"{"kind":"focus"}"#),
            Err(InputParseError::MissingField("target"))
        );
        assert_eq!(
            parse(r#"{"kind":"input","target":"email"}"#),
            Err(InputParseError::MissingField("value"))
        );
        assert_eq!(
            parse(r#"{"kind":"change","target":"terms"}"#),
            Err(InputParseError::MissingField("checked"))
        );
        assert_eq!(
            parse(r#"{"kind":"pointerenter","target":"social"}"#),
            Err(InputParseError::MissingField("index"))
        );
    }

    #[test]
    fn targets_follow_configured_ids() {
        let ids = ElementIds {
            email: "mail".into(),
            ..ElementIds::default()
        };
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"focus","target":"mail"}"#, &ids),
            Ok(Some(FormEvent::Focus(FieldId::Email)))
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"focus","target":"email"}"#, &ids),
            Err(InputParseError::UnknownTarget {
                kind: "focus",
                target: "email".into()
            })
        );
    }

    #[test]
    fn wrong_target_for_kind() {
        assert!(matches!(
            parse(r#"{"kind":"click","target":"submitBtn"}"#),
            Err(InputParseError::UnknownTarget { kind: "click", .. })
        ));
        assert!(matches!(
            parse(r#"{"kind":"change","target":"email","checked":true}"#),
            Err(InputParseError::UnknownTarget { kind: "change", .. })
        ));
    }

    #[test]
    fn error_messages_render() {
        assert_eq!(
            InputParseError::MissingField("target").to_string(),
            "missing required field: target"
        );
    }
}
