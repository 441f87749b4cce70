#![forbid(unsafe_code)]

//! Concrete colors and affordances written by the form controller.
//!
//! Two distinct reds coexist on purpose: [`SUBMIT_ERROR`] is the keyword
//! `red` written by submit-time validation (and the only value the generic
//! error clearer reacts to), while [`INVALID`] is the hex red used by live
//! email validation.

use crate::style::{
    Color, Cursor, NamedColor, Opacity, Rgba, Shadow, TextAlign, Transform, Transition,
};

/// Resting input border.
pub const DEFAULT_BORDER: Color = Color::hex(0x4A4A5A);
/// Resting input background.
pub const DEFAULT_BACKGROUND: Color = Color::hex(0x3A3A4D);
/// Focused input background.
pub const ACTIVE_BACKGROUND: Color = Color::hex(0x4A4A5A);
/// Focused input border.
pub const ACTIVE_BORDER: Color = Color::hex(0x8A2BE2);

/// Border of an empty required field after a rejected submit.
pub const SUBMIT_ERROR: Color = Color::Named(NamedColor::Red);

/// Valid email / strong password.
pub const VALID: Color = Color::hex(0x4ADE80);
/// Non-empty email that fails the syntactic check.
pub const INVALID: Color = Color::hex(0xEF4444);
/// Password shorter than the strength threshold.
pub const WEAK: Color = Color::hex(0xFBBF24);
/// Email text color while the field is empty.
pub const NEUTRAL_TEXT: Color = Color::Named(NamedColor::White);

pub const ENABLED_OPACITY: Opacity = Opacity::FULL;
pub const DISABLED_OPACITY: Opacity = Opacity::DIMMED;
pub const ENABLED_CURSOR: Cursor = Cursor::Pointer;
pub const DISABLED_CURSOR: Cursor = Cursor::NotAllowed;

pub const HOVER_TRANSITION: Transition = Transition {
    property: "transform",
    duration_ms: 200,
    easing: "ease",
};

pub const SUBMIT_HOVER_TRANSFORM: Transform = Transform::Scale { percent: 105 };
pub const SUBMIT_REST_TRANSFORM: Transform = Transform::Scale { percent: 100 };
pub const SUBMIT_HOVER_SHADOW: Shadow = Shadow::Drop {
    x_px: 0,
    y_px: 5,
    blur_px: 15,
    color: Rgba::new(138, 43, 226, 40),
};

pub const SOCIAL_HOVER_TRANSFORM: Transform = Transform::TranslateY { px: -2 };
pub const SOCIAL_REST_TRANSFORM: Transform = Transform::TranslateY { px: 0 };
pub const SOCIAL_HOVER_SHADOW: Shadow = Shadow::Drop {
    x_px: 0,
    y_px: 4,
    blur_px: 8,
    color: Rgba::new(0, 0, 0, 30),
};

// Confirmation element.
pub const SUCCESS_CLASS: &str = "success-message";
pub const SUCCESS_COLOR: Color = VALID;
pub const SUCCESS_MARGIN_TOP_PX: u16 = 15;
pub const SUCCESS_FONT_WEIGHT: u16 = 500;
pub const SUCCESS_TEXT_ALIGN: TextAlign = TextAlign::Center;

/// Class toggled on the visibility control while the password is shown.
pub const EYE_SLASH_CLASS: &str = "fa-eye-slash";
