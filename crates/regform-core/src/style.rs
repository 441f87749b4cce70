#![forbid(unsafe_code)]

//! Typed per-element view-state.
//!
//! Handlers never write CSS text. They update a [`ViewState`], and a separate
//! rendering step turns it into `(property, value)` declarations through
//! [`ViewState::declarations`]. Each value type renders its CSS text via
//! `Display`.
//!
//! Every property is optional: `None` means the element has no inline value
//! for it and the stylesheet decides.

use core::fmt;

/// 24-bit sRGB color, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// CSS color keywords the controller writes verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Red,
    White,
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::White => "white",
        })
    }
}

/// A color value as written to an element.
///
/// Keywords and hex values are distinct even when they render alike:
/// `Named(Red)` is never equal to any `Rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb(Rgb),
    Named(NamedColor),
}

impl Color {
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        Self::Rgb(Rgb::from_hex(hex))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => rgb.fmt(f),
            Self::Named(named) => named.fmt(f),
        }
    }
}

/// sRGB color with an alpha channel stored in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha_pct: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, alpha_pct: u8) -> Self {
        Self { r, g, b, alpha_pct }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f32::from(self.alpha_pct.min(100)) / 100.0
        )
    }
}

/// Element opacity in whole percent (`100` renders as `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opacity(pub u8);

impl Opacity {
    pub const FULL: Self = Self(100);
    pub const DIMMED: Self = Self(50);
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f32::from(self.0.min(100)) / 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Pointer,
    NotAllowed,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pointer => "pointer",
            Self::NotAllowed => "not-allowed",
        })
    }
}

/// 2D transform applied on hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Uniform scale in whole percent (`105` renders as `scale(1.05)`).
    Scale { percent: u16 },
    /// Vertical offset in CSS pixels.
    TranslateY { px: i16 },
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Scale { percent } => write!(f, "scale({})", f32::from(percent) / 100.0),
            Self::TranslateY { px: 0 } => f.write_str("translateY(0)"),
            Self::TranslateY { px } => write!(f, "translateY({px}px)"),
        }
    }
}

/// A single-property CSS transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub property: &'static str,
    pub duration_ms: u32,
    pub easing: &'static str,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Precision loss is irrelevant at animation-duration scale.
        #[allow(clippy::cast_precision_loss)]
        let secs = self.duration_ms as f32 / 1000.0;
        write!(f, "{} {secs}s {}", self.property, self.easing)
    }
}

/// Box shadow; `None` renders as the `none` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shadow {
    None,
    Drop {
        x_px: i16,
        y_px: i16,
        blur_px: u16,
        color: Rgba,
    },
}

fn write_length(f: &mut fmt::Formatter<'_>, px: i32) -> fmt::Result {
    if px == 0 {
        f.write_str("0")
    } else {
        write!(f, "{px}px")
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::None => f.write_str("none"),
            Self::Drop {
                x_px,
                y_px,
                blur_px,
                color,
            } => {
                write_length(f, i32::from(x_px))?;
                f.write_str(" ")?;
                write_length(f, i32::from(y_px))?;
                f.write_str(" ")?;
                write_length(f, i32::from(blur_px))?;
                write!(f, " {color}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

/// Inline visual state of one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewState {
    pub border_color: Option<Color>,
    pub background_color: Option<Color>,
    pub color: Option<Color>,
    pub opacity: Option<Opacity>,
    pub cursor: Option<Cursor>,
    pub transform: Option<Transform>,
    pub transition: Option<Transition>,
    pub box_shadow: Option<Shadow>,
    pub margin_top_px: Option<u16>,
    pub font_weight: Option<u16>,
    pub text_align: Option<TextAlign>,
}

impl ViewState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            border_color: None,
            background_color: None,
            color: None,
            opacity: None,
            cursor: None,
            transform: None,
            transition: None,
            box_shadow: None,
            margin_top_px: None,
            font_weight: None,
            text_align: None,
        }
    }

    /// Whether any inline property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// CSS declarations for every set property, in a fixed order.
    #[must_use]
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        fn push<T: fmt::Display>(
            out: &mut Vec<(&'static str, String)>,
            name: &'static str,
            value: Option<T>,
        ) {
            if let Some(value) = value {
                out.push((name, value.to_string()));
            }
        }

        let mut out = Vec::new();
        push(&mut out, "border-color", self.border_color);
        push(&mut out, "background-color", self.background_color);
        push(&mut out, "color", self.color);
        push(&mut out, "opacity", self.opacity);
        push(&mut out, "cursor", self.cursor);
        push(&mut out, "transform", self.transform);
        push(&mut out, "transition", self.transition);
        push(&mut out, "box-shadow", self.box_shadow);
        push(&mut out, "margin-top", self.margin_top_px.map(|px| format!("{px}px")));
        push(&mut out, "font-weight", self.font_weight);
        push(&mut out, "text-align", self.text_align);
        out
    }
}

/// Every property name [`ViewState::declarations`] can emit.
pub const PROPERTIES: [&str; 11] = [
    "border-color",
    "background-color",
    "color",
    "opacity",
    "cursor",
    "transform",
    "transition",
    "box-shadow",
    "margin-top",
    "font-weight",
    "text-align",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_colors_render_lowercase() {
        assert_eq!(Color::hex(0x4A4A5A).to_string(), "#4a4a5a");
        assert_eq!(Rgb::new(0, 1, 255).to_string(), "#0001ff");
    }

    #[test]
    fn keyword_red_is_distinct_from_hex_red() {
        let keyword = Color::Named(NamedColor::Red);
        assert_eq!(keyword.to_string(), "red");
        assert_ne!(keyword, Color::hex(0xFF0000));
        assert_ne!(keyword, Color::hex(0xEF4444));
    }

    #[test]
    fn numeric_values_render_like_css() {
        assert_eq!(Opacity::FULL.to_string(), "1");
        assert_eq!(Opacity::DIMMED.to_string(), "0.5");
        assert_eq!(Transform::Scale { percent: 105 }.to_string(), "scale(1.05)");
        assert_eq!(Transform::Scale { percent: 100 }.to_string(), "scale(1)");
        assert_eq!(Transform::TranslateY { px: -2 }.to_string(), "translateY(-2px)");
        assert_eq!(Transform::TranslateY { px: 0 }.to_string(), "translateY(0)");
        let transition = Transition {
            property: "transform",
            duration_ms: 200,
            easing: "ease",
        };
        assert_eq!(transition.to_string(), "transform 0.2s ease");
    }

    #[test]
    fn shadows_render_offsets_and_alpha() {
        let shadow = Shadow::Drop {
            x_px: 0,
            y_px: 5,
            blur_px: 15,
            color: Rgba::new(138, 43, 226, 40),
        };
        assert_eq!(shadow.to_string(), "0 5px 15px rgba(138, 43, 226, 0.4)");
        assert_eq!(Shadow::None.to_string(), "none");
    }

    #[test]
    fn declarations_skip_unset_properties() {
        let mut view = ViewState::new();
        assert!(view.is_empty());
        assert!(view.declarations().is_empty());

        view.border_color = Some(Color::Named(NamedColor::Red));
        view.margin_top_px = Some(15);
        assert_eq!(
            view.declarations(),
            vec![
                ("border-color", "red".to_owned()),
                ("margin-top", "15px".to_owned()),
            ]
        );
        assert!(!view.is_empty());
    }

    #[test]
    fn declaration_names_are_known_properties() {
        let view = ViewState {
            border_color: Some(Color::hex(0)),
            background_color: Some(Color::hex(0)),
            color: Some(Color::hex(0)),
            opacity: Some(Opacity::FULL),
            cursor: Some(Cursor::Pointer),
            transform: Some(Transform::Scale { percent: 100 }),
            transition: Some(Transition {
                property: "transform",
                duration_ms: 1,
                easing: "ease",
            }),
            box_shadow: Some(Shadow::None),
            margin_top_px: Some(0),
            font_weight: Some(500),
            text_align: Some(TextAlign::Center),
        };
        let names: Vec<_> = view.declarations().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, PROPERTIES.to_vec());
    }
}
