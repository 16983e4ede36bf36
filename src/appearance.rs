// SPDX-License-Identifier: MPL-2.0
//! Display environment and appearance-aware colors.
//!
//! Cards resolve their colors against the current [`Appearance`] and mirror their
//! layout for right-to-left [`LayoutDirection`]s. Hosts report changes of either
//! through [`Environment`].

use iced_core::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Light or dark system appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

/// Writing direction of the host user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    /// Returns whether leading and trailing edges are swapped.
    #[must_use]
    pub fn is_rtl(self) -> bool {
        matches!(self, LayoutDirection::RightToLeft)
    }
}

/// Environment a card is rendered in.
///
/// A change of environment invalidates every cached card layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    pub appearance: Appearance,
    pub direction: LayoutDirection,
}

/// A color with separate light and dark variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicColor {
    pub light: Color,
    pub dark: Color,
}

impl DynamicColor {
    /// Creates a color that differs between light and dark appearance.
    #[must_use]
    pub const fn new(light: Color, dark: Color) -> Self {
        Self { light, dark }
    }

    /// Creates a color that is the same in both appearances.
    #[must_use]
    pub const fn fixed(color: Color) -> Self {
        Self {
            light: color,
            dark: color,
        }
    }

    /// Picks the variant for the given appearance.
    #[must_use]
    pub fn resolve(&self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Light => self.light,
            Appearance::Dark => self.dark,
        }
    }
}

impl From<Color> for DynamicColor {
    fn from(color: Color) -> Self {
        Self::fixed(color)
    }
}

/// Builds a color from hue/saturation/brightness components in `0.0..=1.0`.
#[must_use]
pub fn hsb(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Color {
    let h = (hue.rem_euclid(1.0)) * 6.0;
    let c = brightness * saturation;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = brightness - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::from_rgba(r + m, g + m, b + m, alpha)
}

/// Formats a color as `#RRGGBBAA`.
#[must_use]
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.into_rgba8();
    format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
}

/// Parses `#RRGGBB`, `#RRGGBBAA` and the short `#RGB`/`#RGBA` forms.
#[must_use]
pub fn from_hex(value: &str) -> Option<Color> {
    value.trim().parse::<Color>().ok()
}

// Config files spell a dynamic color either as one hex string or as a
// `{ light, dark }` table.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Fixed(String),
    Dynamic { light: String, dark: String },
}

impl Serialize for DynamicColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = if self.light == self.dark {
            ColorRepr::Fixed(to_hex(self.light))
        } else {
            ColorRepr::Dynamic {
                light: to_hex(self.light),
                dark: to_hex(self.dark),
            }
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DynamicColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parse = |value: &str| {
            from_hex(value)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{value}`")))
        };

        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Fixed(value) => Ok(Self::fixed(parse(&value)?)),
            ColorRepr::Dynamic { light, dark } => Ok(Self::new(parse(&light)?, parse(&dark)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_picks_variant_by_appearance() {
        let color = DynamicColor::new(Color::WHITE, Color::BLACK);
        assert_eq!(color.resolve(Appearance::Light), Color::WHITE);
        assert_eq!(color.resolve(Appearance::Dark), Color::BLACK);
    }

    #[test]
    fn hsb_zero_saturation_is_gray() {
        let gray = hsb(0.0, 0.0, 0.5, 1.0);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert!((gray.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn hsb_pure_red() {
        let red = hsb(0.0, 1.0, 1.0, 1.0);
        assert!((red.r - 1.0).abs() < 1e-6);
        assert!(red.g.abs() < 1e-6);
        assert!(red.b.abs() < 1e-6);
    }

    #[test]
    fn hex_formatting_includes_alpha() {
        assert_eq!(to_hex(Color::from_rgba8(255, 0, 16, 0.5)), "#FF001080");
    }

    #[test]
    fn hex_parsing_accepts_rgb_and_rgba() {
        assert_eq!(from_hex("#ff0000"), Some(Color::from_rgb8(255, 0, 0)));
        assert!(from_hex("#00ff0080").is_some());
        assert!(from_hex("not a color").is_none());
    }

    #[test]
    fn hex_survives_format_and_parse() {
        let opaque = from_hex("#123456").expect("rgb hex");
        assert_eq!(to_hex(opaque), "#123456FF");
        assert_eq!(from_hex(&to_hex(opaque)), Some(opaque));

        let translucent = from_hex(" #12345680 ").expect("rgba hex");
        assert_eq!(to_hex(translucent), "#12345680");
        assert_eq!(from_hex(&to_hex(translucent)), Some(translucent));
    }

    #[test]
    fn rtl_detection() {
        assert!(LayoutDirection::RightToLeft.is_rtl());
        assert!(!LayoutDirection::LeftToRight.is_rtl());
    }
}
