use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CaptionError, CaptionResult};

/// Straight-alpha RGBA8 paint used for caption text.
///
/// Parsed from the strings a color picker produces (`#rrggbb`), plus short hex, an 8-digit
/// form carrying alpha, and a handful of CSS names. The default is opaque white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CaptionColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight, not premultiplied).
    pub a: u8,
}

impl CaptionColor {
    /// Opaque white, the caption color used when the caller has no preference.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with `alpha` in `0.0..=1.0` replacing the current alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Parse a color string, see [`CaptionColor`] for accepted forms.
    pub fn parse(s: &str) -> CaptionResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map_err(|e| CaptionError::validation(format!("{e}: \"{s}\"")));
        }
        named(&s.to_ascii_lowercase())
            .ok_or_else(|| CaptionError::validation(format!("unknown color \"{s}\"")))
    }

    pub(crate) fn to_peniko(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for CaptionColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for CaptionColor {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CaptionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl Serialize for CaptionColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptionColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(hex: &str) -> Result<CaptionColor, String> {
    if !hex.is_ascii() {
        return Err("hex color must be ascii".to_owned());
    }

    fn byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    match hex.len() {
        3 | 4 => {
            let r = nibble(&hex[0..1])?;
            let g = nibble(&hex[1..2])?;
            let b = nibble(&hex[2..3])?;
            let a = if hex.len() == 4 {
                nibble(&hex[3..4])?
            } else {
                255
            };
            Ok(CaptionColor::rgba(r, g, b, a))
        }
        6 | 8 => {
            let r = byte(&hex[0..2])?;
            let g = byte(&hex[2..4])?;
            let b = byte(&hex[4..6])?;
            let a = if hex.len() == 8 { byte(&hex[6..8])? } else { 255 };
            Ok(CaptionColor::rgba(r, g, b, a))
        }
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn named(name: &str) -> Option<CaptionColor> {
    let c = match name {
        "white" => CaptionColor::WHITE,
        "black" => CaptionColor::BLACK,
        "red" => CaptionColor::rgb(255, 0, 0),
        "green" => CaptionColor::rgb(0, 128, 0),
        "lime" => CaptionColor::rgb(0, 255, 0),
        "blue" => CaptionColor::rgb(0, 0, 255),
        "yellow" => CaptionColor::rgb(255, 255, 0),
        "orange" => CaptionColor::rgb(255, 165, 0),
        "grey" | "gray" => CaptionColor::rgb(128, 128, 128),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
