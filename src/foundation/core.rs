use std::str::FromStr;

use crate::foundation::error::{MergeError, MergeResult};

pub use kurbo::Point;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight (non-premultiplied) RGBA8 fill color for the output canvas.
///
/// Deserializes from either a packed `0xRRGGBBAA` integer or a string accepted by
/// [`FillColor::from_str`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "FillColorRepr")]
pub struct FillColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl FillColor {
    /// Fully transparent black, the default fill.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Build from explicit channels.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xRRGGBBAA` integer.
    pub fn from_u32(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Pack into `0xRRGGBBAA`.
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Pixel value for `image` buffers.
    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<u32> for FillColor {
    fn from(packed: u32) -> Self {
        Self::from_u32(packed)
    }
}

impl FromStr for FillColor {
    type Err = MergeError;

    /// Accepts `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` (the `#` is optional unless the
    /// value is all decimal digits), `0x`-prefixed packed RGBA and plain decimal packed RGBA.
    fn from_str(s: &str) -> MergeResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MergeError::parse("color must be non-empty"));
        }

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16)
                .map(Self::from_u32)
                .map_err(|e| MergeError::parse(format!("invalid packed color '{s}': {e}")));
        }

        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u32>()
                .map(Self::from_u32)
                .map_err(|e| MergeError::parse(format!("invalid packed color '{s}': {e}")));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        parse_hex(hex).ok_or_else(|| MergeError::parse(format!("invalid color '{s}'")))
    }
}

fn parse_hex(hex: &str) -> Option<FillColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| {
        let n = (hex.as_bytes()[i] as char).to_digit(16)? as u8;
        Some(n << 4 | n)
    };
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(FillColor::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(FillColor::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(FillColor::rgba(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(FillColor::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FillColorRepr {
    Packed(u32),
    Text(String),
}

impl TryFrom<FillColorRepr> for FillColor {
    type Error = MergeError;

    fn try_from(value: FillColorRepr) -> MergeResult<Self> {
        match value {
            FillColorRepr::Packed(v) => Ok(Self::from_u32(v)),
            FillColorRepr::Text(s) => s.parse(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
