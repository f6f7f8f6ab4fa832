use std::{fmt, str::FromStr};

use crate::foundation::error::{MediaprepError, MediaprepResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Per-channel brightness threshold in `0..=255`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    /// Accepts any integer and rejects values outside `0..=255`.
    pub fn new(value: i64) -> MediaprepResult<Self> {
        u8::try_from(value).map(Self).map_err(|_| {
            MediaprepError::invalid_argument(format!("threshold {value} is outside 0..=255"))
        })
    }

    pub const fn from_u8(value: u8) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Threshold {
    type Error = MediaprepError;

    fn try_from(value: i64) -> MediaprepResult<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for u8 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque sRGB color used as a solid background substitute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `(r, g, b, 255)`.
    pub const fn opaque(self) -> Rgba8 {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbColor {
    type Err = MediaprepError;

    /// Accepts `#RRGGBB`, `RRGGBB` or `r,g,b`.
    fn from_str(s: &str) -> MediaprepResult<Self> {
        let s = s.trim();
        let bad = || MediaprepError::invalid_argument(format!("invalid color '{s}'"));

        if s.contains(',') {
            let parts = s
                .split(',')
                .map(|p| p.trim().parse::<u8>().map_err(|_| bad()))
                .collect::<MediaprepResult<Vec<u8>>>()?;
            let [r, g, b] = parts[..] else {
                return Err(bad());
            };
            return Ok(Self { r, g, b });
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
