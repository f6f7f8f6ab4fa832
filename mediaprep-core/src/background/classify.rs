use crate::foundation::{
    buffer::PixelBuffer,
    core::{RgbColor, Rgba8, Threshold},
};

/// Pixel written for background in transparency mode. Only the zero alpha matters.
pub const TRANSPARENT_SENTINEL: Rgba8 = [255, 255, 255, 0];

/// Near-white test: every RGB channel strictly above the threshold. Alpha is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundRule {
    pub threshold: Threshold,
}

impl BackgroundRule {
    pub const fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn is_background(&self, px: Rgba8) -> bool {
        let t = self.threshold.get();
        px[0] > t && px[1] > t && px[2] > t
    }
}

/// What a selected pixel becomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    Transparent,
    Solid(RgbColor),
}

impl Replacement {
    pub fn pixel(self) -> Rgba8 {
        match self {
            Self::Transparent => TRANSPARENT_SENTINEL,
            Self::Solid(color) => color.opaque(),
        }
    }
}

/// Which side of the rule gets replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Replace near-white pixels, keep the rest.
    #[default]
    Background,
    /// Keep near-white pixels, replace everything else.
    Foreground,
}

/// A complete classify-and-replace configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundOp {
    pub rule: BackgroundRule,
    pub replacement: Replacement,
    #[serde(default)]
    pub selection: Selection,
}

impl BackgroundOp {
    pub fn to_transparent(threshold: Threshold) -> Self {
        Self {
            rule: BackgroundRule::new(threshold),
            replacement: Replacement::Transparent,
            selection: Selection::Background,
        }
    }

    pub fn to_solid(threshold: Threshold, color: RgbColor) -> Self {
        Self {
            rule: BackgroundRule::new(threshold),
            replacement: Replacement::Solid(color),
            selection: Selection::Background,
        }
    }

    /// Light content on a darker backdrop: keep near-white, clear the rest.
    pub fn isolate_light(threshold: Threshold) -> Self {
        Self {
            rule: BackgroundRule::new(threshold),
            replacement: Replacement::Transparent,
            selection: Selection::Foreground,
        }
    }

    #[inline]
    pub fn selects(&self, px: Rgba8) -> bool {
        let bg = self.rule.is_background(px);
        match self.selection {
            Selection::Background => bg,
            Selection::Foreground => !bg,
        }
    }

    /// Output value for a single pixel.
    #[inline]
    pub fn apply(&self, px: Rgba8) -> Rgba8 {
        if self.selects(px) {
            self.replacement.pixel()
        } else {
            px
        }
    }
}

/// Pure transform: a new buffer with every selected pixel replaced.
pub fn replace_background(src: &PixelBuffer, op: &BackgroundOp) -> PixelBuffer {
    let mut out = src.clone();
    replace_background_in_place(&mut out, op);
    out
}

/// In-place variant. Returns the number of replaced pixels.
pub fn replace_background_in_place(buf: &mut PixelBuffer, op: &BackgroundOp) -> usize {
    let target = op.replacement.pixel();
    let mut replaced = 0usize;
    for px in buf.pixels_mut() {
        if op.selects([px[0], px[1], px[2], px[3]]) {
            px.copy_from_slice(&target);
            replaced += 1;
        }
    }
    replaced
}

#[cfg(test)]
#[path = "../../tests/unit/background/classify.rs"]
mod tests;
