use std::{collections::HashMap, fmt, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    buffer::PixelBuffer,
    core::Rgba8,
    error::{MediaprepError, MediaprepResult},
};

/// Palette size above which color counting gives up.
pub const MAX_COUNTED_COLORS: usize = 256;
pub const TOP_COLORS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ColorCount {
    pub count: usize,
    pub rgba: Rgba8,
}

/// Pixels sampled after RGBA conversion.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PixelSamples {
    /// Top-left, top-right, bottom-left, bottom-right.
    pub corners: [Rgba8; 4],
    pub center: Rgba8,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ImageReport {
    pub file_name: String,
    pub format: Option<String>,
    pub color_type: String,
    pub width: u32,
    pub height: u32,
    pub samples: PixelSamples,
    /// `None` when the image has more than [`MAX_COUNTED_COLORS`] colors.
    pub top_colors: Option<Vec<ColorCount>>,
}

pub fn inspect_file(path: &Path) -> MediaprepResult<ImageReport> {
    if !path.is_file() {
        return Err(MediaprepError::not_found(path));
    }

    let reader = image::ImageReader::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("sniff image format '{}'", path.display()))?;
    let format = reader.format().map(|f| format!("{f:?}").to_uppercase());
    let img = reader
        .decode()
        .with_context(|| format!("decode image '{}'", path.display()))?;
    let color_type = format!("{:?}", img.color());
    let buf = PixelBuffer::try_from(img.to_rgba8())?;

    Ok(ImageReport {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        format,
        color_type,
        width: buf.width(),
        height: buf.height(),
        samples: sample_pixels(&buf),
        top_colors: top_colors(&buf, TOP_COLORS),
    })
}

pub fn sample_pixels(buf: &PixelBuffer) -> PixelSamples {
    let (w, h) = buf.dimensions();
    let at = |x: u32, y: u32| buf.pixel(x, y).unwrap_or_default();
    PixelSamples {
        corners: [at(0, 0), at(w - 1, 0), at(0, h - 1), at(w - 1, h - 1)],
        center: at(w / 2, h / 2),
    }
}

/// Most frequent colors, or `None` past [`MAX_COUNTED_COLORS`] distinct values.
///
/// Ties are broken by ascending channel values.
pub fn top_colors(buf: &PixelBuffer, n: usize) -> Option<Vec<ColorCount>> {
    let mut counts: HashMap<Rgba8, usize> = HashMap::new();
    for px in buf.pixels() {
        *counts.entry(px).or_default() += 1;
        if counts.len() > MAX_COUNTED_COLORS {
            return None;
        }
    }

    let mut colors: Vec<ColorCount> = counts
        .into_iter()
        .map(|(rgba, count)| ColorCount { count, rgba })
        .collect();
    colors.sort_by(|a, b| b.count.cmp(&a.count).then(a.rgba.cmp(&b.rgba)));
    colors.truncate(n);
    Some(colors)
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.file_name)?;
        writeln!(f, "Size: {}x{}", self.width, self.height)?;
        writeln!(f, "Mode: {}", self.color_type)?;
        writeln!(f, "Format: {}", self.format.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "Corners: {:?}", self.samples.corners)?;
        writeln!(f, "Center: {:?}", self.samples.center)?;
        match &self.top_colors {
            Some(colors) => {
                let shown: Vec<String> = colors
                    .iter()
                    .map(|c| format!("{} x {:?}", c.count, c.rgba))
                    .collect();
                write!(f, "Top {} colors: {}", colors.len(), shown.join(", "))
            }
            None => write!(f, "More than {MAX_COUNTED_COLORS} colors"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/inspect/report.rs"]
mod tests;
