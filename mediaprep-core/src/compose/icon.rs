use std::path::Path;

use image::{RgbaImage, imageops};

use crate::{
    assets::codec::{load_rgba, save_png},
    foundation::{
        buffer::PixelBuffer,
        error::{MediaprepError, MediaprepResult},
    },
};

/// Geometry of the two-layer profile icon: a hat stacked on top of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IconLayout {
    pub canvas_width: u32,
    /// Size the hat layer is resampled to (Lanczos3).
    pub hat_size: (u32, u32),
    /// Rows the hat extends down over the top of the face.
    pub overlap: u32,
}

impl Default for IconLayout {
    fn default() -> Self {
        Self {
            canvas_width: 48,
            hat_size: (40, 40),
            overlap: 15,
        }
    }
}

impl IconLayout {
    pub fn validate(&self) -> MediaprepResult<()> {
        if self.canvas_width == 0 || self.hat_size.0 == 0 || self.hat_size.1 == 0 {
            return Err(MediaprepError::invalid_argument(
                "icon canvas width and hat size must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Rectangle `(x, y, width, height)`.
pub type BoundingBox = (u32, u32, u32, u32);

/// Smallest rectangle containing every pixel with non-zero alpha.
pub fn content_bbox(buf: &PixelBuffer) -> Option<BoundingBox> {
    let w = buf.width() as usize;
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;

    for (i, px) in buf.pixels().enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = ((i % w) as u32, (i / w) as u32);
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
        any = true;
    }

    any.then(|| (min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1))
}

/// Stack `hat` over `face` and crop the result to its visible content.
///
/// The face is centered horizontally and bottom-aligned; the hat is centered
/// with its bottom edge `overlap` rows below the top of the face.
pub fn compose_icon(
    face: &PixelBuffer,
    hat: &PixelBuffer,
    layout: &IconLayout,
) -> MediaprepResult<PixelBuffer> {
    layout.validate()?;

    let (hat_w, hat_h) = layout.hat_size;
    let hat: RgbaImage = imageops::resize(
        &RgbaImage::from(hat.clone()),
        hat_w,
        hat_h,
        imageops::FilterType::Lanczos3,
    );
    let face: RgbaImage = face.clone().into();

    let canvas_w = layout.canvas_width;
    let canvas_h = (face.height() + hat_h)
        .checked_sub(layout.overlap)
        .filter(|h| *h > 0)
        .ok_or_else(|| {
            MediaprepError::invalid_argument(format!(
                "overlap {} leaves no room for a {}px face under a {}px hat",
                layout.overlap,
                face.height(),
                hat_h
            ))
        })?;

    let mut canvas = RgbaImage::new(canvas_w, canvas_h);

    let face_x = centered(canvas_w, face.width());
    let face_y = i64::from(canvas_h) - i64::from(face.height());
    imageops::overlay(&mut canvas, &face, face_x, face_y);

    let hat_x = centered(canvas_w, hat_w);
    let hat_y = face_y - i64::from(hat_h) + i64::from(layout.overlap);
    imageops::overlay(&mut canvas, &hat, hat_x, hat_y);

    let canvas = PixelBuffer::try_from(canvas)?;
    let Some((x, y, w, h)) = content_bbox(&canvas) else {
        return Ok(canvas);
    };
    let cropped = imageops::crop_imm(&RgbaImage::from(canvas), x, y, w, h).to_image();
    PixelBuffer::try_from(cropped)
}

/// File-level wrapper: both layers must exist before anything is written.
pub fn compose_icon_files(
    face_path: &Path,
    hat_path: &Path,
    out_path: &Path,
    layout: &IconLayout,
) -> MediaprepResult<PixelBuffer> {
    for p in [face_path, hat_path] {
        if !p.is_file() {
            return Err(MediaprepError::not_found(p));
        }
    }

    let face = load_rgba(face_path)?;
    let hat = load_rgba(hat_path)?;
    let icon = compose_icon(&face, &hat, layout)?;
    save_png(&icon, out_path)?;
    tracing::info!(
        width = icon.width(),
        height = icon.height(),
        "saved composite icon to {}",
        out_path.display()
    );
    Ok(icon)
}

fn centered(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/icon.rs"]
mod tests;
