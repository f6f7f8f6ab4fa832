use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    buffer::PixelBuffer,
    error::{MediaprepError, MediaprepResult},
};

/// Decode any supported image file and convert it to RGBA8.
pub fn load_rgba(path: &Path) -> MediaprepResult<PixelBuffer> {
    if !path.is_file() {
        return Err(MediaprepError::not_found(path));
    }
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    PixelBuffer::try_from(img.to_rgba8())
}

/// Decode encoded image bytes held in memory.
pub fn decode_rgba(bytes: &[u8]) -> MediaprepResult<PixelBuffer> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    PixelBuffer::try_from(img.to_rgba8())
}

/// Encode as PNG, creating the parent directory when needed.
pub fn save_png(buf: &PixelBuffer, path: &Path) -> MediaprepResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        buf.as_raw(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> MediaprepResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
