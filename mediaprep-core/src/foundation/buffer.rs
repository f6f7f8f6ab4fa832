use crate::foundation::{
    core::Rgba8,
    error::{MediaprepError, MediaprepResult},
};

/// Owned RGBA8 pixel grid, row-major with a top-left origin.
///
/// Invariant: `width > 0`, `height > 0` and `data.len() == width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer filled with a single pixel value.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> MediaprepResult<Self> {
        let len = checked_len(width, height, 4)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    /// Wrap raw interleaved bytes with 3 (RGB) or 4 (RGBA) channels per pixel.
    ///
    /// RGB input is widened to RGBA with an opaque alpha channel.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> MediaprepResult<Self> {
        if channels != 3 && channels != 4 {
            return Err(MediaprepError::invalid_argument(format!(
                "expected a 3 or 4 channel buffer, got {channels} channels"
            )));
        }
        let expected = checked_len(width, height, usize::from(channels))?;
        if data.len() != expected {
            return Err(MediaprepError::invalid_argument(format!(
                "buffer length {} does not match {width}x{height}x{channels}",
                data.len()
            )));
        }

        let data = if channels == 4 {
            data
        } else {
            let mut rgba = Vec::with_capacity(expected / 3 * 4);
            for px in data.chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            rgba
        };

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from a slice of pixels in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgba8]) -> MediaprepResult<Self> {
        Self::from_raw(width, height, 4, pixels.concat())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        let px = &self.data[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> MediaprepResult<()> {
        let i = self.offset(x, y).ok_or_else(|| {
            MediaprepError::invalid_argument(format!(
                "pixel ({x}, {y}) is outside {}x{}",
                self.width, self.height
            ))
        })?;
        self.data[i..i + 4].copy_from_slice(&px);
        Ok(())
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    pub(crate) fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(4)
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl TryFrom<image::RgbaImage> for PixelBuffer {
    type Error = MediaprepError;

    fn try_from(img: image::RgbaImage) -> MediaprepResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, 4, img.into_raw())
    }
}

impl From<PixelBuffer> for image::RgbaImage {
    fn from(buf: PixelBuffer) -> Self {
        let (width, height) = buf.dimensions();
        image::RgbaImage::from_raw(width, height, buf.data)
            .expect("pixel buffer length matches width * height * 4")
    }
}

fn checked_len(width: u32, height: u32, channels: usize) -> MediaprepResult<usize> {
    if width == 0 || height == 0 {
        return Err(MediaprepError::invalid_argument(format!(
            "buffer dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            MediaprepError::invalid_argument(format!("buffer {width}x{height} is too large"))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/buffer.rs"]
mod tests;
