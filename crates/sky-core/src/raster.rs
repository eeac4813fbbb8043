//! Raster dimensions and the RGBA frame buffer.
//!
//! [`FrameBuffer`] is the presentation raster every render pass writes into:
//! 8-bit RGBA, row-major, alpha fixed at 255 from allocation onward. Scalers
//! fill it with grayscale, the compositor with color-weighted sums.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dims {
    /// Creates dimensions, rejecting zero sizes and overflowing pixel counts.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                "width and height must be > 0",
            ));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))?;
        Ok(Self { width, height })
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of an RGBA buffer for these dimensions.
    #[inline]
    pub fn rgba_len(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Flat pixel index for `(x, y)`, or an out-of-bounds error.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}

/// An 8-bit RGBA raster with alpha fixed at 255.
///
/// Alpha is set once at allocation and never revisited by any render pass;
/// only the RGB bytes of each pixel are rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    dims: Dims,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a black, fully opaque raster.
    pub fn new(dims: Dims) -> Self {
        let mut data = vec![0u8; dims.rgba_len()];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self { dims, data }
    }

    /// Raster dimensions.
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable RGBA bytes.
    ///
    /// Callers must leave every pixel's alpha byte at 255.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA value of the pixel at flat index `j`.
    #[inline]
    pub fn pixel(&self, j: usize) -> [u8; 4] {
        let o = j * 4;
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Writes the RGB bytes of the pixel at flat index `j`, leaving alpha.
    #[inline]
    pub fn set_rgb(&mut self, j: usize, rgb: [u8; 3]) {
        let o = j * 4;
        self.data[o] = rgb[0];
        self.data[o + 1] = rgb[1];
        self.data[o + 2] = rgb[2];
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel_at(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        let j = self.dims.index(x, y)?;
        Ok(self.pixel(j))
    }

    /// Resets every RGB byte to zero, leaving alpha opaque.
    pub fn clear_rgb(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_rejects_zero() {
        assert!(Dims::new(0, 10).is_err());
        assert!(Dims::new(10, 0).is_err());
        assert!(Dims::new(10, 10).is_ok());
    }

    #[test]
    fn test_dims_counts() {
        let d = Dims::new(4, 3).unwrap();
        assert_eq!(d.pixel_count(), 12);
        assert_eq!(d.rgba_len(), 48);
        assert_eq!(d.index(3, 2).unwrap(), 11);
        assert!(d.index(4, 0).is_err());
    }

    #[test]
    fn test_frame_alpha_opaque() {
        let frame = FrameBuffer::new(Dims::new(2, 2).unwrap());
        for j in 0..4 {
            assert_eq!(frame.pixel(j), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_set_rgb_preserves_alpha() {
        let mut frame = FrameBuffer::new(Dims::new(2, 1).unwrap());
        frame.set_rgb(1, [10, 20, 30]);
        assert_eq!(frame.pixel(1), [10, 20, 30, 255]);
        frame.clear_rgb();
        assert_eq!(frame.pixel(1), [0, 0, 0, 255]);
    }
}
