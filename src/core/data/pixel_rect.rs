use crate::core::data::pixel_buffer::BYTES_PER_PIXEL;
use crate::core::data::point::Point;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelRectError {
    #[error("pixel rect size must be at least 1x1: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("pixel rect {width}x{height} is too large to address in memory")]
    TooLarge { width: u32, height: u32 },
}

/// The pixel grid of one image, anchored at the origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    width: u32,
    height: u32,
}

impl PixelRect {
    pub fn new(width: u32, height: u32) -> Result<Self, PixelRectError> {
        if width < 1 || height < 1 {
            return Err(PixelRectError::InvalidSize { width, height });
        }

        let byte_count = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL));

        if byte_count.is_none() {
            return Err(PixelRectError::TooLarge { width, height });
        }

        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Row-major index of `point`, `x + width * y`.
    #[must_use]
    pub fn index_of(&self, point: Point) -> usize {
        point.x as usize + self.width as usize * point.y as usize
    }

    /// Centre of the grid in pixel units, `(width / 2, height / 2)`.
    #[must_use]
    pub fn centre(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}
