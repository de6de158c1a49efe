use std::path::Path;

use image::{ColorType, ImageFormat};

use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::core::data::pixel_buffer::PixelBuffer;

#[derive(Debug, Default, Clone, Copy)]
pub struct PngFilePresenter;

impl PngFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FilePresenterPort for PngFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> Result<(), FilePresenterError> {
        let pixel_rect = buffer.pixel_rect();

        image::save_buffer_with_format(
            filepath,
            buffer.buffer(),
            pixel_rect.width(),
            pixel_rect.height(),
            ColorType::Rgba8,
            ImageFormat::Png,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::pixel_rect::PixelRect;

    #[test]
    fn test_png_decodes_to_same_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let pixel_rect = PixelRect::new(2, 2).unwrap();
        let data = vec![
            0, 0, 0, 255, 128, 0, 0, 255, //
            242, 0, 13, 255, 0, 0, 255, 255,
        ];
        let buffer = PixelBuffer::from_data(pixel_rect, data.clone()).unwrap();

        PngFilePresenter::new().present(&buffer, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), data);
    }
}
