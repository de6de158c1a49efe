use std::path::Path;

use thiserror::Error;

use crate::core::data::pixel_buffer::PixelBuffer;

#[derive(Debug, Error)]
pub enum FilePresenterError {
    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("unsupported image file extension: {0:?}")]
    UnsupportedExtension(String),
}

pub trait FilePresenterPort {
    fn present(&self, buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> Result<(), FilePresenterError>;
}
