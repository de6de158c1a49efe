pub mod png;
pub mod ppm;

use std::path::Path;

use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::presenters::file::png::PngFilePresenter;
use crate::presenters::file::ppm::PpmFilePresenter;

/// Picks the image encoding from the output file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilePresenter {
    Png,
    Ppm,
}

impl ImageFilePresenter {
    pub fn for_path(filepath: impl AsRef<Path>) -> Result<Self, FilePresenterError> {
        let extension = filepath
            .as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" => Ok(Self::Png),
            "ppm" => Ok(Self::Ppm),
            _ => Err(FilePresenterError::UnsupportedExtension(extension)),
        }
    }
}

impl FilePresenterPort for ImageFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> Result<(), FilePresenterError> {
        match self {
            Self::Png => PngFilePresenter::new().present(buffer, filepath),
            Self::Ppm => PpmFilePresenter::new().present(buffer, filepath),
        }
    }
}
