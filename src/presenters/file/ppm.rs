use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::core::data::pixel_buffer::PixelBuffer;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct PpmFilePresenter;

impl PpmFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FilePresenterPort for PpmFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> Result<(), FilePresenterError> {
        let mut file = BufWriter::new(std::fs::File::create(filepath)?);
        let width = buffer.pixel_rect().width();
        let height = buffer.pixel_rect().height();

        // P6 is binary RGB; alpha is dropped.
        writeln!(file, "P6")?;
        writeln!(file, "{} {}", width, height)?;
        writeln!(file, "255")?;
        file.write_all(&buffer.rgb_bytes())?;
        file.flush()?;

        Ok(())
    }
}
