use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use thiserror::Error;

use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::render_image::ports::progress_sink::ProgressSink;
use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer, PixelBufferError};
use crate::core::data::pixel_rect::PixelRect;
use crate::core::fractals::circle::field::FractalColourField;
use crate::core::fractals::circle::params::FractalParameters;

/// Pixels between progress reports at zero iterations. Divided by the
/// iteration count plus one, so costlier pixels report less often.
const PROGRESS_PIXEL_BUDGET: f64 = 1_000_000.0;

/// How the pixel grid is scanned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One row-major pass on the calling thread.
    #[default]
    Sequential,
    /// Rows spread over rayon's work-stealing pool.
    ParallelRows,
}

/// Error type for a render job.
///
/// Cancellation is kept apart from real failures so callers can drop it
/// quietly instead of showing it as an error.
#[derive(Debug, Error)]
pub enum RenderImageError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("pixel buffer error: {0}")]
    PixelBuffer(#[from] PixelBufferError),
}

/// Pixels between progress reports for a given iteration count, never 0.
#[must_use]
pub fn progress_step(number_of_iterations: u32) -> u64 {
    let step = (PROGRESS_PIXEL_BUDGET / (f64::from(number_of_iterations) + 1.0)).round();
    (step as u64).max(1)
}

/// Renders a whole image by evaluating a [`FractalColourField`] at every
/// integer pixel coordinate, reporting progress as it goes.
#[derive(Debug, Clone, Copy)]
pub struct TiledRenderer {
    pixel_rect: PixelRect,
    field: FractalColourField,
    mode: RenderMode,
    progress_step: u64,
}

impl TiledRenderer {
    #[must_use]
    pub fn new(pixel_rect: PixelRect, params: FractalParameters, mode: RenderMode) -> Self {
        Self {
            pixel_rect,
            field: FractalColourField::new(params),
            mode,
            progress_step: progress_step(params.number_of_iterations()),
        }
    }

    #[must_use]
    pub fn pixel_rect(&self) -> PixelRect {
        self.pixel_rect
    }

    #[must_use]
    pub fn progress_step(&self) -> u64 {
        self.progress_step
    }

    /// Scans the full grid and returns the finished buffer.
    ///
    /// Progress values passed to `progress` are strictly increasing and never
    /// exceed the pixel count. `cancel` is polled every
    /// [`CANCEL_CHECK_INTERVAL_PIXELS`] pixels.
    pub fn render<S, C>(&self, progress: &S, cancel: &C) -> Result<PixelBuffer, RenderImageError>
    where
        S: ProgressSink + ?Sized,
        C: CancelToken + ?Sized,
    {
        let data = match self.mode {
            RenderMode::Sequential => self.render_sequential(progress, cancel)?,
            RenderMode::ParallelRows => self.render_parallel_rows(progress, cancel)?,
        };

        Ok(PixelBuffer::from_data(self.pixel_rect, data)?)
    }

    fn render_sequential<S, C>(&self, progress: &S, cancel: &C) -> Result<Vec<u8>, Cancelled>
    where
        S: ProgressSink + ?Sized,
        C: CancelToken + ?Sized,
    {
        let total_pixels = self.pixel_rect.size();
        let width = self.pixel_rect.width() as usize;
        let mut data = vec![0u8; total_pixels as usize * BYTES_PER_PIXEL];

        for y in 0..self.pixel_rect.height() as usize {
            for x in 0..width {
                let index = x + width * y;

                if index % CANCEL_CHECK_INTERVAL_PIXELS == 0 && cancel.is_cancelled() {
                    return Err(Cancelled);
                }

                let colour = self.field.colour_at(x as f64, y as f64);
                let offset = index * BYTES_PER_PIXEL;
                data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&colour.to_array());

                if index as u64 % self.progress_step == 0 {
                    progress.report(index as u64, total_pixels);
                }
            }
        }

        Ok(data)
    }

    fn render_parallel_rows<S, C>(&self, progress: &S, cancel: &C) -> Result<Vec<u8>, Cancelled>
    where
        S: ProgressSink + ?Sized,
        C: CancelToken + ?Sized,
    {
        let total_pixels = self.pixel_rect.size();
        let width = self.pixel_rect.width() as usize;
        let mut data = vec![0u8; total_pixels as usize * BYTES_PER_PIXEL];

        let completed = AtomicU64::new(0);
        let reporter = RowProgress {
            sink: progress,
            step: self.progress_step,
            total_pixels,
            last_reported: Mutex::new(0),
        };
        reporter.sink.report(0, total_pixels);

        data.par_chunks_mut(width * BYTES_PER_PIXEL)
            .enumerate()
            .try_for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                    if x % CANCEL_CHECK_INTERVAL_PIXELS == 0 && cancel.is_cancelled() {
                        return Err(Cancelled);
                    }

                    let colour = self.field.colour_at(x as f64, y as f64);
                    pixel.copy_from_slice(&colour.to_array());
                }

                let done = completed.fetch_add(width as u64, Ordering::AcqRel) + width as u64;
                reporter.row_completed(done);

                Ok(())
            })?;

        Ok(data)
    }
}

/// Serialises progress from concurrently finishing rows so the sink only
/// ever sees increasing counts, at most once per `step` bucket.
struct RowProgress<'a, S: ProgressSink + ?Sized> {
    sink: &'a S,
    step: u64,
    total_pixels: u64,
    last_reported: Mutex<u64>,
}

impl<S: ProgressSink + ?Sized> RowProgress<'_, S> {
    fn row_completed(&self, done: u64) {
        let Ok(mut last) = self.last_reported.lock() else {
            return;
        };

        if done > *last && done / self.step > *last / self.step {
            *last = done;
            self.sink.report(done, self.total_pixels);
        }
    }
}
