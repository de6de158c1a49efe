//! Messages exchanged between a coordinator and its workers.
//!
//! Every message is a JSON object with a `type` tag. Requests flow to the
//! worker, responses flow back, and both carry the [`WorkerId`] of the job.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::actions::render_image::tiled_renderer::RenderMode;
use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
use crate::core::fractals::circle::params::{FractalParameters, FractalParametersError};
use crate::protocol::worker_id::WorkerId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerRequest {
    #[serde(rename = "DRAW_IMAGE")]
    DrawImage(DrawImageRequest),
}

impl WorkerRequest {
    #[must_use]
    pub fn worker_id(&self) -> WorkerId {
        match self {
            Self::DrawImage(request) => request.worker_id(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerResponse {
    #[serde(rename = "PROGRESS")]
    Progress(ProgressUpdate),
    #[serde(rename = "DRAWING_RESULT")]
    DrawingResult(RenderResult),
}

impl WorkerResponse {
    #[must_use]
    pub fn worker_id(&self) -> WorkerId {
        match self {
            Self::Progress(update) => update.worker_id,
            Self::DrawingResult(result) => result.worker_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawImageRequestError {
    #[error("width and height were not legal: {0}")]
    InvalidSize(#[from] PixelRectError),
    #[error(transparent)]
    InvalidParameters(#[from] FractalParametersError),
}

/// A validated request to render one whole image.
///
/// Construction derives the fractal parameters for the image, so a request
/// that exists is one a worker can render.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "DrawImageFields", into = "DrawImageFields")]
pub struct DrawImageRequest {
    worker_id: WorkerId,
    pixel_rect: PixelRect,
    params: FractalParameters,
    mode: RenderMode,
}

impl DrawImageRequest {
    pub fn new(
        worker_id: WorkerId,
        width: u32,
        height: u32,
        number_of_iterations: u32,
        division_factor: u32,
        cut_off: f64,
    ) -> Result<Self, DrawImageRequestError> {
        let pixel_rect = PixelRect::new(width, height)?;
        let params =
            FractalParameters::for_image(pixel_rect, number_of_iterations, division_factor, cut_off)?;

        Ok(Self {
            worker_id,
            pixel_rect,
            params,
            mode: RenderMode::default(),
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    #[must_use]
    pub fn pixel_rect(&self) -> PixelRect {
        self.pixel_rect
    }

    #[must_use]
    pub fn params(&self) -> &FractalParameters {
        &self.params
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

/// Wire form of [`DrawImageRequest`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrawImageFields {
    worker_id: WorkerId,
    width: u32,
    height: u32,
    number_of_iterations: u32,
    division_factor: u32,
    cut_off: f64,
    #[serde(default)]
    parallel: bool,
}

impl TryFrom<DrawImageFields> for DrawImageRequest {
    type Error = DrawImageRequestError;

    fn try_from(fields: DrawImageFields) -> Result<Self, Self::Error> {
        let mode = if fields.parallel {
            RenderMode::ParallelRows
        } else {
            RenderMode::Sequential
        };

        Ok(Self::new(
            fields.worker_id,
            fields.width,
            fields.height,
            fields.number_of_iterations,
            fields.division_factor,
            fields.cut_off,
        )?
        .with_mode(mode))
    }
}

impl From<DrawImageRequest> for DrawImageFields {
    fn from(request: DrawImageRequest) -> Self {
        Self {
            worker_id: request.worker_id,
            width: request.pixel_rect.width(),
            height: request.pixel_rect.height(),
            number_of_iterations: request.params.number_of_iterations(),
            division_factor: request.params.division_factor(),
            cut_off: request.params.cut_off(),
            parallel: request.mode == RenderMode::ParallelRows,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub worker_id: WorkerId,
    pub pixels_so_far: u64,
    pub total_pixels: u64,
}

impl ProgressUpdate {
    /// Completion as a whole percentage, rounded to nearest.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total_pixels == 0 {
            return 100;
        }

        (100.0 * self.pixels_so_far as f64 / self.total_pixels as f64).round() as u32
    }
}

/// The finished image of one job, RGBA bytes in row-major order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub worker_id: WorkerId,
    pub width: u32,
    pub height: u32,
    pub pixel_buffer: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderResultError {
    #[error("result has illegal size: {0}")]
    InvalidSize(#[from] PixelRectError),
    #[error(transparent)]
    PixelBuffer(#[from] PixelBufferError),
}

impl RenderResult {
    #[must_use]
    pub fn from_buffer(worker_id: WorkerId, buffer: PixelBuffer) -> Self {
        let pixel_rect = buffer.pixel_rect();

        Self {
            worker_id,
            width: pixel_rect.width(),
            height: pixel_rect.height(),
            pixel_buffer: buffer.into_data(),
        }
    }

    /// Checks the byte count against the dimensions and hands the image over.
    pub fn into_pixel_buffer(self) -> Result<PixelBuffer, RenderResultError> {
        let pixel_rect = PixelRect::new(self.width, self.height)?;

        Ok(PixelBuffer::from_data(pixel_rect, self.pixel_buffer)?)
    }
}
