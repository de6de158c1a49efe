use crate::core::data::pixel_rect::PixelRect;
use crate::core::fractals::circle::direction::Direction;
use crate::core::util::distance::distance;
use thiserror::Error;

/// Radius of the root circle, in pixels.
pub const START_RADIUS: f64 = 50.0;

/// Added to the centre-to-corner distance when deriving `maximum_distance`
/// for a whole image.
pub const MAXIMUM_DISTANCE_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FractalParametersError {
    #[error(
        "cut-off and/or maximum distance did not have legal values: cut-off {cut_off}, maximum distance {maximum_distance}"
    )]
    InvalidCutOffOrMaximumDistance { cut_off: f64, maximum_distance: f64 },
    #[error("division factor must be an integer greater than 1: {0}")]
    InvalidDivisionFactor(u32),
    #[error("fractal centre must be finite: ({0}, {1})")]
    NonFiniteCentre(f64, f64),
}

/// Immutable, validated parameters of one circle fractal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParameters {
    centre_x: f64,
    centre_y: f64,
    number_of_iterations: u32,
    maximum_distance: f64,
    division_factor: u32,
    cut_off: f64,
}

impl FractalParameters {
    /// Validates and builds a parameter set.
    ///
    /// Fails when `cut_off < 0`, `maximum_distance < cut_off + 1`,
    /// `division_factor < 2`, or when any of the floating-point inputs is NaN.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn new(
        centre_x: f64,
        centre_y: f64,
        number_of_iterations: u32,
        maximum_distance: f64,
        division_factor: u32,
        cut_off: f64,
    ) -> Result<Self, FractalParametersError> {
        // Written as negated comparisons so that NaN is rejected too.
        if !(cut_off >= 0.0) || !(maximum_distance >= cut_off + 1.0) {
            return Err(FractalParametersError::InvalidCutOffOrMaximumDistance {
                cut_off,
                maximum_distance,
            });
        }

        if division_factor < 2 {
            return Err(FractalParametersError::InvalidDivisionFactor(division_factor));
        }

        if !centre_x.is_finite() || !centre_y.is_finite() {
            return Err(FractalParametersError::NonFiniteCentre(centre_x, centre_y));
        }

        Ok(Self {
            centre_x,
            centre_y,
            number_of_iterations,
            maximum_distance,
            division_factor,
            cut_off,
        })
    }

    /// Parameters for rendering a whole image: the fractal starts at the image
    /// centre and `maximum_distance` reaches just past the corners.
    pub fn for_image(
        pixel_rect: PixelRect,
        number_of_iterations: u32,
        division_factor: u32,
        cut_off: f64,
    ) -> Result<Self, FractalParametersError> {
        let (centre_x, centre_y) = pixel_rect.centre();
        let maximum_distance = distance(0.0, 0.0, centre_x, centre_y) + MAXIMUM_DISTANCE_MARGIN;

        Self::new(
            centre_x,
            centre_y,
            number_of_iterations,
            maximum_distance,
            division_factor,
            cut_off,
        )
    }

    #[must_use]
    pub fn centre_x(&self) -> f64 {
        self.centre_x
    }

    #[must_use]
    pub fn centre_y(&self) -> f64 {
        self.centre_y
    }

    #[must_use]
    pub fn number_of_iterations(&self) -> u32 {
        self.number_of_iterations
    }

    #[must_use]
    pub fn maximum_distance(&self) -> f64 {
        self.maximum_distance
    }

    #[must_use]
    pub fn division_factor(&self) -> u32 {
        self.division_factor
    }

    #[must_use]
    pub fn cut_off(&self) -> f64 {
        self.cut_off
    }

    #[must_use]
    pub fn start_radius(&self) -> f64 {
        START_RADIUS
    }

    #[must_use]
    pub fn start_direction(&self) -> Direction {
        Direction::START
    }
}

/// Number of circles in a packing with `number_of_iterations` generations,
/// `(3^(n+1) - 1) / 2`. `None` when it does not fit in a `u64`.
#[must_use]
pub fn circle_count(number_of_iterations: u32) -> Option<u64> {
    let power = 3u64.checked_pow(number_of_iterations.checked_add(1)?)?;
    Some((power - 1) / 2)
}
