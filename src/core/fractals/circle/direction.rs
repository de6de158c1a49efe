use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

const SEVEN_FRAC_PI_4: f64 = 7.0 * FRAC_PI_4;

/// One of the four cardinal orientations a circle can face.
///
/// Angles follow image coordinates, so `Down` (a quarter turn from `Right`)
/// points towards increasing `y`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Orientation of the root circle.
    pub const START: Direction = Direction::Right;

    #[must_use]
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::Right,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Up,
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Rotates by `quarter_turns`, wrapping modulo four.
    #[must_use]
    pub fn turned(self, quarter_turns: u8) -> Self {
        Self::from_index((self.index() + quarter_turns % 4) % 4)
    }

    /// Facing angle in radians, `index * π/2`.
    #[must_use]
    pub fn angle(self) -> f64 {
        f64::from(self.index()) * FRAC_PI_2
    }

    /// Exact unit step along the facing angle.
    #[must_use]
    pub fn unit_vector(self) -> (f64, f64) {
        match self {
            Direction::Right => (1.0, 0.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Up => (0.0, -1.0),
        }
    }

    /// Picks the child orientation for an offset `(dx, dy)` from the current
    /// circle's centre towards the query point.
    ///
    /// The offset angle is taken relative to this facing and normalised to
    /// `[0, 2π)`. Thresholds are inclusive: up to π/4 keeps the facing, up to
    /// π turns once, up to 7π/4 turns three times, the rest keeps the facing.
    /// Two quarter turns never happen, so the packing never folds back onto
    /// its parent. A zero offset counts as angle 0.
    #[must_use]
    pub fn towards(self, dx: f64, dy: f64) -> Self {
        let relative = if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            (dy.atan2(dx) - self.angle()).rem_euclid(TAU)
        };

        let quarter_turns = if relative <= FRAC_PI_4 {
            0
        } else if relative <= PI {
            1
        } else if relative <= SEVEN_FRAC_PI_4 {
            3
        } else {
            0
        };

        self.turned(quarter_turns)
    }
}
