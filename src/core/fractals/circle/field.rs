use crate::core::data::colour::Colour;
use crate::core::fractals::circle::direction::Direction;
use crate::core::fractals::circle::params::{FractalParameters, START_RADIUS, circle_count};
use crate::core::util::distance::distance;

/// Below this the cut-off band is treated as absent and the black-to-red
/// stage is skipped.
const CUT_OFF_EPSILON: f64 = 0.00001;

/// One circle of the packing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub centre_x: f64,
    pub centre_y: f64,
    pub radius: f64,
    pub direction: Direction,
    pub generation: u32,
}

/// Maps points of the plane to colours by their distance to the nearest
/// circle of the packing described by [`FractalParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalColourField {
    params: FractalParameters,
}

impl FractalColourField {
    #[must_use]
    pub fn new(params: FractalParameters) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &FractalParameters {
        &self.params
    }

    /// Distance from `(x, y)` to the nearest circle, clamped to
    /// `[0, maximum_distance]`. Points on or inside a circle give 0.
    #[must_use]
    pub fn get_distance(&self, x: f64, y: f64) -> f64 {
        self.nearest_signed_distance(x, y)
            .clamp(0.0, self.params.maximum_distance())
    }

    /// Three-stop gradient: black at or inside a circle, red at `cut_off`,
    /// blue at `maximum_distance`.
    #[must_use]
    pub fn colour_from_distance(&self, distance: f64) -> Colour {
        let cut_off = self.params.cut_off();

        if distance <= 0.0 {
            Colour::BLACK
        } else if distance <= cut_off && cut_off > CUT_OFF_EPSILON {
            let red = to_channel(255.0 * distance / cut_off);
            Colour::opaque(red, 0, 0)
        } else {
            let range = self.params.maximum_distance() - cut_off;
            let blue = to_channel(255.0 * (distance - cut_off) / range);
            Colour::opaque(255 - blue, 0, blue)
        }
    }

    #[must_use]
    pub fn colour_at(&self, x: f64, y: f64) -> Colour {
        self.colour_from_distance(self.get_distance(x, y))
    }

    /// Every circle of the packing: the root, then three children per circle
    /// for each generation. The list grows as `(3^(n+1) - 1) / 2`, so this is
    /// only practical for small iteration counts.
    #[must_use]
    pub fn circles(&self) -> Vec<Circle> {
        let capacity = circle_count(self.params.number_of_iterations())
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(0)
            .min(1 << 20);
        let mut circles = Vec::with_capacity(capacity);
        let division = f64::from(self.params.division_factor());

        let mut pending = vec![Circle {
            centre_x: self.params.centre_x(),
            centre_y: self.params.centre_y(),
            radius: START_RADIUS,
            direction: self.params.start_direction(),
            generation: 0,
        }];

        while let Some(circle) = pending.pop() {
            if circle.generation < self.params.number_of_iterations() {
                let child_radius = circle.radius / division;
                let step = circle.radius + child_radius;

                for quarter_turns in [0, 1, 3] {
                    let direction = circle.direction.turned(quarter_turns);
                    let (ux, uy) = direction.unit_vector();

                    pending.push(Circle {
                        centre_x: circle.centre_x + step * ux,
                        centre_y: circle.centre_y + step * uy,
                        radius: child_radius,
                        direction,
                        generation: circle.generation + 1,
                    });
                }
            }

            circles.push(circle);
        }

        circles
    }

    /// Walks from the root circle towards the query point one generation at a
    /// time, keeping the smallest signed distance seen. Stops on a hit
    /// (distance <= 0) or when the iteration budget runs out.
    fn nearest_signed_distance(&self, x: f64, y: f64) -> f64 {
        let division = f64::from(self.params.division_factor());
        let mut centre_x = self.params.centre_x();
        let mut centre_y = self.params.centre_y();
        let mut radius = START_RADIUS;
        let mut remaining = self.params.number_of_iterations();
        let mut facing = self.params.start_direction();
        let mut best = self.params.maximum_distance();

        loop {
            best = best.min(distance(x, y, centre_x, centre_y) - radius);

            if best <= 0.0 || remaining == 0 {
                return best;
            }

            let child_radius = radius / division;
            facing = facing.towards(x - centre_x, y - centre_y);

            let (ux, uy) = facing.unit_vector();
            let step = radius + child_radius;
            centre_x += step * ux;
            centre_y += step * uy;
            radius = child_radius;
            remaining -= 1;
        }
    }
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn field(
        number_of_iterations: u32,
        maximum_distance: f64,
        division_factor: u32,
        cut_off: f64,
    ) -> FractalColourField {
        let params = FractalParameters::new(
            100.0,
            100.0,
            number_of_iterations,
            maximum_distance,
            division_factor,
            cut_off,
        )
        .unwrap();

        FractalColourField::new(params)
    }

    fn grid() -> impl Iterator<Item = (f64, f64)> {
        (-100..=300)
            .step_by(13)
            .flat_map(|x| (-100..=300).step_by(11).map(move |y| (f64::from(x), f64::from(y))))
    }

    #[test]
    fn test_zero_iterations_is_single_circle() {
        let field = field(0, 30.0, 2, 0.1);

        for (x, y) in grid() {
            let expected = (distance(x, y, 100.0, 100.0) - START_RADIUS).clamp(0.0, 30.0);
            assert_eq!(field.get_distance(x, y), expected, "point ({x}, {y})");
        }
    }

    #[test]
    fn test_distance_stays_within_bounds() {
        let fields = [
            field(2, 50.0, 2, 0.0),
            field(2, 50.0, 2, 0.01),
            field(2, 10.0, 2, 0.1),
            field(0, 10.0, 2, 0.1),
            field(11, 10.0, 2, 0.1),
            field(5, 10.0, 3, 0.1),
            field(5, 10.0, 10, 0.1),
            field(5, 20.0, 10, 10.0),
        ];

        for field in &fields {
            let maximum = field.params().maximum_distance();
            for (x, y) in grid() {
                let d = field.get_distance(x, y);
                assert!((0.0..=maximum).contains(&d), "distance {d} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_distance_is_zero_at_every_circle_centre() {
        let field = field(3, 300.0, 2, 1.5);

        for circle in field.circles() {
            assert_eq!(field.get_distance(circle.centre_x, circle.centre_y), 0.0, "{circle:?}");
        }
    }

    #[test]
    fn test_distance_to_first_child_from_outside() {
        let field = field(1, 300.0, 2, 1.5);

        // The child facing right sits at x = 100 + 50 + 25 with radius 25.
        assert_eq!(field.get_distance(210.0, 100.0), 10.0);
        // Without the child only the root circle would count.
        assert_eq!(self::field(0, 300.0, 2, 1.5).get_distance(210.0, 100.0), 60.0);
    }

    #[test]
    fn test_query_at_root_centre_is_a_hit() {
        let field = field(4, 30.0, 2, 1.5);

        assert_eq!(field.get_distance(100.0, 100.0), 0.0);
        assert_eq!(field.colour_at(100.0, 100.0), Colour::BLACK);
    }

    #[test]
    fn test_colour_is_black_on_or_inside_circle() {
        let field = field(2, 30.0, 2, 1.5);

        for distance in [0.0, -0.0, -1.0, -1000.0] {
            assert_eq!(field.colour_from_distance(distance), Colour::BLACK);
        }
    }

    #[test]
    fn test_colour_stops() {
        let field = field(2, 30.0, 2, 1.5);

        assert_eq!(field.colour_from_distance(0.75), Colour::opaque(128, 0, 0));
        assert_eq!(field.colour_from_distance(1.5), Colour::opaque(255, 0, 0));
        assert_eq!(field.colour_from_distance(30.0), Colour::opaque(0, 0, 255));
    }

    #[test]
    fn test_negligible_cut_off_skips_red_stage() {
        let field = field(2, 10.0, 2, 0.0);

        // round(255 * 0.5 / 10) = 13
        assert_eq!(field.colour_from_distance(0.5), Colour::opaque(242, 0, 13));
    }

    #[test]
    fn test_colour_is_monotonic_and_continuous() {
        let field = field(2, 30.0, 2, 1.5);
        let mut previous = field.colour_from_distance(0.001);
        let mut distance = 0.001;

        while distance <= 30.0 {
            let colour = field.colour_from_distance(distance);

            if distance <= 1.5 {
                assert!(colour.r >= previous.r, "red fell at {distance}");
                assert_eq!(colour.b, 0);
            } else {
                assert!(colour.r <= previous.r, "red rose at {distance}");
                assert!(colour.b >= previous.b, "blue fell at {distance}");
            }
            assert!(colour.r.abs_diff(previous.r) <= 1, "red jumped at {distance}");
            assert!(colour.b.abs_diff(previous.b) <= 1, "blue jumped at {distance}");
            assert_eq!(colour.g, 0);
            assert_eq!(colour.a, 255);

            previous = colour;
            distance += 0.001;
        }
    }

    #[test]
    fn test_circles_follow_packing_rule() {
        let field = field(2, 30.0, 2, 1.5);
        let circles = field.circles();

        assert_eq!(circles.len(), 13);
        assert_eq!(circles.iter().filter(|c| c.radius == 50.0).count(), 1);
        assert_eq!(circles.iter().filter(|c| c.radius == 25.0).count(), 3);
        assert_eq!(circles.iter().filter(|c| c.radius == 12.5).count(), 9);
        assert_eq!(self::field(3, 30.0, 3, 1.5).circles().len(), 40);
    }

    #[test]
    fn test_first_generation_never_points_back() {
        let field = field(1, 30.0, 2, 1.5);
        let children: Vec<Circle> = field.circles().into_iter().filter(|c| c.generation == 1).collect();

        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.direction != Direction::Left));
        assert!(children.iter().any(|c| c.centre_x == 175.0 && c.centre_y == 100.0));
        assert!(children.iter().any(|c| c.centre_x == 100.0 && c.centre_y == 175.0));
        assert!(children.iter().any(|c| c.centre_x == 100.0 && c.centre_y == 25.0));
    }

    /// Counts connected regions lying at least `margin` inside some circle.
    /// Circles of the packing touch their parents, so each one is shrunk by
    /// `margin` to keep neighbouring regions apart on the sample grid.
    fn count_hit_regions(field: &FractalColourField, margin: f64) -> usize {
        const STEP: f64 = 0.5;
        const HALF_EXTENT: usize = 260;
        let side = 2 * HALF_EXTENT + 1;
        let to_coord = |i: usize| 100.0 + (i as f64 - HALF_EXTENT as f64) * STEP;

        let hits: Vec<bool> = (0..side * side)
            .map(|i| {
                let (ix, iy) = (i % side, i / side);
                field.nearest_signed_distance(to_coord(ix), to_coord(iy)) <= -margin
            })
            .collect();

        let mut seen = vec![false; side * side];
        let mut regions = 0;

        for start in 0..side * side {
            if !hits[start] || seen[start] {
                continue;
            }

            regions += 1;
            seen[start] = true;
            let mut queue = VecDeque::from([start]);

            while let Some(i) = queue.pop_front() {
                let (ix, iy) = (i % side, i / side);
                let mut neighbours = Vec::with_capacity(4);
                if ix > 0 {
                    neighbours.push(i - 1);
                }
                if ix + 1 < side {
                    neighbours.push(i + 1);
                }
                if iy > 0 {
                    neighbours.push(i - side);
                }
                if iy + 1 < side {
                    neighbours.push(i + side);
                }

                for n in neighbours {
                    if hits[n] && !seen[n] {
                        seen[n] = true;
                        queue.push_back(n);
                    }
                }
            }
        }

        regions
    }

    #[test]
    fn test_hit_regions_match_circle_count() {
        for (iterations, expected) in [(0, 1), (1, 4), (2, 13)] {
            let field = field(iterations, 300.0, 2, 1.5);

            assert_eq!(count_hit_regions(&field, 0.75), expected, "iterations {iterations}");
        }
    }
}
