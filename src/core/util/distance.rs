/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
#[inline]
#[must_use]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}
