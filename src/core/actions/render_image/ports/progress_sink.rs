/// Receives progress of a running render as raw counts.
pub trait ProgressSink: Send + Sync {
    fn report(&self, pixels_so_far: u64, total_pixels: u64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn report(&self, _pixels_so_far: u64, _total_pixels: u64) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64) + Send + Sync,
{
    #[inline]
    fn report(&self, pixels_so_far: u64, total_pixels: u64) {
        self(pixels_so_far, total_pixels)
    }
}
