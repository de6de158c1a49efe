use std::time::Duration;

use crate::core::data::pixel_buffer::PixelBuffer;
use crate::protocol::messages::ProgressUpdate;
use crate::protocol::worker_id::WorkerId;

#[derive(Debug)]
pub struct FrameData {
    pub worker_id: WorkerId,
    pub pixel_buffer: PixelBuffer,
    pub render_duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub worker_id: WorkerId,
    pub message: String,
}

/// Everything the coordinator hands to its presenter. Only events for the
/// current job get this far.
#[derive(Debug)]
pub enum RenderEvent {
    Progress(ProgressUpdate),
    Frame(FrameData),
    Error(RenderFailure),
}
