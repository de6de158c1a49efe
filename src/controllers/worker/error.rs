use thiserror::Error;

use crate::core::actions::render_image::tiled_renderer::RenderImageError;
use crate::protocol::codec::ProtocolError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("render failed: {0}")]
    Render(#[from] RenderImageError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("worker i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("worker channel closed")]
    Disconnected,
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl WorkerError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Render(RenderImageError::Cancelled(_)))
    }
}
