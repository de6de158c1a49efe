use std::time::Duration;

use thiserror::Error;

use crate::controllers::worker::error::WorkerError;
use crate::protocol::messages::DrawImageRequestError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    InvalidRequest(#[from] DrawImageRequestError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("no render job has been submitted")]
    NoActiveJob,
    #[error("render did not finish within {0:?}")]
    Timeout(Duration),
}
