use crate::protocol::messages::WorkerResponse;
use crate::protocol::worker_id::WorkerId;

/// What a worker context delivers to the coordinator's channel.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Response(WorkerResponse),
    /// The worker died or rejected its job. `message` is the best available
    /// explanation, such as a child process's stderr.
    Failed { worker_id: WorkerId, message: String },
}

impl WorkerEvent {
    #[must_use]
    pub fn worker_id(&self) -> WorkerId {
        match self {
            Self::Response(response) => response.worker_id(),
            Self::Failed { worker_id, .. } => *worker_id,
        }
    }
}
