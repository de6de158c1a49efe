use crossbeam::channel::Sender;

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::worker_event::WorkerEvent;
use crate::protocol::messages::WorkerResponse;

/// Where a running job posts its progress and result.
pub trait ResponseSink: Send + Sync {
    fn send(&self, response: WorkerResponse) -> Result<(), WorkerError>;
}

impl ResponseSink for Sender<WorkerEvent> {
    fn send(&self, response: WorkerResponse) -> Result<(), WorkerError> {
        Sender::send(self, WorkerEvent::Response(response)).map_err(|_| WorkerError::Disconnected)
    }
}
