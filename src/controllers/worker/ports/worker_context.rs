use crossbeam::channel::Sender;

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::worker_event::WorkerEvent;
use crate::protocol::messages::WorkerRequest;

/// An isolated execution context that renders requests posted to it.
pub trait WorkerContext: Send {
    fn post(&mut self, request: WorkerRequest) -> Result<(), WorkerError>;

    /// Stops the worker without letting it finish. Anything it still emits
    /// afterwards is stale to the coordinator.
    fn terminate(&mut self);
}

/// Creates fresh worker contexts that report into `events`.
pub trait WorkerFactory {
    type Worker: WorkerContext;

    fn spawn(&self, events: Sender<WorkerEvent>) -> Result<Self::Worker, WorkerError>;
}
