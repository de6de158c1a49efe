use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{debug, error};

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::job::run_draw_image;
use crate::controllers::worker::ports::worker_context::{WorkerContext, WorkerFactory};
use crate::controllers::worker::worker_event::WorkerEvent;
use crate::core::actions::cancellation::{CancelToken, KillFlag};
use crate::protocol::messages::{DrawImageRequest, WorkerRequest};

/// Runs one request on the worker thread.
pub(crate) type DrawJob =
    fn(&DrawImageRequest, &Sender<WorkerEvent>, &KillFlag) -> Result<(), WorkerError>;

/// A worker running on its own OS thread.
///
/// Threads cannot be killed, so `terminate` raises a kill flag that the
/// renderer polls and then detaches the thread.
pub struct ThreadWorker {
    requests: Option<Sender<WorkerRequest>>,
    kill: KillFlag,
    handle: Option<JoinHandle<()>>,
}

impl ThreadWorker {
    pub fn spawn(events: Sender<WorkerEvent>) -> Result<Self, WorkerError> {
        Self::spawn_with_job(events, run_draw_image::<Sender<WorkerEvent>, KillFlag>)
    }

    pub(crate) fn spawn_with_job(
        events: Sender<WorkerEvent>,
        job: DrawJob,
    ) -> Result<Self, WorkerError> {
        let (requests, inbox) = unbounded();
        let kill = KillFlag::new();
        let worker_kill = kill.clone();

        let handle = thread::Builder::new()
            .name("circle-fractal-worker".to_string())
            .spawn(move || Self::worker_loop(&inbox, &events, &worker_kill, job))
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            requests: Some(requests),
            kill,
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.kill.is_cancelled()
    }

    fn worker_loop(
        inbox: &Receiver<WorkerRequest>,
        events: &Sender<WorkerEvent>,
        kill: &KillFlag,
        job: DrawJob,
    ) {
        for request in inbox {
            if kill.is_cancelled() {
                return;
            }

            let WorkerRequest::DrawImage(request) = request;
            let worker_id = request.worker_id();

            // A panicking job is reported like any other failure so the
            // coordinator never waits on a thread that has died.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(&request, events, kill)))
                .unwrap_or_else(|payload| Err(WorkerError::Panicked(panic_message(payload.as_ref()))));

            match outcome {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => {
                    debug!("worker {worker_id}: terminated mid-render");
                    return;
                }
                Err(err) => {
                    error!("worker {worker_id}: {err}");
                    let failed = WorkerEvent::Failed {
                        worker_id,
                        message: err.to_string(),
                    };

                    if events.send(failed).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl WorkerContext for ThreadWorker {
    fn post(&mut self, request: WorkerRequest) -> Result<(), WorkerError> {
        let requests = self.requests.as_ref().ok_or(WorkerError::Disconnected)?;

        requests.send(request).map_err(|_| WorkerError::Disconnected)
    }

    fn terminate(&mut self) {
        self.kill.raise();
        self.requests = None;

        // Detached rather than joined: the thread exits at its next poll.
        self.handle = None;
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadWorkerFactory;

impl WorkerFactory for ThreadWorkerFactory {
    type Worker = ThreadWorker;

    fn spawn(&self, events: Sender<WorkerEvent>) -> Result<ThreadWorker, WorkerError> {
        ThreadWorker::spawn(events)
    }
}
