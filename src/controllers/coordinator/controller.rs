use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info, trace};

use crate::config::render_settings::RenderSettings;
use crate::controllers::coordinator::error::CoordinatorError;
use crate::controllers::coordinator::events::{FrameData, RenderEvent, RenderFailure};
use crate::controllers::coordinator::ports::presenter::CoordinatorPresenterPort;
use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::ports::worker_context::{WorkerContext, WorkerFactory};
use crate::controllers::worker::worker_event::WorkerEvent;
use crate::protocol::messages::{WorkerRequest, WorkerResponse};
use crate::protocol::worker_id::WorkerId;

/// Lifecycle of the current job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// What happened to one event taken off the worker channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Stale,
    Progress,
    Completed,
    Failed,
}

/// Owns at most one live worker and forwards only the current job's events
/// to the presenter.
///
/// Each submission terminates the previous worker and takes a fresh
/// [`WorkerId`]. Events tagged with any other id are dropped, so a late
/// result from a replaced worker is never shown.
pub struct Coordinator<F: WorkerFactory> {
    factory: F,
    presenter_port: Arc<dyn CoordinatorPresenterPort>,
    current_job: WorkerId,
    last_completed_job: WorkerId,
    state: JobState,
    submitted_at: Instant,
    worker: Option<F::Worker>,
    events_tx: Sender<WorkerEvent>,
    events_rx: Receiver<WorkerEvent>,
}

impl<F: WorkerFactory> Coordinator<F> {
    pub fn new(factory: F, presenter_port: Arc<dyn CoordinatorPresenterPort>) -> Self {
        let (events_tx, events_rx) = unbounded();

        Self {
            factory,
            presenter_port,
            current_job: WorkerId::default(),
            last_completed_job: WorkerId::default(),
            state: JobState::Idle,
            submitted_at: Instant::now(),
            worker: None,
            events_tx,
            events_rx,
        }
    }

    #[must_use]
    pub fn current_job(&self) -> WorkerId {
        self.current_job
    }

    #[must_use]
    pub fn last_completed_job(&self) -> WorkerId {
        self.last_completed_job
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Starts a new job, replacing whatever was running.
    ///
    /// Settings are validated first: an illegal request leaves the current
    /// job and its worker untouched.
    pub fn submit(&mut self, settings: &RenderSettings) -> Result<WorkerId, CoordinatorError> {
        let worker_id = self.current_job.next();
        let request = settings.to_request(worker_id)?;

        if let Some(mut previous) = self.worker.take() {
            debug!("terminating worker for job {}", self.current_job);
            previous.terminate();
        }

        self.current_job = worker_id;
        self.state = JobState::Running;
        self.submitted_at = Instant::now();

        let mut worker = match self.factory.spawn(self.events_tx.clone()) {
            Ok(worker) => worker,
            Err(err) => {
                self.state = JobState::Failed;
                return Err(err.into());
            }
        };

        if let Err(err) = worker.post(WorkerRequest::DrawImage(request)) {
            self.state = JobState::Failed;
            worker.terminate();
            return Err(err.into());
        }

        self.worker = Some(worker);

        info!(
            "dispatched job {worker_id}: {}x{}, {} iterations",
            settings.width, settings.height, settings.number_of_iterations
        );

        Ok(worker_id)
    }

    /// Routes one worker event, dropping it unless it belongs to the
    /// running job.
    pub fn handle_event(&mut self, event: WorkerEvent) -> Delivery {
        let worker_id = event.worker_id();

        if worker_id != self.current_job || self.state != JobState::Running {
            debug!("dropping stale event from job {worker_id}");
            return Delivery::Stale;
        }

        match event {
            WorkerEvent::Response(WorkerResponse::Progress(update)) => {
                trace!("job {worker_id}: {}%", update.percent());
                self.presenter_port.present(RenderEvent::Progress(update));
                Delivery::Progress
            }
            WorkerEvent::Response(WorkerResponse::DrawingResult(result)) => {
                match result.into_pixel_buffer() {
                    Ok(pixel_buffer) => {
                        let render_duration = self.submitted_at.elapsed();
                        info!("job {worker_id} completed in {render_duration:?}");

                        self.finish(JobState::Completed);
                        self.presenter_port.present(RenderEvent::Frame(FrameData {
                            worker_id,
                            pixel_buffer,
                            render_duration,
                        }));

                        Delivery::Completed
                    }
                    Err(err) => self.fail(worker_id, err.to_string()),
                }
            }
            WorkerEvent::Failed { message, .. } => self.fail(worker_id, message),
        }
    }

    /// Handles every event already queued, without blocking. Returns how many
    /// were delivered to the presenter.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut delivered = 0;

        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle_event(event) != Delivery::Stale {
                delivered += 1;
            }
        }

        delivered
    }

    /// Blocks until the current job completes or fails.
    pub fn wait_for_completion(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<JobState, CoordinatorError> {
        if self.state == JobState::Idle {
            return Err(CoordinatorError::NoActiveJob);
        }

        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        while self.state == JobState::Running {
            let event = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());

                    match self.events_rx.recv_timeout(remaining) {
                        Ok(event) => event,
                        Err(RecvTimeoutError::Timeout) => {
                            return Err(CoordinatorError::Timeout(timeout.unwrap_or_default()));
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            return Err(WorkerError::Disconnected.into());
                        }
                    }
                }
                None => self
                    .events_rx
                    .recv()
                    .map_err(|_| CoordinatorError::Worker(WorkerError::Disconnected))?,
            };

            self.handle_event(event);
        }

        Ok(self.state)
    }

    /// Terminates the live worker, if any.
    pub fn shutdown(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            debug!("shutting down worker for job {}", self.current_job);
            worker.terminate();
        }
    }

    fn finish(&mut self, state: JobState) {
        self.state = state;
        self.last_completed_job = self.current_job;
    }

    fn fail(&mut self, worker_id: WorkerId, message: String) -> Delivery {
        error!("job {worker_id} failed: {message}");

        self.finish(JobState::Failed);
        self.presenter_port
            .present(RenderEvent::Error(RenderFailure { worker_id, message }));

        Delivery::Failed
    }
}

impl<F: WorkerFactory> Drop for Coordinator<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
