use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam::channel::Sender;
use log::{debug, warn};

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::ports::worker_context::{WorkerContext, WorkerFactory};
use crate::controllers::worker::worker_event::WorkerEvent;
use crate::protocol::codec::{decode_response, encode};
use crate::protocol::messages::{WorkerRequest, WorkerResponse};
use crate::protocol::worker_id::WorkerId;

/// Subcommand that turns the binary into a stdio worker.
pub const WORKER_SUBCOMMAND: &str = "worker";

/// Id of the job posted to a child and not yet answered with a result.
type Outstanding = Arc<Mutex<Option<WorkerId>>>;

/// A worker running as a child process, speaking newline-delimited JSON
/// over its stdin and stdout. Terminating it kills the process.
pub struct ProcessWorker {
    child: Child,
    stdin: Option<ChildStdin>,
    outstanding: Outstanding,
}

impl ProcessWorker {
    pub fn spawn(
        program: &Path,
        args: &[OsString],
        events: Sender<WorkerEvent>,
    ) -> Result<Self, WorkerError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(WorkerError::Spawn)?;

        let stdin = child.stdin.take();
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(WorkerError::Disconnected);
        };

        debug!("spawned worker process {}", child.id());

        let outstanding: Outstanding = Arc::new(Mutex::new(None));
        let stderr_reader = thread::spawn(move || collect_stderr(stderr));
        let reader_outstanding = Arc::clone(&outstanding);

        thread::Builder::new()
            .name("circle-fractal-process-reader".to_string())
            .spawn(move || read_responses(stdout, stderr_reader, &reader_outstanding, &events))
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            child,
            stdin,
            outstanding,
        })
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl WorkerContext for ProcessWorker {
    fn post(&mut self, request: WorkerRequest) -> Result<(), WorkerError> {
        let line = encode(&request)?;
        let stdin = self.stdin.as_mut().ok_or(WorkerError::Disconnected)?;

        if let Ok(mut outstanding) = self.outstanding.lock() {
            *outstanding = Some(request.worker_id());
        }

        writeln!(stdin, "{line}")?;
        stdin.flush()?;

        Ok(())
    }

    fn terminate(&mut self) {
        self.stdin = None;

        match self.child.kill() {
            Ok(()) => debug!("killed worker process {}", self.child.id()),
            Err(err) => debug!("worker process {} already gone: {err}", self.child.id()),
        }

        if let Err(err) = self.child.wait() {
            warn!("could not reap worker process {}: {err}", self.child.id());
        }
    }
}

impl Drop for ProcessWorker {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            self.terminate();
        }
    }
}

fn collect_stderr(mut stderr: impl Read) -> String {
    let mut text = String::new();

    if let Err(err) = stderr.read_to_string(&mut text) {
        debug!("worker stderr unreadable: {err}");
    }

    text.trim().to_string()
}

fn read_responses(
    stdout: ChildStdout,
    stderr_reader: JoinHandle<String>,
    outstanding: &Outstanding,
    events: &Sender<WorkerEvent>,
) {
    for line in BufReader::new(stdout).lines() {
        let Ok(line) = line else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        match decode_response(&line) {
            Ok(response) => {
                if let WorkerResponse::DrawingResult(result) = &response {
                    if let Ok(mut outstanding) = outstanding.lock() {
                        if *outstanding == Some(result.worker_id) {
                            *outstanding = None;
                        }
                    }
                }

                if events.send(WorkerEvent::Response(response)).is_err() {
                    return;
                }
            }
            Err(err) => {
                warn!("worker process sent an unreadable message: {err}");
                report_failure(outstanding, events, err.to_string());
                return;
            }
        }
    }

    let stderr = stderr_reader.join().unwrap_or_default();
    let message = if stderr.is_empty() {
        "worker process exited without a result".to_string()
    } else {
        stderr
    };

    report_failure(outstanding, events, message);
}

/// Fails the outstanding job, if any.
fn report_failure(outstanding: &Outstanding, events: &Sender<WorkerEvent>, message: String) {
    let pending = outstanding.lock().ok().and_then(|mut outstanding| outstanding.take());

    if let Some(worker_id) = pending {
        let _ = events.send(WorkerEvent::Failed { worker_id, message });
    }
}

/// Spawns [`ProcessWorker`]s running `program` with `args`.
#[derive(Debug, Clone)]
pub struct ProcessWorkerFactory {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessWorkerFactory {
    /// A factory running `program worker`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![OsString::from(WORKER_SUBCOMMAND)],
        }
    }

    /// A factory that re-runs the current executable as a worker.
    pub fn current_exe() -> Result<Self, WorkerError> {
        Ok(Self::new(std::env::current_exe()?))
    }

    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl WorkerFactory for ProcessWorkerFactory {
    type Worker = ProcessWorker;

    fn spawn(&self, events: Sender<WorkerEvent>) -> Result<ProcessWorker, WorkerError> {
        ProcessWorker::spawn(&self.program, &self.args, events)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::protocol::messages::DrawImageRequest;
    use crossbeam::channel::unbounded;
    use std::time::Duration;

    fn sh(script: &str) -> ProcessWorkerFactory {
        ProcessWorkerFactory::new("sh").with_args(["-c", script])
    }

    fn draw(worker_id: u64) -> WorkerRequest {
        WorkerRequest::DrawImage(
            DrawImageRequest::new(WorkerId::new(worker_id), 2, 2, 0, 2, 1.5).unwrap(),
        )
    }

    #[test]
    fn test_forwards_child_responses() {
        let factory = sh(
            r#"read line; echo '{"type":"PROGRESS","workerId":4,"pixelsSoFar":0,"totalPixels":4}'; echo '{"type":"DRAWING_RESULT","workerId":4,"width":1,"height":1,"pixelBuffer":[0,0,0,255]}'"#,
        );
        let (tx, rx) = unbounded();
        let mut worker = factory.spawn(tx).unwrap();

        worker.post(draw(4)).unwrap();

        let first = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(first, WorkerEvent::Response(WorkerResponse::Progress(_))));
        assert!(matches!(second, WorkerEvent::Response(WorkerResponse::DrawingResult(_))));
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn test_exit_without_result_reports_stderr() {
        let factory = sh("read line; echo 'render exploded' >&2; exit 3");
        let (tx, rx) = unbounded();
        let mut worker = factory.spawn(tx).unwrap();

        worker.post(draw(7)).unwrap();

        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(
            event,
            WorkerEvent::Failed {
                worker_id: WorkerId::new(7),
                message: "render exploded".to_string(),
            }
        );
    }

    #[test]
    fn test_terminate_kills_child() {
        let factory = sh("read line; exec sleep 30");
        let (tx, rx) = unbounded();
        let mut worker = factory.spawn(tx).unwrap();
        worker.post(draw(2)).unwrap();

        worker.terminate();

        // The reader reports the stale job as failed once stdout closes.
        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(event.worker_id(), WorkerId::new(2));
        assert!(matches!(event, WorkerEvent::Failed { .. }));
        assert!(worker.post(draw(3)).is_err());
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let factory = ProcessWorkerFactory::new("/nonexistent/circle-fractal-worker");
        let (tx, _rx) = unbounded();

        assert!(matches!(factory.spawn(tx), Err(WorkerError::Spawn(_))));
    }
}
