//! Worker contexts: isolated executors that receive `DRAW_IMAGE` requests
//! and answer with `PROGRESS` and `DRAWING_RESULT` messages.
//!
//! Two contexts are provided. [`ThreadWorker`] renders on a dedicated thread
//! and is stopped cooperatively. [`ProcessWorker`] runs the binary's stdio
//! worker loop in a child process and is stopped by killing it.

pub mod error;
pub mod job;
pub mod ports;
pub mod process_worker;
pub mod stdio;
pub mod thread_worker;
pub mod worker_event;

pub use error::WorkerError;
pub use ports::response_sink::ResponseSink;
pub use ports::worker_context::{WorkerContext, WorkerFactory};
pub use process_worker::{ProcessWorker, ProcessWorkerFactory};
pub use stdio::run_stdio_worker;
pub use thread_worker::{ThreadWorker, ThreadWorkerFactory};
pub use worker_event::WorkerEvent;
