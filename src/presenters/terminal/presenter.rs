use std::io::Write;
use std::sync::Mutex;

use log::warn;

use crate::controllers::coordinator::events::{FrameData, RenderEvent, RenderFailure};
use crate::controllers::coordinator::ports::presenter::CoordinatorPresenterPort;

#[derive(Debug, Default)]
struct TerminalState {
    last_percent: Option<u32>,
    frame: Option<FrameData>,
    failure: Option<RenderFailure>,
}

/// Prints `Progress: N%` lines as a job advances and keeps the finished
/// frame for whoever drives the coordinator.
pub struct TerminalPresenter<W: Write + Send> {
    output: Mutex<W>,
    state: Mutex<TerminalState>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: Mutex::new(output),
            state: Mutex::new(TerminalState::default()),
        }
    }

    /// Takes the most recent frame, if one has arrived since the last call.
    pub fn take_frame(&self) -> Option<FrameData> {
        self.state.lock().ok()?.frame.take()
    }

    pub fn take_failure(&self) -> Option<RenderFailure> {
        self.state.lock().ok()?.failure.take()
    }

    pub fn into_output(self) -> Option<W> {
        self.output.into_inner().ok()
    }

    fn print(&self, line: &str) {
        let Ok(mut output) = self.output.lock() else {
            return;
        };

        if let Err(err) = writeln!(output, "{line}").and_then(|()| output.flush()) {
            warn!("could not print to terminal: {err}");
        }
    }
}

impl<W: Write + Send> CoordinatorPresenterPort for TerminalPresenter<W> {
    fn present(&self, event: RenderEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        match event {
            RenderEvent::Progress(update) => {
                let percent = update.percent();

                if state.last_percent != Some(percent) {
                    state.last_percent = Some(percent);
                    drop(state);
                    self.print(&format!("Progress: {percent}%"));
                }
            }
            RenderEvent::Frame(frame) => {
                state.last_percent = None;
                let rect = frame.pixel_buffer.pixel_rect();
                let line = format!(
                    "Rendered {}x{} in {:?}",
                    rect.width(),
                    rect.height(),
                    frame.render_duration
                );
                state.frame = Some(frame);
                drop(state);
                self.print(&line);
            }
            RenderEvent::Error(failure) => {
                state.last_percent = None;
                let line = format!("Render failed: {}", failure.message);
                state.failure = Some(failure);
                drop(state);
                self.print(&line);
            }
        }
    }
}
