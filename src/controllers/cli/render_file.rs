use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::config::render_settings::RenderSettings;
use crate::controllers::coordinator::{Coordinator, CoordinatorError, JobState};
use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::controllers::worker::ports::worker_context::WorkerFactory;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::presenters::terminal::presenter::TerminalPresenter;

#[derive(Debug, Error)]
pub enum RenderFileError {
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
    #[error("render failed: {0}")]
    Failed(String),
    #[error("no image has been rendered yet")]
    NothingRendered,
    #[error(transparent)]
    Presenter(#[from] FilePresenterError),
}

/// Renders one image through a worker and writes it to disk.
pub struct RenderFileController<F, P, W>
where
    F: WorkerFactory,
    P: FilePresenterPort,
    W: Write + Send + 'static,
{
    coordinator: Coordinator<F>,
    terminal: Arc<TerminalPresenter<W>>,
    presenter: P,
    timeout: Option<Duration>,
    buffer: Option<PixelBuffer>,
}

impl<F, P, W> RenderFileController<F, P, W>
where
    F: WorkerFactory,
    P: FilePresenterPort,
    W: Write + Send + 'static,
{
    pub fn new(factory: F, presenter: P, terminal: Arc<TerminalPresenter<W>>) -> Self {
        let coordinator = Coordinator::new(factory, terminal.clone());

        Self {
            coordinator,
            terminal,
            presenter,
            timeout: None,
            buffer: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn generate(&mut self, settings: &RenderSettings) -> Result<&PixelBuffer, RenderFileError> {
        info!(
            "rendering {}x{}, {} iterations, division factor {}, cut-off {}",
            settings.width,
            settings.height,
            settings.number_of_iterations,
            settings.division_factor,
            settings.cut_off
        );

        self.coordinator.submit(settings)?;

        match self.coordinator.wait_for_completion(self.timeout)? {
            JobState::Completed => {
                let frame = self.terminal.take_frame().ok_or(RenderFileError::NothingRendered)?;
                Ok(self.buffer.insert(frame.pixel_buffer))
            }
            _ => {
                let message = self
                    .terminal
                    .take_failure()
                    .map(|failure| failure.message)
                    .unwrap_or_else(|| "unknown failure".to_string());
                Err(RenderFileError::Failed(message))
            }
        }
    }

    pub fn write(&self, filepath: impl AsRef<Path>) -> Result<(), RenderFileError> {
        let buffer = self.buffer.as_ref().ok_or(RenderFileError::NothingRendered)?;

        self.presenter.present(buffer, filepath.as_ref())?;
        info!("wrote {}", filepath.as_ref().display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::worker::thread_worker::ThreadWorkerFactory;
    use crate::core::data::colour::Colour;
    use crate::core::data::point::Point;
    use crate::presenters::file::ppm::PpmFilePresenter;

    fn controller() -> RenderFileController<ThreadWorkerFactory, PpmFilePresenter, Vec<u8>> {
        RenderFileController::new(
            ThreadWorkerFactory,
            PpmFilePresenter::new(),
            Arc::new(TerminalPresenter::new(Vec::new())),
        )
        .with_timeout(Duration::from_secs(30))
    }

    #[test]
    fn test_generate_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circles.ppm");
        let settings = RenderSettings {
            width: 40,
            height: 30,
            ..RenderSettings::default()
        };
        let mut controller = controller();

        let buffer = controller.generate(&settings).unwrap();
        assert_eq!(buffer.pixel(Point { x: 20, y: 15 }).unwrap(), Colour::BLACK);

        controller.write(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), "P6\n40 30\n255\n".len() + 40 * 30 * 3);
    }

    #[test]
    fn test_write_before_generate_fails() {
        let controller = controller();

        assert!(matches!(
            controller.write("unused.ppm"),
            Err(RenderFileError::NothingRendered)
        ));
    }

    #[test]
    fn test_illegal_settings_are_reported() {
        let mut controller = controller();
        let settings = RenderSettings {
            width: 0,
            ..RenderSettings::default()
        };

        assert!(matches!(
            controller.generate(&settings),
            Err(RenderFileError::Coordinator(CoordinatorError::InvalidRequest(_)))
        ));
    }
}
