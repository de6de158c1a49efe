pub mod config;
pub mod controllers;
pub mod core;
pub mod input;
pub mod presenters;
pub mod protocol;

pub use config::render_settings::{RenderSettings, SettingsError};
pub use controllers::cli::render_file::{RenderFileController, RenderFileError};
pub use controllers::coordinator::{
    Coordinator, CoordinatorError, CoordinatorPresenterPort, Delivery, FrameData, JobState,
    RenderEvent, RenderFailure,
};
pub use controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
pub use controllers::worker::{
    ProcessWorker, ProcessWorkerFactory, ThreadWorker, ThreadWorkerFactory, WorkerContext,
    WorkerError, WorkerEvent, WorkerFactory, run_stdio_worker,
};
pub use crate::core::actions::cancellation::{CancelToken, Cancelled, KillFlag, NeverCancel};
pub use crate::core::actions::render_image::ports::progress_sink::{NoProgress, ProgressSink};
pub use crate::core::actions::render_image::tiled_renderer::{RenderImageError, RenderMode, TiledRenderer};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::pixel_buffer::PixelBuffer;
pub use crate::core::data::pixel_rect::PixelRect;
pub use crate::core::fractals::circle::field::{Circle, FractalColourField};
pub use crate::core::fractals::circle::params::{FractalParameters, FractalParametersError};
pub use input::cli::args::{Cli, Command, RenderArgs};
pub use input::cli::commands::{run_render, run_worker};
pub use presenters::file::ImageFilePresenter;
pub use presenters::terminal::presenter::TerminalPresenter;
pub use protocol::codec::{ProtocolError, decode_request, decode_response, encode};
pub use protocol::messages::{
    DrawImageRequest, DrawImageRequestError, ProgressUpdate, RenderResult, WorkerRequest,
    WorkerResponse,
};
pub use protocol::worker_id::WorkerId;
