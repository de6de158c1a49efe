//! Render coordination: one live worker at a time, newest job wins.

mod controller;
pub mod error;
pub mod events;
pub mod ports;

pub use controller::{Coordinator, Delivery, JobState};
pub use error::CoordinatorError;
pub use events::{FrameData, RenderEvent, RenderFailure};
pub use ports::presenter::CoordinatorPresenterPort;
