use std::sync::Mutex;

use circle_fractal::{CoordinatorPresenterPort, RenderEvent, RenderSettings};

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingPresenter {
    pub fn take_events(&self) -> Vec<RenderEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl CoordinatorPresenterPort for RecordingPresenter {
    fn present(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn settings(width: u32, height: u32, number_of_iterations: u32) -> RenderSettings {
    RenderSettings {
        width,
        height,
        number_of_iterations,
        division_factor: 2,
        cut_off: 1.5,
        parallel: false,
    }
}
