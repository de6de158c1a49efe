use crate::controllers::coordinator::events::RenderEvent;

pub trait CoordinatorPresenterPort: Send + Sync {
    fn present(&self, event: RenderEvent);
}
