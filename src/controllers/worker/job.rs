use std::time::Instant;

use log::{debug, info, trace};

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::ports::response_sink::ResponseSink;
use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::render_image::tiled_renderer::TiledRenderer;
use crate::protocol::messages::{DrawImageRequest, ProgressUpdate, RenderResult, WorkerResponse};

/// Renders one request, streaming `PROGRESS` messages into `sink` and
/// finishing with a single `DRAWING_RESULT`.
///
/// A progress message that cannot be delivered is dropped. Failing to
/// deliver the result is an error.
pub fn run_draw_image<S, C>(request: &DrawImageRequest, sink: &S, cancel: &C) -> Result<(), WorkerError>
where
    S: ResponseSink + ?Sized,
    C: CancelToken + ?Sized,
{
    let worker_id = request.worker_id();
    let pixel_rect = request.pixel_rect();
    let renderer = TiledRenderer::new(pixel_rect, *request.params(), request.mode());

    let progress = |pixels_so_far: u64, total_pixels: u64| {
        trace!("worker {worker_id}: {pixels_so_far}/{total_pixels} pixels");

        let update = ProgressUpdate {
            worker_id,
            pixels_so_far,
            total_pixels,
        };

        if let Err(err) = sink.send(WorkerResponse::Progress(update)) {
            debug!("worker {worker_id}: progress not delivered: {err}");
        }
    };

    let start = Instant::now();
    let buffer = renderer.render(&progress, cancel)?;

    info!(
        "worker {worker_id}: rendered {}x{} in {:?}",
        pixel_rect.width(),
        pixel_rect.height(),
        start.elapsed()
    );

    sink.send(WorkerResponse::DrawingResult(RenderResult::from_buffer(worker_id, buffer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::worker::worker_event::WorkerEvent;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::protocol::worker_id::WorkerId;
    use crossbeam::channel::unbounded;

    #[test]
    fn test_emits_progress_then_single_result() {
        let (tx, rx) = unbounded::<WorkerEvent>();
        let request = DrawImageRequest::new(WorkerId::new(3), 4, 4, 0, 2, 1.5).unwrap();

        run_draw_image(&request, &tx, &NeverCancel).unwrap();
        drop(tx);

        let events: Vec<WorkerEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            WorkerEvent::Response(WorkerResponse::Progress(ProgressUpdate {
                pixels_so_far: 0,
                total_pixels: 16,
                ..
            }))
        ));

        let WorkerEvent::Response(WorkerResponse::DrawingResult(result)) = &events[1] else {
            panic!("expected a drawing result, got {:?}", events[1]);
        };
        assert_eq!(result.worker_id, WorkerId::new(3));
        assert_eq!(result.pixel_buffer.len(), 64);
    }

    #[test]
    fn test_cancelled_job_sends_no_result() {
        let (tx, rx) = unbounded::<WorkerEvent>();
        let request = DrawImageRequest::new(WorkerId::new(1), 32, 32, 2, 2, 1.5).unwrap();
        let cancel = || true;

        let err = run_draw_image(&request, &tx, &cancel).unwrap_err();
        drop(tx);

        assert!(err.is_cancelled());
        assert!(rx.iter().all(|event| !matches!(
            event,
            WorkerEvent::Response(WorkerResponse::DrawingResult(_))
        )));
    }

    #[test]
    fn test_closed_sink_fails_on_result() {
        let (tx, rx) = unbounded::<WorkerEvent>();
        drop(rx);
        let request = DrawImageRequest::new(WorkerId::new(1), 2, 2, 0, 2, 1.5).unwrap();

        let err = run_draw_image(&request, &tx, &NeverCancel).unwrap_err();

        assert!(matches!(err, WorkerError::Disconnected));
    }
}
