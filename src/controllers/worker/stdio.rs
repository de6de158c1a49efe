use std::io::{BufRead, Write};
use std::sync::Mutex;

use log::{debug, info};

use crate::controllers::worker::error::WorkerError;
use crate::controllers::worker::job::run_draw_image;
use crate::controllers::worker::ports::response_sink::ResponseSink;
use crate::core::actions::cancellation::NeverCancel;
use crate::protocol::codec::{decode_request, encode};
use crate::protocol::messages::{WorkerRequest, WorkerResponse};

/// Serves requests read line by line from `input`, writing each response as
/// one line to `output`, until `input` is exhausted.
///
/// An unrecognized or malformed request ends the loop with an error. The
/// worker stays usable across any number of requests until then.
pub fn run_stdio_worker<R, W>(input: R, output: W) -> Result<(), WorkerError>
where
    R: BufRead,
    W: Write + Send,
{
    let sink = LineSink {
        output: Mutex::new(output),
    };

    for line in input.lines() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        match decode_request(&line)? {
            WorkerRequest::DrawImage(request) => {
                info!("worker {}: drawing image", request.worker_id());
                run_draw_image(&request, &sink, &NeverCancel)?;
            }
        }
    }

    debug!("worker input closed");

    Ok(())
}

struct LineSink<W> {
    output: Mutex<W>,
}

impl<W: Write + Send> ResponseSink for LineSink<W> {
    fn send(&self, response: WorkerResponse) -> Result<(), WorkerError> {
        let line = encode(&response)?;
        let mut output = self.output.lock().map_err(|_| WorkerError::Disconnected)?;

        writeln!(output, "{line}")?;
        output.flush()?;

        Ok(())
    }
}
