use std::error::Error;
use std::fs;
use std::io::{self, BufWriter};
use std::sync::Arc;

use log::debug;

use crate::config::render_settings::RenderSettings;
use crate::controllers::cli::render_file::RenderFileController;
use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::controllers::worker::ports::worker_context::WorkerFactory;
use crate::controllers::worker::process_worker::ProcessWorkerFactory;
use crate::controllers::worker::stdio::run_stdio_worker;
use crate::controllers::worker::thread_worker::ThreadWorkerFactory;
use crate::input::cli::args::RenderArgs;
use crate::presenters::file::ImageFilePresenter;
use crate::presenters::terminal::presenter::TerminalPresenter;

pub fn run_render(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)?,
        None => RenderSettings::default(),
    };
    let settings = args.apply(base);
    debug!("effective settings: {settings:?}");

    let presenter = ImageFilePresenter::for_path(&args.output)?;

    if let Some(parent) = args.output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if args.isolated {
        render_with(ProcessWorkerFactory::current_exe()?, presenter, &settings, args)
    } else {
        render_with(ThreadWorkerFactory, presenter, &settings, args)
    }
}

fn render_with<F, P>(
    factory: F,
    presenter: P,
    settings: &RenderSettings,
    args: &RenderArgs,
) -> Result<(), Box<dyn Error>>
where
    F: WorkerFactory,
    P: FilePresenterPort,
{
    let terminal = Arc::new(TerminalPresenter::new(io::stdout()));
    let mut controller = RenderFileController::new(factory, presenter, terminal);

    controller.generate(settings)?;
    controller.write(&args.output)?;
    println!("Saved {}", args.output.display());

    Ok(())
}

pub fn run_worker() -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout());

    run_stdio_worker(stdin, stdout)?;

    Ok(())
}
