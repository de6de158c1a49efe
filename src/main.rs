use clap::Parser;
use log::error;

use circle_fractal::{Cli, Command, run_render, run_worker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Worker => run_worker(),
    };

    if let Err(err) = &result {
        error!("{err}");
    }

    result
}
