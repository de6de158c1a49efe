use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::render_settings::RenderSettings;

#[derive(Parser, Debug)]
#[command(name = "circle_fractal", version, about = "Render circle fractals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render an image file.
    Render(RenderArgs),
    /// Serve render requests as newline-delimited JSON on stdin/stdout.
    Worker,
}

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// JSON settings file; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    #[arg(short = 'd', long)]
    pub division_factor: Option<u32>,

    #[arg(short = 'c', long)]
    pub cut_off: Option<f64>,

    /// Render rows in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Render rows on one thread, overriding a settings file.
    #[arg(long, conflicts_with = "parallel")]
    pub sequential: bool,

    /// Render in a child worker process instead of a thread.
    #[arg(long)]
    pub isolated: bool,

    /// Output file, `.png` or `.ppm`.
    #[arg(short, long, default_value = "output/circle_fractal.png")]
    pub output: PathBuf,
}

impl RenderArgs {
    /// Applies the flags given on the command line on top of `settings`.
    #[must_use]
    pub fn apply(&self, settings: RenderSettings) -> RenderSettings {
        RenderSettings {
            width: self.width.unwrap_or(settings.width),
            height: self.height.unwrap_or(settings.height),
            number_of_iterations: self.iterations.unwrap_or(settings.number_of_iterations),
            division_factor: self.division_factor.unwrap_or(settings.division_factor),
            cut_off: self.cut_off.unwrap_or(settings.cut_off),
            parallel: !self.sequential && (self.parallel || settings.parallel),
        }
    }
}
