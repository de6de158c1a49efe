//! Output adapters: image files and terminal progress.

pub mod file;
pub mod terminal;
