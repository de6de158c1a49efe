//! Input adapters: turn command-line input into settings and controller calls.

pub mod cli;
