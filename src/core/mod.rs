//! Domain core: pixel data, the circle fractal and the render action.
//! Nothing in here knows about workers, messages or files.

pub mod actions;
pub mod data;
pub mod fractals;
pub mod util;
