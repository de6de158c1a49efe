pub mod ports;
pub mod tiled_renderer;
