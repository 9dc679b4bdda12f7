pub mod rng;
pub mod render;

pub use rng::{RngStream, rng_from_seed};
pub use render::{encode_png, encode_view_png, save_png};
