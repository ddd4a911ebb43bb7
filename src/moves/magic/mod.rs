pub mod attacks;
pub mod precompute;
pub mod search;
pub mod structs;

pub use precompute::{MAGIC_SEED, Slider, generate_slider_magics};
pub use structs::{MagicEntry, SliderMagics};
