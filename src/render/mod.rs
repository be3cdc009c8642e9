pub mod renderer;
pub mod surface;

pub use renderer::{food_blink_on, Renderer};
pub use surface::{Surface, Tone};
