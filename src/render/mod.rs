mod slide;
mod wrap;

pub use slide::{SlideRenderer, SlideStyle, DEFAULT_FONT_PATH, OUTRO_FONT_SIZE, OUTRO_TEXT};
pub use wrap::wrap_lines;
