//! Output backends: PNG files and SVG canvases.

mod png_encoder;
mod svg;

pub use png_encoder::PngEncoder;
pub use svg::SvgCanvas;
