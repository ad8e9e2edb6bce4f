//! PNG encoding of framebuffers.
//!
//! Rasters produced by the scalar-field renderer are encoded here,
//! either straight to disk or to an in-memory byte vector for base64
//! embedding in SVG output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// Encodes a [`Framebuffer`] as 8-bit RGBA PNG.
pub struct PngEncoder;

impl PngEncoder {
    /// Encode `fb` into any writer.
    fn encode<W: Write>(fb: &Framebuffer, sink: W) -> Result<()> {
        let mut encoder = png::Encoder::new(sink, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(fb.pixels())?;
        Ok(())
    }

    /// Encode to an in-memory PNG byte vector.
    ///
    /// # Errors
    ///
    /// Returns an error when PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        Self::encode(fb, &mut bytes)?;
        Ok(bytes)
    }

    /// Encode straight to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error when file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        Self::encode(fb, BufWriter::new(File::create(path)?))
    }
}
