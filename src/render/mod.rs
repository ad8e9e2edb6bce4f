//! Raster rendering support.
//!
//! The vector canvas is the primary target; these routines exist for the
//! scalar-field raster mode, which rasterizes into a [`crate::framebuffer::Framebuffer`]
//! before blitting the result as a single image.

pub mod primitives;
