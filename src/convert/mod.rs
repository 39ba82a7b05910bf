//! SVG conversion module
//!
//! This module handles the two per-file conversion paths:
//! - EPS export via the Inkscape subprocess, padded to a target size (eps.rs)
//! - High-resolution JPG rasterization via resvg (jpg.rs)
//!
//! Both paths derive the output path from the input path (same stem,
//! different extension) and write it alongside the input.

pub mod eps;
pub mod jpg;

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the per-file conversion paths.
///
/// The batch runner catches these, logs them, and moves on to the next
/// file, so a single bad input never aborts the rest of the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("SVG declares invalid dimensions ({width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("could not allocate a {width}x{height} pixmap")]
    PixmapAllocation { width: u64, height: u64 },

    #[error("JPEG encoding failed: {0}")]
    JpegEncode(String),

    #[error("no EPS output was produced at {}", .0.display())]
    MissingOutput(PathBuf),
}
