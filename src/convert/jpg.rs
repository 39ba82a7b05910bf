//! JPG conversion path
//!
//! Rasterizes an SVG at an integer upscale factor chosen so the larger
//! dimension reaches 8000 pixels, flattens transparency against white,
//! and encodes the result as a quality-95 JPEG next to the input.

use crate::convert::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use once_cell::sync::Lazy;
use resvg::usvg::{self, Transform};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Pixel ceiling the larger output dimension should reach
const TARGET_EDGE: f32 = 8000.0;

/// Fixed JPEG encode quality
const JPEG_QUALITY: u8 = 95;

/// System font database for SVG text, loaded once and shared by all
/// conversions (loading system fonts per file is far too slow)
static FONTDB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Convert an SVG file to a high-resolution JPG written next to it.
///
/// # Arguments
/// * `svg_path` - Path to the input SVG
///
/// # Returns
/// * `Ok(jpg_path)` - Path of the `.jpg` output
/// * `Err(ConvertError)` - Read/parse failure, invalid dimensions,
///   rasterization failure, or encode failure
pub fn convert(svg_path: &Path) -> Result<PathBuf, ConvertError> {
    let jpg_path = svg_path.with_extension("jpg");

    let svg_data = std::fs::read(svg_path)?;
    let options = usvg::Options {
        fontdb: FONTDB.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(&svg_data, &options)
        .map_err(|e| ConvertError::SvgParse(e.to_string()))?;

    let (width, height) = declared_dimensions(&tree)?;
    let scale = upscale_factor(width, height);

    let pixmap = rasterize(&tree, width, height, scale)?;
    let rgb = flatten_to_rgb(&pixmap);
    write_jpeg(&jpg_path, &rgb, pixmap.width(), pixmap.height())?;

    println!(
        "🖼️  Exported JPG: {} ({}x{}, scale {})",
        jpg_path.display(),
        pixmap.width(),
        pixmap.height(),
        scale
    );

    Ok(jpg_path)
}

/// Declared SVG dimensions in user units, truncated to whole numbers
fn declared_dimensions(tree: &usvg::Tree) -> Result<(u32, u32), ConvertError> {
    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;

    if width == 0 || height == 0 {
        return Err(ConvertError::InvalidDimensions { width, height });
    }

    Ok((width, height))
}

/// Smallest integer scale at which the larger dimension reaches the
/// 8000-pixel ceiling. Kept as a float because the rasterizer takes a
/// float scale. The ceil keeps it at 1 or above, so oversized inputs are
/// rendered as-is rather than shrunk.
pub fn upscale_factor(width: u32, height: u32) -> f32 {
    (TARGET_EDGE / width as f32)
        .max(TARGET_EDGE / height as f32)
        .ceil()
}

/// Rasterize the parsed SVG tree into an RGBA pixmap at the given scale.
///
/// Output dimensions are computed in u64 first: an extreme aspect ratio
/// (say 1x536871 user units) pushes the scaled edge past u32::MAX, which
/// must be an error, not a wrapped-around tiny pixmap.
fn rasterize(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<Pixmap, ConvertError> {
    let out_width = width as u64 * scale as u64;
    let out_height = height as u64 * scale as u64;

    if out_width > u32::MAX as u64 || out_height > u32::MAX as u64 {
        return Err(ConvertError::PixmapAllocation {
            width: out_width,
            height: out_height,
        });
    }

    let out_width = out_width as u32;
    let out_height = out_height as u32;

    let mut pixmap = Pixmap::new(out_width, out_height).ok_or(ConvertError::PixmapAllocation {
        width: out_width as u64,
        height: out_height as u64,
    })?;

    let transform = Transform::from_scale(scale, scale);
    resvg::render(tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Flatten an RGBA pixmap to opaque 3-channel RGB bytes, alpha-compositing
/// against white.
fn flatten_to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixmap.pixels().len() * 3);

    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        let (r, g, b, a) = (color.red(), color.green(), color.blue(), color.alpha());

        if a == 255 {
            rgb.extend_from_slice(&[r, g, b]);
        } else if a == 0 {
            rgb.extend_from_slice(&[255, 255, 255]);
        } else {
            // Alpha composite against white
            let af = a as u16;
            let cr = ((r as u16 * af + 255 * (255 - af)) / 255) as u8;
            let cg = ((g as u16 * af + 255 * (255 - af)) / 255) as u8;
            let cb = ((b as u16 * af + 255 * (255 - af)) / 255) as u8;
            rgb.extend_from_slice(&[cr, cg, cb]);
        }
    }

    rgb
}

/// Encode RGB bytes as a JPEG file at the fixed quality setting
fn write_jpeg(path: &Path, rgb: &[u8], width: u32, height: u32) -> Result<(), ConvertError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    encoder
        .encode(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| ConvertError::JpegEncode(e.to_string()))?;

    Ok(())
}
