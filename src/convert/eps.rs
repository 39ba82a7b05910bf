//! EPS conversion path
//!
//! Shells out to Inkscape for the actual SVG → EPS export, then pads the
//! resulting file in place with inert PostScript comment lines until its
//! size lands in a target window.

use crate::convert::ConvertError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Smallest size padding will aim for (0.5 MiB)
pub const MIN_TARGET_SIZE: u64 = 512 * 1024;

/// Largest size padding will aim for (80 MiB)
pub const MAX_TARGET_SIZE: u64 = 80 * 1024 * 1024;

/// Random characters per padding block
const PADDING_CHARS: usize = 1000;

/// Convert an SVG file to a padded EPS written next to it.
///
/// # Arguments
/// * `svg_path` - Path to the input SVG
///
/// # Returns
/// * `Ok(eps_path)` - Path of the `.eps` output
/// * `Err(ConvertError)` - Subprocess launch failure, missing output, or
///   an I/O error while padding
pub fn convert(svg_path: &Path) -> Result<PathBuf, ConvertError> {
    let eps_path = svg_path.with_extension("eps");

    run_inkscape(svg_path, &eps_path)?;

    // Inkscape writes nothing on bad input, so check before padding
    if !eps_path.exists() {
        return Err(ConvertError::MissingOutput(eps_path));
    }

    let final_size = pad_to_target(&eps_path)?;
    println!(
        "📄 Exported EPS: {} ({:.1} MiB)",
        eps_path.display(),
        final_size as f64 / 1024.0 / 1024.0
    );

    Ok(eps_path)
}

/// Invoke Inkscape to export `svg` as a PostScript level 2 EPS.
///
/// Stdout/stderr are discarded and the exit code is not checked; Inkscape
/// reports some benign conditions through both. A missing binary still
/// surfaces as an I/O error from the spawn itself.
fn run_inkscape(svg: &Path, eps: &Path) -> Result<(), ConvertError> {
    Command::new("inkscape")
        .arg(format!("--export-filename={}", eps.display()))
        .arg("--export-type=eps")
        .arg("--export-ps-level=2")
        .arg(svg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    Ok(())
}

/// Compute the size a file of `original` bytes should be padded to:
/// double the original, clamped to the [MIN, MAX] target window.
fn target_size(original: u64) -> u64 {
    original
        .saturating_mul(2)
        .clamp(MIN_TARGET_SIZE, MAX_TARGET_SIZE)
}

/// Append comment-formatted random padding to `path` until it reaches its
/// target size.
///
/// Never truncates: a file already at or past its target is left untouched,
/// even if it exceeds `MAX_TARGET_SIZE`. The append is in place and
/// non-atomic. Returns the final size in bytes.
pub fn pad_to_target(path: &Path) -> Result<u64, ConvertError> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    let original = file.metadata()?.len();

    let target = target_size(original);
    if target <= original {
        return Ok(original);
    }

    let block = padding_block();
    let mut size = original;
    while size < target {
        file.write_all(block.as_bytes())?;
        size += block.len() as u64;
    }

    Ok(size)
}

/// A single inert padding block: a PostScript comment line filled with
/// random alphanumeric characters, so downstream parsers skip it.
fn padding_block() -> String {
    let noise: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PADDING_CHARS)
        .map(char::from)
        .collect();

    format!("\n%% Padding to increase file size (ignore this): {}\n", noise)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of_size(dir: &tempfile::TempDir, name: &str, size: usize) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![b'x'; size]).unwrap();
        path
    }

    #[test]
    fn test_target_size_clamps_to_window() {
        assert_eq!(target_size(0), MIN_TARGET_SIZE);
        assert_eq!(target_size(100 * 1024), MIN_TARGET_SIZE);
        assert_eq!(target_size(1024 * 1024), 2 * 1024 * 1024);
        assert_eq!(target_size(MAX_TARGET_SIZE), MAX_TARGET_SIZE);
        assert_eq!(target_size(MAX_TARGET_SIZE * 2), MAX_TARGET_SIZE);
    }

    #[test]
    fn test_small_file_padded_to_minimum() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_of_size(&dir, "small.eps", 1000);

        let final_size = pad_to_target(&path).unwrap();

        assert!(final_size >= MIN_TARGET_SIZE);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), final_size);
    }

    #[test]
    fn test_midsize_file_roughly_doubles() {
        let start = 1024 * 1024;
        let dir = tempfile::tempdir().unwrap();
        let path = file_of_size(&dir, "mid.eps", start);

        let final_size = pad_to_target(&path).unwrap();

        assert!(final_size >= 2 * start as u64);
        assert!(final_size > start as u64);
    }

    #[test]
    fn test_file_at_minimum_never_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_of_size(&dir, "min.eps", MIN_TARGET_SIZE as usize);

        let final_size = pad_to_target(&path).unwrap();

        assert!(final_size >= MIN_TARGET_SIZE);
        assert!(final_size >= 2 * MIN_TARGET_SIZE);
    }

    #[test]
    fn test_padding_is_comment_formatted() {
        let original = 2000;
        let dir = tempfile::tempdir().unwrap();
        let path = file_of_size(&dir, "fmt.eps", original);

        pad_to_target(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let appended = &contents[original..];
        assert!(appended.starts_with("\n%% Padding to increase file size (ignore this): "));

        // Every padding line is a PostScript comment
        for line in appended.lines().filter(|l| !l.is_empty()) {
            assert!(line.starts_with("%% "), "non-comment padding line: {}", line);
        }
    }

    #[test]
    fn test_padding_blocks_differ() {
        let a = padding_block();
        let b = padding_block();
        assert_ne!(a, b);
        assert!(a.len() > PADDING_CHARS);
    }

    #[test]
    fn test_convert_fails_without_valid_input() {
        // Whether inkscape is installed or not, a garbage input must not
        // yield a padded EPS: either the spawn fails or no output appears.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.svg");
        std::fs::write(&path, "definitely not an svg").unwrap();

        assert!(convert(&path).is_err());
    }
}
