//! Background batch runner
//!
//! Runs one conversion operation over an ordered file list on the blocking
//! thread pool, emitting a progress percentage after each file and a single
//! completion event at the end. A per-file failure is logged and the batch
//! moves on to the next file; only the log distinguishes a failed file from
//! a converted one.

use crate::convert::{self, ConvertError};
use iced::futures::{SinkExt, Stream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which conversion a batch stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Eps,
    Jpg,
}

impl Operation {
    /// Human-readable stage name for status messages
    pub fn label(self) -> &'static str {
        match self {
            Operation::Eps => "EPS",
            Operation::Jpg => "JPG",
        }
    }

    /// Run this conversion on a single input file
    pub fn convert(self, svg_path: &Path) -> Result<PathBuf, ConvertError> {
        match self {
            Operation::Eps => convert::eps::convert(svg_path),
            Operation::Jpg => convert::jpg::convert(svg_path),
        }
    }
}

/// Notifications emitted by a running batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Percent complete after each file, rounded to the nearest whole number
    Progress(u8),
    /// The batch finished (sent exactly once, after the last file)
    Completed,
}

/// Run `op` over `files` in order, yielding progress and completion events
pub fn stream(files: Vec<PathBuf>, op: Operation) -> impl Stream<Item = BatchEvent> {
    stream_with(files, move |path| op.convert(path))
}

/// Batch runner over an arbitrary per-file conversion function.
///
/// Each file is converted on `spawn_blocking` so the UI executor is never
/// blocked by subprocess or rasterization work. Files run strictly one at
/// a time; there is no cancellation once the stream is being polled.
pub fn stream_with<F>(files: Vec<PathBuf>, convert: F) -> impl Stream<Item = BatchEvent>
where
    F: Fn(&Path) -> Result<PathBuf, ConvertError> + Send + Sync + 'static,
{
    iced::stream::channel(8, move |mut output| async move {
        let total = files.len();
        let convert = Arc::new(convert);

        for (i, file) in files.into_iter().enumerate() {
            let input = file.clone();
            let convert = Arc::clone(&convert);

            match tokio::task::spawn_blocking(move || convert(&file)).await {
                Ok(Ok(out)) => println!("✅ Converted: {}", out.display()),
                Ok(Err(e)) => eprintln!("⚠️  Conversion failed for {}: {}", input.display(), e),
                Err(e) => eprintln!("⚠️  Conversion panicked for {}: {}", input.display(), e),
            }

            let percent = (((i + 1) as f64 / total as f64) * 100.0).round() as u8;
            let _ = output.send(BatchEvent::Progress(percent)).await;
        }

        let _ = output.send(BatchEvent::Completed).await;
    })
}
