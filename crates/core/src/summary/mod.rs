//! Summary image produced after every successful refresh.
//!
//! The image shows the total country count, the refresh instant and the top
//! five countries by estimated GDP. It lives at a single well-known path and
//! is replaced wholesale each time; see [`SummaryImage::render`].

mod glyphs;
pub mod layout;
mod raster;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::Timestamp;

use self::layout::SummaryLayout;

/// Number of ranked rows on the image.
pub const TOP_N: usize = 5;

/// Default location of the rendered image, relative to the working directory.
pub const DEFAULT_IMAGE_PATH: &str = "cache/summary.png";

/// The two fields of a country record the summary needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GdpEntry<'a> {
    pub name: &'a str,
    pub estimated_gdp: Option<f64>,
}

/// Entries with an estimate, highest first, at most `limit` of them.
///
/// The sort is stable, so equal estimates keep their input order.
pub fn select_top<'a>(entries: &[GdpEntry<'a>], limit: usize) -> Vec<GdpEntry<'a>> {
    let mut ranked: Vec<GdpEntry<'a>> = entries
        .iter()
        .filter(|e| e.estimated_gdp.is_some())
        .copied()
        .collect();
    ranked.sort_by(|a, b| {
        let a = a.estimated_gdp.unwrap_or(f64::NEG_INFINITY);
        let b = b.estimated_gdp.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    ranked.truncate(limit);
    ranked
}

/// Handle on the rendered summary image at a fixed path.
#[derive(Debug, Clone)]
pub struct SummaryImage {
    path: PathBuf,
}

impl SummaryImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an image has been written.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the current image bytes.
    ///
    /// Returns `NotFound` when no refresh has produced an image yet.
    pub fn read(&self) -> Result<Vec<u8>, CoreError> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound {
                entity: "Summary image",
                key: self.path.display().to_string(),
            },
            _ => CoreError::Internal(format!("cannot read {}: {e}", self.path.display())),
        })
    }

    /// Render the summary for `entries` and atomically replace the image.
    ///
    /// Blocking: encodes a PNG and performs filesystem I/O.
    pub fn render(
        &self,
        total: usize,
        refreshed_at: Timestamp,
        entries: &[GdpEntry<'_>],
    ) -> Result<(), CoreError> {
        let top = select_top(entries, TOP_N);
        let layout = SummaryLayout::build(total, refreshed_at, &top);
        let canvas = raster::paint(&layout);
        let bytes = raster::encode_png(&canvas)
            .map_err(|e| CoreError::ArtifactWriteFailed(format!("PNG encoding failed: {e}")))?;
        write_atomic(&self.path, &bytes)
    }
}

/// Write to a sibling temporary file, then rename over `path`.
///
/// Readers see either the previous file or the complete new one.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let fail = |what: &str, e: std::io::Error| {
        CoreError::ArtifactWriteFailed(format!("{what} {}: {e}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| fail("cannot create directory for", e))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| CoreError::ArtifactWriteFailed(format!("{} has no file name", path.display())))?;
    let tmp = dir.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4()
    ));

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(fail("cannot write temporary file for", e));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        fail("cannot replace", e)
    })
}
