//! PDF export
//!
//! Pages are frozen into [`StaticPage`]s on the UI thread, rasterized in
//! parallel by a [`PageRenderer`] and assembled into a PDF. The file is
//! written through a temp file next to the destination and only persisted
//! once everything succeeded, so a failed export leaves nothing behind.

pub mod pdf;
pub mod renderer;
pub mod static_page;

#[cfg(test)]
mod test;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::progress::Progress;

pub use pdf::PageImage;
pub use renderer::{FontSet, PageRenderer, RasterRenderer};
pub use static_page::StaticPage;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("an export is already running")]
    Busy,

    #[error("nothing to export")]
    Empty,

    #[error("failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    #[error("no font available for '{0}'")]
    MissingFont(String),

    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// `document_<unix millis>.pdf` inside `dir`
pub fn default_destination(dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    dir.join(format!("document_{}.pdf", millis))
}

/// Render every page and write the PDF to `destination`.
///
/// `progress` counts rendered pages; the total is set by the caller.
pub fn export_pdf(
    renderer: &dyn PageRenderer,
    pages: &[StaticPage],
    destination: &Path,
    progress: &Progress,
) -> Result<PathBuf, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::Empty);
    }

    let images = pages
        .par_iter()
        .map(|page| {
            let image = renderer.render(page)?;
            progress.inc();
            Ok(PageImage {
                size: page.size,
                image,
            })
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(file.as_file());
        pdf::write_pdf(&images, &mut writer)?;
        writer.flush()?;
    }
    file.persist(destination).map_err(|e| ExportError::Io(e.error))?;

    info!(path = %destination.display(), pages = images.len(), "pdf exported");
    Ok(destination.to_path_buf())
}
