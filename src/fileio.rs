use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::history::{rebuild, RestoreError, Snapshot};

#[derive(Error, Debug)]
pub enum FileError {
    #[error("no file name (use :w <path>)")]
    NoPath,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("not a folio document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed document: {0}")]
    Restore(#[from] RestoreError),
}

/// Result of loading a file, including any warnings
pub struct LoadResult {
    /// `None` when the file does not exist yet
    pub snapshot: Option<Snapshot>,
    pub warnings: Vec<String>,
}

/// Reads and writes documents as JSON in the snapshot shape
pub struct FileIO {
    pub file_path: Option<PathBuf>,
}

impl FileIO {
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self { file_path }
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    /// Load the document. Its content is validated as strictly as an undo
    /// restore, so a malformed file is rejected as a whole.
    pub fn load(&self) -> Result<LoadResult, FileError> {
        let path = match self.file_path.as_ref() {
            Some(p) => p,
            None => {
                return Ok(LoadResult {
                    snapshot: None,
                    warnings: Vec::new(),
                })
            }
        };

        if !path.exists() {
            return Ok(LoadResult {
                snapshot: None,
                warnings: vec![format!("New file: {}", path.display())],
            });
        }

        let snapshot = read_snapshot(path)?;
        rebuild(&snapshot)?;
        Ok(LoadResult {
            snapshot: Some(snapshot),
            warnings: Vec::new(),
        })
    }

    /// Write through a temp file in the same directory, then rename
    pub fn write(&self, snapshot: &Snapshot) -> Result<(), FileError> {
        let path = self.file_path.as_ref().ok_or(FileError::NoPath)?;
        write_snapshot(path, snapshot)
    }
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot, FileError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), FileError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file());
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    file.persist(path).map_err(|e| FileError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, PageSize, PaperColor, Px, TextBox, TextBoxId};
    use crate::history::capture_state;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> Snapshot {
        let mut doc = Document::new(PageSize::Legal, PaperColor::Inverted);
        let mut b = TextBox::new(TextBoxId::new("42"), PaperColor::Default, "Arial", Px(12.0));
        b.content = "line one\nline two".to_string();
        doc.add_text_box(1, b);
        doc.insert_page_after(1);
        capture_state(&doc, 2)
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file_io = FileIO::new(Some(dir.path().join("doc.json")));
        file_io.write(&sample()).unwrap();

        let loaded = file_io.load().unwrap();
        assert_eq!(loaded.snapshot, Some(sample()));
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_missing_file_is_new() {
        let dir = tempfile::tempdir().unwrap();
        let file_io = FileIO::new(Some(dir.path().join("new.json")));
        let loaded = file_io.load().unwrap();
        assert!(loaded.snapshot.is_none());
        assert!(loaded.warnings[0].contains("New file"));
    }

    #[test]
    fn test_no_path() {
        let file_io = FileIO::new(None);
        assert!(file_io.load().unwrap().snapshot.is_none());
        assert!(matches!(file_io.write(&sample()), Err(FileError::NoPath)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let file_io = FileIO::new(Some(file.path().to_path_buf()));
        assert!(matches!(file_io.load(), Err(FileError::Json(_))));
    }

    #[test]
    fn test_rejects_missing_field() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["pages"][0]["textBoxes"][0]
            .as_object_mut()
            .unwrap()
            .remove("fontWeight");

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        let file_io = FileIO::new(Some(file.path().to_path_buf()));
        assert!(matches!(file_io.load(), Err(FileError::Json(_))));
    }

    #[test]
    fn test_rejects_malformed_value() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["pages"][0]["textBoxes"][0]["top"] = serde_json::Value::from("12em");

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        let file_io = FileIO::new(Some(file.path().to_path_buf()));
        assert!(matches!(
            file_io.load(),
            Err(FileError::Restore(RestoreError::InvalidField { field: "top", .. }))
        ));
    }
}
