//! Sidecar-file persistence for annotations and the label class list.

use crate::document::AnnotationDocument;
use crate::obox::OrientedBox;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid annotation record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Sidecar path for an image: the full image filename with `.json`
/// appended (`photo.png` -> `photo.png.json`).
pub fn annotation_path(image_path: &Path) -> PathBuf {
    let mut os = image_path.as_os_str().to_os_string();
    os.push(".json");
    PathBuf::from(os)
}

/// Load the boxes annotated on an image. A missing sidecar file is an
/// empty set, not an error; a malformed record fails fast.
pub fn load_annotations(image_path: &Path) -> StorageResult<Vec<OrientedBox>> {
    let path = annotation_path(image_path);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(&path)?;
    let doc = AnnotationDocument::from_json(&json)?;
    log::debug!("loaded {} boxes from {}", doc.boxes.len(), path.display());
    Ok(doc.boxes.iter().map(OrientedBox::from_record).collect())
}

/// Write the boxes for an image to its sidecar file. Angles are stored in
/// canonical form.
pub fn save_annotations(image_path: &Path, boxes: &[OrientedBox]) -> StorageResult<()> {
    let path = annotation_path(image_path);
    let doc = AnnotationDocument {
        boxes: boxes.iter().map(OrientedBox::to_record).collect(),
    };
    fs::write(&path, doc.to_json()?)?;
    log::info!("saved {} boxes to {}", doc.boxes.len(), path.display());
    Ok(())
}

/// Load the label class list: one class per line, blank lines skipped.
/// A missing file is an empty list.
pub fn load_classes(path: &Path) -> StorageResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Append one class name to the class list file, creating it if needed.
pub fn append_class(path: &Path, name: &str) -> StorageResult<()> {
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{name}")?;
    Ok(())
}
