//! Upload source: an in-memory file selection and cheap byte-range views of it.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// A file selected for upload: original filename plus shared contents.
///
/// The contents live behind an `Arc` so planned chunks can hold range views
/// without copying; one file can back many transfer units.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    data: Arc<[u8]>,
}

impl UploadFile {
    /// Read a file from disk, keeping its filename for the multipart payload.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        Ok(Self {
            name,
            data: data.into(),
        })
    }

    /// Wrap bytes already in memory (tests, embedding callers).
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// A `[start, end)` view of the contents; `end` is clamped to the file size.
    pub fn slice(&self, start: u64, end: u64) -> FileSlice {
        let len = self.data.len();
        let end = (end as usize).min(len);
        let start = (start as usize).min(end);
        FileSlice {
            data: Arc::clone(&self.data),
            start,
            end,
        }
    }
}

/// Zero-copy byte range of an [`UploadFile`] (half-open, like an HTTP range).
#[derive(Debug, Clone)]
pub struct FileSlice {
    data: Arc<[u8]>,
    start: usize,
    end: usize,
}

impl FileSlice {
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    pub fn len(&self) -> u64 {
        (self.end - self.start) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The `(start, end)` offsets this slice covers within the source file.
    pub fn range(&self) -> (u64, u64) {
        (self.start as u64, self.end as u64)
    }
}
