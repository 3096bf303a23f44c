//! Transfer unit: one multipart payload ready for transport.

use crate::source::FileSlice;

/// Chunk position of a unit within its file (both 1-based `part` and total).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMeta {
    /// Total chunk count for the file.
    pub parts: u32,
    /// 1-based index of this chunk.
    pub part: u32,
}

/// Value of one multipart field: plain text or a binary blob with a filename.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Blob { data: FileSlice, filename: String },
}

/// A named multipart field. Field order is wire order.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// One multipart payload, owned by the queue until transferred or removed.
///
/// Immutable once planned, except that extra text fields may be appended
/// via the engine's `add_fields_to_all`; chunk metadata never changes.
#[derive(Debug, Clone)]
pub struct TransferUnit {
    fields: Vec<FormField>,
    chunk: Option<ChunkMeta>,
}

impl TransferUnit {
    pub(crate) fn new(chunk: Option<ChunkMeta>) -> Self {
        Self {
            fields: Vec::new(),
            chunk,
        }
    }

    pub(crate) fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        });
    }

    pub(crate) fn push_blob(&mut self, name: impl Into<String>, data: FileSlice, filename: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::Blob {
                data,
                filename: filename.into(),
            },
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn chunk(&self) -> Option<ChunkMeta> {
        self.chunk
    }

    pub fn is_chunked(&self) -> bool {
        self.chunk.is_some()
    }

    /// Text value of a named field, if present (introspection helper).
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    /// Binary slice of a named field, if present.
    pub fn blob_field(&self, name: &str) -> Option<&FileSlice> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Blob { data, .. } if f.name == name => Some(data),
            _ => None,
        })
    }

    /// Total binary payload carried by this unit.
    pub fn payload_len(&self) -> u64 {
        self.fields
            .iter()
            .map(|f| match &f.value {
                FieldValue::Blob { data, .. } => data.len(),
                FieldValue::Text(_) => 0,
            })
            .sum()
    }
}
