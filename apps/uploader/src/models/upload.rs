use bytes::Bytes;
use serde::Serialize;

pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// The file chosen by the user. Never mutated; a new selection replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes: bytes.into(),
        }
    }

    /// Extension hint only; nothing downstream enforces it.
    pub fn looks_like_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }

    pub fn summary(&self) -> SelectedFileSummary {
        SelectedFileSummary {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size_bytes: self.bytes.len(),
        }
    }
}

/// What the UI shows about the current selection; never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFileSummary {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
}
