//! Sandboxed in-memory file store
//!
//! Holds `/main.typ` plus any assets handed in with a render request. Paths
//! are virtual; traversal outside the root is refused.

use std::collections::HashMap;

use typst::foundations::Bytes;
use typst::syntax::{FileId, Source, VirtualPath};

use crate::compiler::errors::RenderError;

pub const MAIN_PATH: &str = "/main.typ";

#[derive(Debug)]
pub struct VirtualFilesystem {
    files: HashMap<FileId, Bytes>,
    main_id: FileId,
}

impl VirtualFilesystem {
    /// Create a filesystem whose entry point is `source`
    pub fn new(source: String) -> Self {
        let main_id = file_id(MAIN_PATH);
        let mut files = HashMap::new();
        files.insert(main_id, Bytes::from(source.into_bytes()));
        Self { files, main_id }
    }

    /// Mount an additional file (image, included module)
    pub fn mount_file(&mut self, path: &str, content: Bytes) -> Result<FileId, RenderError> {
        let normalized = normalize_path(path)?;
        if normalized == MAIN_PATH {
            return Err(RenderError::PathSecurityViolation(
                "Assets may not replace the main source".to_string(),
            ));
        }
        let id = file_id(&normalized);
        self.files.insert(id, content);
        Ok(id)
    }

    pub fn main_id(&self) -> FileId {
        self.main_id
    }

    /// Source file by id; `None` for unknown or non-UTF-8 files
    pub fn get_source(&self, id: FileId) -> Option<Source> {
        let bytes = self.files.get(&id)?;
        let text = std::str::from_utf8(bytes).ok()?;
        Some(Source::new(id, text.to_string()))
    }

    pub fn get_file(&self, id: FileId) -> Option<&Bytes> {
        self.files.get(&id)
    }
}

fn file_id(path: &str) -> FileId {
    FileId::new(None, VirtualPath::new(path))
}

/// Rooted, slash-separated path with no `..` components
fn normalize_path(path: &str) -> Result<String, RenderError> {
    let parts: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    if parts.iter().any(|part| *part == ".." || part.contains(':')) {
        return Err(RenderError::PathSecurityViolation(format!(
            "Refusing asset path '{}'",
            path
        )));
    }
    if parts.is_empty() {
        return Err(RenderError::PathSecurityViolation(
            "Empty asset path".to_string(),
        ));
    }

    Ok(format!("/{}", parts.join("/")))
}
