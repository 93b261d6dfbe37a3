//! Export file writing.

use anyhow::{Context, Result};
use relay_core::export::ExportDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes an export document into the given directory, creating it if
/// needed. Returns the full path of the written file.
pub fn write_export(document: &ExportDocument, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {:?}", dir))?;
    let path = dir.join(&document.file_name);
    fs::write(&path, &document.contents)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_document_into_fresh_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("exports");
        let document = ExportDocument {
            file_name: "relay-export-2024-01-01.json".to_string(),
            contents: "[]".to_string(),
        };

        let path = write_export(&document, &dir).unwrap();

        assert!(path.ends_with("relay-export-2024-01-01.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
