//! Attachment loading from disk.

use anyhow::{Context, Result, bail};
use relay_core::transport::FileAttachment;
use std::fs;
use std::path::Path;

/// Fallback MIME type when sniffing fails.
const OCTET_STREAM: &str = "application/octet-stream";

/// Reads a file into a `FileAttachment`, sniffing the MIME type from the
/// file extension.
pub fn load_attachment(path: &Path) -> Result<FileAttachment> {
    let data = fs::read(path).with_context(|| format!("Failed to read attachment: {:?}", path))?;

    let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
        bail!("Attachment path has no file name: {:?}", path);
    };

    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| OCTET_STREAM.to_string());

    Ok(FileAttachment::new(file_name, mime_type, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_loads_file_with_sniffed_mime_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let attachment = load_attachment(&path).unwrap();
        assert_eq!(attachment.file_name, "notes.txt");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.data, b"hello");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_octet_stream() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.weirdext");
        fs::write(&path, [0u8, 1, 2]).unwrap();

        let attachment = load_attachment(&path).unwrap();
        assert_eq!(attachment.mime_type, OCTET_STREAM);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_attachment(&temp_dir.path().join("absent.txt")).is_err());
    }
}
