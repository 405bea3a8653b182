//! Pulls the `library.json` text out of a backup archive.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::io::{ArchiveBuffer, ReadAt};
use crate::zip::{ZipExtractor, ZipFileEntry};

/// Name of the library entry at the archive root.
pub const LIBRARY_ENTRY: &str = "library.json";

/// Decode the library text from an in-memory archive.
///
/// The bytes are always read as a ZIP container; the name the file arrived
/// under plays no part here.
pub async fn decode(buffer: ArchiveBuffer) -> Result<String> {
    decode_from(Arc::new(buffer)).await
}

/// Decode the library text from any random-access source.
pub async fn decode_from<R: ReadAt + 'static>(reader: Arc<R>) -> Result<String> {
    let extractor = ZipExtractor::new(reader);

    let entry = extractor
        .find_file(LIBRARY_ENTRY)
        .await
        .map_err(ConvertError::corrupt)?
        .ok_or(ConvertError::NotFound)?;

    debug!(
        size = entry.uncompressed_size,
        compressed = entry.compressed_size,
        "found {}",
        LIBRARY_ENTRY
    );

    let bytes = extractor
        .extract_to_memory(&entry)
        .await
        .map_err(ConvertError::corrupt)?;

    // Invalid sequences become U+FFFD
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(error = %err.utf8_error(), "{} is not valid UTF-8, replacing bad bytes", LIBRARY_ENTRY);
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

/// Every entry in the archive, in Central Directory order.
pub async fn list_entries(buffer: ArchiveBuffer) -> Result<Vec<ZipFileEntry>> {
    ZipExtractor::new(Arc::new(buffer))
        .list_files()
        .await
        .map_err(ConvertError::corrupt)
}

/// One line per entry: uncompressed size, right-aligned, then the name.
pub fn format_listing(entries: &[ZipFileEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!("{:>10}  {}", entry.uncompressed_size, entry.file_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ::zip::write::SimpleFileOptions;
    use std::io::{Cursor, Write};

    fn archive(files: &[(&str, &[u8])]) -> ArchiveBuffer {
        let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        ArchiveBuffer::from(writer.finish().unwrap().into_inner())
    }

    #[tokio::test]
    async fn returns_library_text() {
        let buffer = archive(&[
            ("cover.png", b"\x89PNG"),
            ("library.json", br#"{"docs":[]}"#),
        ]);
        assert_eq!(decode(buffer).await.unwrap(), r#"{"docs":[]}"#);
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let buffer = archive(&[("notes/library.json", b"{}")]);
        let err = decode(buffer).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound));

        let err = decode(archive(&[])).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound));
    }

    #[tokio::test]
    async fn garbage_is_corrupt() {
        let err = decode(ArchiveBuffer::from(&b"not a zip at all"[..]))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Corrupt { .. }));
        assert_eq!(err.kind(), ErrorKind::Archive);
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let buffer = archive(&[("library.json", b"{\"docs\": \"caf\xe9\"}")]);
        assert_eq!(decode(buffer).await.unwrap(), "{\"docs\": \"caf\u{FFFD}\"}");
    }

    #[tokio::test]
    async fn lists_every_entry_with_its_size() {
        let buffer = archive(&[("cover.png", b"\x89PNG"), ("library.json", b"{}")]);
        let entries = list_entries(buffer).await.unwrap();

        assert_eq!(
            format_listing(&entries),
            ["         4  cover.png", "         2  library.json"]
        );
    }

    #[tokio::test]
    async fn listing_garbage_is_corrupt() {
        let err = list_entries(ArchiveBuffer::from(vec![7u8; 64]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Archive);
    }
}
