use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail, ensure};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Look up a file entry by its exact name.
    ///
    /// Directory entries never match. When the Central Directory names the
    /// same file more than once, the last entry wins.
    pub async fn find_file(&self, name: &str) -> Result<Option<ZipFileEntry>> {
        let entries = self.list_files().await?;
        Ok(entries
            .into_iter()
            .rev()
            .find(|e| !e.is_directory && e.file_name == name))
    }

    /// Extract file data to memory, verifying size and CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("{} is encrypted, encrypted entries are not supported", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => inflate(&raw, entry.uncompressed_size)
                .with_context(|| format!("Failed to inflate {}", entry.file_name))?,
            CompressionMethod::Unknown(method) => bail!(
                "Unsupported compression method {} for {} (only STORED and DEFLATE are supported)",
                method,
                entry.file_name
            ),
        };

        ensure!(
            data.len() as u64 == entry.uncompressed_size,
            "{} is {} bytes, Central Directory says {}",
            entry.file_name,
            data.len(),
            entry.uncompressed_size
        );

        let mut crc = Crc::new();
        crc.update(&data);
        ensure!(
            crc.sum() == entry.crc32,
            "CRC-32 mismatch for {}: expected {:08x}, got {:08x}",
            entry.file_name,
            entry.crc32,
            crc.sum()
        );

        debug!(
            file = %entry.file_name,
            method = entry.compression_method.as_u16(),
            compressed = entry.compressed_size,
            size = data.len(),
            "extracted entry"
        );

        Ok(data)
    }
}

/// Inflate raw DEFLATE data, reading at most one byte past the declared size
/// so an oversized stream is detected without being buffered in full.
fn inflate(raw: &[u8], uncompressed_size: u64) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(uncompressed_size.min(raw.len() as u64 * 4) as usize);
    DeflateDecoder::new(raw)
        .take(uncompressed_size.saturating_add(1))
        .read_to_end(&mut data)?;
    Ok(data)
}
