use super::ReadAt;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// In-memory archive contents, read without regard to the file's name.
#[derive(Debug, Clone)]
pub struct ArchiveBuffer {
    data: Arc<[u8]>,
}

impl ArchiveBuffer {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for ArchiveBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for ArchiveBuffer {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

#[async_trait]
impl ReadAt for ArchiveBuffer {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Ok(0);
        }

        let start = offset as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_at_clamps_to_end() {
        let buffer = ArchiveBuffer::from(&b"abcdef"[..]);
        let mut buf = [0u8; 4];

        assert_eq!(buffer.read_at(4, &mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(buffer.read_at(6, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn read_exact_at_rejects_short_reads() {
        let buffer = ArchiveBuffer::from(vec![1u8, 2, 3]);
        let mut buf = [0u8; 3];

        buffer.read_exact_at(0, &mut buf).await.unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert!(buffer.read_exact_at(1, &mut buf).await.is_err());
    }
}
