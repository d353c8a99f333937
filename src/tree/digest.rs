//! Content digests for file equality using BLAKE3

use blake3::Hasher;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Digest length in bytes (128 bits)
pub const DIGEST_LEN: usize = 16;

/// Default read size when streaming a file into the hasher
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Content-derived equality token for a single file.
///
/// Only equality is meaningful; digests are never ordered or persisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Streams readers through BLAKE3 in fixed-size chunks
#[derive(Debug, Clone)]
pub struct Digester {
    chunk_size: usize,
}

impl Default for Digester {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Digester {
    /// Create a digester reading `chunk_size` bytes at a time.
    ///
    /// A zero chunk size is clamped to one byte; the digest does not depend on it.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest everything readable from `reader`
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Digest> {
        let mut hasher = Hasher::new();
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }

        let mut out = [0u8; DIGEST_LEN];
        hasher.finalize_xof().fill(&mut out);
        Ok(Digest(out))
    }

    /// Digest the file at `path`
    pub fn digest_file(&self, path: &Path) -> std::io::Result<Digest> {
        let file = File::open(path)?;
        self.digest_reader(file)
    }

    /// Digest an in-memory byte slice
    pub fn digest_bytes(&self, content: &[u8]) -> Digest {
        let mut out = [0u8; DIGEST_LEN];
        let mut hasher = Hasher::new();
        hasher.update(content);
        hasher.finalize_xof().fill(&mut out);
        Digest(out)
    }
}
