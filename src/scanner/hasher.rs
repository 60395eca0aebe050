//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes a full-content digest by reading the file in
//! [`CHUNK_SIZE`] chunks, so memory use does not depend on file size.
//! A read that fails part way never yields a digest over the bytes read so
//! far: the whole call fails with a [`HashError`].
//!
//! Digest equality is treated as content equality. There is no byte-by-byte
//! comparison after a match.
//!
//! The [`ChecksumProvider`] trait is the seam the duplicate index hashes
//! through, so the index can be driven by synthetic providers in tests.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::HashError;

/// Read buffer size for streaming checksums (8 KiB).
pub const CHUNK_SIZE: usize = 8 * 1024;

/// A BLAKE3 digest (32 bytes).
pub type Digest = [u8; 32];

/// Computes content digests for files.
pub trait ChecksumProvider {
    /// Compute the digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read.
    fn checksum(&self, path: &Path) -> Result<Digest, HashError>;
}

impl<T: ChecksumProvider + ?Sized> ChecksumProvider for &T {
    fn checksum(&self, path: &Path) -> Result<Digest, HashError> {
        (**self).checksum(path)
    }
}

/// Streaming BLAKE3 file hasher.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    /// Optional shutdown flag, checked between chunks
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown flag. A set flag aborts the current read with
    /// [`HashError::Interrupted`].
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash everything `reader` yields until end of stream.
    ///
    /// # Errors
    ///
    /// Any read error other than `Interrupted` fails the whole hash.
    pub fn hash_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Digest, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }

    /// Compute the BLAKE3 digest of an entire file.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `PermissionDenied` when the file cannot be opened
    /// - `NotAFile` for directories and other non-regular files
    /// - `Unreadable` for any other I/O failure
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let metadata = file.metadata().map_err(|e| HashError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(HashError::NotAFile(path.to_path_buf()));
        }

        let digest = self.hash_reader(path, file)?;
        log::trace!("Checksum {} for {}", hash_to_hex(&digest), path.display());
        Ok(digest)
    }
}

impl ChecksumProvider for Hasher {
    fn checksum(&self, path: &Path) -> Result<Digest, HashError> {
        self.full_hash(path)
    }
}

/// Render a digest as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Digest) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
