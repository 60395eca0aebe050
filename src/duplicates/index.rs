//! Incremental duplicate index: size buckets first, checksums second.
//!
//! # Overview
//!
//! [`DuplicateIndex`] receives candidates one at a time in traversal order
//! and decides, for each, whether it duplicates something already seen.
//!
//! 1. The first file of a given byte length only opens a size bucket. It is
//!    not hashed.
//! 2. When a second file of that length arrives, the candidate is hashed,
//!    and the bucket's first file is hashed lazily (once, ever).
//! 3. Digests are cached with the first file that produced them. A later
//!    file whose digest is already cached from a different path is a
//!    confirmed duplicate of that first file.
//!
//! For N files of one length, at most N checksums are computed, and a file
//! whose digest is cached is never hashed again. Files that cannot be read
//! are excluded and never appear in the results.
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::duplicates::{DuplicateIndex, Verdict};
//! use dupewalk::scanner::{FileCandidate, Hasher};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let mut index = DuplicateIndex::new(Hasher::new());
//! let now = SystemTime::now();
//!
//! index.consider(FileCandidate::new(PathBuf::from("/data/a.iso"), 4096, now));
//! match index.consider(FileCandidate::new(PathBuf::from("/data/b.iso"), 4096, now)) {
//!     Verdict::Duplicate(pair) => println!("{} duplicates {}", pair.duplicate.display(), pair.original.display()),
//!     other => println!("{:?}", other),
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::scanner::{hash_to_hex, ChecksumProvider, Digest, FileCandidate, HashError};

/// Digest state of a size bucket's first file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketDigest {
    /// Not hashed yet; no second file of this size has arrived.
    Pending,
    /// Hashed successfully.
    Known(Digest),
    /// Hashing failed. Never retried.
    Unreadable,
}

/// The first file seen at a given byte length.
#[derive(Debug, Clone)]
pub struct SizeBucketEntry {
    /// Path of the first file with this length
    pub path: PathBuf,
    /// Modification time of that file
    pub modified: SystemTime,
    /// Extension of that file
    pub extension: Option<String>,
    /// Lazily computed digest
    pub digest: BucketDigest,
}

/// The first file confirmed to have a given digest. Immutable once inserted.
#[derive(Debug, Clone)]
pub struct ChecksumEntry {
    /// Path of the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// File extension
    pub extension: Option<String>,
    /// Value of the pair counter when this entry was inserted
    pub sequence: u64,
    /// When the digest was first recorded
    pub discovered: DateTime<Local>,
}

/// Whether a confirmed file is the original of its pair or the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateRole {
    /// First file seen with this content
    Original,
    /// Later file with the same content
    Duplicate,
}

/// A file that took part in at least one confirmed duplicate pair.
#[derive(Debug, Clone)]
pub struct ConfirmedDuplicate {
    /// Content digest shared with its partner
    pub digest: Digest,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Pair number (1-based). Originals keep the number of their first pair.
    pub sequence: u64,
    /// When the file was recorded as part of a pair
    pub discovered: DateTime<Local>,
    /// File extension
    pub extension: Option<String>,
    /// Role within the pair
    pub role: DuplicateRole,
}

/// A newly confirmed (original, duplicate) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    /// Pair number (1-based, in confirmation order)
    pub sequence: u64,
    /// Shared digest
    pub digest: Digest,
    /// Shared size in bytes
    pub size: u64,
    /// The first file seen with this content
    pub original: PathBuf,
    /// Modification time of the original
    pub original_modified: SystemTime,
    /// The file just found to duplicate it
    pub duplicate: PathBuf,
    /// Modification time of the duplicate
    pub duplicate_modified: SystemTime,
}

/// Outcome of considering one candidate.
#[derive(Debug)]
pub enum Verdict {
    /// First file of its size; recorded, not hashed.
    FirstOfSize,
    /// The candidate could not be hashed and is excluded.
    Excluded(HashError),
    /// Same size as an earlier file, but new content.
    Unique,
    /// Same content as an earlier file at a different path.
    Duplicate(DuplicatePair),
    /// The same path was already recorded (overlapping traversal).
    AlreadySeen,
}

/// Counters kept while indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Candidates passed to [`DuplicateIndex::consider`]
    pub considered: usize,
    /// Checksums computed (successful or not)
    pub checksums_computed: usize,
    /// Files excluded because they could not be hashed
    pub excluded: usize,
    /// Confirmed duplicate pairs
    pub duplicates: usize,
    /// Total size of all duplicate (non-original) files
    pub wasted_bytes: u64,
}

/// Owned duplicate-detection state for one scan.
///
/// Generic over the [`ChecksumProvider`] so it can run against synthetic
/// digests without touching the filesystem.
#[derive(Debug)]
pub struct DuplicateIndex<C: ChecksumProvider> {
    provider: C,
    size_buckets: HashMap<u64, SizeBucketEntry>,
    checksum_cache: HashMap<Digest, ChecksumEntry>,
    confirmed: HashMap<PathBuf, ConfirmedDuplicate>,
    sequence: u64,
    stats: IndexStats,
}

impl<C: ChecksumProvider> DuplicateIndex<C> {
    /// Create an empty index hashing through `provider`.
    #[must_use]
    pub fn new(provider: C) -> Self {
        Self {
            provider,
            size_buckets: HashMap::new(),
            checksum_cache: HashMap::new(),
            confirmed: HashMap::new(),
            sequence: 0,
            stats: IndexStats::default(),
        }
    }

    /// Decide what `candidate` is relative to everything seen so far.
    ///
    /// Must be called in traversal order: the first path seen with some
    /// content is the original of every later copy.
    pub fn consider(&mut self, candidate: FileCandidate) -> Verdict {
        self.stats.considered += 1;

        if !self.size_buckets.contains_key(&candidate.size) {
            log::trace!(
                "First file of size {}: {}",
                candidate.size,
                candidate.path.display()
            );
            self.size_buckets.insert(
                candidate.size,
                SizeBucketEntry {
                    path: candidate.path,
                    modified: candidate.modified,
                    extension: candidate.extension,
                    digest: BucketDigest::Pending,
                },
            );
            return Verdict::FirstOfSize;
        }

        let first_of_size = self
            .size_buckets
            .get(&candidate.size)
            .is_some_and(|b| b.path == candidate.path);
        if first_of_size || self.confirmed.contains_key(&candidate.path) {
            log::debug!("Already recorded: {}", candidate.path.display());
            return Verdict::AlreadySeen;
        }

        let digest = match self.hash(&candidate.path) {
            Ok(d) => d,
            Err(e @ HashError::Interrupted(_)) => return Verdict::Excluded(e),
            Err(e) => {
                log::debug!("Excluding {}: {}", candidate.path.display(), e);
                self.stats.excluded += 1;
                return Verdict::Excluded(e);
            }
        };

        if let Err(e) = self.resolve_bucket(candidate.size) {
            return Verdict::Excluded(e);
        }

        if !self.checksum_cache.contains_key(&digest) {
            log::trace!(
                "New content {} at {}",
                hash_to_hex(&digest),
                candidate.path.display()
            );
            self.checksum_cache.insert(
                digest,
                ChecksumEntry {
                    path: candidate.path,
                    size: candidate.size,
                    modified: candidate.modified,
                    extension: candidate.extension,
                    sequence: self.sequence,
                    discovered: Local::now(),
                },
            );
            return Verdict::Unique;
        }

        let original = &self.checksum_cache[&digest];
        if original.path == candidate.path {
            log::debug!("Already recorded: {}", candidate.path.display());
            return Verdict::AlreadySeen;
        }

        self.sequence += 1;
        let sequence = self.sequence;
        let discovered = Local::now();

        let pair = DuplicatePair {
            sequence,
            digest,
            size: candidate.size,
            original: original.path.clone(),
            original_modified: original.modified,
            duplicate: candidate.path.clone(),
            duplicate_modified: candidate.modified,
        };

        self.confirmed
            .entry(original.path.clone())
            .or_insert_with(|| ConfirmedDuplicate {
                digest,
                size: original.size,
                modified: original.modified,
                sequence,
                discovered,
                extension: original.extension.clone(),
                role: DuplicateRole::Original,
            });
        self.confirmed.insert(
            candidate.path,
            ConfirmedDuplicate {
                digest,
                size: candidate.size,
                modified: candidate.modified,
                sequence,
                discovered,
                extension: candidate.extension,
                role: DuplicateRole::Duplicate,
            },
        );

        self.stats.duplicates += 1;
        self.stats.wasted_bytes += candidate.size;

        log::debug!(
            "Duplicate #{}: {} == {}",
            sequence,
            pair.duplicate.display(),
            pair.original.display()
        );
        Verdict::Duplicate(pair)
    }

    /// Hash the bucket's first file if that has not been attempted yet.
    ///
    /// An interrupted read leaves the bucket `Pending` and is handed back
    /// so the caller can stop.
    fn resolve_bucket(&mut self, size: u64) -> Result<(), HashError> {
        let (path, modified, extension) = match self.size_buckets.get(&size) {
            Some(b) if b.digest == BucketDigest::Pending => {
                (b.path.clone(), b.modified, b.extension.clone())
            }
            _ => return Ok(()),
        };

        let state = match self.hash(&path) {
            Ok(digest) => {
                if !self.checksum_cache.contains_key(&digest) {
                    self.checksum_cache.insert(
                        digest,
                        ChecksumEntry {
                            path: path.clone(),
                            size,
                            modified,
                            extension,
                            sequence: self.sequence,
                            discovered: Local::now(),
                        },
                    );
                }
                BucketDigest::Known(digest)
            }
            Err(e @ HashError::Interrupted(_)) => return Err(e),
            Err(e) => {
                log::warn!("Could not hash {}: {}", path.display(), e);
                self.stats.excluded += 1;
                BucketDigest::Unreadable
            }
        };

        if let Some(bucket) = self.size_buckets.get_mut(&size) {
            bucket.digest = state;
        }
        Ok(())
    }

    fn hash(&mut self, path: &Path) -> Result<Digest, HashError> {
        self.stats.checksums_computed += 1;
        self.provider.checksum(path)
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Number of confirmed pairs so far.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Confirmed files so far, keyed by path.
    #[must_use]
    pub fn confirmed(&self) -> &HashMap<PathBuf, ConfirmedDuplicate> {
        &self.confirmed
    }

    /// Bucket for a given size, if one was opened.
    #[must_use]
    pub fn bucket(&self, size: u64) -> Option<&SizeBucketEntry> {
        self.size_buckets.get(&size)
    }

    /// Cached entry for a digest, if any.
    #[must_use]
    pub fn cached(&self, digest: &Digest) -> Option<&ChecksumEntry> {
        self.checksum_cache.get(digest)
    }

    /// Consume the index and return every confirmed file.
    #[must_use]
    pub fn into_results(self) -> HashMap<PathBuf, ConfirmedDuplicate> {
        self.confirmed
    }
}
