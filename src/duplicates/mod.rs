//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Incremental size bucketing with lazy checksums ([`index`])
//! - Scan orchestration over one or more roots ([`finder`])

pub mod finder;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use index::{
    BucketDigest, ChecksumEntry, ConfirmedDuplicate, DuplicateIndex, DuplicatePair,
    DuplicateRole, IndexStats, SizeBucketEntry, Verdict,
};
