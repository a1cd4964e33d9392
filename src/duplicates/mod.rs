//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size bucketing (files with a unique size are never hashed)
//! - Parallel content hashing of the remaining candidates
//! - Duplicate set resolution and scan statistics

pub mod finder;
pub mod groups;

// Re-export main types
pub use finder::{DuplicateFinder, ScanConfig, ScanSummary};
pub use groups::{group_by_size, DuplicateSet, GroupingStats};
