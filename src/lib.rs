//! Maintenance helpers for the static exam question banks.

pub mod explanations;
pub mod merge;

pub use explanations::ExplanationMap;
pub use merge::{merge_file, merge_file_with, MergeReport};
