//! # ss-search
//!
//! Candidate-space generation and quality summarization for SlimScan.
//!
//! Provides the exhaustive grid over per-position layer ranges (with
//! zero-stripping and deduplication) and the pure reduction of raw
//! cost/error sequences to a summarized result row.

mod generator;
mod quality;

pub use generator::{generate, grid_size};
pub use quality::{mean, summarize, tail_mean};
