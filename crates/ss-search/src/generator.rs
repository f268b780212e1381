//! Candidate-space generation.
//!
//! Builds the exhaustive grid over per-position layer ranges, strips zero
//! widths ("layer absent"), drops the all-zero point, deduplicates, and
//! returns the candidates sorted ascending for a reproducible run order.

use std::collections::BTreeSet;
use tracing::info;

use ss_types::{CandidateStructure, GenerationError, LayerRange};

/// Total number of raw grid points (before zero-stripping and dedup), or
/// `None` on overflow.
pub fn grid_size(ranges: &[LayerRange]) -> Option<usize> {
    let mut total: usize = 1;
    for range in ranges {
        total = total.checked_mul(range.span())?;
    }
    Some(total)
}

/// Generate the deduplicated, sorted candidate set for the given ranges.
///
/// Every point of the K-dimensional Cartesian product contributes the
/// structure left after removing its zero entries; distinct points that
/// collapse to the same structure appear once. All ranges `[0, 0]` yield an
/// empty candidate set, which is valid (if useless), not an error.
pub fn generate(ranges: &[LayerRange]) -> Result<Vec<CandidateStructure>, GenerationError> {
    if ranges.is_empty() {
        return Err(GenerationError::NoRanges);
    }
    for (position, range) in ranges.iter().enumerate() {
        if range.lo > range.hi {
            return Err(GenerationError::InvalidRange {
                position,
                lo: range.lo,
                hi: range.hi,
            });
        }
    }

    // Cartesian product, one axis at a time.
    let mut points: Vec<Vec<u32>> = vec![Vec::new()];
    for range in ranges {
        let mut next = Vec::with_capacity(points.len() * range.span());
        for existing in &points {
            for width in range.lo..=range.hi {
                let mut point = existing.clone();
                point.push(width);
                next.push(point);
            }
        }
        points = next;
    }

    // BTreeSet gives dedup and ascending lexicographic order in one pass.
    let candidates: BTreeSet<CandidateStructure> = points
        .iter()
        .filter_map(|point| CandidateStructure::from_point(point))
        .collect();
    let candidates: Vec<CandidateStructure> = candidates.into_iter().collect();

    let listing: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
    info!(
        raw_points = points.len(),
        count = candidates.len(),
        "generated candidate structures: {}",
        listing.join(" ")
    );

    Ok(candidates)
}
