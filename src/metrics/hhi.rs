//! Herfindahl-Hirschman index of a block distribution.
//!
//! The HHI sums the squared percentage shares of every entity. It ranges
//! from close to 0 (many small producers) to 10,000 (a single producer).
//! Below 1,500 is usually read as competitive, 1,500 to 2,500 as moderately
//! concentrated and above 2,500 as highly concentrated.

/// HHI of per-entity block counts
///
/// Returns `None` if no blocks were produced. Zero-count entities add
/// nothing.
pub fn compute_hhi(blocks_per_entity: &[u64]) -> Option<f64> {
    let total: u64 = blocks_per_entity.iter().sum();
    if total == 0 {
        return None;
    }

    Some(
        blocks_per_entity
            .iter()
            .map(|&blocks| (blocks as f64 / total as f64 * 100.0).powi(2))
            .sum(),
    )
}
