//! Nakamoto coefficient of a block distribution.

/// Smallest number of entities that together produced more than half of
/// the blocks
///
/// Returns `None` if no blocks were produced.
pub fn compute_nakamoto_coefficient(blocks_per_entity: &[u64]) -> Option<f64> {
    let total: u64 = blocks_per_entity.iter().sum();
    if total == 0 {
        return None;
    }

    let mut sorted = blocks_per_entity.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut accumulated = 0u64;
    for (i, blocks) in sorted.iter().enumerate() {
        accumulated += blocks;
        if accumulated * 2 > total {
            return Some((i + 1) as f64);
        }
    }

    // Unreachable with a positive total
    Some(sorted.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nakamoto() {
        assert_eq!(compute_nakamoto_coefficient(&[60, 40]), Some(1.0));
        assert_eq!(compute_nakamoto_coefficient(&[50, 50]), Some(2.0));
        assert_eq!(compute_nakamoto_coefficient(&[10, 30, 20, 25, 15]), Some(2.0));
        assert_eq!(compute_nakamoto_coefficient(&[0, 0]), None);
    }
}
