//! Gini coefficient of a block distribution.

/// Gini coefficient of per-entity block counts
///
/// Returns `None` if no blocks were produced. 0 means every entity produced
/// the same number of blocks; values approach 1 as production concentrates
/// in one entity.
pub fn compute_gini(blocks_per_entity: &[u64]) -> Option<f64> {
    if blocks_per_entity.iter().sum::<u64>() == 0 {
        return None;
    }
    let values: Vec<f64> = blocks_per_entity.iter().map(|&b| b as f64).collect();
    gini(&values)
}

/// Gini coefficient of an arbitrary distribution
///
/// Negative values are shifted up by the minimum first. Returns `None`
/// for an empty distribution or one whose shifted total is zero.
pub fn gini(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    let min = sorted.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        sorted.iter_mut().for_each(|v| *v -= min);
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    if sorted.is_empty() || total == 0.0 {
        return None;
    }

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (2.0 * (i + 1) as f64 - n - 1.0) * x)
        .sum();

    Some(weighted / (n * total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_distributions() {
        assert_eq!(compute_gini(&[]), None);
        assert_eq!(compute_gini(&[0, 0, 0]), None);
    }

    #[test]
    fn test_perfect_equality() {
        assert_eq!(compute_gini(&[5, 5, 5, 5]), Some(0.0));
    }

    #[test]
    fn test_single_entity() {
        // n = 1: (2*1 - 1 - 1) * x / (1 * x) = 0
        assert_eq!(compute_gini(&[4]), Some(0.0));
    }

    #[test]
    fn test_one_producer_among_four() {
        // sorted [0, 0, 0, 10]: (2*4 - 4 - 1) * 10 / (4 * 10)
        assert!(close(compute_gini(&[10, 0, 0, 0]).unwrap(), 0.75));
    }

    #[test]
    fn test_order_insensitive() {
        let a = compute_gini(&[1, 7, 3, 9]).unwrap();
        let b = compute_gini(&[9, 3, 7, 1]).unwrap();
        assert!(close(a, b));
        assert!(close(a, 0.35));
    }

    #[test]
    fn test_negative_values_shifted() {
        // [-2, 0, 2] shifts to [0, 2, 4]
        let shifted = gini(&[-2.0, 0.0, 2.0]).unwrap();
        assert!(close(shifted, gini(&[0.0, 2.0, 4.0]).unwrap()));
        assert_eq!(gini(&[-3.0, -3.0]), None);
    }
}
