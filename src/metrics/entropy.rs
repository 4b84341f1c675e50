//! Rényi entropy of a block distribution.
//!
//! `alpha = 1` is Shannon entropy, `alpha = 0` is Hartley entropy and
//! `alpha = inf` is min-entropy. All values are in bits.

/// Rényi entropy of order `alpha`
///
/// Returns `None` if no blocks were produced.
pub fn compute_entropy(blocks_per_entity: &[u64], alpha: f64) -> Option<f64> {
    let shares = shares(blocks_per_entity)?;

    let entropy = if alpha == 1.0 {
        -shares.iter().map(|p| p * p.log2()).sum::<f64>()
    } else if alpha.is_infinite() {
        let max = shares.iter().copied().fold(0.0, f64::max);
        -max.log2()
    } else {
        let sum: f64 = shares.iter().map(|p| p.powf(alpha)).sum();
        sum.log2() / (1.0 - alpha)
    };

    // -0.0 for a single producer
    Some(entropy + 0.0)
}

/// Entropy as a percentage of the maximum entropy for the same number of
/// producers
pub fn compute_entropy_percentage(blocks_per_entity: &[u64], alpha: f64) -> Option<f64> {
    let entropy = compute_entropy(blocks_per_entity, alpha)?;
    let producers = blocks_per_entity.iter().filter(|&&b| b > 0).count();
    if producers <= 1 {
        return Some(0.0);
    }
    Some(entropy / (producers as f64).log2() * 100.0)
}

/// Nonzero shares of the total
fn shares(blocks_per_entity: &[u64]) -> Option<Vec<f64>> {
    let total: u64 = blocks_per_entity.iter().sum();
    if total == 0 {
        return None;
    }
    Some(
        blocks_per_entity
            .iter()
            .filter(|&&b| b > 0)
            .map(|&b| b as f64 / total as f64)
            .collect(),
    )
}
