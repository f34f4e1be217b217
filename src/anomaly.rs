use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Below this many positive amounts the detector declines to run — tiny
/// files produce nothing but spurious flags.
pub const MIN_SAMPLES: usize = 10;

/// Expected fraction of rows flagged as outliers.
pub const CONTAMINATION: f64 = 0.02;

const TREE_COUNT: usize = 100;
const MAX_SUBSAMPLE: usize = 256;
const EULER: f64 = 0.577_215_664_901_532_9;

/// Isolation-forest outlier detection over one numeric column.
///
/// Builds an ensemble of random partition trees over the positive entries of
/// `amounts` and scores each point by how quickly it becomes isolated.
/// Returns the indices (into `amounts`) of flagged rows, ascending.
/// Deterministic for a fixed seed. The detector asserts nothing about
/// correctness — flagged rows are directions for human review, not errors.
pub fn detect(amounts: &[f64], seed: u64) -> Vec<usize> {
    let positives: Vec<(usize, f64)> = amounts
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| *v > 0.0)
        .collect();
    if positives.len() < MIN_SAMPLES {
        return Vec::new();
    }
    let values: Vec<f64> = positives.iter().map(|(_, v)| *v).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let sample_size = values.len().min(MAX_SUBSAMPLE);
    let depth_limit = (sample_size as f64).log2().ceil() as usize;

    let mut trees = Vec::with_capacity(TREE_COUNT);
    for _ in 0..TREE_COUNT {
        let sample: Vec<f64> = values
            .choose_multiple(&mut rng, sample_size)
            .copied()
            .collect();
        trees.push(build_tree(&sample, 0, depth_limit, &mut rng));
    }

    let norm = avg_path_length(sample_size);
    let scores: Vec<f64> = values
        .iter()
        .map(|v| {
            let mean_path = trees
                .iter()
                .map(|t| path_length(t, *v, 0))
                .sum::<f64>()
                / TREE_COUNT as f64;
            2f64.powf(-mean_path / norm)
        })
        .collect();

    let flag_count = ((values.len() as f64) * CONTAMINATION).ceil() as usize;
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| {
        scores[*b]
            .partial_cmp(&scores[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut flagged: Vec<usize> = order
        .into_iter()
        .take(flag_count)
        .filter(|i| scores[*i] > 0.5)
        .map(|i| positives[i].0)
        .collect();
    flagged.sort_unstable();
    flagged
}

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        lo: Box<Node>,
        hi: Box<Node>,
    },
}

fn build_tree(values: &[f64], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
    if values.len() <= 1 || depth >= limit {
        return Node::Leaf { size: values.len() };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return Node::Leaf { size: values.len() };
    }
    let threshold = rng.gen_range(min..max);
    let (lo, hi): (Vec<f64>, Vec<f64>) = values.iter().copied().partition(|v| *v < threshold);
    Node::Split {
        threshold,
        lo: Box::new(build_tree(&lo, depth + 1, limit, rng)),
        hi: Box::new(build_tree(&hi, depth + 1, limit, rng)),
    }
}

fn path_length(node: &Node, value: f64, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + avg_path_length(*size),
        Node::Split { threshold, lo, hi } => {
            if value < *threshold {
                path_length(lo, value, depth + 1)
            } else {
                path_length(hi, value, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points, the
/// standard isolation-forest normalization term.
fn avg_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER) - 2.0 * (n - 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declines_below_min_samples() {
        // Nine positive values, however extreme, produce nothing.
        let mut amounts = vec![100.0; 8];
        amounts.push(9_000_000.0);
        assert!(detect(&amounts, 42).is_empty());
    }

    #[test]
    fn test_nonpositive_values_do_not_count_toward_minimum() {
        let mut amounts = vec![0.0; 20];
        amounts.extend(vec![100.0; 9]);
        assert!(detect(&amounts, 42).is_empty());
    }

    #[test]
    fn test_extreme_outlier_is_flagged() {
        let mut amounts: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        amounts.push(5_000_000.0);
        let flagged = detect(&amounts, 42);
        assert_eq!(flagged, vec![30]);
    }

    #[test]
    fn test_outlier_index_maps_back_through_nonpositive_rows() {
        // Row 0 is a zero amount; flagged indices refer to the input slice,
        // not the filtered positive subset.
        let mut amounts = vec![0.0];
        amounts.extend((0..30).map(|i| 200.0 + i as f64));
        amounts.push(7_000_000.0);
        let flagged = detect(&amounts, 42);
        assert_eq!(flagged, vec![31]);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let amounts: Vec<f64> = (0..50).map(|i| 100.0 + ((i * 37) % 1000) as f64).collect();
        assert_eq!(detect(&amounts, 7), detect(&amounts, 7));
    }

    #[test]
    fn test_flag_count_bounded_by_contamination() {
        let mut amounts: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        amounts.push(3_000_000.0);
        amounts.push(4_000_000.0);
        let flagged = detect(&amounts, 42);
        // ceil(102 * 0.02) = 3 is the hard upper bound
        assert!(flagged.len() <= 3);
        assert!(!flagged.is_empty());
    }
}
