//! Seeded train/validation split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of each side of a split, both ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Shuffle `0..rows` with `seed` and hold out `ceil(rows * fraction)` rows.
///
/// `fraction` is clamped to `[0, 1]`. At least one row always stays on the
/// training side when `rows > 0`. Same inputs, same split.
pub fn train_validation_split(rows: usize, fraction: f64, seed: u64) -> Split {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let held_out = ((rows as f64 * fraction).ceil() as usize).min(rows.saturating_sub(1));

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut validation = indices[..held_out].to_vec();
    let mut train = indices[held_out..].to_vec();
    validation.sort_unstable();
    train.sort_unstable();

    Split { train, validation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let split = train_validation_split(7, 0.33, 42);
        assert_eq!(split.validation.len(), 3);
        assert_eq!(split.train.len(), 4);
    }

    #[test]
    fn test_split_is_partition() {
        let split = train_validation_split(50, 0.33, 7);
        let mut all: Vec<usize> = split.train.iter().chain(&split.validation).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_deterministic_for_seed() {
        assert_eq!(
            train_validation_split(100, 0.33, 42),
            train_validation_split(100, 0.33, 42)
        );
    }

    #[test]
    fn test_zero_fraction_keeps_everything() {
        let split = train_validation_split(5, 0.0, 42);
        assert_eq!(split.train, vec![0, 1, 2, 3, 4]);
        assert!(split.validation.is_empty());
    }

    #[test]
    fn test_never_empties_training_side() {
        let split = train_validation_split(3, 1.0, 42);
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.validation.len(), 2);

        let split = train_validation_split(0, 0.5, 42);
        assert!(split.train.is_empty());
        assert!(split.validation.is_empty());
    }
}
