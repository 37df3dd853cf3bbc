use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::MetadataSample;

/// Shuffles the samples and cuts off `floor(len * eval_percentage)` of them
/// for evaluation. Both halves come back sorted by `audio_file`.
pub fn split_samples(
    mut samples: Vec<MetadataSample>,
    eval_percentage: f64,
    seed: Option<u64>,
) -> (Vec<MetadataSample>, Vec<MetadataSample>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    samples.shuffle(&mut rng);

    let eval_count = eval_count(samples.len(), eval_percentage);
    let mut train = samples.split_off(eval_count);
    let mut eval = samples;

    train.sort_by(|a, b| a.audio_file.cmp(&b.audio_file));
    eval.sort_by(|a, b| a.audio_file.cmp(&b.audio_file));
    (train, eval)
}

/// Number of eval samples for a dataset of `total` samples.
pub fn eval_count(total: usize, eval_percentage: f64) -> usize {
    let count = (total as f64 * eval_percentage.clamp(0.0, 1.0)).floor() as usize;
    count.min(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn samples(n: usize) -> Vec<MetadataSample> {
        (0..n)
            .map(|i| MetadataSample {
                audio_file: format!("/data/clip{:03}.wav", i),
                text: format!("sentence {}", i),
                speaker_name: "coqui".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_eval_count() {
        assert_eq!(eval_count(100, 0.15), 15);
        assert_eq!(eval_count(10, 0.15), 1);
        assert_eq!(eval_count(6, 0.15), 0);
        assert_eq!(eval_count(0, 0.5), 0);
        assert_eq!(eval_count(7, 0.0), 0);
    }

    #[test]
    fn test_split_partitions_all_samples() {
        let (train, eval) = split_samples(samples(40), 0.25, Some(7));
        assert_eq!(eval.len(), 10);
        assert_eq!(train.len(), 30);

        let train_set: HashSet<_> = train.iter().map(|s| s.audio_file.clone()).collect();
        let eval_set: HashSet<_> = eval.iter().map(|s| s.audio_file.clone()).collect();
        assert!(train_set.is_disjoint(&eval_set));
        assert_eq!(train_set.len() + eval_set.len(), 40);
    }

    #[test]
    fn test_split_outputs_sorted() {
        let (train, eval) = split_samples(samples(25), 0.2, None);
        assert!(train.windows(2).all(|w| w[0].audio_file <= w[1].audio_file));
        assert!(eval.windows(2).all(|w| w[0].audio_file <= w[1].audio_file));
    }

    #[test]
    fn test_split_is_reproducible_with_seed() {
        let a = split_samples(samples(50), 0.3, Some(42));
        let b = split_samples(samples(50), 0.3, Some(42));
        assert_eq!(a, b);
    }
}
