//! Weighted random selection.

use rand::Rng;

/// Invalid weight vectors passed to [`weighted_choice`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("Negative weight {weight} at index {index}")]
    Negative { index: usize, weight: f64 },
    #[error("Sum of weights is not positive")]
    NonPositiveTotal,
    #[error("Draw not consumed by the weights, remainder {remainder}")]
    Exhausted { remainder: f64 },
}

/// Return an index with probability proportional to its weight.
///
/// Draws `u` uniformly from `[0, sum)` and subtracts the weights in order,
/// returning the first index at which the remainder drops below zero. If
/// rounding leaves the remainder non-negative after the last weight, the
/// draw is reported as [`WeightError::Exhausted`].
pub fn weighted_choice<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, WeightError> {
    if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| **w < 0.0) {
        return Err(WeightError::Negative { index, weight });
    }

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return Err(WeightError::NonPositiveTotal);
    }

    let mut remainder = rng.gen::<f64>() * total;
    for (index, &weight) in weights.iter().enumerate() {
        remainder -= weight;
        if remainder < 0.0 {
            return Ok(index);
        }
    }

    Err(WeightError::Exhausted { remainder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Generator pinned to its largest output, so `gen::<f64>()` is `1 - 2^-53`.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(u8::MAX);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_uniform_weights_are_fair() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            counts[weighted_choice(&[1.0, 1.0, 1.0, 1.0], &mut rng).unwrap()] += 1;
        }
        for count in counts {
            let frequency = count as f64 / draws as f64;
            assert!((frequency - 0.25).abs() < 0.01, "frequency {} too far from 0.25", frequency);
        }
    }

    #[test]
    fn test_zero_weight_is_never_chosen() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            assert_ne!(weighted_choice(&[0.5, 0.0, 2.0], &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_proportional_to_weight() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws = 60_000;
        let hits = (0..draws)
            .filter(|_| weighted_choice(&[1.0, 2.0], &mut rng).unwrap() == 1)
            .count();
        let frequency = hits as f64 / draws as f64;
        assert!((frequency - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            weighted_choice(&[-1.0, 2.0], &mut rng),
            Err(WeightError::Negative { index: 0, weight: -1.0 })
        );
        assert_eq!(weighted_choice(&[0.0, 0.0], &mut rng), Err(WeightError::NonPositiveTotal));
        assert_eq!(weighted_choice(&[], &mut rng), Err(WeightError::NonPositiveTotal));
    }

    #[test]
    fn test_unconsumed_draw_is_an_error() {
        // 1 - 2^-53 - 0.3 rounds to exactly 0.7, so nothing goes negative
        let result = weighted_choice(&[0.3, 0.7], &mut MaxRng);
        assert!(matches!(result, Err(WeightError::Exhausted { .. })));

        // The same draw is consumed when the last weight overshoots it
        assert_eq!(weighted_choice(&[0.5, 0.5], &mut MaxRng), Ok(1));
    }
}
