//! Where question sets come from.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use tutor_model::{QUESTIONS_PER_SET, Question, QuestionBank};

use crate::error::{CoreError, Result};
use crate::problem::{ProblemBounds, largest_with_digits};

/// Supplies ten questions for a level in `0..=max_level()`.
pub trait QuestionProvider {
    fn max_level(&self) -> u32;

    fn question_set(&mut self, level: u32) -> Result<Vec<Question>>;

    fn label(&self) -> &'static str;
}

impl QuestionProvider for QuestionBank {
    fn max_level(&self) -> u32 {
        QuestionBank::max_level(self).unwrap_or(0)
    }

    fn question_set(&mut self, level: u32) -> Result<Vec<Question>> {
        self.level(level)
            .map(<[Question]>::to_vec)
            .ok_or(CoreError::MissingLevel(level))
    }

    fn label(&self) -> &'static str {
        "question bank"
    }
}

/// Offline generator used when no bank is available.
///
/// Level 0 draws the multiplicand from `1..=1000` and the multiplier from
/// the two-digit range. Each level after that raises the multiplicand's
/// lower bound by a digit until it reaches the bound's width, and the
/// upper half of the curriculum adds a multiplier digit.
#[derive(Debug, Clone)]
pub struct RandomProvider {
    rng: StdRng,
    bounds: ProblemBounds,
    max_level: u32,
}

impl RandomProvider {
    #[must_use]
    pub fn new(bounds: ProblemBounds, max_level: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            bounds,
            max_level,
        }
    }

    /// Deterministic sequence for replays and tests.
    #[must_use]
    pub fn seeded(seed: u64, bounds: ProblemBounds, max_level: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bounds,
            max_level,
        }
    }

    /// Operand ranges used at `level`.
    #[must_use]
    pub fn ranges(&self, level: u32) -> (RangeInclusive<u64>, RangeInclusive<u64>) {
        let max_multiplicand = self.bounds.max_multiplicand();
        let multiplicand = if level == 0 {
            1..=1000.min(max_multiplicand)
        } else {
            let exponent = level.min(self.bounds.max_multiplicand_digits.saturating_sub(1));
            let floor = 10u64.checked_pow(exponent).unwrap_or(max_multiplicand);
            floor.min(max_multiplicand)..=max_multiplicand
        };

        let min_digits = self.bounds.min_multiplier_digits.max(1);
        let max_digits = self.bounds.max_multiplier_digits.max(min_digits);
        let upper_half = level > 0 && level >= self.max_level.div_ceil(2);
        let digits = if upper_half { min_digits + 1 } else { min_digits }.min(max_digits);
        let ceiling = largest_with_digits(digits);
        let floor = largest_with_digits(digits - 1).saturating_add(1).min(ceiling);
        let multiplier = floor..=ceiling;

        (multiplicand, multiplier)
    }
}

impl QuestionProvider for RandomProvider {
    fn max_level(&self) -> u32 {
        self.max_level
    }

    fn question_set(&mut self, level: u32) -> Result<Vec<Question>> {
        let (multiplicands, multipliers) = self.ranges(level.min(self.max_level));
        debug!(level, ?multiplicands, ?multipliers, "generating question set");
        (0..QUESTIONS_PER_SET)
            .map(|_| {
                let multiplicand = self.rng.gen_range(multiplicands.clone());
                let multiplier = self.rng.gen_range(multipliers.clone());
                Question::new(multiplicand, multiplier).map_err(CoreError::from)
            })
            .collect()
    }

    fn label(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_matches_the_classic_ranges() {
        let provider = RandomProvider::seeded(1, ProblemBounds::default(), 5);
        let (multiplicands, multipliers) = provider.ranges(0);
        assert_eq!(multiplicands, 1..=1000);
        assert_eq!(multipliers, 10..=99);
    }

    #[test]
    fn upper_levels_widen_both_operands() {
        let provider = RandomProvider::seeded(1, ProblemBounds::default(), 5);
        assert_eq!(provider.ranges(1).0, 10..=9999);
        assert_eq!(provider.ranges(3).0, 1000..=9999);
        assert_eq!(provider.ranges(9).0, 1000..=9999);
        assert_eq!(provider.ranges(2).1, 10..=99);
        assert_eq!(provider.ranges(3).1, 100..=999);
    }

    #[test]
    fn same_seed_same_questions() {
        let mut a = RandomProvider::seeded(42, ProblemBounds::default(), 5);
        let mut b = RandomProvider::seeded(42, ProblemBounds::default(), 5);
        let first = a.question_set(2).unwrap();
        assert_eq!(first, b.question_set(2).unwrap());
        assert_eq!(first.len(), QUESTIONS_PER_SET);
        let bounds = ProblemBounds::default();
        assert!(first.iter().all(|q| bounds.check(*q).is_ok()));
    }

    #[test]
    fn oversized_multiplier_width_does_not_panic() {
        let bounds = ProblemBounds {
            max_multiplicand_digits: 4,
            min_multiplier_digits: 20,
            max_multiplier_digits: 20,
        };
        let mut provider = RandomProvider::seeded(1, bounds, 5);
        let (_, multipliers) = provider.ranges(0);
        assert_eq!(*multipliers.end(), u64::MAX);
        assert_eq!(provider.question_set(0).unwrap().len(), QUESTIONS_PER_SET);
    }

    #[test]
    fn widest_valid_bounds_always_decompose() {
        let bounds = ProblemBounds {
            max_multiplicand_digits: 16,
            min_multiplier_digits: 2,
            max_multiplier_digits: 3,
        };
        bounds.validate().unwrap();
        for seed in 0..20 {
            let mut provider = RandomProvider::seeded(seed, bounds, 5);
            for level in 0..=5 {
                for question in provider.question_set(level).unwrap() {
                    assert!(crate::MultiplicationProblem::from_question(question).is_ok());
                }
            }
        }
    }
}
