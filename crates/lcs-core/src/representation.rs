use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How two conditions exchange elements during crossover.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverStrategy {
    /// Swap the elements between two random cut points.
    #[default]
    TwoPoint,
    /// Swap each element independently with probability 0.5.
    Uniform,
}

/// Condition geometry: what a condition element is and how it relates to a situation.
///
/// The learning engine never inspects condition elements itself. Everything that
/// depends on the kind of predicate (ternary symbols, intervals, ...) goes through
/// this trait, which the engine receives at construction.
///
/// # Required Operations
///
/// - [`does_match`](Self::does_match) - does a condition accept a situation?
/// - [`gen_covering_condition`](Self::gen_covering_condition) - synthesize a condition
///   that accepts a situation
/// - [`mutate_condition`](Self::mutate_condition) - perturb a condition in place
/// - [`is_wildcard`](Self::is_wildcard) - does an element accept every input value?
///
/// # Provided Operations
///
/// [`crossover_conditions`](Self::crossover_conditions),
/// [`num_wildcards`](Self::num_wildcards), [`calc_generality`](Self::calc_generality)
/// and [`is_more_general`](Self::is_more_general) are defined in terms of the above and
/// may be overridden when the geometry knows better (e.g. interval containment).
pub trait Representation {
    /// Encoded input presented at a timestep.
    type Situation;
    /// A single predicate of a condition.
    type Element: Clone + PartialEq + fmt::Debug;

    fn does_match(&self, condition: &[Self::Element], situation: &Self::Situation) -> bool;

    /// Generates a condition that matches `situation`.
    fn gen_covering_condition<R>(
        &self,
        situation: &Self::Situation,
        rng: &mut R,
    ) -> Vec<Self::Element>
    where
        R: Rng + ?Sized;

    /// Mutates each element of `condition` with probability `mu`.
    ///
    /// `situation` is the input the parent classifiers matched when discovery was
    /// triggered, for representations that keep offspring inside that niche.
    fn mutate_condition<R>(
        &self,
        condition: &mut [Self::Element],
        situation: &Self::Situation,
        mu: f64,
        rng: &mut R,
    ) where
        R: Rng + ?Sized;

    fn is_wildcard(&self, element: &Self::Element, index: usize) -> bool;

    /// Exchanges elements between two conditions of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the conditions differ in length.
    fn crossover_conditions<R>(
        &self,
        a: &mut [Self::Element],
        b: &mut [Self::Element],
        strategy: CrossoverStrategy,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        assert_eq!(a.len(), b.len(), "conditions must have equal length");
        match strategy {
            CrossoverStrategy::TwoPoint => {
                let mut x = rng.random_range(0..=a.len());
                let mut y = rng.random_range(0..=a.len());
                if x > y {
                    (x, y) = (y, x);
                }
                a[x..y].swap_with_slice(&mut b[x..y]);
            }
            CrossoverStrategy::Uniform => {
                for (ea, eb) in a.iter_mut().zip(b) {
                    if rng.random_bool(0.5) {
                        std::mem::swap(ea, eb);
                    }
                }
            }
        }
    }

    fn num_wildcards(&self, condition: &[Self::Element]) -> usize {
        condition
            .iter()
            .enumerate()
            .filter(|(i, e)| self.is_wildcard(e, *i))
            .count()
    }

    /// Fraction of the input space the condition accepts, in `0.0..=1.0`.
    #[expect(clippy::cast_precision_loss)]
    fn calc_generality(&self, condition: &[Self::Element]) -> f64 {
        if condition.is_empty() {
            return 1.0;
        }
        self.num_wildcards(condition) as f64 / condition.len() as f64
    }

    /// Is `general` strictly more general than `specific`?
    ///
    /// True iff `general` has more wildcards than `specific` and agrees with it on every
    /// position where `general` is not a wildcard.
    fn is_more_general(&self, general: &[Self::Element], specific: &[Self::Element]) -> bool {
        if general.len() != specific.len()
            || self.num_wildcards(general) <= self.num_wildcards(specific)
        {
            return false;
        }
        general
            .iter()
            .zip(specific)
            .enumerate()
            .all(|(i, (g, s))| self.is_wildcard(g, i) || g == s)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Digits where `9` accepts anything.
    struct Digits;

    impl Representation for Digits {
        type Situation = Vec<u8>;
        type Element = u8;

        fn does_match(&self, condition: &[u8], situation: &Vec<u8>) -> bool {
            condition
                .iter()
                .zip(situation)
                .all(|(c, s)| *c == 9 || c == s)
        }

        fn gen_covering_condition<R>(&self, situation: &Vec<u8>, _rng: &mut R) -> Vec<u8>
        where
            R: Rng + ?Sized,
        {
            situation.clone()
        }

        fn mutate_condition<R>(&self, _: &mut [u8], _: &Vec<u8>, _: f64, _: &mut R)
        where
            R: Rng + ?Sized,
        {
        }

        fn is_wildcard(&self, element: &u8, _index: usize) -> bool {
            *element == 9
        }
    }

    #[test]
    fn test_is_more_general() {
        assert!(Digits.is_more_general(&[9, 1, 9], &[0, 1, 9]));
        assert!(Digits.is_more_general(&[9, 9, 9], &[0, 1, 2]));
        // same number of wildcards
        assert!(!Digits.is_more_general(&[9, 1, 2], &[0, 9, 2]));
        // disagreement on a fixed position
        assert!(!Digits.is_more_general(&[9, 1, 9], &[0, 2, 2]));
        assert!(!Digits.is_more_general(&[0, 1, 2], &[9, 1, 2]));
    }

    #[test]
    fn test_generality() {
        assert_eq!(Digits.num_wildcards(&[9, 1, 9, 2]), 2);
        assert!((Digits.calc_generality(&[9, 1, 9, 2]) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crossover_preserves_multiset_of_elements() {
        let mut rng = Pcg32::seed_from_u64(3);
        for strategy in [CrossoverStrategy::TwoPoint, CrossoverStrategy::Uniform] {
            for _ in 0..50 {
                let mut a = vec![0, 1, 2, 3, 4, 5];
                let mut b = vec![10, 11, 12, 13, 14, 15];
                Digits.crossover_conditions(&mut a, &mut b, strategy, &mut rng);
                for i in 0..6 {
                    let mut pair = [a[i], b[i]];
                    pair.sort_unstable();
                    assert_eq!(pair, [i as u8, i as u8 + 10], "position {i} mixed up");
                }
            }
        }
    }
}
