//! Centre-spread interval conditions over real inputs in `[0, 1]`.
//!
//! Each condition element is an interval `[c - s, c + s]`. Bounds reaching past the unit
//! range behave as if clamped to it, so an interval covering all of `[0, 1]` is a
//! wildcard.

use lcs_core::Representation;
use rand::Rng;
use rand_distr::{Distribution as _, Normal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub centre: f64,
    pub spread: f64,
}

impl Interval {
    #[must_use]
    pub fn new(centre: f64, spread: f64) -> Self {
        Self { centre, spread }
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        (self.centre - self.spread).max(0.0)
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        (self.centre + self.spread).min(1.0)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        (self.upper() - self.lower()).max(0.0)
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.lower() <= x && x <= self.upper()
    }

    /// Does this interval cover all of `other`?
    #[must_use]
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.lower() <= other.lower() && other.upper() <= self.upper()
    }
}

/// The centre-spread representation.
///
/// Covering centres each interval on the input with a spread drawn from `(0, s0]`.
/// Mutation shifts centre and spread by Gaussian noise of scale `m0`; a mutated interval
/// is widened if needed so it still contains the input that triggered discovery.
#[derive(Debug, Clone, Copy)]
pub struct CentreSpread {
    s0: f64,
    m0: f64,
    noise: Normal<f64>,
}

impl CentreSpread {
    /// # Panics
    ///
    /// Panics if `s0` or `m0` is not positive and finite.
    #[must_use]
    pub fn new(s0: f64, m0: f64) -> Self {
        assert!(s0 > 0.0 && s0.is_finite(), "s0 must be positive");
        assert!(m0 > 0.0 && m0.is_finite(), "m0 must be positive");
        let noise = Normal::new(0.0, m0).expect("m0 is a valid standard deviation");
        Self { s0, m0, noise }
    }

    #[must_use]
    pub fn s0(&self) -> f64 {
        self.s0
    }

    #[must_use]
    pub fn m0(&self) -> f64 {
        self.m0
    }
}

impl Representation for CentreSpread {
    type Situation = Vec<f64>;
    type Element = Interval;

    fn does_match(&self, condition: &[Interval], situation: &Vec<f64>) -> bool {
        condition.len() == situation.len()
            && condition
                .iter()
                .zip(situation)
                .all(|(interval, &x)| interval.contains(x))
    }

    fn gen_covering_condition<R>(&self, situation: &Vec<f64>, rng: &mut R) -> Vec<Interval>
    where
        R: Rng + ?Sized,
    {
        situation
            .iter()
            .map(|&x| Interval::new(x, self.s0 * (1.0 - rng.random::<f64>())))
            .collect()
    }

    fn mutate_condition<R>(
        &self,
        condition: &mut [Interval],
        situation: &Vec<f64>,
        mu: f64,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        for (interval, &x) in condition.iter_mut().zip(situation) {
            if !rng.random_bool(mu) {
                continue;
            }
            let centre = (interval.centre + self.noise.sample(rng)).clamp(0.0, 1.0);
            let spread = (interval.spread + self.noise.sample(rng))
                .abs()
                .max((centre - x).abs());
            let mutated = Interval::new(centre, spread);
            // rounding can still leave `x` just outside; keep the old interval then
            if mutated.contains(x) {
                *interval = mutated;
            }
        }
    }

    fn is_wildcard(&self, element: &Interval, _index: usize) -> bool {
        element.lower() <= 0.0 && element.upper() >= 1.0
    }

    /// Mean clamped width of the intervals.
    #[expect(clippy::cast_precision_loss)]
    fn calc_generality(&self, condition: &[Interval]) -> f64 {
        if condition.is_empty() {
            return 1.0;
        }
        condition.iter().map(Interval::width).sum::<f64>() / condition.len() as f64
    }

    /// Containment in every dimension, strict in at least one.
    fn is_more_general(&self, general: &[Interval], specific: &[Interval]) -> bool {
        general.len() == specific.len()
            && general
                .iter()
                .zip(specific)
                .all(|(g, s)| g.contains_interval(s))
            && general
                .iter()
                .zip(specific)
                .any(|(g, s)| g.width() > s.width())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn test_interval_bounds_are_clamped() {
        let interval = Interval::new(0.9, 0.3);
        assert!((interval.lower() - 0.6).abs() < 1e-12);
        assert!((interval.upper() - 1.0).abs() < f64::EPSILON);
        assert!(interval.contains(1.0));
        assert!(!interval.contains(0.5));
    }

    #[test]
    fn test_covering_matches_situation() {
        let repr = CentreSpread::new(0.2, 0.1);
        let mut rng = Pcg64::seed_from_u64(3);
        for _ in 0..100 {
            let situation = (0..4).map(|_| rng.random::<f64>()).collect::<Vec<_>>();
            let condition = repr.gen_covering_condition(&situation, &mut rng);
            assert!(repr.does_match(&condition, &situation));
            for interval in &condition {
                assert!(interval.spread > 0.0 && interval.spread <= 0.2);
            }
        }
    }

    #[test]
    fn test_mutation_keeps_situation_matched() {
        let repr = CentreSpread::new(0.2, 0.1);
        let mut rng = Pcg64::seed_from_u64(4);
        let situation = vec![0.1, 0.5, 0.95];
        let mut condition = repr.gen_covering_condition(&situation, &mut rng);
        let before = condition.clone();
        for _ in 0..100 {
            repr.mutate_condition(&mut condition, &situation, 0.5, &mut rng);
            assert!(repr.does_match(&condition, &situation));
        }
        assert_ne!(condition, before);
    }

    #[test]
    fn test_generality_and_containment() {
        let repr = CentreSpread::new(0.2, 0.1);
        let wide = [Interval::new(0.5, 0.5), Interval::new(0.5, 0.2)];
        let narrow = [Interval::new(0.5, 0.1), Interval::new(0.5, 0.2)];
        assert!(repr.is_wildcard(&wide[0], 0));
        assert!(!repr.is_wildcard(&wide[1], 1));
        assert!((repr.calc_generality(&wide) - 0.7).abs() < 1e-12);
        assert!(repr.is_more_general(&wide, &narrow));
        assert!(!repr.is_more_general(&narrow, &wide));
        assert!(!repr.is_more_general(&wide, &wide));
    }
}
