//! Parent selection strategies for rule discovery.
//!
//! A strategy sees the action set only as a list of [`SelectionCandidate`]s (fitness and
//! numerosity) and returns the index of the chosen one, so it stays independent of the
//! rule representation. Strategies are built from [`SelectionMethod`] once, when the
//! engine is constructed.
//!
//! [`SelectionMethod`]: crate::params::SelectionMethod

use std::fmt;

use rand::{Rng as _, RngCore, seq::index};

/// What a selection strategy knows about an action set member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionCandidate {
    pub fitness: f64,
    pub numerosity: u32,
}

impl SelectionCandidate {
    fn micro_fitness(&self) -> f64 {
        self.fitness / f64::from(self.numerosity)
    }
}

pub trait ParentSelection: fmt::Debug {
    /// Returns the index of the selected candidate.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty.
    fn select(&self, candidates: &[SelectionCandidate], rng: &mut dyn RngCore) -> usize;
}

/// Fitness-proportionate selection.
///
/// Candidates with zero total fitness are chosen uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteWheelSelection;

impl ParentSelection for RouletteWheelSelection {
    fn select(&self, candidates: &[SelectionCandidate], rng: &mut dyn RngCore) -> usize {
        assert!(!candidates.is_empty(), "no candidates to select from");
        let total: f64 = candidates.iter().map(|c| c.fitness).sum();
        if total <= 0.0 {
            return rng.random_range(0..candidates.len());
        }
        let point = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        for (i, c) in candidates.iter().enumerate() {
            cumulative += c.fitness;
            if cumulative > point {
                return i;
            }
        }
        candidates.len() - 1
    }
}

/// Tournament among a `tau` fraction of the microclassifiers, won by the highest fitness
/// per microclassifier.
///
/// At least one microclassifier takes part. Ties go to the first one drawn.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    tau: f64,
}

impl TournamentSelection {
    /// # Panics
    ///
    /// Panics if `tau` is not within `(0, 1]`.
    #[must_use]
    pub fn new(tau: f64) -> Self {
        assert!(tau > 0.0 && tau <= 1.0, "tau must be within (0, 1]");
        Self { tau }
    }
}

impl ParentSelection for TournamentSelection {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn select(&self, candidates: &[SelectionCandidate], rng: &mut dyn RngCore) -> usize {
        assert!(!candidates.is_empty(), "no candidates to select from");
        let num_micros = candidates
            .iter()
            .map(|c| c.numerosity as usize)
            .sum::<usize>();
        let size = ((self.tau * num_micros as f64).ceil() as usize).clamp(1, num_micros);

        let owner_of = |micro: usize| {
            let mut remaining = micro;
            for (i, c) in candidates.iter().enumerate() {
                let n = c.numerosity as usize;
                if remaining < n {
                    return i;
                }
                remaining -= n;
            }
            candidates.len() - 1
        };

        let mut best: Option<usize> = None;
        for micro in index::sample(rng, num_micros, size) {
            let i = owner_of(micro);
            if best.is_none_or(|b| candidates[i].micro_fitness() > candidates[b].micro_fitness()) {
                best = Some(i);
            }
        }
        best.unwrap_or(0)
    }
}
