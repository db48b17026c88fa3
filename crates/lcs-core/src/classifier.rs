use serde::{Deserialize, Serialize};

use crate::{Representation, Rule};

/// Initial values given to the learned statistics of a freshly created classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialEstimates {
    pub prediction: f64,
    pub error: f64,
    pub fitness: f64,
}

/// A single evolvable rule together with its learned statistics.
///
/// A classifier object may stand for several identical logical copies of the same
/// rule: its [`numerosity`](Self::numerosity). A classifier with numerosity 1 is a
/// *microclassifier*, one with numerosity > 1 a *macroclassifier*.
///
/// # Invariants
///
/// | attribute         | constraint         |
/// |-------------------|--------------------|
/// | `prediction`      | finite             |
/// | `error`           | finite, `>= 0`     |
/// | `fitness`         | finite, `>= 0`     |
/// | `action_set_size` | finite, `>= 1`     |
/// | `numerosity`      | `>= 1`             |
///
/// `time_stamp` and `experience` are unsigned and so cannot go below zero.
///
/// Setters enforce these with `assert!`. A violation is a logic error in the learning
/// engine, never a condition to recover from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier<E, A> {
    rule: Rule<E, A>,
    prediction: f64,
    error: f64,
    fitness: f64,
    time_stamp: u64,
    experience: u64,
    action_set_size: f64,
    numerosity: u32,
}

impl<E, A> Classifier<E, A> {
    /// Creates a microclassifier with no experience and an action set size estimate of 1.
    ///
    /// # Panics
    ///
    /// Panics if `estimates` violate the attribute invariants.
    #[must_use]
    pub fn new(rule: Rule<E, A>, estimates: InitialEstimates, time_stamp: u64) -> Self {
        let mut this = Self {
            rule,
            prediction: 0.0,
            error: 0.0,
            fitness: 0.0,
            time_stamp,
            experience: 0,
            action_set_size: 1.0,
            numerosity: 1,
        };
        this.set_prediction(estimates.prediction);
        this.set_error(estimates.error);
        this.set_fitness(estimates.fitness);
        this
    }

    #[must_use]
    pub fn rule(&self) -> &Rule<E, A> {
        &self.rule
    }

    pub fn rule_mut(&mut self) -> &mut Rule<E, A> {
        &mut self.rule
    }

    #[must_use]
    pub fn condition(&self) -> &[E] {
        self.rule.condition()
    }

    #[must_use]
    pub fn action(&self) -> &A {
        self.rule.action()
    }

    #[must_use]
    pub fn prediction(&self) -> f64 {
        self.prediction
    }

    pub fn set_prediction(&mut self, prediction: f64) {
        assert!(
            prediction.is_finite(),
            "prediction must be finite, got {prediction}"
        );
        self.prediction = prediction;
    }

    #[must_use]
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn set_error(&mut self, error: f64) {
        assert!(
            error.is_finite() && error >= 0.0,
            "error must be finite and non-negative, got {error}"
        );
        self.error = error;
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        assert!(
            fitness.is_finite() && fitness >= 0.0,
            "fitness must be finite and non-negative, got {fitness}"
        );
        self.fitness = fitness;
    }

    /// Fitness of a single logical copy (`fitness / numerosity`).
    #[must_use]
    pub fn micro_fitness(&self) -> f64 {
        self.fitness / f64::from(self.numerosity)
    }

    /// Last timestep at which this classifier took part in rule discovery.
    #[must_use]
    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    pub fn set_time_stamp(&mut self, time_stamp: u64) {
        self.time_stamp = time_stamp;
    }

    /// Number of statistic updates this classifier has received.
    #[must_use]
    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn set_experience(&mut self, experience: u64) {
        self.experience = experience;
    }

    pub fn increment_experience(&mut self) {
        self.experience += 1;
    }

    /// Estimated mean number of microclassifiers in the action sets this classifier
    /// has belonged to.
    #[must_use]
    pub fn action_set_size(&self) -> f64 {
        self.action_set_size
    }

    pub fn set_action_set_size(&mut self, action_set_size: f64) {
        assert!(
            action_set_size.is_finite() && action_set_size >= 1.0,
            "action set size must be finite and at least 1, got {action_set_size}"
        );
        self.action_set_size = action_set_size;
    }

    #[must_use]
    pub fn numerosity(&self) -> u32 {
        self.numerosity
    }

    pub fn set_numerosity(&mut self, numerosity: u32) {
        assert!(numerosity >= 1, "numerosity must be at least 1");
        self.numerosity = numerosity;
    }

    pub(crate) fn add_numerosity(&mut self, copies: u32) {
        self.numerosity += copies;
    }

    #[must_use]
    pub fn is_macroclassifier(&self) -> bool {
        self.numerosity > 1
    }

    /// Copies the learned statistics of `other`, leaving rule and numerosity untouched.
    pub fn copy_statistics_from(&mut self, other: &Self) {
        self.prediction = other.prediction;
        self.error = other.error;
        self.fitness = other.fitness;
        self.time_stamp = other.time_stamp;
        self.experience = other.experience;
        self.action_set_size = other.action_set_size;
    }

    /// Number of wildcard positions in the condition, as defined by `repr`.
    #[must_use]
    pub fn num_wildcards<R>(&self, repr: &R) -> usize
    where
        R: Representation<Element = E> + ?Sized,
    {
        repr.num_wildcards(self.condition())
    }

    /// Generality of the condition in percent (`0.0..=100.0`), as defined by `repr`.
    #[must_use]
    pub fn generality_as_percentage<R>(&self, repr: &R) -> f64
    where
        R: Representation<Element = E> + ?Sized,
    {
        repr.calc_generality(self.condition()) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESTIMATES: InitialEstimates = InitialEstimates {
        prediction: 10.0,
        error: 0.0,
        fitness: 0.01,
    };

    fn classifier() -> Classifier<u8, bool> {
        Classifier::new(Rule::new(vec![0, 1], true), ESTIMATES, 5)
    }

    #[test]
    fn test_new_starts_at_minima() {
        let cl = classifier();
        assert_eq!(cl.numerosity(), 1);
        assert_eq!(cl.experience(), 0);
        assert!((cl.action_set_size() - 1.0).abs() < f64::EPSILON);
        assert_eq!(cl.time_stamp(), 5);
        assert!((cl.prediction() - 10.0).abs() < f64::EPSILON);
        assert!(!cl.is_macroclassifier());
    }

    #[test]
    fn test_micro_fitness() {
        let mut cl = classifier();
        cl.set_fitness(0.6);
        cl.set_numerosity(3);
        assert!((cl.micro_fitness() - 0.2).abs() < 1e-12);
        assert!(cl.is_macroclassifier());
    }

    #[test]
    #[should_panic(expected = "numerosity must be at least 1")]
    fn test_zero_numerosity_rejected() {
        classifier().set_numerosity(0);
    }

    #[test]
    #[should_panic(expected = "error must be finite and non-negative")]
    fn test_negative_error_rejected() {
        classifier().set_error(-0.5);
    }

    #[test]
    #[should_panic(expected = "action set size must be finite and at least 1")]
    fn test_small_action_set_size_rejected() {
        classifier().set_action_set_size(0.5);
    }

    #[test]
    #[should_panic(expected = "prediction must be finite")]
    fn test_nan_prediction_rejected() {
        classifier().set_prediction(f64::NAN);
    }

    #[test]
    fn test_copy_statistics_keeps_numerosity() {
        let mut a = classifier();
        a.set_numerosity(4);
        let mut b = classifier();
        b.set_prediction(500.0);
        b.set_experience(12);
        b.set_action_set_size(7.5);
        a.copy_statistics_from(&b);
        assert_eq!(a.numerosity(), 4);
        assert_eq!(a.experience(), 12);
        assert!((a.prediction() - 500.0).abs() < f64::EPSILON);
        assert!((a.action_set_size() - 7.5).abs() < f64::EPSILON);
    }
}
