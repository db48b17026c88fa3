//! Core data structures of a Michigan-style learning classifier system.
//!
//! This crate holds everything the learning engine mutates, and nothing about how
//! it learns:
//!
//! - [`Rule`] - A condition → action pair
//! - [`Classifier`] - A rule plus its learned statistics and numerosity
//! - [`ClassifierSet`] - A transient, owned snapshot (match set, action set)
//! - [`Population`] - The long-lived, capacity-bounded store of classifiers
//! - [`OperationLedger`] - Counters of microclassifiers affected per [`Operation`]
//!
//! It also defines the two capability traits the engine consumes from pluggable
//! collaborators:
//!
//! - [`Representation`] - Condition geometry (matching, covering, mutation, crossover,
//!   wildcards)
//! - [`Environment`] - The problem being learned (observe, act, reset)
//!
//! # Ownership Model
//!
//! The [`Population`] is an arena that exclusively owns every long-lived classifier.
//! Match sets and action sets are [`ClassifierSet`]s holding independent copies taken
//! at creation time; there are no references from a set back into the population.
//! Membership is decided by structural equality of [`Rule`]s, so statistics learned on a
//! snapshot are written back with [`Population::commit`].
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use lcs_core::{Classifier, InitialEstimates, Operation, Population, Rule};
//!
//! let mut population = Population::new(NonZeroUsize::new(10).unwrap());
//! let rule = Rule::new(vec![0_u8, 1, 2], true);
//! let estimates = InitialEstimates {
//!     prediction: 10.0,
//!     error: 0.0,
//!     fitness: 0.01,
//! };
//!
//! population.insert(Classifier::new(rule.clone(), estimates, 0), Operation::Discovery);
//! population.insert(Classifier::new(rule.clone(), estimates, 0), Operation::Discovery);
//!
//! assert_eq!(population.num_macros(), 1);
//! assert_eq!(population.num_micros(), 2);
//! ```

pub use self::{
    classifier::*, classifier_set::*, environment::*, population::*, representation::*, rule::*,
};

mod classifier;
mod classifier_set;
mod environment;
mod population;
mod representation;
mod rule;

/// Raised when an operation references a classifier that is not a member of the
/// container it targets.
///
/// Within a single timestep, subsumption can remove a classifier that a later step still
/// holds a copy of, so callers on the subsumption paths treat this as "skip this attempt".
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MemberNotFound {
    #[display("classifier is not a member of the population")]
    Population,
    #[display("classifier is not a member of the classifier set")]
    ClassifierSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EnvironmentError {
    #[display("environment epoch exhausted; reset before the next epoch")]
    EpochExhausted,
    #[display("environment offers no actions")]
    NoActions,
}
