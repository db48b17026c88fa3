//! The XCS learning classifier system.
//!
//! XCS evolves a population of condition → action rules whose fitness is the *accuracy*
//! of their payoff prediction rather than the size of the payoff itself. Over time the
//! population converges toward a complete, accurate and maximally general map of the
//! problem's situation × action space.
//!
//! # Architecture
//!
//! The engine ([`Xcs`]) runs one pipeline per timestep, each stage in its own module:
//!
//! - [`matching`] - Match set formation and covering
//! - [`prediction`] - Fitness-weighted prediction array
//! - [`action_selection`] - Epsilon-greedy choice of the action to take
//! - [`credit`] - Widrow-Hoff credit assignment and accuracy-based fitness
//! - [`subsumption`] - Folding accurate specific rules into general ones
//! - [`genetic`] - Rule discovery by a steady-state genetic algorithm
//! - [`deletion`] - Keeping the population within its capacity
//!
//! Data structures and the [`Representation`](lcs_core::Representation) and
//! [`Environment`](lcs_core::Environment) traits live in [`lcs_core`].
//!
//! # Single-step and Multi-step Problems
//!
//! In a single-step problem (classification) the action set of a timestep is credited
//! with the immediate reward. In a multi-step problem the credit is lagged by one
//! timestep: the previous action set receives `reward + gamma · max(prediction array)`
//! once the next situation has been seen, and only a terminal step credits its own action
//! set directly. See [`Xcs::train_step`].
//!
//! # Randomness
//!
//! All randomness of a run comes from one [`rand_pcg::Pcg64`] seeded at construction and
//! drawn from in a fixed order, so a run is reproducible from its seed.
//!
//! # Example
//!
//! ```
//! use lcs_problems::{multiplexer::Multiplexer, ternary::Ternary};
//! use lcs_xcs::{Xcs, XcsParams};
//!
//! let mut env = Multiplexer::new(2, 42);
//! let mut xcs = Xcs::for_environment(Ternary::new(0.33), &env, XcsParams::default(), 42)?;
//! for _ in 0..100 {
//!     xcs.train_step(&mut env)?;
//! }
//! assert_eq!(xcs.time_step(), 100);
//! assert!(xcs.population().num_micros() <= 800);
//! # Ok::<(), lcs_xcs::XcsError>(())
//! ```

use lcs_core::{EnvironmentError, MemberNotFound};

pub use self::{
    params::{ExplorationSchedule, InvalidParamsError, SelectionMethod, XcsParams},
    summary::PopulationSummary,
    xcs::{StepRecord, Xcs},
};

pub mod action_selection;
pub mod credit;
pub mod deletion;
pub mod genetic;
pub mod matching;
pub mod params;
pub mod prediction;
pub mod selection;
pub mod subsumption;
mod summary;
mod xcs;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum XcsError {
    #[display("{_0}")]
    InvalidParams(InvalidParamsError),
    #[display("environment failed: {_0}")]
    Environment(EnvironmentError),
    #[display("population membership violated: {_0}")]
    Membership(MemberNotFound),
}
