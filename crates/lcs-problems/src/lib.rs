//! Rule representations and benchmark environments for learning classifier systems.
//!
//! # Representations
//!
//! - [`ternary::Ternary`] - `{0, 1, #}` conditions over boolean inputs
//! - [`interval::CentreSpread`] - Centre-spread intervals over real inputs in `[0, 1]`
//!
//! # Environments
//!
//! - [`multiplexer::Multiplexer`] - The boolean multiplexer (single-step)
//! - [`multiplexer::RealMultiplexer`] - The multiplexer over thresholded real inputs
//!   (single-step)
//! - [`corridor::Corridor`] - A one-dimensional corridor with a goal at its right end
//!   (multi-step)
//!
//! Environments own a seeded [`rand_pcg::Pcg64`], so the situations they produce are
//! reproducible independently of the learner's own random draws.

pub mod corridor;
pub mod interval;
pub mod multiplexer;
pub mod ternary;
