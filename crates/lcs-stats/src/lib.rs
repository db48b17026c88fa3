//! Statistics used to monitor a learning run.
//!
//! - [`descriptive`]: Summaries (min, max, mean, median, spread) of classifier attributes
//! - [`moving_average`]: Rolling mean over the most recent timesteps or episodes
//!
//! # Examples
//!
//! ```
//! use lcs_stats::{descriptive::DescriptiveStats, moving_average::MovingAverage};
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//!
//! let mut accuracy = MovingAverage::new(2);
//! accuracy.push(1.0);
//! accuracy.push(0.0);
//! accuracy.push(0.0);
//! assert_eq!(accuracy.mean(), Some(0.0));
//! ```

pub mod descriptive;
pub mod moving_average;
