use chrono::{DateTime, Utc};
use lcs_xcs::{PopulationSummary, XcsParams};
use serde::{Deserialize, Serialize};

use crate::command::train::Problem;

/// The JSON document `lcs train` writes when a run finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub problem: Problem,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
    pub steps: u64,
    pub params: XcsParams,
    pub performance: Performance,
    pub summary: PopulationSummary,
}

/// Rolling performance over the last reported window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Performance {
    /// Fraction of correct answers (single-step problems).
    Accuracy { value: Option<f64> },
    /// Mean steps per finished episode (multi-step problems).
    StepsToGoal {
        value: Option<f64>,
        episodes: u64,
    },
}
