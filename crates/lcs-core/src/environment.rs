use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::EnvironmentError;

/// Values usable as actions: small, copyable, totally ordered identifiers.
pub trait Action: Copy + Eq + Ord + Hash + fmt::Debug {}

impl<T> Action for T where T: Copy + Eq + Ord + Hash + fmt::Debug {}

/// Whether reward arrives immediately or after a sequence of actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// Every action is rewarded at once and each situation is independent.
    SingleStep,
    /// Reward may be delayed; episodes end when the environment signals terminal.
    MultiStep,
}

/// What the environment answers to an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvResponse {
    pub reward: f64,
    pub is_terminal: bool,
    /// Set by classification-style problems that know the correct answer.
    pub was_correct: Option<bool>,
}

/// The problem a learning engine interacts with.
///
/// Calls alternate: [`observe`](Self::observe) the current situation, then
/// [`act`](Self::act) on it. Environments with a finite epoch report
/// [`EnvironmentError::EpochExhausted`] once it runs out; [`reset`](Self::reset) starts
/// the next epoch.
pub trait Environment {
    type Situation;
    type Action: Action;

    /// All actions the environment accepts, in a fixed order.
    fn action_set(&self) -> &[Self::Action];

    fn step_type(&self) -> StepType;

    fn observe(&mut self) -> Result<Self::Situation, EnvironmentError>;

    fn act(&mut self, action: Self::Action) -> Result<EnvResponse, EnvironmentError>;

    fn reset(&mut self);
}
