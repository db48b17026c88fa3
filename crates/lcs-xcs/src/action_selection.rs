//! Epsilon-greedy action selection over a prediction array.

use lcs_core::Action;
use rand::{
    Rng,
    seq::{IndexedRandom as _, IteratorRandom as _},
};

use crate::prediction::PredictionArray;

/// The action chosen for a timestep and whether it was chosen by exploration.
///
/// In multi-step problems only explored actions may trigger rule discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionChoice<A> {
    pub action: A,
    pub did_explore: bool,
}

/// Chooses an action epsilon-greedily.
///
/// With probability `epsilon` the choice is uniform among actions with a non-null
/// prediction, or among all `actions` if every prediction is null. Otherwise the
/// [greedy](exploit) action is taken.
///
/// # Panics
///
/// Panics if `actions` is empty.
pub fn select_action<A, G>(
    prediction_array: &PredictionArray<A>,
    actions: &[A],
    epsilon: f64,
    rng: &mut G,
) -> ActionChoice<A>
where
    A: Action,
    G: Rng + ?Sized,
{
    if rng.random_bool(epsilon) {
        let action = prediction_array
            .non_null_actions()
            .choose(rng)
            .or_else(|| actions.choose(rng).copied())
            .expect("environment offers at least one action");
        return ActionChoice {
            action,
            did_explore: true,
        };
    }
    ActionChoice {
        action: exploit(prediction_array, actions),
        did_explore: false,
    }
}

/// The action with the highest prediction, ties going to the earliest action.
///
/// Null predictions read as `0.0`, so when every entry is null the first action wins.
///
/// # Panics
///
/// Panics if `actions` is empty.
#[must_use]
pub fn exploit<A>(prediction_array: &PredictionArray<A>, actions: &[A]) -> A
where
    A: Action,
{
    prediction_array
        .best_action()
        .or_else(|| actions.first().copied())
        .expect("environment offers at least one action")
}
