//! Credit assignment and accuracy-based fitness update.
//!
//! Both updates act on an action set snapshot; the caller commits the result back to the
//! population.
//!
//! # Credit Assignment
//!
//! Every member's experience is incremented, then prediction `p`, error `ε` and action
//! set size estimate `as` move toward their targets with the Widrow-Hoff rule:
//!
//! ```text
//! p  ← p  + η·(P − p)
//! ε  ← ε  + η·(|P − p| − ε)
//! as ← as + η·(|[A]| − as)
//!
//! η = 1/exp   while exp < 1/β
//! η = β       afterwards
//! ```
//!
//! where `P` is the payoff and `|[A]|` the number of microclassifiers in the action set.
//! The initial `1/exp` phase makes the estimates plain averages of what has been seen so
//! far, so a fresh classifier's arbitrary initial values are forgotten after one update.
//!
//! # Fitness
//!
//! ```text
//! κ   = 1                    if ε < ε₀
//!     = α·(ε/ε₀)^(−ν)        otherwise
//! κ'  = κ·num / Σ(κ·num)     over the action set
//! F  ← F + β·(κ' − F)
//! ```

use lcs_core::ClassifierSet;

use crate::XcsParams;

/// Updates prediction, error, action set size and fitness of every member toward
/// `payoff`.
#[expect(clippy::cast_precision_loss)]
pub fn update_action_set<E, A>(
    action_set: &mut ClassifierSet<E, A>,
    payoff: f64,
    params: &XcsParams,
) {
    let set_size = action_set.num_micros() as f64;
    for cl in action_set.iter_mut() {
        cl.increment_experience();
        let experience = cl.experience() as f64;
        let rate = if experience < 1.0 / params.beta {
            1.0 / experience
        } else {
            params.beta
        };

        let payoff_diff = payoff - cl.prediction();
        cl.set_prediction(cl.prediction() + rate * payoff_diff);
        cl.set_error((cl.error() + rate * (payoff_diff.abs() - cl.error())).max(0.0));
        cl.set_action_set_size(
            (cl.action_set_size() + rate * (set_size - cl.action_set_size())).max(1.0),
        );
    }
    update_fitness(action_set, params);
}

/// Accuracy of a classifier with the given prediction error.
#[must_use]
pub fn accuracy(error: f64, params: &XcsParams) -> f64 {
    if error < params.epsilon_nought {
        1.0
    } else {
        params.alpha * (error / params.epsilon_nought).powf(-params.nu)
    }
}

/// Moves every member's fitness toward its numerosity-weighted share of the action set's
/// total accuracy.
pub fn update_fitness<E, A>(action_set: &mut ClassifierSet<E, A>, params: &XcsParams) {
    let accuracies = action_set
        .iter()
        .map(|cl| accuracy(cl.error(), params))
        .collect::<Vec<_>>();
    let accuracy_sum: f64 = action_set
        .iter()
        .zip(&accuracies)
        .map(|(cl, k)| k * f64::from(cl.numerosity()))
        .sum();
    if accuracy_sum <= 0.0 {
        return;
    }
    for (cl, k) in action_set.iter_mut().zip(accuracies) {
        let share = k * f64::from(cl.numerosity()) / accuracy_sum;
        cl.set_fitness(cl.fitness() + params.beta * (share - cl.fitness()));
    }
}
