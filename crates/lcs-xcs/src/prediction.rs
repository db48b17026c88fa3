//! The prediction array: one payoff estimate per action.

use lcs_core::{Action, ClassifierSet};
use tracing::warn;

/// Fitness-weighted payoff estimates for every action, in the environment's action order.
///
/// An entry is `None` ("null") when no classifier advocates the action or their total
/// fitness is zero. Readers that need a number treat a null entry as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionArray<A> {
    entries: Vec<(A, Option<f64>)>,
}

impl<A> PredictionArray<A>
where
    A: Action,
{
    /// The estimate for `action`, or `None` if it is null or unknown.
    #[must_use]
    pub fn get(&self, action: A) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| *a == action)
            .and_then(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (A, Option<f64>)> + '_ {
        self.entries.iter().copied()
    }

    /// Actions with a non-null estimate.
    pub fn non_null_actions(&self) -> impl Iterator<Item = A> + '_ {
        self.entries
            .iter()
            .filter_map(|(a, p)| p.is_some().then_some(*a))
    }

    #[must_use]
    pub fn is_all_null(&self) -> bool {
        self.entries.iter().all(|(_, p)| p.is_none())
    }

    /// The action with the highest estimate, null entries reading as `0.0`; ties go to
    /// the earliest action.
    ///
    /// Returns `None` only for an array over no actions.
    #[must_use]
    pub fn best_action(&self) -> Option<A> {
        let mut best: Option<(A, f64)> = None;
        for (action, prediction) in self.read_entries() {
            if best.is_none_or(|(_, p)| prediction > p) {
                best = Some((action, prediction));
            }
        }
        best.map(|(a, _)| a)
    }

    /// Highest estimate, null entries reading as `0.0`.
    #[must_use]
    pub fn max_prediction(&self) -> f64 {
        self.read_entries()
            .map(|(_, p)| p)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    fn read_entries(&self) -> impl Iterator<Item = (A, f64)> + '_ {
        self.entries.iter().map(|&(a, p)| (a, p.unwrap_or(0.0)))
    }
}

/// Aggregates the predictions of `match_set` per action.
///
/// For each action: `Σ prediction·fitness / Σ fitness` over the classifiers advocating it.
///
/// An empty match set is logged and yields an all-null array; covering normally rules
/// it out.
#[must_use]
pub fn generate_prediction_array<E, A>(
    match_set: &ClassifierSet<E, A>,
    actions: &[A],
) -> PredictionArray<A>
where
    A: Action,
{
    if match_set.is_empty() {
        warn!("prediction array requested for an empty match set");
    }
    let entries = actions
        .iter()
        .map(|&action| {
            let (weighted, total_fitness) = match_set
                .iter()
                .filter(|cl| *cl.action() == action)
                .fold((0.0, 0.0), |(w, f), cl| {
                    (w + cl.prediction() * cl.fitness(), f + cl.fitness())
                });
            let prediction = (total_fitness > 0.0).then(|| weighted / total_fitness);
            (action, prediction)
        })
        .collect();
    PredictionArray { entries }
}

#[cfg(test)]
mod tests {
    use lcs_core::{Classifier, InitialEstimates, Rule};

    use super::*;

    fn classifier(action: u8, prediction: f64, fitness: f64) -> Classifier<u8, u8> {
        Classifier::new(
            Rule::new(vec![action], action),
            InitialEstimates {
                prediction,
                error: 0.0,
                fitness,
            },
            0,
        )
    }

    fn match_set(entries: &[(u8, f64, f64)]) -> ClassifierSet<u8, u8> {
        entries
            .iter()
            .enumerate()
            .map(|(i, &(a, p, f))| {
                let mut cl = classifier(a, p, f);
                // distinct rules for the same action
                cl.rule_mut().condition_mut()[0] = u8::try_from(i).unwrap();
                cl
            })
            .collect()
    }

    #[test]
    fn test_fitness_weighted_mean() {
        let set = match_set(&[(0, 100.0, 0.3), (0, 200.0, 0.1), (1, 50.0, 1.0)]);
        let pa = generate_prediction_array(&set, &[0, 1, 2]);
        assert!((pa.get(0).unwrap() - 125.0).abs() < 1e-9);
        assert!((pa.get(1).unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(pa.get(2), None, "unadvocated action is null");
        assert_eq!(pa.best_action(), Some(0));
        assert!((pa.max_prediction() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fitness_is_null() {
        let set = match_set(&[(0, 100.0, 0.0), (1, 10.0, 0.5)]);
        let pa = generate_prediction_array(&set, &[0, 1]);
        assert_eq!(pa.get(0), None);
        assert_eq!(pa.non_null_actions().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_ties_go_to_first_action() {
        let set = match_set(&[(2, 10.0, 1.0), (1, 10.0, 1.0)]);
        let pa = generate_prediction_array(&set, &[0, 1, 2]);
        assert_eq!(pa.best_action(), Some(1));
    }

    #[test]
    fn test_empty_match_set_is_all_null() {
        let pa = generate_prediction_array(&ClassifierSet::<u8, u8>::new(), &[0, 1]);
        assert!(pa.is_all_null());
        assert_eq!(pa.best_action(), Some(0));
        assert!(pa.max_prediction().abs() < f64::EPSILON);
        assert_eq!(
            generate_prediction_array(&ClassifierSet::<u8, u8>::new(), &[]).best_action(),
            None
        );
    }

    #[test]
    fn test_null_reads_as_zero_against_negative_estimates() {
        let set = match_set(&[(1, -50.0, 1.0), (2, -10.0, 1.0)]);
        let pa = generate_prediction_array(&set, &[0, 1, 2]);
        assert_eq!(pa.get(0), None);
        assert_eq!(pa.best_action(), Some(0));
        assert!(pa.max_prediction().abs() < f64::EPSILON);
        assert_eq!(pa.non_null_actions().collect::<Vec<_>>(), vec![1, 2]);
    }
}
