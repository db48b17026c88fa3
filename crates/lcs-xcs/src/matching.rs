//! Match set and action set formation, with covering.

use std::collections::BTreeSet;

use lcs_core::{Action, Classifier, ClassifierSet, Operation, Population, Representation, Rule};
use rand::{Rng, seq::IndexedRandom as _};
use tracing::{debug, warn};

use crate::XcsParams;

/// Copies every population member whose condition matches `situation` into a new set,
/// then covers until at least `theta_mna` distinct actions are advocated.
///
/// Each covering round synthesizes a condition matching `situation`, pairs it with an
/// action drawn uniformly from the actions not yet represented, adds the new classifier
/// to the population under [`Operation::Covering`], and appends a copy to the match set.
/// The loop runs at most `theta_mna` rounds.
pub fn generate_match_set<R, A, G>(
    population: &mut Population<R::Element, A>,
    repr: &R,
    situation: &R::Situation,
    actions: &[A],
    params: &XcsParams,
    time_step: u64,
    rng: &mut G,
) -> ClassifierSet<R::Element, A>
where
    R: Representation,
    A: Action,
    G: Rng + ?Sized,
{
    let mut match_set = population.snapshot(|cl| repr.does_match(cl.condition(), situation));

    let mut represented: BTreeSet<A> = match_set.iter().map(|cl| *cl.action()).collect();
    while represented.len() < params.theta_mna {
        let unrepresented = actions
            .iter()
            .copied()
            .filter(|a| !represented.contains(a))
            .collect::<Vec<_>>();
        let Some(&action) = unrepresented.choose(rng) else {
            warn!(
                theta_mna = params.theta_mna,
                "covering ran out of unrepresented actions"
            );
            break;
        };
        let condition = repr.gen_covering_condition(situation, rng);
        let classifier = Classifier::new(
            Rule::new(condition, action),
            params.initial_estimates(),
            time_step,
        );
        debug!(?action, "covering");
        match_set.push(&classifier);
        population.add(classifier, Operation::Covering);
        represented.insert(action);
    }

    match_set
}

/// The members of `match_set` advocating exactly `action`.
#[must_use]
pub fn generate_action_set<E, A>(match_set: &ClassifierSet<E, A>, action: A) -> ClassifierSet<E, A>
where
    E: Clone,
    A: Action,
{
    match_set
        .iter()
        .filter(|cl| *cl.action() == action)
        .cloned()
        .collect()
}
