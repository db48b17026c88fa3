//! Subsumption: folding reliable specific classifiers into more general ones.
//!
//! A classifier may subsume another when it is experienced and accurate
//! ([`could_subsume`]), advocates the same action, and is strictly more general
//! ([`is_more_general`]). Subsumption is applied in two places:
//!
//! - **Action set subsumption** ([`run_action_set_subsumption`]) after credit assignment
//! - **GA subsumption** inside rule discovery (see [`genetic`](crate::genetic))
//!
//! Generality itself is decided by the [`Representation`].

use lcs_core::{Action, Classifier, ClassifierSet, Operation, Population, Representation};
use tracing::debug;

use crate::XcsParams;

/// Is `cl` experienced and accurate enough to subsume others?
#[must_use]
pub fn could_subsume<E, A>(cl: &Classifier<E, A>, params: &XcsParams) -> bool {
    cl.experience() > params.theta_sub && cl.error() < params.epsilon_nought
}

#[must_use]
pub fn is_more_general<R, A>(
    repr: &R,
    general: &Classifier<R::Element, A>,
    specific: &Classifier<R::Element, A>,
) -> bool
where
    R: Representation,
{
    repr.is_more_general(general.condition(), specific.condition())
}

#[must_use]
pub fn does_subsume<R, A>(
    repr: &R,
    subsumer: &Classifier<R::Element, A>,
    subsumee: &Classifier<R::Element, A>,
    params: &XcsParams,
) -> bool
where
    R: Representation,
    A: Action,
{
    subsumer.action() == subsumee.action()
        && could_subsume(subsumer, params)
        && is_more_general(repr, subsumer, subsumee)
}

/// Lets the most general eligible member of `action_set` absorb every member it is more
/// general than.
///
/// The subsumer is the classifier with the most wildcards among those that
/// [`could_subsume`]; ties go to the earliest member. Each subsumed member is replaced in
/// the population (recorded as [`Operation::AsSubsumption`]) and folded into the
/// subsumer within the snapshot as well. A member that is no longer in the population is
/// skipped.
///
/// Returns the number of members subsumed.
pub fn run_action_set_subsumption<R, A>(
    action_set: &mut ClassifierSet<R::Element, A>,
    population: &mut Population<R::Element, A>,
    repr: &R,
    params: &XcsParams,
) -> usize
where
    R: Representation,
    A: Action,
{
    let mut subsumer: Option<(&Classifier<R::Element, A>, usize)> = None;
    for cl in action_set.iter().filter(|cl| could_subsume(cl, params)) {
        let wildcards = cl.num_wildcards(repr);
        if subsumer.is_none_or(|(_, w)| wildcards > w) {
            subsumer = Some((cl, wildcards));
        }
    }
    let Some((subsumer, _)) = subsumer else {
        return 0;
    };
    let subsumer = subsumer.clone();

    let subsumees = action_set
        .iter()
        .filter(|cl| is_more_general(repr, &subsumer, cl))
        .map(|cl| cl.rule().clone())
        .collect::<Vec<_>>();

    let mut subsumed = 0;
    for rule in subsumees {
        if let Err(err) = population.replace(&rule, subsumer.rule(), Operation::AsSubsumption) {
            debug!(%err, "skipping action set subsumption");
            continue;
        }
        let Ok(removed) = action_set.remove(&rule) else {
            continue;
        };
        if let Some(cl) = action_set.get_mut(subsumer.rule()) {
            cl.set_numerosity(cl.numerosity() + removed.numerosity());
        }
        subsumed += 1;
    }
    if subsumed > 0 {
        debug!(subsumed, "action set subsumption");
    }
    subsumed
}
