//! Rule discovery: a steady-state genetic algorithm run inside an action set.
//!
//! # Algorithm Overview
//!
//! Discovery is triggered when the action set has, on average, not taken part in
//! discovery for more than `theta_ga` timesteps ([`should_run_ga`]). Then:
//!
//! 1. **Time Stamp** - Every member's time stamp is set to the current timestep
//! 2. **Selection** - Two parents are picked by the configured [`ParentSelection`]
//! 3. **Reproduction** - Each parent is copied into a child with numerosity 1, no
//!    experience and the parent's per-copy fitness
//! 4. **Crossover** - With probability `chi` the children's conditions exchange
//!    elements, and both children take the parents' mean prediction, a quarter of their
//!    mean error and a tenth of their mean fitness
//! 5. **Mutation** - Each child's condition is mutated by the [`Representation`], and its
//!    action is replaced by a different one with probability `mu`
//! 6. **Insertion** - A child subsumed by one of its parents adds a copy to that parent
//!    instead ([`Operation::GaSubsumption`]); any other child is inserted
//!    ([`Operation::Discovery`]), merging into a structurally equal rule if one exists
//!
//! The population may exceed its capacity afterwards; the deletion pass at the end of the
//! timestep restores it.
//!
//! # Design Decisions
//!
//! ## Discounted Offspring Statistics
//!
//! Offspring have never been evaluated, so their inherited error is reduced and their
//! fitness heavily discounted. This keeps an untested child from out-competing its
//! parents in selection and shields it from deletion only through its low experience.

use lcs_core::{Action, Classifier, ClassifierSet, Operation, Population, Representation};
use rand::{Rng, seq::IndexedRandom as _};
use tracing::debug;

use crate::{
    XcsParams,
    selection::{ParentSelection, SelectionCandidate},
    subsumption::does_subsume,
};

/// Numerosity-weighted mean time stamp of `action_set` (0 for an empty set).
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_time_stamp<E, A>(action_set: &ClassifierSet<E, A>) -> f64 {
    let num_micros = action_set.num_micros();
    if num_micros == 0 {
        return 0.0;
    }
    let weighted: f64 = action_set
        .iter()
        .map(|cl| cl.time_stamp() as f64 * f64::from(cl.numerosity()))
        .sum();
    weighted / num_micros as f64
}

/// Has `action_set` gone without discovery for more than `theta_ga` timesteps on average?
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn should_run_ga<E, A>(
    action_set: &ClassifierSet<E, A>,
    time_step: u64,
    params: &XcsParams,
) -> bool {
    !action_set.is_empty() && time_step as f64 - mean_time_stamp(action_set) > params.theta_ga
}

/// Everything rule discovery reads besides the action set and population.
#[derive(Debug)]
pub struct Discovery<'a, R, A>
where
    R: Representation,
{
    pub repr: &'a R,
    pub actions: &'a [A],
    pub selection: &'a dyn ParentSelection,
    pub params: &'a XcsParams,
    pub time_step: u64,
}

impl<R, A> Discovery<'_, R, A>
where
    R: Representation,
    A: Action,
{
    /// Runs one round of the genetic algorithm on `action_set`.
    ///
    /// Time stamps are written to the population as well as to the snapshot. Returns the
    /// number of children that became or merged into population entries of their own
    /// (children subsumed by a parent are not counted).
    pub fn run<G>(
        &self,
        action_set: &mut ClassifierSet<R::Element, A>,
        population: &mut Population<R::Element, A>,
        situation: &R::Situation,
        rng: &mut G,
    ) -> usize
    where
        G: Rng,
    {
        if action_set.is_empty() {
            return 0;
        }
        for cl in action_set.iter_mut() {
            cl.set_time_stamp(self.time_step);
        }
        population.commit(action_set);

        let candidates = action_set
            .iter()
            .map(|cl| SelectionCandidate {
                fitness: cl.fitness(),
                numerosity: cl.numerosity(),
            })
            .collect::<Vec<_>>();
        let parent1 = &action_set.as_slice()[self.selection.select(&candidates, rng)];
        let parent2 = &action_set.as_slice()[self.selection.select(&candidates, rng)];

        let mut child1 = self.reproduce(parent1);
        let mut child2 = self.reproduce(parent2);

        if rng.random_bool(self.params.chi) {
            self.repr.crossover_conditions(
                child1.rule_mut().condition_mut(),
                child2.rule_mut().condition_mut(),
                self.params.crossover,
                rng,
            );
            let prediction = (parent1.prediction() + parent2.prediction()) / 2.0;
            let error = 0.25 * (parent1.error() + parent2.error()) / 2.0;
            let fitness = 0.1 * (parent1.micro_fitness() + parent2.micro_fitness()) / 2.0;
            for child in [&mut child1, &mut child2] {
                child.set_prediction(prediction);
                child.set_error(error);
                child.set_fitness(fitness);
            }
        }

        let mut inserted = 0;
        for mut child in [child1, child2] {
            self.repr.mutate_condition(
                child.rule_mut().condition_mut(),
                situation,
                self.params.mu,
                rng,
            );
            self.mutate_action(&mut child, rng);

            if self.params.do_ga_subsumption {
                let subsumer = [parent1, parent2]
                    .into_iter()
                    .find(|parent| does_subsume(self.repr, parent, &child, self.params));
                if let Some(parent) = subsumer {
                    match population.duplicate(parent.rule(), 1, Operation::GaSubsumption) {
                        Ok(()) => continue,
                        Err(err) => debug!(%err, "parent gone, inserting child instead"),
                    }
                }
            }
            population.insert(child, Operation::Discovery);
            inserted += 1;
        }
        debug!(time_step = self.time_step, inserted, "rule discovery");
        inserted
    }

    fn reproduce(&self, parent: &Classifier<R::Element, A>) -> Classifier<R::Element, A> {
        let mut child = parent.clone();
        child.set_numerosity(1);
        child.set_experience(0);
        child.set_fitness(parent.micro_fitness());
        child.set_time_stamp(self.time_step);
        child
    }

    fn mutate_action<G>(&self, child: &mut Classifier<R::Element, A>, rng: &mut G)
    where
        G: Rng,
    {
        if self.actions.len() < 2 || !rng.random_bool(self.params.mu) {
            return;
        }
        let current = *child.action();
        let others = self
            .actions
            .iter()
            .copied()
            .filter(|a| *a != current)
            .collect::<Vec<_>>();
        if let Some(&action) = others.choose(rng) {
            child.rule_mut().set_action(action);
        }
    }
}
