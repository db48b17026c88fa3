//! Deletion: keeping the population within its microclassifier capacity.
//!
//! One microclassifier is removed per pass until the population fits again. Each member
//! is chosen with probability proportional to its [deletion vote](deletion_vote): members
//! sitting in crowded niches (large action set size estimate) are favoured, and
//! experienced members whose fitness per copy is far below the population mean are
//! penalized further.

use lcs_core::{Classifier, MemberNotFound, Population};
use rand::Rng;
use tracing::trace;

use crate::XcsParams;

/// Deletion weight of `cl` given the population's mean fitness per microclassifier.
///
/// ```text
/// vote = as·num                             base
/// vote = as·num · F̄ / (F/num)               if exp > θdel and F/num < δ·F̄
/// ```
#[must_use]
pub fn deletion_vote<E, A>(cl: &Classifier<E, A>, mean_fitness: f64, params: &XcsParams) -> f64 {
    let vote = cl.action_set_size() * f64::from(cl.numerosity());
    let micro_fitness = cl.micro_fitness();
    if cl.experience() > params.theta_del && micro_fitness < params.delta * mean_fitness {
        vote * mean_fitness / micro_fitness.max(f64::EPSILON)
    } else {
        vote
    }
}

/// Deletes microclassifiers until the population no longer exceeds its capacity.
///
/// The mean fitness is recomputed before every deletion. Returns the number of
/// microclassifiers deleted.
#[expect(clippy::cast_precision_loss)]
pub fn run_deletion<E, A, G>(
    population: &mut Population<E, A>,
    params: &XcsParams,
    rng: &mut G,
) -> Result<u64, MemberNotFound>
where
    E: Clone + PartialEq,
    A: Clone + PartialEq,
    G: Rng + ?Sized,
{
    let mut deleted = 0;
    while population.excess_micros() > 0 {
        let total_fitness: f64 = population.iter().map(Classifier::fitness).sum();
        let mean_fitness = total_fitness / population.num_micros() as f64;
        let votes = population
            .iter()
            .map(|cl| deletion_vote(cl, mean_fitness, params))
            .collect::<Vec<_>>();

        let index = roulette(&votes, rng);
        let rule = population.as_slice()[index].rule().clone();
        population.delete(&rule)?;
        deleted += 1;
    }
    if deleted > 0 {
        trace!(deleted, "deletion");
    }
    Ok(deleted)
}

fn roulette<G>(weights: &[f64], rng: &mut G) -> usize
where
    G: Rng + ?Sized,
{
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..weights.len());
    }
    let point = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > point {
            return i;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use lcs_core::{Operation, Rule};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn classifier(id: u8, numerosity: u32, fitness: f64, experience: u64) -> Classifier<u8, u8> {
        let mut cl = Classifier::new(
            Rule::new(vec![id], 0),
            XcsParams::default().initial_estimates(),
            0,
        );
        cl.set_numerosity(numerosity);
        cl.set_fitness(fitness);
        cl.set_experience(experience);
        cl.set_action_set_size(2.0);
        cl
    }

    #[test]
    fn test_vote_is_action_set_size_times_numerosity() {
        let params = XcsParams::default();
        let cl = classifier(0, 3, 0.3, 100);
        assert!((deletion_vote(&cl, 0.1, &params) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_vote_penalizes_unfit_experienced() {
        let params = XcsParams::default();
        let unfit = classifier(0, 1, 0.001, 100);
        let vote = deletion_vote(&unfit, 0.5, &params);
        assert!((vote - 2.0 * 0.5 / 0.001).abs() < 1e-6);

        let young = classifier(1, 1, 0.001, 5);
        assert!((deletion_vote(&young, 0.5, &params) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_deletion_restores_capacity() {
        let params = XcsParams::default();
        let mut population = Population::new(NonZeroUsize::new(10).unwrap());
        for id in 0..6 {
            population.add(classifier(id, 3, 0.2, 50), Operation::Covering);
        }
        let mut rng = Pcg64::seed_from_u64(9);
        let deleted = run_deletion(&mut population, &params, &mut rng).unwrap();

        assert_eq!(deleted, 8);
        assert_eq!(population.num_micros(), 10);
        assert_eq!(
            population.iter().map(|cl| u64::from(cl.numerosity())).sum::<u64>(),
            10
        );
        assert_eq!(population.ledger().get(Operation::Deletion), 8);
    }

    #[test]
    fn test_no_deletion_within_capacity() {
        let params = XcsParams::default();
        let mut population = Population::new(NonZeroUsize::new(10).unwrap());
        population.add(classifier(0, 10, 0.2, 50), Operation::Covering);
        let mut rng = Pcg64::seed_from_u64(9);
        assert_eq!(run_deletion(&mut population, &params, &mut rng).unwrap(), 0);
        assert_eq!(population.num_micros(), 10);
    }

    #[test]
    fn test_unfit_members_are_deleted_first() {
        let params = XcsParams::default();
        let mut rng = Pcg64::seed_from_u64(21);
        let mut unfit_survived = 0;
        for _ in 0..50 {
            let mut population = Population::new(NonZeroUsize::new(2).unwrap());
            population.add(classifier(0, 1, 0.9, 100), Operation::Covering);
            population.add(classifier(1, 1, 0.9, 100), Operation::Covering);
            population.add(classifier(2, 1, 0.0001, 100), Operation::Covering);
            run_deletion(&mut population, &params, &mut rng).unwrap();
            if population.contains(&Rule::new(vec![2], 0)) {
                unfit_survived += 1;
            }
        }
        assert!(unfit_survived <= 2, "unfit survived {unfit_survived} times");
    }
}
