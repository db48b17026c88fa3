use lcs_core::{Classifier, OperationLedger, Population, Representation};
use lcs_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// A serializable snapshot of the population's size and learned statistics.
///
/// Distributions are taken over macroclassifiers and are `None` for an empty population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub time_step: u64,
    pub num_macros: usize,
    pub num_micros: u64,
    pub max_micros: usize,
    pub ledger: OperationLedger,
    pub fitness: Option<DescriptiveStats>,
    pub error: Option<DescriptiveStats>,
    pub prediction: Option<DescriptiveStats>,
    pub generality: Option<DescriptiveStats>,
    pub experience: Option<DescriptiveStats>,
}

impl PopulationSummary {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<R, A>(population: &Population<R::Element, A>, repr: &R, time_step: u64) -> Self
    where
        R: Representation,
    {
        Self {
            time_step,
            num_macros: population.num_macros(),
            num_micros: population.num_micros(),
            max_micros: population.max_micros().get(),
            ledger: population.ledger().clone(),
            fitness: DescriptiveStats::new(population.iter().map(Classifier::fitness)),
            error: DescriptiveStats::new(population.iter().map(Classifier::error)),
            prediction: DescriptiveStats::new(population.iter().map(Classifier::prediction)),
            generality: DescriptiveStats::new(
                population
                    .iter()
                    .map(|cl| repr.calc_generality(cl.condition())),
            ),
            experience: DescriptiveStats::new(population.iter().map(|cl| cl.experience() as f64)),
        }
    }
}
