use std::{fmt, num::NonZeroUsize};

use lcs_core::{
    Action, ClassifierSet, EnvResponse, Environment, Population, Representation, StepType,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use tracing::{debug, trace};

use crate::{
    InvalidParamsError, XcsError, XcsParams,
    action_selection::{ActionChoice, exploit, select_action},
    credit::update_action_set,
    deletion::run_deletion,
    genetic::{Discovery, should_run_ga},
    matching::{generate_action_set, generate_match_set},
    prediction::generate_prediction_array,
    selection::ParentSelection,
    subsumption::run_action_set_subsumption,
    summary::PopulationSummary,
};

/// What happened during one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord<S, A> {
    pub situation: S,
    pub action: A,
    pub did_explore: bool,
    pub response: EnvResponse,
}

/// The action set of the previous multi-step timestep, waiting for its discounted payoff.
struct PreviousStep<S, E, A> {
    action_set: ClassifierSet<E, A>,
    reward: f64,
    situation: S,
    did_explore: bool,
}

/// An XCS learning engine over representation `R` and action type `A`.
///
/// The engine owns its population, its hyperparameters and its random number generator;
/// every random draw of a run comes from that one seeded generator in a fixed order, so a
/// run is reproducible from `(params, seed)` and the environment's own seed.
pub struct Xcs<R, A>
where
    R: Representation,
{
    repr: R,
    actions: Vec<A>,
    params: XcsParams,
    population: Population<R::Element, A>,
    selection: Box<dyn ParentSelection>,
    rng: Pcg64,
    time_step: u64,
    previous: Option<PreviousStep<R::Situation, R::Element, A>>,
}

impl<R, A> fmt::Debug for Xcs<R, A>
where
    R: Representation,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xcs")
            .field("params", &self.params)
            .field("time_step", &self.time_step)
            .field("num_macros", &self.population.num_macros())
            .field("num_micros", &self.population.num_micros())
            .field("pending_update", &self.previous.is_some())
            .finish_non_exhaustive()
    }
}

impl<R, A> Xcs<R, A>
where
    R: Representation,
    R::Situation: Clone,
    A: Action,
{
    /// Builds an engine with an empty population.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParamsError`] if `params` fail validation, if `actions` is empty,
    /// or if `theta_mna` exceeds the number of actions (covering could never satisfy it).
    pub fn new(
        repr: R,
        actions: &[A],
        params: XcsParams,
        seed: u64,
    ) -> Result<Self, InvalidParamsError> {
        params.validate()?;
        if actions.is_empty() {
            return Err(InvalidParamsError::new("actions", "must not be empty"));
        }
        if params.theta_mna > actions.len() {
            return Err(InvalidParamsError::new(
                "theta_mna",
                "must not exceed the number of actions",
            ));
        }
        let max_micros = NonZeroUsize::new(params.n)
            .ok_or(InvalidParamsError::new("N", "must be positive"))?;

        Ok(Self {
            repr,
            actions: actions.to_vec(),
            selection: params.selection.build(),
            population: Population::new(max_micros),
            params,
            rng: Pcg64::seed_from_u64(seed),
            time_step: 0,
            previous: None,
        })
    }

    /// Builds an engine for the actions `env` offers.
    ///
    /// # Errors
    ///
    /// Same as [`Xcs::new`].
    pub fn for_environment<Env>(
        repr: R,
        env: &Env,
        params: XcsParams,
        seed: u64,
    ) -> Result<Self, InvalidParamsError>
    where
        Env: Environment<Situation = R::Situation, Action = A>,
    {
        Self::new(repr, env.action_set(), params, seed)
    }

    #[must_use]
    pub fn population(&self) -> &Population<R::Element, A> {
        &self.population
    }

    #[must_use]
    pub fn params(&self) -> &XcsParams {
        &self.params
    }

    #[must_use]
    pub fn representation(&self) -> &R {
        &self.repr
    }

    #[must_use]
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Number of training timesteps completed.
    #[must_use]
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    #[must_use]
    pub fn summary(&self) -> PopulationSummary {
        PopulationSummary::new(&self.population, &self.repr, self.time_step)
    }

    /// Forgets the action set waiting for a discounted payoff.
    ///
    /// Call this whenever the environment is reset outside a terminal step, so that
    /// reward from a new episode is not credited to the previous one.
    pub fn reset_episode(&mut self) {
        self.previous = None;
    }

    /// Runs one learning timestep against `env`.
    ///
    /// Order of work: match (covering as needed), predict, select, act, credit
    /// assignment with subsumption and rule discovery, deletion.
    ///
    /// In single-step problems the action set is updated with the immediate reward. In
    /// multi-step problems the previous timestep's action set is first updated with
    /// `reward + gamma · max(prediction array)`; then a terminal response updates the
    /// current action set with the raw reward and ends the episode, while a non-terminal
    /// one holds the current action set back for the next timestep.
    ///
    /// # Errors
    ///
    /// Returns [`XcsError::Environment`] when `env` refuses to observe or act. A failed
    /// timestep assigns no credit and does not advance the timestep counter. Classifiers
    /// covered before `env` refused to act stay in the population, which is trimmed back to
    /// capacity before the error is returned.
    pub fn train_step<Env>(
        &mut self,
        env: &mut Env,
    ) -> Result<StepRecord<R::Situation, A>, XcsError>
    where
        Env: Environment<Situation = R::Situation, Action = A>,
    {
        let situation = env.observe()?;
        let match_set = generate_match_set(
            &mut self.population,
            &self.repr,
            &situation,
            &self.actions,
            &self.params,
            self.time_step,
            &mut self.rng,
        );
        let prediction_array = generate_prediction_array(&match_set, &self.actions);
        let epsilon = self.params.exploration.epsilon(self.time_step);
        let ActionChoice {
            action,
            did_explore,
        } = select_action(&prediction_array, &self.actions, epsilon, &mut self.rng);
        let action_set = generate_action_set(&match_set, action);
        let response = match env.act(action) {
            Ok(response) => response,
            Err(err) => {
                run_deletion(&mut self.population, &self.params, &mut self.rng)?;
                return Err(err.into());
            }
        };
        trace!(time_step = self.time_step, ?action, did_explore, reward = response.reward);

        match env.step_type() {
            StepType::SingleStep => {
                self.learn(action_set, response.reward, &situation, true);
            }
            StepType::MultiStep => {
                if let Some(mut previous) = self.previous.take() {
                    let payoff =
                        previous.reward + self.params.gamma * prediction_array.max_prediction();
                    previous.action_set.refresh_from(&self.population);
                    self.learn(
                        previous.action_set,
                        payoff,
                        &previous.situation,
                        previous.did_explore,
                    );
                }
                if response.is_terminal {
                    let mut action_set = action_set;
                    action_set.refresh_from(&self.population);
                    self.learn(action_set, response.reward, &situation, did_explore);
                } else {
                    self.previous = Some(PreviousStep {
                        action_set,
                        reward: response.reward,
                        situation: situation.clone(),
                        did_explore,
                    });
                }
            }
        }

        run_deletion(&mut self.population, &self.params, &mut self.rng)?;
        self.time_step += 1;

        Ok(StepRecord {
            situation,
            action,
            did_explore,
            response,
        })
    }

    /// Runs one greedy timestep against `env` without learning.
    ///
    /// Nothing is covered, updated or deleted, and the timestep counter does not advance.
    /// When no classifier matches, the first action is taken.
    ///
    /// # Errors
    ///
    /// Returns [`XcsError::Environment`] when `env` refuses to observe or act.
    pub fn test_step<Env>(
        &mut self,
        env: &mut Env,
    ) -> Result<StepRecord<R::Situation, A>, XcsError>
    where
        Env: Environment<Situation = R::Situation, Action = A>,
    {
        let situation = env.observe()?;
        let action = self.predict(&situation);
        let response = env.act(action)?;
        Ok(StepRecord {
            situation,
            action,
            did_explore: false,
            response,
        })
    }

    /// The greedy action for `situation` under the current population.
    #[must_use]
    pub fn predict(&self, situation: &R::Situation) -> A {
        let match_set = self
            .population
            .snapshot(|cl| self.repr.does_match(cl.condition(), situation));
        let prediction_array = generate_prediction_array(&match_set, &self.actions);
        exploit(&prediction_array, &self.actions)
    }

    /// Credit assignment, action set subsumption and rule discovery on one action set.
    fn learn(
        &mut self,
        mut action_set: ClassifierSet<R::Element, A>,
        payoff: f64,
        situation: &R::Situation,
        may_discover: bool,
    ) {
        if action_set.is_empty() {
            return;
        }
        update_action_set(&mut action_set, payoff, &self.params);
        self.population.commit(&action_set);

        if self.params.do_as_subsumption {
            run_action_set_subsumption(
                &mut action_set,
                &mut self.population,
                &self.repr,
                &self.params,
            );
        }

        if may_discover && should_run_ga(&action_set, self.time_step, &self.params) {
            let discovery = Discovery {
                repr: &self.repr,
                actions: &self.actions,
                selection: self.selection.as_ref(),
                params: &self.params,
                time_step: self.time_step,
            };
            discovery.run(
                &mut action_set,
                &mut self.population,
                situation,
                &mut self.rng,
            );
            debug!(
                time_step = self.time_step,
                num_macros = self.population.num_macros(),
                num_micros = self.population.num_micros(),
                "population after discovery"
            );
        }
    }
}
