//! XCS hyperparameters.
//!
//! [`XcsParams`] is an immutable value validated once when the engine is built and then
//! passed by reference to every component. It serializes to and from JSON so that runs
//! can be configured from a file; missing fields take the [`Default`] values, which are
//! the customary settings for boolean multiplexer problems with a reward of 1000.
//!
//! # Parameters
//!
//! | name                | meaning                                                          |
//! |---------------------|------------------------------------------------------------------|
//! | `n`                 | population capacity in microclassifiers (`N`)                    |
//! | `beta`              | learning rate of prediction, error, set size and fitness         |
//! | `alpha`             | accuracy fall-off for errors above `epsilon_nought`              |
//! | `epsilon_nought`    | error below which a classifier counts as accurate                |
//! | `nu`                | accuracy exponent                                                |
//! | `gamma`             | discount factor for multi-step payoff                            |
//! | `theta_ga`          | mean time since last discovery that triggers the GA              |
//! | `chi`               | crossover probability                                            |
//! | `mu`                | per-element mutation probability                                 |
//! | `theta_del`         | experience above which low fitness raises the deletion vote     |
//! | `delta`             | fraction of mean fitness below which that penalty applies        |
//! | `theta_sub`         | experience above which a classifier may subsume                  |
//! | `theta_mna`         | minimum number of distinct actions in a match set                |
//! | `prediction_i`      | initial prediction                                               |
//! | `epsilon_i`         | initial error                                                    |
//! | `fitness_i`         | initial fitness                                                  |
//!
//! Strategy choices ([`ExplorationSchedule`], [`SelectionMethod`],
//! [`CrossoverStrategy`]) are serde-tagged enums.

use lcs_core::{CrossoverStrategy, InitialEstimates};
use serde::{Deserialize, Serialize};

use crate::selection::{ParentSelection, RouletteWheelSelection, TournamentSelection};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hyperparameter `{name}`: {reason}")]
pub struct InvalidParamsError {
    name: &'static str,
    reason: &'static str,
}

impl InvalidParamsError {
    #[must_use]
    pub const fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Probability of exploring (choosing a random action) as a function of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    Fixed {
        p_explore: f64,
    },
    /// Linear interpolation from `start` to `end` over `decay_steps` timesteps, then
    /// constant at `end`.
    LinearDecay {
        start: f64,
        end: f64,
        decay_steps: u64,
    },
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::Fixed { p_explore: 0.5 }
    }
}

impl ExplorationSchedule {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn epsilon(&self, time_step: u64) -> f64 {
        match *self {
            Self::Fixed { p_explore } => p_explore,
            Self::LinearDecay {
                start,
                end,
                decay_steps,
            } => {
                let progress = (time_step as f64 / decay_steps as f64).min(1.0);
                start + (end - start) * progress
            }
        }
    }

    fn validate(&self) -> Result<(), InvalidParamsError> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        match *self {
            Self::Fixed { p_explore } => {
                if !in_unit(p_explore) {
                    return Err(InvalidParamsError::new(
                        "p_explore",
                        "must be within [0, 1]",
                    ));
                }
            }
            Self::LinearDecay {
                start,
                end,
                decay_steps,
            } => {
                if !in_unit(start) || !in_unit(end) {
                    return Err(InvalidParamsError::new(
                        "exploration",
                        "start and end must be within [0, 1]",
                    ));
                }
                if decay_steps == 0 {
                    return Err(InvalidParamsError::new(
                        "exploration",
                        "decay_steps must be positive",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// How the genetic algorithm picks parents from an action set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionMethod {
    RouletteWheel,
    /// Tournament over a `tau` fraction of the action set's microclassifiers.
    Tournament {
        tau: f64,
    },
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::Tournament { tau: 0.4 }
    }
}

impl SelectionMethod {
    /// Builds the selection strategy this method names.
    #[must_use]
    pub fn build(&self) -> Box<dyn ParentSelection> {
        match *self {
            Self::RouletteWheel => Box::new(RouletteWheelSelection),
            Self::Tournament { tau } => Box::new(TournamentSelection::new(tau)),
        }
    }
}

/// The full XCS hyperparameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XcsParams {
    pub n: usize,
    pub beta: f64,
    pub alpha: f64,
    pub epsilon_nought: f64,
    pub nu: f64,
    pub gamma: f64,
    pub theta_ga: f64,
    pub chi: f64,
    pub mu: f64,
    pub theta_del: u64,
    pub delta: f64,
    pub theta_sub: u64,
    pub theta_mna: usize,
    pub do_ga_subsumption: bool,
    pub do_as_subsumption: bool,
    pub exploration: ExplorationSchedule,
    pub prediction_i: f64,
    pub epsilon_i: f64,
    pub fitness_i: f64,
    pub selection: SelectionMethod,
    pub crossover: CrossoverStrategy,
}

impl Default for XcsParams {
    fn default() -> Self {
        Self {
            n: 800,
            beta: 0.2,
            alpha: 0.1,
            epsilon_nought: 10.0,
            nu: 5.0,
            gamma: 0.71,
            theta_ga: 25.0,
            chi: 0.8,
            mu: 0.04,
            theta_del: 20,
            delta: 0.1,
            theta_sub: 20,
            theta_mna: 2,
            do_ga_subsumption: true,
            do_as_subsumption: true,
            exploration: ExplorationSchedule::default(),
            prediction_i: 10.0,
            epsilon_i: 0.0,
            fitness_i: 0.01,
            selection: SelectionMethod::default(),
            crossover: CrossoverStrategy::default(),
        }
    }
}

impl XcsParams {
    /// Checks every parameter against its admissible range.
    pub fn validate(&self) -> Result<(), InvalidParamsError> {
        let unit = |name: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(InvalidParamsError::new(name, "must be within [0, 1]"))
            }
        };
        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(InvalidParamsError::new(name, "must be positive and finite"))
            }
        };

        if self.n == 0 {
            return Err(InvalidParamsError::new("N", "must be positive"));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(InvalidParamsError::new("beta", "must be within (0, 1]"));
        }
        positive("alpha", self.alpha)?;
        positive("epsilon_nought", self.epsilon_nought)?;
        positive("nu", self.nu)?;
        unit("gamma", self.gamma)?;
        if !(self.theta_ga.is_finite() && self.theta_ga >= 0.0) {
            return Err(InvalidParamsError::new(
                "theta_ga",
                "must be non-negative and finite",
            ));
        }
        unit("chi", self.chi)?;
        unit("mu", self.mu)?;
        unit("delta", self.delta)?;
        if self.theta_mna == 0 {
            return Err(InvalidParamsError::new("theta_mna", "must be positive"));
        }
        self.exploration.validate()?;
        if !self.prediction_i.is_finite() {
            return Err(InvalidParamsError::new("prediction_I", "must be finite"));
        }
        if !(self.epsilon_i.is_finite() && self.epsilon_i >= 0.0) {
            return Err(InvalidParamsError::new(
                "epsilon_I",
                "must be non-negative and finite",
            ));
        }
        if !(self.fitness_i.is_finite() && self.fitness_i >= 0.0) {
            return Err(InvalidParamsError::new(
                "fitness_I",
                "must be non-negative and finite",
            ));
        }
        if let SelectionMethod::Tournament { tau } = self.selection
            && !(tau > 0.0 && tau <= 1.0)
        {
            return Err(InvalidParamsError::new("tau", "must be within (0, 1]"));
        }
        Ok(())
    }

    /// Initial statistics for classifiers created by covering.
    #[must_use]
    pub fn initial_estimates(&self) -> InitialEstimates {
        InitialEstimates {
            prediction: self.prediction_i,
            error: self.epsilon_i,
            fitness: self.fitness_i,
        }
    }

    /// Looks up a numeric or boolean parameter by its conventional name.
    ///
    /// Booleans read as `0.0`/`1.0`. `p_explore` is the exploration probability at
    /// time zero. Returns `None` for unknown names.
    ///
    /// ```
    /// use lcs_xcs::XcsParams;
    ///
    /// let params = XcsParams::default();
    /// assert_eq!(params.get("beta"), Some(0.2));
    /// assert_eq!(params.get("N"), Some(800.0));
    /// assert_eq!(params.get("no_such_param"), None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let value = match name {
            "N" | "n" => self.n as f64,
            "beta" => self.beta,
            "alpha" => self.alpha,
            "epsilon_nought" => self.epsilon_nought,
            "nu" => self.nu,
            "gamma" => self.gamma,
            "theta_ga" => self.theta_ga,
            "chi" => self.chi,
            "mu" => self.mu,
            "theta_del" => self.theta_del as f64,
            "delta" => self.delta,
            "theta_sub" => self.theta_sub as f64,
            "theta_mna" => self.theta_mna as f64,
            "do_ga_subsumption" => flag(self.do_ga_subsumption),
            "do_as_subsumption" => flag(self.do_as_subsumption),
            "p_explore" => self.exploration.epsilon(0),
            "prediction_I" | "prediction_i" => self.prediction_i,
            "epsilon_I" | "epsilon_i" => self.epsilon_i,
            "fitness_I" | "fitness_i" => self.fitness_i,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        XcsParams::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_out_of_range() {
        let cases: [(&str, fn(&mut XcsParams)); 6] = [
            ("N", |p| p.n = 0),
            ("beta", |p| p.beta = 0.0),
            ("chi", |p| p.chi = 1.5),
            ("theta_mna", |p| p.theta_mna = 0),
            ("p_explore", |p| {
                p.exploration = ExplorationSchedule::Fixed { p_explore: -0.1 };
            }),
            ("tau", |p| p.selection = SelectionMethod::Tournament { tau: 0.0 }),
        ];
        for (name, modify) in cases {
            let mut params = XcsParams::default();
            modify(&mut params);
            let err = params.validate().unwrap_err();
            assert_eq!(err.name(), name);
        }
    }

    #[test]
    fn test_linear_decay() {
        let schedule = ExplorationSchedule::LinearDecay {
            start: 1.0,
            end: 0.0,
            decay_steps: 100,
        };
        assert!((schedule.epsilon(0) - 1.0).abs() < 1e-12);
        assert!((schedule.epsilon(50) - 0.5).abs() < 1e-12);
        assert!(schedule.epsilon(1000).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: XcsParams =
            serde_json::from_str(r#"{"n": 400, "selection": {"kind": "roulette_wheel"}}"#)
                .unwrap();
        assert_eq!(params.n, 400);
        assert_eq!(params.selection, SelectionMethod::RouletteWheel);
        assert!((params.beta - 0.2).abs() < f64::EPSILON);
    }
}
