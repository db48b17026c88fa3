use std::path::PathBuf;

use chrono::Utc;
use lcs_core::{EnvResponse, Environment, Representation, StepType};
use lcs_problems::{
    corridor::Corridor,
    interval::CentreSpread,
    multiplexer::{Multiplexer, RealMultiplexer},
    ternary::Ternary,
};
use lcs_stats::moving_average::MovingAverage;
use lcs_xcs::{Xcs, XcsParams};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    model::report::{Performance, TrainingReport},
    util,
};

const P_HASH: f64 = 0.33;
const INTERVAL_S0: f64 = 0.5;
const INTERVAL_M0: f64 = 0.1;

const CORRIDOR_LENGTH: usize = 10;
const CORRIDOR_MAX_STEPS: u64 = 50;

const PERFORMANCE_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Problem {
    /// 6-bit boolean multiplexer
    Mux6,
    /// 11-bit boolean multiplexer
    Mux11,
    /// 6-input real multiplexer with interval conditions
    RealMux6,
    /// Corridor of length 10 with the goal at its right end
    Corridor,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[arg(long, value_enum)]
    problem: Problem,
    /// Number of training timesteps
    #[arg(long, default_value_t = 10_000)]
    steps: u64,
    /// Seed of the learner; the environment uses the same seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Hyperparameter JSON file (missing fields take their defaults)
    #[arg(long)]
    params: Option<PathBuf>,
    /// Print progress every this many timesteps (0 to disable)
    #[arg(long, default_value_t = 1000)]
    report_interval: u64,
    /// Output file path for the training report (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = match &arg.params {
        Some(path) => util::read_params_file(path)?,
        None => XcsParams::default(),
    };
    info!(problem = ?arg.problem, steps = arg.steps, seed = arg.seed, "training");

    let report = match arg.problem {
        Problem::Mux6 => train(Ternary::new(P_HASH), Multiplexer::new(2, arg.seed), params, arg)?,
        Problem::Mux11 => train(Ternary::new(P_HASH), Multiplexer::new(3, arg.seed), params, arg)?,
        Problem::RealMux6 => train(
            CentreSpread::new(INTERVAL_S0, INTERVAL_M0),
            RealMultiplexer::new(2, arg.seed),
            params,
            arg,
        )?,
        Problem::Corridor => train(
            Ternary::new(P_HASH),
            Corridor::new(CORRIDOR_LENGTH, CORRIDOR_MAX_STEPS, arg.seed),
            params,
            arg,
        )?,
    };

    util::save_json(&report, arg.output.as_deref())?;

    eprintln!();
    eprintln!("Training completed");
    if let Some(path) = &arg.output {
        eprintln!("  Report: {}", path.display());
    }
    eprintln!("  Trained at: {}", report.trained_at);
    eprintln!("  Performance: {}", describe(&report.performance));
    eprintln!(
        "  Population: {} macroclassifiers, {} microclassifiers",
        report.summary.num_macros, report.summary.num_micros
    );
    Ok(())
}

fn train<R, Env>(
    repr: R,
    mut env: Env,
    params: XcsParams,
    arg: &TrainArg,
) -> anyhow::Result<TrainingReport>
where
    R: Representation<Situation = Env::Situation>,
    R::Situation: Clone,
    Env: Environment,
{
    let mut xcs = Xcs::for_environment(repr, &env, params, arg.seed)?;
    let mut tracker = Tracker::new(env.step_type());

    for step in 1..=arg.steps {
        let record = xcs.train_step(&mut env)?;
        tracker.record(&record.response);
        if arg.report_interval > 0 && step % arg.report_interval == 0 {
            let population = xcs.population();
            eprintln!(
                "Step #{step}: {} | population {} macro / {} micro",
                describe(&tracker.performance()),
                population.num_macros(),
                population.num_micros(),
            );
        }
    }

    Ok(TrainingReport {
        problem: arg.problem,
        seed: arg.seed,
        trained_at: Utc::now(),
        steps: xcs.time_step(),
        params: xcs.params().clone(),
        performance: tracker.performance(),
        summary: xcs.summary(),
    })
}

/// Rolling performance of the steps seen so far.
#[derive(Debug)]
struct Tracker {
    step_type: StepType,
    window: MovingAverage,
    episode_steps: u64,
    episodes: u64,
}

impl Tracker {
    fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            window: MovingAverage::new(PERFORMANCE_WINDOW),
            episode_steps: 0,
            episodes: 0,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn record(&mut self, response: &EnvResponse) {
        match self.step_type {
            StepType::SingleStep => {
                let correct = response.was_correct.unwrap_or(response.reward > 0.0);
                self.window.push(if correct { 1.0 } else { 0.0 });
            }
            StepType::MultiStep => {
                self.episode_steps += 1;
                if response.is_terminal {
                    self.window.push(self.episode_steps as f64);
                    self.episodes += 1;
                    self.episode_steps = 0;
                }
            }
        }
    }

    fn performance(&self) -> Performance {
        match self.step_type {
            StepType::SingleStep => Performance::Accuracy {
                value: self.window.mean(),
            },
            StepType::MultiStep => Performance::StepsToGoal {
                value: self.window.mean(),
                episodes: self.episodes,
            },
        }
    }
}

fn describe(performance: &Performance) -> String {
    match performance {
        Performance::Accuracy { value: Some(v) } => format!("accuracy {:.1}%", v * 100.0),
        Performance::StepsToGoal {
            value: Some(v),
            episodes,
        } => format!("{v:.2} steps to goal ({episodes} episodes)"),
        Performance::Accuracy { value: None } | Performance::StepsToGoal { value: None, .. } => {
            "no data yet".to_owned()
        }
    }
}
