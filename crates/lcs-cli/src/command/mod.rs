use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{params::ParamsArg, train::TrainArg};

mod params;
pub(crate) mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); `RUST_LOG` takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train an XCS learner on a benchmark problem
    Train(#[clap(flatten)] TrainArg),
    /// Write the default hyperparameters as JSON
    Params(#[clap(flatten)] ParamsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    setup_logging(args.verbose);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Params(arg) => params::run(&arg)?,
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}
