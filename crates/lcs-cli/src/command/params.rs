use std::path::PathBuf;

use lcs_xcs::XcsParams;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ParamsArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ParamsArg) -> anyhow::Result<()> {
    let ParamsArg { output } = arg;
    util::save_json(&XcsParams::default(), output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Default parameters written to {}", path.display());
    }
    Ok(())
}
