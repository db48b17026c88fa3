use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use lcs_xcs::XcsParams;

/// Where a command writes its JSON result: a file if a path was given, stdout otherwise.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn target(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `value` as pretty-printed JSON followed by a newline, then flushes.
    pub fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.target()))?;
        writeln!(self).with_context(|| format!("Failed to write to {}", self.target()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.target()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    Output::create(path)?.write_json(value)
}

/// Reads hyperparameters from a JSON file; missing fields take their defaults.
pub fn read_params_file(path: &Path) -> anyhow::Result<XcsParams> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open parameters file: {}", path.display()))?;
    let params = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse parameters file: {}", path.display()))?;
    Ok(params)
}
