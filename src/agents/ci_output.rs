use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Where step outputs such as the branch name are published for CI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// `$GITHUB_OUTPUT` file, one `key=value` line appended per output.
    File(PathBuf),
    /// Legacy `::set-output` workflow command on stdout.
    Stdout,
}

impl OutputSink {
    pub fn from_env() -> Self {
        match std::env::var_os(GITHUB_OUTPUT_ENV) {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Stdout,
        }
    }

    pub fn publish(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{key}={value}")?;
            }
            Self::Stdout => println!("::set-output name={key}::{value}"),
        }
        Ok(())
    }
}
