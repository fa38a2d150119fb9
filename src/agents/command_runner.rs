use crate::error::{BumpError, Result};
use colored::Colorize;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, current_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external commands on behalf of the workflow. Success means the process
/// started and exited with status zero.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// Spawns real processes, streaming their stdout while stderr goes straight to the terminal.
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        println!("{}", format!("Executing: {}", spec).blue());

        let mut child = Command::new(&spec.program)
            .current_dir(&spec.current_dir)
            .args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                BumpError::CommandExecution(format!("Failed to spawn '{}': {}", spec, e))
            })?;

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(std::result::Result::ok) {
                println!("{}", line);
            }
        }

        let status = child.wait().map_err(|e| {
            BumpError::CommandExecution(format!("Failed to wait for '{}': {}", spec, e))
        })?;

        if !status.success() {
            return Err(BumpError::CommandExecution(format!(
                "'{}' failed with exit code: {}",
                spec,
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Records every command and optionally fails the first one whose rendered
    /// form contains `fail_on`.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: RefCell<Vec<CommandSpec>>,
        pub fail_on: Option<String>,
    }

    impl RecordingRunner {
        pub fn failing_on(needle: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on: Some(needle.to_string()),
            }
        }

        pub fn rendered(&self) -> Vec<String> {
            self.calls.borrow().iter().map(ToString::to_string).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec) -> Result<()> {
            self.calls.borrow_mut().push(spec.clone());
            match &self.fail_on {
                Some(needle) if spec.to_string().contains(needle.as_str()) => Err(
                    BumpError::CommandExecution(format!("'{}' failed with exit code: 1", spec)),
                ),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renders_quoted_arguments() {
        let spec = CommandSpec::new("git", ".")
            .arg("commit")
            .args(["-m", "chore: update package version"]);
        assert_eq!(spec.to_string(), "git commit -m \"chore: update package version\"");
    }

    #[test]
    fn missing_program_is_an_error() {
        let dir = tempdir().unwrap();
        let spec = CommandSpec::new("npmbump-definitely-not-a-real-binary", dir.path());
        let err = SystemCommandRunner.run(&spec).unwrap_err();
        assert!(matches!(err, BumpError::CommandExecution(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(SystemCommandRunner.run(&CommandSpec::new("true", dir.path())).is_ok());

        let err = SystemCommandRunner
            .run(&CommandSpec::new("false", dir.path()))
            .unwrap_err();
        assert!(err.to_string().contains("exit code: 1"));
    }
}
