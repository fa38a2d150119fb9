use crate::agents::command_runner::{CommandRunner, CommandSpec};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// PackageManagerAgent re-syncs node_modules and package-lock.json after a bump
pub struct PackageManagerAgent<'a> {
    runner: &'a dyn CommandRunner,
    project_path: PathBuf,
}

impl<'a> PackageManagerAgent<'a> {
    pub fn new<P: AsRef<Path>>(runner: &'a dyn CommandRunner, project_path: P) -> Self {
        Self {
            runner,
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Run `npm install` in the project directory
    pub fn refresh(&self) -> Result<()> {
        let npm = if cfg!(target_os = "windows") {
            "npm.cmd"
        } else {
            "npm"
        };
        self.runner
            .run(&CommandSpec::new(npm, &self.project_path).arg("install"))
    }
}
