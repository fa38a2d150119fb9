use crate::agents::command_runner::{CommandRunner, CommandSpec};
use crate::agents::project_scanner::{LOCK_FILE, MANIFEST_FILE};
use crate::agents::update::PackageTarget;
use crate::error::{BumpError, Result};
use crate::utils::path_validator::PathValidator;
use jiff::Zoned;
use std::path::{Path, PathBuf};

pub const COMMIT_MESSAGE: &str = "chore: update package version";
const MAX_BRANCH_LEN: usize = 80;

/// Author used when committing from CI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl GitIdentity {
    pub fn github_actions_bot() -> Self {
        Self {
            name: "github-actions[bot]".to_string(),
            email: "github-actions[bot]@users.noreply.github.com".to_string(),
        }
    }
}

/// VersionControlAgent handles Git operations with hardened input validation.
pub struct VersionControlAgent<'a> {
    runner: &'a dyn CommandRunner,
    project_path: PathBuf,
    identity: Option<GitIdentity>,
}

impl<'a> VersionControlAgent<'a> {
    pub fn new<P: AsRef<Path>>(runner: &'a dyn CommandRunner, project_path: P) -> Result<Self> {
        let project_path = Self::validate_git_path(project_path.as_ref())?;
        Ok(Self {
            runner,
            project_path,
            identity: None,
        })
    }

    pub fn with_identity(mut self, identity: Option<GitIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Create and switch to a new branch
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.run_git(["checkout", "-b", branch_name], "git checkout -b")
    }

    /// Stage package.json, plus package-lock.json when the project has one
    pub fn stage_manifests(&self, include_lock: bool) -> Result<()> {
        let mut files = vec![MANIFEST_FILE];
        if include_lock {
            files.push(LOCK_FILE);
        }

        for file in &files {
            PathValidator::validate_project_file(file, &self.project_path).map_err(|err| {
                BumpError::GitOperation(format!("Refusing to stage unsafe path: {err}"))
            })?;
        }

        let mut args = vec!["add"];
        args.extend(files);
        self.run_git(args, "git add")
    }

    /// Commit the staged changes with the standard message
    pub fn commit(&self) -> Result<()> {
        let mut args = Vec::new();
        if let Some(identity) = &self.identity {
            args.push("-c".to_string());
            args.push(format!("user.name={}", identity.name));
            args.push("-c".to_string());
            args.push(format!("user.email={}", identity.email));
        }
        args.extend(["commit", "-m", COMMIT_MESSAGE].map(String::from));
        self.run_git(args, "git commit")
    }

    pub fn push(&self, branch_name: &str) -> Result<()> {
        self.run_git(
            ["push", "--set-upstream", "origin", branch_name],
            "git push",
        )
    }

    /// Full workflow: create branch, stage, commit and optionally push
    pub fn commit_to_new_branch(
        &self,
        targets: &[PackageTarget],
        include_lock: bool,
        push: bool,
    ) -> Result<String> {
        let branch_name = branch_name_for(targets, &timestamp());
        self.create_branch(&branch_name)?;
        self.stage_manifests(include_lock)?;
        self.commit()?;
        if push {
            self.push(&branch_name)?;
        }
        Ok(branch_name)
    }

    fn run_git<I, S>(&self, args: I, step: &str) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new("git", &self.project_path).args(args);
        self.runner
            .run(&spec)
            .map_err(|e| BumpError::GitOperation(format!("{} failed: {}", step, e)))
    }

    fn validate_git_path(path: &Path) -> Result<PathBuf> {
        let dangerous = [';', '|', '&', '$', '`', '\n', '\r'];
        let path_str = path.to_string_lossy();
        if let Some(ch) = dangerous.iter().find(|c| path_str.contains(**c)) {
            return Err(BumpError::GitOperation(format!(
                "Path contains dangerous character: '{}'",
                ch
            )));
        }

        if !path.is_absolute() {
            return Err(BumpError::GitOperation(
                "Only absolute paths are allowed for Git operations".to_string(),
            ));
        }

        PathValidator::validate_project_path(path)
            .map_err(|err| BumpError::GitOperation(format!("Invalid Git path: {}", err)))
    }
}

fn timestamp() -> String {
    Zoned::now().strftime("%Y-%m-%d-%H%M%S").to_string()
}

/// `update-<name>-<version>` for a single target, `update-deps-<timestamp>` for a batch.
pub fn branch_name_for(targets: &[PackageTarget], timestamp: &str) -> String {
    let raw = match targets {
        [single] => format!("update-{}-{}", single.name, single.version),
        _ => format!("update-deps-{timestamp}"),
    };
    sanitize_branch_name(&raw)
}

fn sanitize_branch_name(raw: &str) -> String {
    let mut branch: String = raw
        .chars()
        .filter(|c| *c != '@')
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '/' | '.' => c,
            _ => '-',
        })
        .collect();

    while branch.contains("..") {
        branch = branch.replace("..", ".");
    }
    while branch.contains("//") {
        branch = branch.replace("//", "/");
    }

    if branch.len() > MAX_BRANCH_LEN {
        branch.truncate(MAX_BRANCH_LEN);
    }

    let mut branch = branch
        .trim_start_matches(['-', '.', '/'])
        .to_string();

    // git rejects refs ending in `.lock` or `.`
    loop {
        let trimmed = branch.trim_end_matches(['.', '/']);
        let trimmed = trimmed.strip_suffix(".lock").unwrap_or(trimmed);
        if trimmed.len() == branch.len() {
            break;
        }
        branch = trimmed.to_string();
    }

    branch
}
