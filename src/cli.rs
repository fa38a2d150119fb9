use clap::{Args, Parser, Subcommand};

/// Scope prefix whose packages keep their pinned transitive dependencies.
pub const DEFAULT_SCOPE_PREFIX: &str = "@makemydeal";

#[derive(Parser, Debug)]
#[command(
    name = "npmbump",
    about = "Bump a dependency in package.json and package-lock.json, then commit it on a new branch",
    version,
    author
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update the given packages, refresh the lock file and push a branch
    Update {
        #[command(flatten)]
        target: TargetArgs,

        /// Skip the `npm install` refresh even when something changed
        #[arg(long)]
        no_install: bool,

        /// Skip Git operations (don't create branch, commit or push)
        #[arg(long)]
        no_git: bool,

        /// Commit on the new branch but don't push it
        #[arg(long, conflicts_with = "no_git")]
        no_push: bool,

        /// Commit as github-actions[bot] instead of the configured Git user
        #[arg(long, conflicts_with = "no_git")]
        bot_identity: bool,
    },

    /// Show what an update would change without touching any file
    Check {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Package/version pairs: <NAME> <VERSION> [<NAME> <VERSION>...]
    #[arg(value_name = "NAME VERSION", num_args = 2.., required = true)]
    pub pairs: Vec<String>,

    /// Lock entries nested under a package starting with this prefix are left alone (repeatable)
    #[arg(long = "scope-prefix", value_name = "PREFIX", default_values_t = [DEFAULT_SCOPE_PREFIX.to_string()])]
    pub scope_prefixes: Vec<String>,
}
