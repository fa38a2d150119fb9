use crate::agents::lock_updater::LockUpdate;
use crate::agents::manifest_updater::SectionOutcome;
use crate::agents::project_scanner::LOCK_FILE;
use crate::agents::update::PairReport;
use crate::agents::{
    CommandRunner, GitIdentity, OutputSink, PackageManagerAgent, PackageTarget,
    ProjectScannerAgent, ScopeFilter, SystemCommandRunner, UpdateReport, UpdateSession,
    VersionControlAgent,
};
use crate::error::Result;
use crate::utils::verbose_enabled;
use colored::Colorize;
use std::path::Path;

/// Flags of the `update` command that steer the external steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    pub no_install: bool,
    pub no_git: bool,
    pub no_push: bool,
    pub bot_identity: bool,
}

/// What the update workflow ended up doing.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    pub report: UpdateReport,
    pub installed: bool,
    pub branch: Option<String>,
}

/// Execute the update workflow against real processes
pub fn execute_update<P: AsRef<Path>>(
    project_path: P,
    pairs: &[String],
    scope_prefixes: &[String],
    options: UpdateOptions,
) -> Result<()> {
    let targets = PackageTarget::parse_pairs(pairs)?;
    let scopes = ScopeFilter::new(scope_prefixes.iter().cloned());

    run_update(
        project_path.as_ref(),
        &targets,
        scopes,
        options,
        &SystemCommandRunner,
        &OutputSink::from_env(),
    )?;
    Ok(())
}

pub fn run_update(
    project_path: &Path,
    targets: &[PackageTarget],
    scopes: ScopeFilter,
    options: UpdateOptions,
    runner: &dyn CommandRunner,
    sink: &OutputSink,
) -> Result<UpdateOutcome> {
    println!("{}", "Starting package update process...".cyan().bold());
    warn_inexact_versions(targets);

    // Step 1: Validate project structure
    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    // Step 2: Rewrite manifest and lock tree
    println!("\n{}", "2. Updating package.json and package-lock.json...".yellow());
    let mut session = UpdateSession::open(&project_info, scopes)?;
    let report = session.apply_all(targets);
    for pair in &report.pairs {
        print_pair_report(pair);
    }

    let persisted = session.persist(&report)?;
    if persisted.manifest_written {
        println!("{}", "✓ package.json written".green());
    }
    if persisted.lock_written {
        println!("{}", "✓ package-lock.json updated successfully".green());
    } else if session.has_lock() {
        println!("{}", "✓ No updates needed for package-lock.json".green());
    }

    // Step 3: Refresh installed dependencies
    println!("\n{}", "3. Syncing dependencies...".yellow());
    let mut installed = false;
    if !report.needs_install_refresh() {
        println!(
            "{}",
            "⚠ Skipping npm install because nothing was updated".yellow()
        );
    } else if options.no_install {
        println!("{}", "⚠ Skipping npm install (--no-install)".yellow());
    } else {
        PackageManagerAgent::new(runner, &project_info.project_path).refresh()?;
        installed = true;
        println!("{}", "✓ Dependencies installed".green());
    }

    // Step 4: Git operations run whether or not anything changed; git itself
    // finds the enclosing work tree and any failure aborts the run.
    let mut branch = None;
    if options.no_git {
        println!("\n{}", "4. Skipping Git operations (--no-git)".yellow());
    } else {
        println!("\n{}", "4. Creating Git branch and commit...".yellow());
        let identity = options
            .bot_identity
            .then(GitIdentity::github_actions_bot);
        let git_agent =
            VersionControlAgent::new(runner, &project_info.project_path)?.with_identity(identity);

        // npm install may have created the lock file
        let include_lock = project_info.project_path.join(LOCK_FILE).is_file();
        let push = !options.no_push;
        let branch_name = git_agent.commit_to_new_branch(targets, include_lock, push)?;

        if push {
            println!(
                "{}",
                format!("✓ Changes pushed to branch: {}", branch_name).green()
            );
            sink.publish("branch-name", &branch_name)?;
        } else {
            println!(
                "{}",
                format!("✓ Changes committed to branch: {}", branch_name).green()
            );
        }
        branch = Some(branch_name);
    }

    print_update_summary(&report);
    println!(
        "\n{}",
        "✨ Update process completed successfully!".green().bold()
    );

    Ok(UpdateOutcome {
        report,
        installed,
        branch,
    })
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(
    project_path: P,
    pairs: &[String],
    scope_prefixes: &[String],
    json: bool,
) -> Result<()> {
    let targets = PackageTarget::parse_pairs(pairs)?;
    let scopes = ScopeFilter::new(scope_prefixes.iter().cloned());
    let report = check_report(project_path.as_ref(), &targets, scopes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Checking what an update would change...".cyan().bold());
    warn_inexact_versions(&targets);
    for pair in &report.pairs {
        print_pair_report(pair);
    }
    print_update_summary(&report);

    if !report.is_empty() {
        println!("\n{}", "To apply these updates, run:".dimmed());
        println!("  {}", format!("npmbump update {}", pairs.join(" ")).cyan());
    }
    Ok(())
}

/// Apply targets to in-memory copies of the documents without writing anything.
pub fn check_report(
    project_path: &Path,
    targets: &[PackageTarget],
    scopes: ScopeFilter,
) -> Result<UpdateReport> {
    let project_info = ProjectScannerAgent::new(project_path).validate()?;
    let mut session = UpdateSession::open(&project_info, scopes)?;
    Ok(session.apply_all(targets))
}

fn warn_inexact_versions(targets: &[PackageTarget]) {
    for target in targets.iter().filter(|t| !t.is_exact_version()) {
        println!(
            "{}",
            format!(
                "⚠ '{}' is not an exact version; lock entries for {} will record it verbatim",
                target.version, target.name
            )
            .yellow()
        );
    }
}

fn print_pair_report(pair: &PairReport) {
    let name = &pair.target.name;
    let version = &pair.target.version;
    println!(
        "\n{} {} {}",
        name.white().bold(),
        "→".dimmed(),
        version.green().bold()
    );

    for outcome in &pair.manifest.outcomes {
        match outcome {
            SectionOutcome::Updated { section, old, new } => println!(
                "  {}",
                format!("✓ Updated {} in {}: {} → {}", name, section, old, new).green()
            ),
            SectionOutcome::AlreadyCurrent { section } => println!(
                "  {}",
                format!("✓ {} is already at version {} in {}", name, version, section).green()
            ),
        }
    }

    if pair.manifest.not_listed() {
        println!(
            "  {}",
            format!(
                "⚠ {} is not listed in dependencies or devDependencies",
                name
            )
            .yellow()
        );
    }

    match &pair.lock {
        Some(lock) => print_lock_update(lock),
        None => println!("  {}", "package-lock.json not present".dimmed()),
    }
}

fn print_lock_update(lock: &LockUpdate) {
    for change in &lock.changes {
        println!(
            "  {}",
            format!(
                "✓ Updated nested dependency {}: {} → {}",
                change.path.join(" > "),
                change.old,
                change.new
            )
            .green()
        );
    }

    if verbose_enabled() {
        for skipped in &lock.skipped {
            println!(
                "  {}",
                format!(
                    "⚠ Skipping update for {} as its parent ({}) is in a reserved scope",
                    skipped.name, skipped.parent
                )
                .dimmed()
            );
        }
    } else if !lock.skipped.is_empty() {
        println!(
            "  {}",
            format!(
                "{} lock entries under reserved scopes left untouched",
                lock.skipped.len()
            )
            .dimmed()
        );
    }
}

fn print_update_summary(report: &UpdateReport) {
    if report.is_empty() {
        println!("\n{}", "No updates were applied".yellow());
        return;
    }

    println!("\n{}", "Update Summary:".cyan().bold());
    println!(
        "{}",
        format!("Total updates: {}", report.total_updates()).green()
    );
    for pair in report.pairs.iter().filter(|p| p.changed()) {
        println!(
            "  • {} {} (package.json: {}, package-lock.json: {})",
            pair.target.name.white().bold(),
            pair.target.version.green(),
            yes_no(pair.manifest_changed()),
            yes_no(pair.lock_changed())
        );
    }
}

fn yes_no(changed: bool) -> colored::ColoredString {
    if changed {
        "changed".green()
    } else {
        "unchanged".dimmed()
    }
}
