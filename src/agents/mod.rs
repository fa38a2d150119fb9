pub mod ci_output;
pub mod command_runner;
pub mod document;
pub mod lock_updater;
pub mod manifest_updater;
pub mod package_manager;
pub mod project_scanner;
pub mod update;
pub mod version_control;

pub use ci_output::OutputSink;
pub use command_runner::{CommandRunner, SystemCommandRunner};
pub use lock_updater::ScopeFilter;
pub use package_manager::PackageManagerAgent;
pub use project_scanner::ProjectScannerAgent;
pub use update::{PackageTarget, UpdateReport, UpdateSession};
pub use version_control::{GitIdentity, VersionControlAgent};
