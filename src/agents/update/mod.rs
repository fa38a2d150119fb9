// Update module - applies package targets to package.json and package-lock.json
//
// Architecture:
// - PackageTarget: a validated (name, version) pair from the command line
// - UpdateSession: owns the in-memory documents and applies targets in order
// - UpdateReport: per-target changes, drives persistence and the install refresh
pub mod report;
pub mod session;
pub mod target;

pub use report::{PairReport, UpdateReport};
pub use session::UpdateSession;
pub use target::PackageTarget;
