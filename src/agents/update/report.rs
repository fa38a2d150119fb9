use crate::agents::lock_updater::LockUpdate;
use crate::agents::manifest_updater::{ManifestUpdate, SectionOutcome};
use crate::agents::update::PackageTarget;
use serde::Serialize;

/// Outcome of applying one target to the manifest and lock tree.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub target: PackageTarget,
    pub manifest: ManifestUpdate,
    /// `None` when the project has no package-lock.json.
    pub lock: Option<LockUpdate>,
}

impl PairReport {
    pub fn manifest_changed(&self) -> bool {
        self.manifest.changed()
    }

    pub fn lock_changed(&self) -> bool {
        self.lock.as_ref().is_some_and(LockUpdate::changed)
    }

    pub fn changed(&self) -> bool {
        self.manifest_changed() || self.lock_changed()
    }
}

/// Tracks the changes made for every requested target
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub pairs: Vec<PairReport>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: PairReport) {
        self.pairs.push(pair);
    }

    pub fn manifest_changed(&self) -> bool {
        self.pairs.iter().any(PairReport::manifest_changed)
    }

    pub fn lock_changed(&self) -> bool {
        self.pairs.iter().any(PairReport::lock_changed)
    }

    /// True when no target changed either document
    pub fn is_empty(&self) -> bool {
        !self.pairs.iter().any(PairReport::changed)
    }

    /// `npm install` must run exactly when something changed
    pub fn needs_install_refresh(&self) -> bool {
        !self.is_empty()
    }

    /// Number of individual manifest sections and lock entries rewritten
    pub fn total_updates(&self) -> usize {
        self.pairs
            .iter()
            .map(|pair| {
                let manifest = pair
                    .manifest
                    .outcomes
                    .iter()
                    .filter(|o| matches!(o, SectionOutcome::Updated { .. }))
                    .count();
                let lock = pair.lock.as_ref().map_or(0, |l| l.changes.len());
                manifest + lock
            })
            .sum()
    }
}
