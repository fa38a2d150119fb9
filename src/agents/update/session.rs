use crate::agents::document::JsonDocument;
use crate::agents::lock_updater::{ScopeFilter, update_lock_tree};
use crate::agents::manifest_updater::update_manifest;
use crate::agents::project_scanner::ProjectInfo;
use crate::agents::update::{PackageTarget, PairReport, UpdateReport};
use crate::error::Result;

/// Which documents were written back by [`UpdateSession::persist`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    pub manifest_written: bool,
    pub lock_written: bool,
}

/// Holds the manifest and optional lock document in memory while targets are applied.
pub struct UpdateSession {
    manifest: JsonDocument,
    lock: Option<JsonDocument>,
    scopes: ScopeFilter,
}

impl UpdateSession {
    pub fn open(project: &ProjectInfo, scopes: ScopeFilter) -> Result<Self> {
        let manifest = JsonDocument::load(&project.manifest_path)?;
        let lock = project
            .lock_path
            .as_ref()
            .map(JsonDocument::load)
            .transpose()?;

        Ok(Self {
            manifest,
            lock,
            scopes,
        })
    }

    pub fn has_lock(&self) -> bool {
        self.lock.is_some()
    }

    /// Apply one target to both in-memory documents.
    pub fn apply(&mut self, target: &PackageTarget) -> PairReport {
        let manifest = update_manifest(&mut self.manifest.root, &target.name, &target.version);
        let scopes = &self.scopes;
        let lock = self
            .lock
            .as_mut()
            .map(|doc| update_lock_tree(&mut doc.root, &target.name, &target.version, scopes));

        PairReport {
            target: target.clone(),
            manifest,
            lock,
        }
    }

    /// Apply every target in order, one report entry per target.
    pub fn apply_all(&mut self, targets: &[PackageTarget]) -> UpdateReport {
        let mut report = UpdateReport::new();
        for target in targets {
            report.push(self.apply(target));
        }
        report
    }

    /// Write back each document that at least one target changed.
    pub fn persist(&self, report: &UpdateReport) -> Result<PersistOutcome> {
        let manifest_written = self.manifest.persist_if_changed(report.manifest_changed())?;
        let lock_written = match &self.lock {
            Some(doc) => doc.persist_if_changed(report.lock_changed())?,
            None => false,
        };

        Ok(PersistOutcome {
            manifest_written,
            lock_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::project_scanner::ProjectScannerAgent;
    use serde_json::{Value, json};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_json(path: &Path, value: &Value) {
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn scopes() -> ScopeFilter {
        ScopeFilter::new(["@makemydeal"])
    }

    #[test]
    fn writes_only_changed_documents() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("package.json");
        let lock_path = dir.path().join("package-lock.json");
        write_json(&manifest_path, &json!({"dependencies": {"left-pad": "1.0.0"}}));
        let lock_raw = r#"{"dependencies":{"@makemydeal/foo":{"version":"1.0.0","dependencies":{"left-pad":{"version":"1.0.0"}}}}}"#;
        fs::write(&lock_path, lock_raw).unwrap();

        let project = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        let mut session = UpdateSession::open(&project, scopes()).unwrap();
        let report = session.apply_all(&[PackageTarget::new("left-pad", "1.1.0").unwrap()]);

        assert!(report.manifest_changed());
        assert!(!report.lock_changed());

        let outcome = session.persist(&report).unwrap();
        assert_eq!(
            outcome,
            PersistOutcome {
                manifest_written: true,
                lock_written: false
            }
        );
        assert_eq!(
            read_json(&manifest_path),
            json!({"dependencies": {"left-pad": "1.1.0"}})
        );
        assert_eq!(fs::read_to_string(&lock_path).unwrap(), lock_raw);
    }

    #[test]
    fn nothing_listed_means_nothing_written() {
        let dir = tempdir().unwrap();
        let manifest_raw = r#"{"dependencies":{"react":"18.0.0"}}"#;
        fs::write(dir.path().join("package.json"), manifest_raw).unwrap();

        let project = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        let mut session = UpdateSession::open(&project, scopes()).unwrap();
        assert!(!session.has_lock());

        let report = session.apply_all(&[PackageTarget::new("left-pad", "1.1.0").unwrap()]);
        assert!(report.is_empty());
        assert!(!report.needs_install_refresh());
        assert!(report.pairs[0].lock.is_none());

        assert_eq!(session.persist(&report).unwrap(), PersistOutcome::default());
        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            manifest_raw
        );
    }

    #[test]
    fn batch_reports_each_pair() {
        let dir = tempdir().unwrap();
        write_json(
            &dir.path().join("package.json"),
            &json!({
                "dependencies": {"left-pad": "1.0.0"},
                "devDependencies": {"jest": "29.0.0"}
            }),
        );
        write_json(
            &dir.path().join("package-lock.json"),
            &json!({"dependencies": {
                "left-pad": {"version": "1.0.0"},
                "jest": {"version": "29.0.0", "dependencies": {"left-pad": {"version": "0.9.0"}}}
            }}),
        );

        let project = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        let mut session = UpdateSession::open(&project, scopes()).unwrap();
        let targets = PackageTarget::parse_pairs(&[
            "left-pad".to_string(),
            "1.1.0".to_string(),
            "jest".to_string(),
            "29.0.0".to_string(),
        ])
        .unwrap();
        let report = session.apply_all(&targets);

        assert!(report.pairs[0].manifest_changed());
        assert!(report.pairs[0].lock_changed());
        assert!(!report.pairs[1].changed());
        assert_eq!(report.total_updates(), 3);

        let outcome = session.persist(&report).unwrap();
        assert!(outcome.manifest_written && outcome.lock_written);

        let lock = read_json(&dir.path().join("package-lock.json"));
        assert_eq!(lock["dependencies"]["jest"]["dependencies"]["left-pad"]["version"], "1.1.0");
        assert_eq!(lock["dependencies"]["jest"]["version"], "29.0.0");
    }

    #[test]
    fn malformed_lock_fails_to_open() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("package-lock.json"), "{").unwrap();

        let project = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        assert!(UpdateSession::open(&project, scopes()).is_err());
    }
}
