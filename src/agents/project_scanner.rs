use crate::error::{BumpError, Result};
use crate::utils::path_validator::PathValidator;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const LOCK_FILE: &str = "package-lock.json";

/// ProjectScannerAgent validates the npm project structure.
/// Git is not probed here: the package may sit anywhere inside a work tree.
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        let project_path = PathValidator::validate_project_path(&self.project_path)?;

        let manifest_path = project_path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(BumpError::ProjectValidation(format!(
                "{} not found in '{}'",
                MANIFEST_FILE,
                project_path.display()
            )));
        }

        let lock_path = project_path.join(LOCK_FILE);
        let lock_path = lock_path.is_file().then_some(lock_path);

        Ok(ProjectInfo {
            project_path,
            manifest_path,
            lock_path,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    /// Canonical project directory
    pub project_path: PathBuf,
    pub manifest_path: PathBuf,
    pub lock_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_manifest_is_fatal() {
        let dir = tempdir().unwrap();
        let err = ProjectScannerAgent::new(dir.path()).validate().unwrap_err();
        assert!(matches!(err, BumpError::ProjectValidation(_)));
        assert!(err.to_string().contains("package.json not found"));
    }

    #[test]
    fn lock_is_optional() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();

        let info = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        assert!(info.lock_path.is_none());
        assert!(info.project_path.is_absolute());
    }

    #[test]
    fn detects_lock() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();
        fs::write(dir.path().join(LOCK_FILE), "{}").unwrap();

        let info = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        assert_eq!(
            info.lock_path.as_deref(),
            Some(info.project_path.join(LOCK_FILE).as_path())
        );
    }
}
