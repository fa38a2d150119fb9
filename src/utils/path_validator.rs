use crate::error::{BumpError, Result};
use std::path::{Component, Path, PathBuf};

/// System directories a project may never live in.
const FORBIDDEN_ROOTS: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// Path hardening for the project directory and the files handed to git.
pub struct PathValidator;

impl PathValidator {
    /// Canonicalises the project directory and refuses system locations.
    pub fn validate_project_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            BumpError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(BumpError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        for forbidden in FORBIDDEN_ROOTS {
            let forbidden_path = Path::new(forbidden);
            let resolved = forbidden_path.canonicalize().ok();

            if canonical.starts_with(forbidden_path)
                || resolved.is_some_and(|r| canonical.starts_with(r))
            {
                return Err(BumpError::ProjectValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }
        }

        Ok(canonical)
    }

    /// Checks that `relative` names an existing file inside `base_dir` and
    /// returns the relative form git should receive.
    pub fn validate_project_file(relative: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let base_dir = base_dir.as_ref();

        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(BumpError::ProjectValidation(format!(
                "'{}' must be a plain path inside the project",
                relative.display()
            )));
        }

        let canonical_base = base_dir.canonicalize().map_err(|e| {
            BumpError::ProjectValidation(format!(
                "Invalid base directory '{}': {e}",
                base_dir.display()
            ))
        })?;

        let canonical_file = canonical_base.join(relative).canonicalize().map_err(|e| {
            BumpError::ProjectValidation(format!("Invalid file path '{}': {e}", relative.display()))
        })?;

        if !canonical_file.starts_with(&canonical_base) {
            return Err(BumpError::ProjectValidation(
                "File path is outside the project directory".to_string(),
            ));
        }

        Ok(relative.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn validate_project_path_accepts_directory() {
        let dir = tempdir().unwrap();
        assert!(PathValidator::validate_project_path(dir.path()).is_ok());
    }

    #[test]
    fn validate_project_path_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("package.json");
        fs::write(&file_path, "{}").unwrap();
        let err = PathValidator::validate_project_path(&file_path).unwrap_err();
        assert!(matches!(err, BumpError::ProjectValidation(_)));
    }

    #[test]
    fn validate_project_path_rejects_system_directory() {
        assert!(PathValidator::validate_project_path("/etc").is_err());
    }

    #[test]
    fn validate_project_file_accepts_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let relative = PathValidator::validate_project_file("package.json", dir.path()).unwrap();
        assert_eq!(relative, PathBuf::from("package.json"));
    }

    #[test]
    fn validate_project_file_rejects_traversal() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("app");
        fs::create_dir(&base).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        assert!(PathValidator::validate_project_file("../package.json", &base).is_err());
        assert!(PathValidator::validate_project_file("/tmp", &base).is_err());
    }

    #[test]
    fn validate_project_file_rejects_missing_file() {
        let dir = tempdir().unwrap();
        assert!(PathValidator::validate_project_file("package-lock.json", dir.path()).is_err());
    }
}
