use crate::error::{BumpError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A JSON document loaded whole from disk, mutated in memory and written back
/// only when something changed.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
    pub root: Value,
}

impl JsonDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BumpError::DocumentParsing(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let root = serde_json::from_str(&content).map_err(|e| {
            BumpError::DocumentParsing(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Overwrite the file with the pretty-printed document when `changed` is set.
    /// Returns whether a write happened.
    pub fn persist_if_changed(&self, changed: bool) -> Result<bool> {
        if !changed {
            return Ok(false);
        }

        fs::write(&self.path, render(&self.root)?).map_err(|e| {
            BumpError::DocumentParsing(format!(
                "Failed to write '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(true)
    }
}

/// Two-space indented JSON with a trailing newline, the layout npm itself writes.
pub fn render(value: &Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
