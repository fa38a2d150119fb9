use serde::Serialize;
use serde_json::Value;

/// Top-level dependency sections of package.json that may carry the target.
pub const MANIFEST_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// What happened to one section of the manifest for a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Updated {
        section: String,
        old: String,
        new: String,
    },
    AlreadyCurrent {
        section: String,
    },
}

/// Result of applying one (package, version) pair to the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestUpdate {
    pub outcomes: Vec<SectionOutcome>,
}

impl ManifestUpdate {
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, SectionOutcome::Updated { .. }))
    }

    /// The package appears in neither dependency section.
    pub fn not_listed(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Rewrite `package_name` to `new_version` in every top-level dependency section
/// that lists it.
pub fn update_manifest(manifest: &mut Value, package_name: &str, new_version: &str) -> ManifestUpdate {
    let mut update = ManifestUpdate::default();

    for section in MANIFEST_SECTIONS {
        let Some(entry) = manifest
            .get_mut(section)
            .and_then(Value::as_object_mut)
            .and_then(|deps| deps.get_mut(package_name))
        else {
            continue;
        };

        if entry.as_str() == Some(new_version) {
            update.outcomes.push(SectionOutcome::AlreadyCurrent {
                section: section.to_string(),
            });
            continue;
        }

        let old = match &*entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        *entry = Value::from(new_version);
        update.outcomes.push(SectionOutcome::Updated {
            section: section.to_string(),
            old,
            new: new_version.to_string(),
        });
    }

    update
}
