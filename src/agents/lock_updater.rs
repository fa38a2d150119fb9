use serde::Serialize;
use serde_json::{Map, Value};

/// A nested lock entry whose version was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockChange {
    /// Package names from the root down to the rewritten entry.
    pub path: Vec<String>,
    pub old: String,
    pub new: String,
}

/// A lock entry left alone because its parent belongs to a reserved scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockUpdate {
    pub changes: Vec<LockChange>,
    pub skipped: Vec<SkippedEntry>,
}

impl LockUpdate {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }

    fn absorb(&mut self, other: LockUpdate) {
        self.changes.extend(other.changes);
        self.skipped.extend(other.skipped);
    }
}

/// Reserved organisation scopes. Entries directly beneath a package whose name
/// starts with one of these prefixes are never rewritten.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    prefixes: Vec<String>,
}

impl ScopeFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn excludes(&self, parent: &str) -> bool {
        self.prefixes.iter().any(|p| parent.starts_with(p.as_str()))
    }
}

/// Rewrite the `version` of every lock entry named `package_name`, walking the
/// root `dependencies` tree depth-first.
///
/// An entry whose enclosing package matches `scopes` keeps its version, but its
/// own nested dependencies are still visited.
pub fn update_lock_tree(
    lock_root: &mut Value,
    package_name: &str,
    new_version: &str,
    scopes: &ScopeFilter,
) -> LockUpdate {
    let walker = LockWalker {
        package_name,
        new_version,
        scopes,
    };

    match lock_root
        .get_mut("dependencies")
        .and_then(Value::as_object_mut)
    {
        Some(deps) => walker.visit(deps, &mut Vec::new()),
        None => LockUpdate::default(),
    }
}

struct LockWalker<'a> {
    package_name: &'a str,
    new_version: &'a str,
    scopes: &'a ScopeFilter,
}

impl LockWalker<'_> {
    /// `ancestry` holds the names of the enclosing packages; its last element is
    /// the parent of every entry in `deps` (empty at the root).
    fn visit(&self, deps: &mut Map<String, Value>, ancestry: &mut Vec<String>) -> LockUpdate {
        let mut update = LockUpdate::default();
        let parent = ancestry.last().cloned().unwrap_or_default();
        let excluded = self.scopes.excludes(&parent);

        for (name, entry) in deps.iter_mut() {
            let Some(record) = entry.as_object_mut() else {
                continue;
            };

            if excluded {
                update.skipped.push(SkippedEntry {
                    name: name.clone(),
                    parent: parent.clone(),
                });
            } else if name == self.package_name {
                if let Some(change) = self.rewrite_version(record, ancestry, name) {
                    update.changes.push(change);
                }
            }

            if let Some(nested) = record.get_mut("dependencies").and_then(Value::as_object_mut) {
                ancestry.push(name.clone());
                update.absorb(self.visit(nested, ancestry));
                ancestry.pop();
            }
        }

        update
    }

    fn rewrite_version(
        &self,
        record: &mut Map<String, Value>,
        ancestry: &[String],
        name: &str,
    ) -> Option<LockChange> {
        let current = record.get_mut("version")?;
        let old = current.as_str()?.to_string();
        if old == self.new_version {
            return None;
        }

        *current = Value::from(self.new_version);

        let mut path = ancestry.to_vec();
        path.push(name.to_string());
        Some(LockChange {
            path,
            old,
            new: self.new_version.to_string(),
        })
    }
}
