use crate::error::{BumpError, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// npm package names: optional `@scope/` prefix, URL-safe characters, no leading dot or underscore.
const PACKAGE_NAME_PATTERN: &str = r"^(?:@[a-zA-Z0-9\-*~][a-zA-Z0-9\-*._~]*/)?[a-zA-Z0-9\-~][a-zA-Z0-9\-._~]*$";
const MAX_PACKAGE_NAME_LEN: usize = 214;

/// A single package to bump and the version specifier it should carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageTarget {
    pub name: String,
    pub version: String,
}

impl PackageTarget {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into().trim().to_string();

        validate_package_name(&name)?;
        if version.is_empty() {
            return Err(BumpError::InvalidArguments(format!(
                "Version for '{}' must not be empty",
                name
            )));
        }

        Ok(Self { name, version })
    }

    /// Split positional `<name> <version> ...` values into targets.
    pub fn parse_pairs(values: &[String]) -> Result<Vec<Self>> {
        if values.is_empty() || values.len() % 2 != 0 {
            return Err(BumpError::InvalidArguments(format!(
                "expected <package-name> <new-version> pairs, got {} value(s)\nUsage: npmbump update <package-name> <new-version> [<package-name> <new-version>...]",
                values.len()
            )));
        }

        values
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0].as_str(), pair[1].as_str()))
            .collect()
    }

    /// Lock entries record resolved versions; ranges such as `^1.2.0` are written verbatim.
    pub fn is_exact_version(&self) -> bool {
        semver::Version::parse(&self.version).is_ok()
    }
}

impl fmt::Display for PackageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

fn validate_package_name(name: &str) -> Result<()> {
    let pattern = Regex::new(PACKAGE_NAME_PATTERN).map_err(|e| {
        BumpError::InvalidArguments(format!("Invalid package name pattern: {}", e))
    })?;

    if name.len() > MAX_PACKAGE_NAME_LEN || !pattern.is_match(name) {
        return Err(BumpError::InvalidArguments(format!(
            "'{}' is not a valid npm package name",
            name
        )));
    }

    Ok(())
}
