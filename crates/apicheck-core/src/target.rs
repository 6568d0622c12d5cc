//! Targets and where they come from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::SetupError;

/// One address to validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(address: impl Into<String>) -> Self {
        Target(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input enumeration: exactly one address, or a newline-delimited list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Single(String),
    List(PathBuf),
}

impl TargetSource {
    /// Enumerate the targets in input order.
    pub fn load(&self) -> Result<Vec<Target>, SetupError> {
        match self {
            TargetSource::Single(address) => Ok(vec![Target::new(address.trim())]),
            TargetSource::List(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| SetupError::TargetList {
                        path: path.clone(),
                        source,
                    })?;
                Ok(parse_target_list(&contents))
            }
        }
    }
}

/// One target per line; surrounding whitespace is trimmed and blank lines are skipped.
pub fn parse_target_list(contents: &str) -> Vec<Target> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect()
}
