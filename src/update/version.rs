//! Dot-separated numeric versions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::{Result, UpdateError};

/// A version such as `1.7.10`.
///
/// Components compare numerically; the shorter version is padded with
/// zeros, so `1.0` equals `1.0.0`.
#[derive(Debug, Clone)]
pub struct Version(Vec<u64>);

impl Version {
    /// Version of this build.
    pub fn current() -> Self {
        // Cargo guarantees a numeric x.y.z package version.
        Self::from_str(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Self(vec![0]))
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(UpdateError::InvalidVersion(s.to_string()));
        }

        digits
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self)
            .map_err(|_| UpdateError::InvalidVersion(s.to_string()))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Compares two version strings.
///
/// # Errors
///
/// Returns [`UpdateError::InvalidVersion`] if either side has a
/// non-numeric component.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(a.parse::<Version>()?.cmp(&b.parse::<Version>()?))
}
