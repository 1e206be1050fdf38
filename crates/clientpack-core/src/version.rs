//! Version management.
//!
//! The version lives in a plain-text file holding a dot-joined
//! `major.minor.patch` string. Missing components count as zero, so `1.2`
//! bumps to `1.2.1`.

use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// Version reported when no version file exists yet.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// How to derive the next version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bump {
    /// Increment major, reset minor and patch.
    Major,
    /// Increment minor, reset patch.
    Minor,
    /// Increment patch.
    Patch,
    /// Use this literal as the new version.
    Explicit(String),
}

impl FromStr for Bump {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "major" => Self::Major,
            "minor" => Self::Minor,
            "patch" => Self::Patch,
            other => Self::Explicit(other.to_string()),
        })
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => f.write_str("major"),
            Self::Minor => f.write_str("minor"),
            Self::Patch => f.write_str("patch"),
            Self::Explicit(v) => write!(f, "explicit {v}"),
        }
    }
}

/// A `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ReleaseVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a dot-joined version, defaulting missing components to zero.
    ///
    /// Components past the third are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the first three components is not a
    /// non-negative integer.
    pub fn parse_lenient(version: &str) -> CoreResult<Self> {
        let mut parts = [0u64; 3];

        for (slot, component) in parts.iter_mut().zip(version.trim().split('.')) {
            *slot = component
                .parse()
                .map_err(|_| CoreError::InvalidVersion {
                    version: version.to_string(),
                    reason: format!("component {component:?} is not a number"),
                })?;
        }

        let [major, minor, patch] = parts;
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Reads, bumps and writes the persisted version.
#[derive(Debug, Clone)]
pub struct VersionManager {
    path: PathBuf,
}

impl VersionManager {
    /// Creates a version manager for the given version file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the version file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted version, or [`DEFAULT_VERSION`] if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read(&self) -> CoreResult<String> {
        if !self.path.exists() {
            debug!(path = ?self.path, "no version file, starting from default");
            return Ok(DEFAULT_VERSION.to_string());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(content.trim().to_string())
    }

    /// Persists the version with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn write(&self, version: &str) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, format!("{}\n", version.trim()))?;
        debug!(path = ?self.path, version, "wrote version file");
        Ok(())
    }

    /// Computes the next version.
    ///
    /// Explicit versions are returned unchanged without looking at `current`.
    ///
    /// # Errors
    ///
    /// Returns an error if a keyword bump is requested and `current` has a
    /// non-numeric component.
    pub fn bump(&self, current: &str, bump: &Bump) -> CoreResult<String> {
        let mut version = match bump {
            Bump::Explicit(literal) => {
                if semver::Version::parse(literal).is_err() {
                    warn!(version = %literal, "explicit version is not valid semver, using it as-is");
                }
                return Ok(literal.clone());
            }
            _ => ReleaseVersion::parse_lenient(current)?,
        };

        match bump {
            Bump::Major => {
                version.major += 1;
                version.minor = 0;
                version.patch = 0;
            }
            Bump::Minor => {
                version.minor += 1;
                version.patch = 0;
            }
            Bump::Patch => {
                version.patch += 1;
            }
            Bump::Explicit(_) => {}
        }

        Ok(version.to_string())
    }
}
