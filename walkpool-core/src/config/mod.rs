//! Serializable walk settings.
//!
//! [`WalkSettings`] is the plain-data form of a walk configuration: it can
//! be loaded from JSON, validated, and echoed back in progress snapshots.
//! The walker crate turns it into a runtime `WalkConfig` with compiled
//! matchers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Result, WalkError};

/// Default file selection pattern: every file, recursively.
pub const DEFAULT_PATTERN: &str = "**/*";

/// Default ignore regex: any `node_modules` path segment.
pub const DEFAULT_IGNORE: &str = r"(^|[/\\])node_modules([/\\]|$)";

/// Default number of files processed at once.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Serializable form of an ignore rule.
///
/// Deserializes from a bare string (a regex), `{"glob": [...]}`, or
/// `{"custom": "..."}`. Custom rules are callbacks: the settings only record
/// that one is active, and they cannot be turned back into a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreSettings {
    /// Regex matched against the path text.
    Pattern(String),
    /// Glob patterns matched against the path.
    Glob {
        /// Pattern sources.
        glob: Vec<String>,
        /// Whether matching is case sensitive.
        #[serde(default = "default_case_sensitive")]
        case_sensitive: bool,
    },
    /// A callback rule, described for diagnostics.
    Custom {
        /// Free-form description of the callback.
        custom: String,
    },
}

impl IgnoreSettings {
    /// Whether a runtime rule can be rebuilt from these settings.
    pub fn is_restorable(&self) -> bool {
        !matches!(self, Self::Custom { .. })
    }
}

fn default_case_sensitive() -> bool {
    true
}

/// Plain-data walk settings.
///
/// # Examples
///
/// ```rust
/// use walkpool_core::config::WalkSettings;
///
/// let settings = WalkSettings::from_json_str(r#"{"pattern": "**/*.md", "concurrency": 4}"#)
///     .unwrap();
/// assert_eq!(settings.concurrency, 4);
/// assert_eq!(settings.pattern, "**/*.md");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    /// Directory the pattern is resolved against.
    pub root: PathBuf,

    /// Glob selecting files below `root`.
    pub pattern: String,

    /// Maximum number of files processed at once.
    pub concurrency: usize,

    /// The ignore rule. `None` disables ignoring.
    pub ignore: Option<IgnoreSettings>,

    /// Timeout for the whole run, in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            pattern: DEFAULT_PATTERN.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            ignore: Some(IgnoreSettings::Pattern(DEFAULT_IGNORE.to_string())),
            timeout_ms: None,
        }
    }
}

impl WalkSettings {
    /// Create settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            WalkError::configuration(format!("Failed to parse JSON configuration: {e}"))
        })
    }

    /// Load settings from a JSON file and validate them.
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| {
                WalkError::configuration(format!(
                    "Failed to read configuration file {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?;

        let settings = Self::from_json_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Render the settings as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(WalkError::configuration(
                "Concurrency must be greater than 0",
            ));
        }

        if self.pattern.trim().is_empty() {
            return Err(WalkError::configuration("Pattern must not be empty"));
        }

        if self.timeout_ms == Some(0) {
            return Err(WalkError::configuration("Timeout must be greater than 0"));
        }

        if matches!(&self.ignore, Some(IgnoreSettings::Glob { glob, .. }) if glob.is_empty()) {
            return Err(WalkError::configuration(
                "Glob ignore rule needs at least one pattern",
            ));
        }

        Ok(())
    }

    /// The run timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// The process working directory, or `.` when it cannot be determined.
#[must_use]
pub fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
