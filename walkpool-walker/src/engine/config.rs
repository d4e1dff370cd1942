//! Runtime walk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use walkpool_core::config::{DEFAULT_CONCURRENCY, DEFAULT_PATTERN, default_root};
use walkpool_core::{Result, WalkError, WalkSettings};

use crate::filter::IgnoreRule;

/// Configuration for one walk.
///
/// # Examples
///
/// ```rust
/// use walkpool_walker::engine::WalkConfig;
/// use walkpool_walker::filter::IgnoreRule;
///
/// let config = WalkConfig::new()
///     .with_root("./docs")
///     .with_pattern("**/*.md")
///     .with_concurrency(4)
///     .with_ignore(IgnoreRule::pattern("drafts").unwrap());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Directory the pattern is resolved against.
    pub root: PathBuf,

    /// Glob selecting files below `root`.
    pub pattern: String,

    /// Maximum number of files processed at once.
    pub concurrency: usize,

    /// Files to skip. Ignored files still count towards the total.
    pub ignore: IgnoreRule,

    /// Timeout for the whole run, hooks included.
    pub timeout: Option<Duration>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pattern: DEFAULT_PATTERN.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            ignore: IgnoreRule::default(),
            timeout: None,
        }
    }
}

impl WalkConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory.
    #[must_use]
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    /// Set the file selection pattern.
    #[must_use]
    pub fn with_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the concurrency level.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the ignore rule.
    #[must_use]
    pub fn with_ignore<R: Into<IgnoreRule>>(mut self, ignore: R) -> Self {
        self.ignore = ignore.into();
        self
    }

    /// Set the timeout for the whole run.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(WalkError::configuration(
                "Concurrency must be greater than 0",
            ));
        }

        if self.pattern.trim().is_empty() {
            return Err(WalkError::configuration("Pattern must not be empty"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(WalkError::configuration("Timeout must be greater than 0"));
        }

        Ok(())
    }

    /// The plain-data form of this configuration.
    ///
    /// The timeout is rounded up to whole milliseconds. Predicate rules are
    /// recorded as [`IgnoreSettings::Custom`](walkpool_core::IgnoreSettings::Custom),
    /// which cannot be converted back.
    pub fn settings(&self) -> WalkSettings {
        WalkSettings {
            root: self.root.clone(),
            pattern: self.pattern.clone(),
            concurrency: self.concurrency,
            ignore: self.ignore.to_settings(),
            timeout_ms: self.timeout.map(|t| {
                u64::try_from(t.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
            }),
        }
    }
}

impl TryFrom<WalkSettings> for WalkConfig {
    type Error = WalkError;

    fn try_from(settings: WalkSettings) -> Result<Self> {
        settings.validate()?;
        let ignore = IgnoreRule::from_settings(settings.ignore.as_ref())?;
        let timeout = settings.timeout();

        Ok(Self {
            root: settings.root,
            pattern: settings.pattern,
            concurrency: settings.concurrency,
            ignore,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use walkpool_core::IgnoreSettings;

    #[test]
    fn test_defaults() {
        let config = WalkConfig::default();
        assert_eq!(config.pattern, "**/*");
        assert_eq!(config.concurrency, 1);
        assert!(config.timeout.is_none());
        assert!(
            config
                .ignore
                .should_ignore(Path::new("/app/node_modules/a.js"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(WalkConfig::new().with_concurrency(0).validate().is_err());
        assert!(WalkConfig::new().with_pattern("").validate().is_err());
        assert!(
            WalkConfig::new()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = WalkSettings {
            root: PathBuf::from("/srv/data"),
            pattern: "**/*.txt".to_string(),
            concurrency: 8,
            ignore: Some(IgnoreSettings::Pattern("tmp".to_string())),
            timeout_ms: Some(30_000),
        };

        let config = WalkConfig::try_from(settings.clone()).unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.ignore.should_ignore(Path::new("/srv/data/tmp/a.txt")));
        assert_eq!(config.settings(), settings);
    }

    #[test]
    fn test_invalid_settings() {
        let bad_regex = WalkSettings {
            ignore: Some(IgnoreSettings::Pattern("(".to_string())),
            ..WalkSettings::default()
        };
        assert!(matches!(
            WalkConfig::try_from(bad_regex),
            Err(WalkError::Configuration { .. })
        ));

        let zero = WalkSettings {
            concurrency: 0,
            ..WalkSettings::default()
        };
        assert!(WalkConfig::try_from(zero).is_err());
    }

    #[test]
    fn test_sub_second_timeout_survives_settings() {
        let config = WalkConfig::new().with_timeout(Duration::from_millis(500));
        let settings = config.settings();
        assert_eq!(settings.timeout_ms, Some(500));

        let restored = WalkConfig::try_from(settings).unwrap();
        assert_eq!(restored.timeout, Some(Duration::from_millis(500)));

        let tiny = WalkConfig::new().with_timeout(Duration::from_micros(10));
        assert_eq!(tiny.settings().timeout_ms, Some(1));
        assert!(WalkConfig::try_from(tiny.settings()).is_ok());
    }

    #[test]
    fn test_glob_rules_survive_settings() {
        let config = WalkConfig::new().with_ignore(IgnoreRule::glob(&["**/skip.txt"]).unwrap());
        let restored = WalkConfig::try_from(config.settings()).unwrap();
        assert!(restored.ignore.should_ignore(Path::new("/data/skip.txt")));
        assert!(!restored.ignore.should_ignore(Path::new("/data/keep.txt")));
    }

    #[test]
    fn test_predicate_rules_are_not_silently_dropped() {
        let config = WalkConfig::new()
            .with_ignore(IgnoreRule::predicate(|p| p.ends_with("skip.txt")));
        assert!(config.ignore.should_ignore(Path::new("/data/skip.txt")));

        let settings = config.settings();
        assert!(matches!(settings.ignore, Some(IgnoreSettings::Custom { .. })));
        assert!(matches!(
            WalkConfig::try_from(settings),
            Err(WalkError::Configuration { .. })
        ));
    }
}
