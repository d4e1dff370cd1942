//! The per-file ignore rule.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use walkpool_core::config::{DEFAULT_IGNORE, IgnoreSettings};

use super::{FilterError, FilterResult, GlobMatcher};

/// User callback deciding whether a file is ignored.
pub type IgnorePredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

static DEFAULT_IGNORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_IGNORE).expect("default ignore regex is valid"));

/// Decides which resolved files are skipped.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use walkpool_walker::filter::IgnoreRule;
///
/// let rule = IgnoreRule::pattern(r"\.bak$").unwrap();
/// assert!(rule.should_ignore(Path::new("/srv/notes.txt.bak")));
/// assert!(!rule.should_ignore(Path::new("/srv/notes.txt")));
///
/// let rule = IgnoreRule::predicate(|path| path.extension().is_none());
/// assert!(rule.should_ignore(Path::new("/srv/Makefile")));
/// ```
#[derive(Clone)]
pub enum IgnoreRule {
    /// Ignore nothing.
    Never,
    /// Ignore paths whose text matches the regex.
    Pattern(Regex),
    /// Ignore paths matching any of the globs.
    Glob(GlobMatcher),
    /// Ignore paths for which the callback returns `true`.
    Predicate(IgnorePredicate),
}

impl IgnoreRule {
    /// Build a regex rule.
    pub fn pattern(source: &str) -> FilterResult<Self> {
        Ok(Self::Pattern(Regex::new(source)?))
    }

    /// Build a case-sensitive glob rule.
    pub fn glob<S: AsRef<str>>(patterns: &[S]) -> FilterResult<Self> {
        Ok(Self::Glob(GlobMatcher::new(patterns, true)?))
    }

    /// Build a callback rule.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Rebuild a rule from its settings form.
    ///
    /// `None` yields [`IgnoreRule::Never`]. Custom rules cannot be rebuilt.
    pub fn from_settings(settings: Option<&IgnoreSettings>) -> FilterResult<Self> {
        match settings {
            None => Ok(Self::Never),
            Some(IgnoreSettings::Pattern(source)) if source == DEFAULT_IGNORE => Ok(Self::default()),
            Some(IgnoreSettings::Pattern(source)) => Self::pattern(source),
            Some(IgnoreSettings::Glob {
                glob,
                case_sensitive,
            }) => Ok(Self::Glob(GlobMatcher::new(glob.as_slice(), *case_sensitive)?)),
            Some(IgnoreSettings::Custom { custom }) => Err(FilterError::NotRestorable(format!(
                "custom ignore rule '{custom}' has no settings form"
            ))),
        }
    }

    /// Whether `path` should be skipped.
    pub fn should_ignore(&self, path: &Path) -> bool {
        match self {
            Self::Never => false,
            Self::Pattern(regex) => regex.is_match(&path.to_string_lossy()),
            Self::Glob(matcher) => matcher.is_match(path),
            Self::Predicate(predicate) => predicate(path),
        }
    }

    /// The settings form of this rule. `None` means nothing is ignored.
    pub fn to_settings(&self) -> Option<IgnoreSettings> {
        match self {
            Self::Never => None,
            Self::Pattern(regex) => Some(IgnoreSettings::Pattern(regex.as_str().to_string())),
            Self::Glob(matcher) => Some(IgnoreSettings::Glob {
                glob: matcher.patterns().to_vec(),
                case_sensitive: matcher.is_case_sensitive(),
            }),
            Self::Predicate(_) => Some(IgnoreSettings::Custom {
                custom: "predicate".to_string(),
            }),
        }
    }
}

impl Default for IgnoreRule {
    /// Ignores any `node_modules` path segment.
    fn default() -> Self {
        Self::Pattern(DEFAULT_IGNORE_REGEX.clone())
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Glob(matcher) => f.debug_tuple("Glob").field(&matcher.patterns()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

impl From<Regex> for IgnoreRule {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<GlobMatcher> for IgnoreRule {
    fn from(matcher: GlobMatcher) -> Self {
        Self::Glob(matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use test_case::test_case;

    #[test_case("/app/node_modules/lodash/index.js", true ; "nested dependency file")]
    #[test_case("/app/node_modules", true ; "trailing segment")]
    #[test_case("node_modules/a.js", true ; "leading segment")]
    #[test_case("/app/src/index.js", false ; "source file")]
    #[test_case("/app/my_node_modules_notes.txt", false ; "segment name inside a file name")]
    fn test_default_rule(path: &str, expected: bool) {
        let rule = IgnoreRule::default();
        assert_eq!(rule.should_ignore(&PathBuf::from(path)), expected);
    }

    #[test]
    fn test_never() {
        let rule = IgnoreRule::Never;
        assert!(!rule.should_ignore(Path::new("/app/node_modules/x.js")));
        assert!(rule.to_settings().is_none());
    }

    #[test]
    fn test_glob_rule() {
        let rule = IgnoreRule::glob(&["**/*.log"]).unwrap();
        assert!(rule.should_ignore(Path::new("/var/app/debug.log")));
        assert!(!rule.should_ignore(Path::new("/var/app/debug.txt")));
    }

    #[test]
    fn test_predicate_rule() {
        let rule = IgnoreRule::predicate(|path| path.ends_with("skip.txt"));
        assert!(rule.should_ignore(Path::new("/data/skip.txt")));
        assert!(!rule.should_ignore(Path::new("/data/keep.txt")));
        assert_eq!(format!("{rule:?}"), "Predicate(<fn>)");
    }

    #[test]
    fn test_from_settings() {
        let rule = IgnoreRule::from_settings(Some(&IgnoreSettings::Pattern("test2".into()))).unwrap();
        assert!(rule.should_ignore(Path::new("/data/test2.txt")));

        let rule = IgnoreRule::from_settings(None).unwrap();
        assert!(matches!(rule, IgnoreRule::Never));

        assert!(IgnoreRule::from_settings(Some(&IgnoreSettings::Pattern("(".into()))).is_err());
        assert!(matches!(
            IgnoreRule::from_settings(Some(&IgnoreSettings::Custom {
                custom: "predicate".into()
            })),
            Err(FilterError::NotRestorable(_))
        ));
    }

    #[test]
    fn test_settings_keep_every_rule_kind() {
        let glob = IgnoreRule::from(GlobMatcher::new(&["**/*.LOG"], false).unwrap());
        let restored = IgnoreRule::from_settings(glob.to_settings().as_ref()).unwrap();
        assert!(restored.should_ignore(Path::new("/var/app/debug.log")));
        assert!(!restored.should_ignore(Path::new("/var/app/debug.txt")));

        let predicate = IgnoreRule::predicate(|path| path.ends_with("skip.txt"));
        let settings = predicate.to_settings();
        assert!(settings.as_ref().is_some_and(|s| !s.is_restorable()));
        assert!(IgnoreRule::from_settings(settings.as_ref()).is_err());

        let regex = IgnoreRule::pattern("tmp").unwrap();
        assert_eq!(
            regex.to_settings(),
            Some(IgnoreSettings::Pattern("tmp".to_string()))
        );
    }
}
