//! Alias table entries.
//!
//! An entry pairs a [`Matcher`] (anything that can test a string and hand back
//! capture groups) with a substitution function over those captures. Entries
//! built from configuration strings use `regex-lite`, but callers can plug in
//! any matcher.

use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::Arc;

/// Capture groups from a successful match. Group 0 is the whole match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    input: String,
    groups: Vec<Option<String>>,
}

impl Captures {
    #[must_use]
    pub fn new(input: impl Into<String>, groups: Vec<Option<String>>) -> Self {
        Self {
            input: input.into(),
            groups,
        }
    }

    /// The string the matcher was run against.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Group `index`, or `None` if it does not exist or did not participate.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Test-and-capture capability used by alias tables.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Match `haystack`, returning its captures or `None`.
    fn captures(&self, haystack: &str) -> Option<Captures>;

    /// Human-readable form for diagnostics.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

impl Matcher for regex_lite::Regex {
    fn captures(&self, haystack: &str) -> Option<Captures> {
        let caps = regex_lite::Regex::captures(self, haystack)?;
        let groups = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()))
            .collect();
        Some(Captures::new(haystack, groups))
    }

    fn describe(&self) -> String {
        self.as_str().to_string()
    }
}

/// Substitution function: captures in, replacement specifier out.
///
/// Returning an error aborts the whole resolution call.
pub type Substitute = Arc<dyn Fn(&Captures) -> Result<String> + Send + Sync>;

/// One row of an alias table.
#[derive(Clone)]
pub struct AliasEntry {
    matcher: Arc<dyn Matcher>,
    substitute: Substitute,
    literal: Option<String>,
}

impl AliasEntry {
    /// Entry from an arbitrary matcher and substitution.
    pub fn new<M, F>(matcher: M, substitute: F) -> Self
    where
        M: Matcher + 'static,
        F: Fn(&Captures) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            matcher: Arc::new(matcher),
            substitute: Arc::new(substitute),
            literal: None,
        }
    }

    /// Entry from a regular expression and substitution.
    pub fn regex<F>(pattern: &str, substitute: F) -> Result<Self>
    where
        F: Fn(&Captures) -> Result<String> + Send + Sync + 'static,
    {
        Ok(Self::new(compile(pattern)?, substitute))
    }

    /// Entry from a configuration key/target pair.
    ///
    /// A key starting with `^` is a regular expression and `target` may refer to
    /// its groups as `\1`..`\N` (`\\` is a literal backslash). Any other key
    /// matches itself or itself followed by `/...`, and the remainder is
    /// appended to `target`.
    pub fn from_config(key: &str, target: &str) -> Result<Self> {
        let target = target.to_string();

        if key.starts_with('^') {
            return Self::regex(key, move |caps| Ok(expand_template(&target, caps)));
        }

        Self::regex(&prefix_pattern(key), move |caps| {
            Ok(format!("{target}{}", caps.get(1).unwrap_or("")))
        })
    }

    /// Third-party entry: `key` is matched like [`AliasEntry::from_config`] and
    /// a hit maps to the literal `path`.
    pub fn third_party(key: &str, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let pattern = if key.starts_with('^') {
            key.to_string()
        } else {
            prefix_pattern(key)
        };
        let substituted = path.clone();
        Ok(Self::regex(&pattern, move |_| Ok(substituted.clone()))?.with_literal(path))
    }

    /// Attach a literal third-party path.
    #[must_use]
    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    /// Run the matcher against `input`.
    #[must_use]
    pub fn captures(&self, input: &str) -> Option<Captures> {
        self.matcher.captures(input)
    }

    /// Produce the replacement for a match.
    pub fn substitute(&self, caps: &Captures) -> Result<String> {
        (self.substitute)(caps)
    }

    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Pattern as written, for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.matcher.describe()
    }
}

impl fmt::Debug for AliasEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasEntry")
            .field("matcher", &self.matcher.describe())
            .field("literal", &self.literal)
            .finish_non_exhaustive()
    }
}

impl Serialize for AliasEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AliasEntry", 2)?;
        state.serialize_field("pattern", &self.describe())?;
        state.serialize_field("literal", &self.literal)?;
        state.end()
    }
}

fn compile(pattern: &str) -> Result<regex_lite::Regex> {
    regex_lite::Regex::new(pattern).map_err(|source| Error::InvalidAliasPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn prefix_pattern(key: &str) -> String {
    format!("^{}(/.*|)$", regex_lite::escape(key))
}

/// Expand `\N` group references; `\\` stands for a literal backslash.
fn expand_template(template: &str, caps: &Captures) -> String {
    template
        .split("\\\\")
        .map(|part| expand_group_refs(part, caps))
        .collect::<Vec<_>>()
        .join("\\")
}

fn expand_group_refs(part: &str, caps: &Captures) -> String {
    let mut out = String::with_capacity(part.len());
    let mut chars = part.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            let start = i + 1;
            let mut end = start;
            while let Some(&(j, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = j + 1;
                chars.next();
            }
            if end > start {
                let group = part[start..end].parse::<usize>().ok();
                out.push_str(group.and_then(|g| caps.get(g)).unwrap_or(""));
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(entry: &AliasEntry, spec: &str) -> Option<String> {
        entry
            .captures(spec)
            .map(|caps| entry.substitute(&caps).unwrap())
    }

    #[test]
    fn test_prefix_key() {
        let entry = AliasEntry::from_config("@utils", "./src/utils").unwrap();
        assert_eq!(
            apply(&entry, "@utils/helper").as_deref(),
            Some("./src/utils/helper")
        );
        assert_eq!(apply(&entry, "@utils").as_deref(), Some("./src/utils"));
        assert_eq!(apply(&entry, "@utilsx"), None);
        assert_eq!(apply(&entry, "x/@utils"), None);
    }

    #[test]
    fn test_prefix_key_is_escaped() {
        let entry = AliasEntry::from_config("a.b", "./ab").unwrap();
        assert_eq!(apply(&entry, "a.b/c").as_deref(), Some("./ab/c"));
        assert_eq!(apply(&entry, "axb/c"), None);
    }

    #[test]
    fn test_regex_key_with_groups() {
        let entry = AliasEntry::from_config(r"^@namespace/foo-(.+)", r"packages/\1").unwrap();
        assert_eq!(
            apply(&entry, "@namespace/foo-bar").as_deref(),
            Some("packages/bar")
        );
    }

    #[test]
    fn test_regex_key_missing_group_is_empty() {
        let entry = AliasEntry::from_config(r"^~(/.*)?$", r"./root\1\5").unwrap();
        assert_eq!(apply(&entry, "~").as_deref(), Some("./root"));
        assert_eq!(apply(&entry, "~/x").as_deref(), Some("./root/x"));
    }

    #[test]
    fn test_regex_key_literal_backslash() {
        let entry = AliasEntry::from_config(r"^win-(\w+)$", r"C:\\\1").unwrap();
        assert_eq!(apply(&entry, "win-dir").as_deref(), Some(r"C:\dir"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = AliasEntry::from_config("^(unclosed", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidAliasPattern { .. }));
    }

    #[test]
    fn test_custom_substitute_sees_input() {
        let entry = AliasEntry::regex(r"^@utils/", |caps| {
            Ok(format!("./src/utils/{}", &caps.input()[7..]))
        })
        .unwrap();
        assert_eq!(
            apply(&entry, "@utils/helper").as_deref(),
            Some("./src/utils/helper")
        );
    }

    #[test]
    fn test_substitute_error_propagates() {
        let entry = AliasEntry::regex("^boom$", |caps| {
            Err(Error::substitution(caps.input(), "no target"))
        })
        .unwrap();
        let caps = entry.captures("boom").unwrap();
        assert!(matches!(
            entry.substitute(&caps),
            Err(Error::Substitution { .. })
        ));
    }

    #[test]
    fn test_third_party_literal() {
        let entry = AliasEntry::third_party("widget", "third-party-widget").unwrap();
        assert_eq!(entry.literal(), Some("third-party-widget"));
        assert!(entry.captures("widget").is_some());
        assert!(entry.captures("widgets").is_none());
    }

    #[test]
    fn test_captures_accessors() {
        let caps = Captures::new("abc", vec![Some("abc".into()), None]);
        assert_eq!(caps.input(), "abc");
        assert_eq!(caps.get(0), Some("abc"));
        assert_eq!(caps.get(1), None);
        assert_eq!(caps.get(9), None);
        assert_eq!(caps.len(), 2);
    }
}
