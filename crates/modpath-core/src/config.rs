//! Resolver configuration.
//!
//! Two layers:
//! - [`RawOptions`]: the JSON document authors write (camelCase keys).
//! - [`ResolverOptions`]: the compiled form, with alias patterns and scope
//!   globs already validated. Unset fields stay `None` until the options
//!   normalizer fills in defaults for a particular file.
//!
//! ## Supported config format
//!
//! ```json
//! {
//!   "root": ["./src", "./packages/*"],
//!   "cwd": "packagejson",
//!   "extensions": [".js", ".ts"],
//!   "extensionRewrites": { ".ts": ".js" },
//!   "alias": { "@utils": "./src/utils", "^@ns/(.+)": "./packages/\\1" },
//!   "thirdParty": { "module": "node_modules/widget-kit", "alias": { "widget": "third-party-widget" } },
//!   "loglevel": "warn",
//!   "verifyExternalAliases": true,
//!   "overrides": [{ "scope": "legacy/**", "extensions": [".js"] }]
//! }
//! ```

use crate::alias::AliasEntry;
use crate::error::{Error, Result};
use modpath_util::path::{resolve, ExtensionRewrite};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Extensions probed when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".es", ".es6", ".mjs"];

/// Keyword for `cwd`: use the directory of the nearest `package.json`.
pub const CWD_PACKAGE_JSON: &str = "packagejson";

/// Diagnostic verbosity of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Never emit warnings.
    Silent,
    #[default]
    Warn,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Warn => "warn",
        }
    }
}

/// Base directory for relative-path math.
///
/// This never affects where the current file itself is looked up; that is
/// always anchored on the process working directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CwdOption {
    /// The process working directory.
    #[default]
    Process,
    /// An explicit directory, resolved against the process working directory.
    Path(PathBuf),
    /// The nearest ancestor of the current file containing `package.json`.
    PackageJson,
}

impl CwdOption {
    fn parse(raw: &str) -> Self {
        if raw == CWD_PACKAGE_JSON {
            Self::PackageJson
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

/// Third-party remapping: relative imports made from files under `module`
/// are matched by basename against `alias`.
#[derive(Debug, Clone, Serialize)]
pub struct ThirdPartyConfig {
    /// Path marker identifying the module boundary.
    pub module: String,
    /// Entries carrying literal replacement paths.
    pub alias: Vec<AliasEntry>,
}

impl ThirdPartyConfig {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            alias: Vec::new(),
        }
    }

    /// Map basenames matching `key` to the literal `path`.
    pub fn with_alias(mut self, key: &str, path: impl Into<String>) -> Result<Self> {
        self.alias.push(AliasEntry::third_party(key, path)?);
        Ok(self)
    }
}

/// A partial set of options. `None` means "inherit" (or "default" at the top level).
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    pub root: Option<Vec<String>>,
    pub cwd: Option<CwdOption>,
    pub extensions: Option<Vec<String>>,
    pub extension_rewrites: Option<Vec<ExtensionRewrite>>,
    pub alias: Option<Vec<AliasEntry>>,
    pub third_party: Option<ThirdPartyConfig>,
    pub loglevel: Option<LogLevel>,
    pub verify_external_aliases: Option<bool>,
}

impl ScopeOptions {
    /// Overlay `other` on top of `self`: every field `other` sets wins.
    #[must_use]
    pub fn merged_with(&self, other: &ScopeOptions) -> ScopeOptions {
        ScopeOptions {
            root: other.root.clone().or_else(|| self.root.clone()),
            cwd: other.cwd.clone().or_else(|| self.cwd.clone()),
            extensions: other.extensions.clone().or_else(|| self.extensions.clone()),
            extension_rewrites: other
                .extension_rewrites
                .clone()
                .or_else(|| self.extension_rewrites.clone()),
            alias: other.alias.clone().or_else(|| self.alias.clone()),
            third_party: other
                .third_party
                .clone()
                .or_else(|| self.third_party.clone()),
            loglevel: other.loglevel.or(self.loglevel),
            verify_external_aliases: other
                .verify_external_aliases
                .or(self.verify_external_aliases),
        }
    }
}

/// Where an override applies.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Glob over file paths (absolute, or relative to the process working directory).
    Glob(glob::Pattern),
    /// Directory prefix, resolved against the process working directory.
    Prefix(PathBuf),
}

impl Scope {
    /// Parse a scope string. Anything with glob metacharacters is a glob.
    pub fn parse(scope: &str) -> Result<Self> {
        if scope.contains(['*', '?', '[']) {
            let pattern = glob::Pattern::new(scope).map_err(|source| Error::InvalidScope {
                scope: scope.to_string(),
                source,
            })?;
            return Ok(Self::Glob(pattern));
        }
        Ok(Self::Prefix(PathBuf::from(scope)))
    }

    /// Check whether `file` (absolute) falls in this scope.
    #[must_use]
    pub fn contains(&self, file: &Path, process_cwd: &Path) -> bool {
        match self {
            Self::Glob(pattern) => {
                pattern.matches_path(file)
                    || file
                        .strip_prefix(process_cwd)
                        .is_ok_and(|rel| pattern.matches_path(rel))
            }
            Self::Prefix(prefix) => file.starts_with(resolve(process_cwd, prefix)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Self::Glob(pattern) => pattern.as_str().to_string(),
            Self::Prefix(prefix) => prefix.display().to_string(),
        }
    }
}

/// Options that apply only to files inside `scope`.
#[derive(Debug, Clone)]
pub struct ScopedOverride {
    pub scope: Scope,
    pub options: ScopeOptions,
}

/// Compiled resolver configuration: base options plus ordered per-scope overrides.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    pub base: ScopeOptions,
    pub overrides: Vec<ScopedOverride>,
}

impl ResolverOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a raw configuration document.
    pub fn from_raw(raw: RawOptions) -> Result<Self> {
        let overrides = raw
            .overrides
            .iter()
            .map(|o| {
                if !o.options.overrides.is_empty() {
                    return Err(Error::other(format!(
                        "override `{}` cannot contain nested overrides",
                        o.scope
                    )));
                }
                Ok(ScopedOverride {
                    scope: Scope::parse(&o.scope)?,
                    options: compile_scope(&o.options)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base: compile_scope(&raw)?,
            overrides,
        })
    }

    /// Add root directories.
    #[must_use]
    pub fn with_root<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base
            .root
            .get_or_insert_with(Vec::new)
            .extend(roots.into_iter().map(Into::into));
        self
    }

    /// Append an alias entry.
    #[must_use]
    pub fn with_alias(mut self, entry: AliasEntry) -> Self {
        self.base.alias.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Set the base directory for relative-path math.
    #[must_use]
    pub fn with_cwd(mut self, cwd: CwdOption) -> Self {
        self.base.cwd = Some(cwd);
        self
    }

    /// Set the probed extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Set the extension rewrite rules (an empty list disables rewriting).
    #[must_use]
    pub fn with_extension_rewrites(mut self, rules: Vec<ExtensionRewrite>) -> Self {
        self.base.extension_rewrites = Some(rules);
        self
    }

    #[must_use]
    pub fn with_third_party(mut self, third_party: ThirdPartyConfig) -> Self {
        self.base.third_party = Some(third_party);
        self
    }

    #[must_use]
    pub fn with_loglevel(mut self, loglevel: LogLevel) -> Self {
        self.base.loglevel = Some(loglevel);
        self
    }

    /// Whether bare alias targets are checked for existence.
    #[must_use]
    pub fn with_verify_external_aliases(mut self, verify: bool) -> Self {
        self.base.verify_external_aliases = Some(verify);
        self
    }

    /// Add an override for files inside `scope`.
    pub fn with_override(mut self, scope: &str, options: ScopeOptions) -> Result<Self> {
        self.overrides.push(ScopedOverride {
            scope: Scope::parse(scope)?,
            options,
        });
        Ok(self)
    }
}

/// Raw configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_rewrites: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party: Option<RawThirdParty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loglevel: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_external_aliases: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RawOverride>,
}

/// Raw `thirdParty` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawThirdParty {
    pub module: String,
    #[serde(default)]
    pub alias: Map<String, Value>,
}

/// Raw entry of `overrides`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOverride {
    pub scope: String,
    #[serde(flatten)]
    pub options: RawOptions,
}

/// Load and compile a configuration file.
pub fn load_options(path: &Path) -> Result<ResolverOptions> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawOptions = serde_json::from_str(&source).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    ResolverOptions::from_raw(raw)
}

fn compile_scope(raw: &RawOptions) -> Result<ScopeOptions> {
    let extension_rewrites = raw
        .extension_rewrites
        .as_ref()
        .map(|map| {
            map.iter()
                .map(|(from, to)| {
                    let to = expect_str("extensionRewrites", from, to)?;
                    Ok(ExtensionRewrite::new(from.as_str(), to))
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    let alias = raw
        .alias
        .as_ref()
        .map(|map| {
            map.iter()
                .map(|(key, target)| {
                    AliasEntry::from_config(key, expect_str("alias", key, target)?)
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    let third_party = raw
        .third_party
        .as_ref()
        .map(|tp| {
            let alias = tp
                .alias
                .iter()
                .map(|(key, path)| {
                    AliasEntry::third_party(key, expect_str("thirdParty.alias", key, path)?)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok::<_, Error>(ThirdPartyConfig {
                module: tp.module.clone(),
                alias,
            })
        })
        .transpose()?;

    Ok(ScopeOptions {
        root: raw.root.clone(),
        cwd: raw.cwd.as_deref().map(CwdOption::parse),
        extensions: raw.extensions.clone(),
        extension_rewrites,
        alias,
        third_party,
        loglevel: raw.loglevel,
        verify_external_aliases: raw.verify_external_aliases,
    })
}

fn expect_str<'a>(section: &str, key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::other(format!("{section}.{key} must be a string, got {value}")))
}
