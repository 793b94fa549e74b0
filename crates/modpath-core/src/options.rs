//! Options normalizer: scope the configuration to one file and fill defaults.
//!
//! The result is fully resolved (absolute roots, concrete extension list and
//! rewrite rules) so resolvers never look anything else up. Normalization never
//! fails: a scope miss falls back to the base options, an unreadable root glob
//! contributes no directories.

use crate::alias::AliasEntry;
use crate::config::{CwdOption, LogLevel, ResolverOptions, ThirdPartyConfig, DEFAULT_EXTENSIONS};
use modpath_util::fs::find_up;
use modpath_util::path::{normalize, resolve, ExtensionRewrite};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration resolved for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedOptions {
    /// Base directory for relative-path math.
    pub cwd: PathBuf,
    /// Root directories, searched in order.
    pub root: Vec<PathBuf>,
    /// Extensions probed by the locator, in order.
    pub extensions: Vec<String>,
    /// Rules applied when the file found on disk has a different extension
    /// than the one written in the specifier.
    #[serde(serialize_with = "serialize_rewrites")]
    pub extension_rewrites: Vec<ExtensionRewrite>,
    pub alias: Vec<AliasEntry>,
    pub third_party: Option<ThirdPartyConfig>,
    pub loglevel: LogLevel,
    pub verify_external_aliases: bool,
    /// Scope of the override that applied, if any.
    pub scope: Option<String>,
}

/// Normalize `options` for `current_file` (absolute).
///
/// The first override whose scope contains the file is merged over the base
/// options; later overrides are ignored.
#[must_use]
pub fn normalize_options(
    current_file: &Path,
    process_cwd: &Path,
    options: &ResolverOptions,
) -> NormalizedOptions {
    let matched = options
        .overrides
        .iter()
        .find(|o| o.scope.contains(current_file, process_cwd));

    let scoped = match matched {
        Some(o) => options.base.merged_with(&o.options),
        None => options.base.clone(),
    };

    let cwd = normalize_cwd(
        scoped.cwd.as_ref().unwrap_or(&CwdOption::Process),
        current_file,
        process_cwd,
    );

    let extensions = scoped
        .extensions
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect());

    // Unconfigured rewrites strip every probed extension.
    let extension_rewrites = scoped
        .extension_rewrites
        .unwrap_or_else(|| extensions.iter().map(ExtensionRewrite::strip).collect());

    let root = normalize_root(scoped.root.as_deref().unwrap_or_default(), &cwd);

    NormalizedOptions {
        cwd,
        root,
        extensions,
        extension_rewrites,
        alias: scoped.alias.unwrap_or_default(),
        third_party: scoped.third_party,
        loglevel: scoped.loglevel.unwrap_or_default(),
        verify_external_aliases: scoped.verify_external_aliases.unwrap_or(true),
        scope: matched.map(|o| o.scope.as_str()),
    }
}

fn normalize_cwd(cwd: &CwdOption, current_file: &Path, process_cwd: &Path) -> PathBuf {
    match cwd {
        CwdOption::Process => process_cwd.to_path_buf(),
        CwdOption::Path(path) => resolve(process_cwd, path),
        CwdOption::PackageJson => current_file
            .parent()
            .and_then(|dir| find_up(dir, "package.json"))
            .unwrap_or_else(|| process_cwd.to_path_buf()),
    }
}

/// Resolve roots against `cwd`, expanding globs to the directories they match.
///
/// Only the configured pattern is a glob; the `cwd` prefix is matched literally.
fn normalize_root(roots: &[String], cwd: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for root in roots {
        if !root.contains(['*', '?', '[']) {
            out.push(resolve(cwd, Path::new(root)));
            continue;
        }

        let pattern = if Path::new(root).is_absolute() {
            PathBuf::from(root)
        } else {
            Path::new(&glob::Pattern::escape(&cwd.to_string_lossy()))
                .join(normalize(Path::new(root)))
        };

        let Ok(paths) = glob::glob(&pattern.to_string_lossy()) else {
            tracing::debug!(root = %root, "ignoring invalid root glob");
            continue;
        };
        out.extend(
            paths
                .filter_map(Result::ok)
                .filter(|p| p.is_dir())
                .map(|p| normalize(&p)),
        );
    }

    out
}

fn serialize_rewrites<S: Serializer>(
    rules: &[ExtensionRewrite],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(rules.len()))?;
    for rule in rules {
        map.serialize_entry(&rule.from, &rule.to)?;
    }
    map.end()
}
