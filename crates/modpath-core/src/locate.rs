//! Module location: given a specifier, a base directory and an extension list,
//! find the file it names on disk.
//!
//! Resolution strategies consume this through [`ModuleLocator`] so embedders can
//! plug in their own resolver. [`NodeLocator`] is a Node-style default:
//! - Relative (`./`, `../`) and absolute specifiers
//! - Bare specifiers with `node_modules` lookup
//! - Extension probing (appended, in configured order)
//! - Directory resolution (`package.json` main, `index.*`)
//!
//! Paths are returned lexically normalized. Symlinks are preserved and nothing
//! is cached between calls.

use modpath_util::path::{is_absolute_path, normalize};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// External resolution primitive.
pub trait ModuleLocator: Send + Sync {
    /// Absolute path of the file `specifier` names from `base_dir`, or `None`.
    fn locate(&self, specifier: &str, base_dir: &Path, extensions: &[String]) -> Option<PathBuf>;
}

impl<F> ModuleLocator for F
where
    F: Fn(&str, &Path, &[String]) -> Option<PathBuf> + Send + Sync,
{
    fn locate(&self, specifier: &str, base_dir: &Path, extensions: &[String]) -> Option<PathBuf> {
        self(specifier, base_dir, extensions)
    }
}

/// Node-style filesystem locator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeLocator;

impl ModuleLocator for NodeLocator {
    fn locate(&self, specifier: &str, base_dir: &Path, extensions: &[String]) -> Option<PathBuf> {
        if specifier.is_empty() {
            return None;
        }

        // URL-like specifiers never name a file
        if specifier.contains("://") || specifier.starts_with("node:") || specifier.starts_with("data:")
        {
            return None;
        }

        if is_path_like(specifier) {
            let base = normalize(&base_dir.join(specifier));
            return resolve_file_or_dir(&base, extensions);
        }

        resolve_bare(specifier, base_dir, extensions)
    }
}

fn is_path_like(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || is_absolute_path(specifier)
}

/// Resolve a path: exact file, then appended extensions, then as a directory.
fn resolve_file_or_dir(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    if let Some(file) = resolve_file(base, extensions) {
        return Some(file);
    }

    if base.is_dir() {
        return resolve_directory(base, extensions);
    }

    None
}

fn resolve_file(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    extensions
        .iter()
        .map(|ext| with_appended_extension(base, ext))
        .find(|candidate| candidate.is_file())
}

/// Resolve a directory (`package.json` main > `index.*`).
fn resolve_directory(dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    let pkg_json_path = dir.join("package.json");

    if pkg_json_path.is_file() {
        if let Some(main) = read_package_main(&pkg_json_path) {
            let main_path = normalize(&dir.join(main));

            if let Some(file) = resolve_file(&main_path, extensions) {
                return Some(file);
            }

            if main_path.is_dir() {
                if let Some(index) = resolve_index(&main_path, extensions) {
                    return Some(index);
                }
            }
        }
    }

    resolve_index(dir, extensions)
}

fn resolve_index(dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("index{ext}")))
        .find(|index| index.is_file())
}

fn read_package_main(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&content).ok()?;
    value.get("main").and_then(Value::as_str).map(str::to_string)
}

/// Resolve a bare specifier via `node_modules`, walking up from `base_dir`.
fn resolve_bare(specifier: &str, base_dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    let (pkg_name, subpath) = parse_bare_specifier(specifier);
    let mut current = Some(base_dir);

    while let Some(dir) = current {
        let pkg_dir = dir.join("node_modules").join(pkg_name);

        if pkg_dir.is_dir() {
            let target = match subpath {
                Some(sub) => normalize(&pkg_dir.join(sub)),
                None => pkg_dir,
            };
            if let Some(found) = resolve_file_or_dir(&target, extensions) {
                return Some(found);
            }
        }

        current = dir.parent();
    }

    None
}

/// Parse a bare specifier into package name and optional subpath.
fn parse_bare_specifier(spec: &str) -> (&str, Option<&str>) {
    // Scoped package: @scope/pkg or @scope/pkg/subpath
    if spec.starts_with('@') {
        let mut slash_count = 0;
        for (i, c) in spec.char_indices() {
            if c == '/' {
                slash_count += 1;
                if slash_count == 2 {
                    return (&spec[..i], Some(&spec[i + 1..]));
                }
            }
        }
        return (spec, None);
    }

    // Regular package: pkg or pkg/subpath
    if let Some(pos) = spec.find('/') {
        (&spec[..pos], Some(&spec[pos + 1..]))
    } else {
        (spec, None)
    }
}

fn with_appended_extension(base: &Path, ext: &str) -> PathBuf {
    let mut os: OsString = base.as_os_str().to_owned();
    os.push(ext);
    PathBuf::from(os)
}
