//! Specifier and path math.
//!
//! Everything here is lexical: no function touches the filesystem. Paths are
//! normalized the way Node's `path.resolve`/`path.relative` do it, so output
//! specifiers are stable regardless of symlinks or whether the files exist.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// A single extension rewrite rule: a trailing `from` is replaced by `to`.
///
/// An empty `to` strips the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRewrite {
    pub from: String,
    pub to: String,
}

impl ExtensionRewrite {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Rule that strips `ext` entirely.
    #[must_use]
    pub fn strip(ext: impl Into<String>) -> Self {
        Self::new(ext, "")
    }
}

/// Replace platform path separators with `/`.
#[must_use]
pub fn to_posix_specifier(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}

/// Prefix `path` with `./` unless it already starts with `./` or `../`.
///
/// An empty path (the importing file's own directory) becomes `./`.
#[must_use]
pub fn to_local_specifier(path: &str) -> String {
    if path.is_empty() {
        "./".to_string()
    } else if has_relative_prefix(path) {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// Check whether a specifier is relative (`./`, `../`) or a filesystem-absolute path.
///
/// Bare package names, scoped or not, are never relative.
#[must_use]
pub fn is_relative_specifier(spec: &str) -> bool {
    has_relative_prefix(spec) || is_absolute_path(spec)
}

fn has_relative_prefix(spec: &str) -> bool {
    spec.starts_with("./") || spec.starts_with("../")
}

/// Check if a specifier is an absolute path.
#[must_use]
pub fn is_absolute_path(spec: &str) -> bool {
    // Unix absolute
    if spec.starts_with('/') {
        return true;
    }

    // Windows absolute: C:\, D:\, etc.
    let bytes = spec.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        return true;
    }

    // UNC path: \\server\share
    spec.starts_with("\\\\")
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
///
/// Leading `..` segments of a relative path are kept; `..` above the root is dropped.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(segment) => out.push(segment),
        }
    }

    out
}

/// Resolve `path` against `base` and normalize the result.
///
/// An absolute `path` ignores `base`.
#[must_use]
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    normalize(&base.join(path))
}

/// Relative path from directory `from` to `to`. Both should be normalized.
///
/// Paths on different prefixes (Windows drives) have no relative form, so `to`
/// is returned unchanged.
#[must_use]
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let to_components: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(&to_components)
        .take_while(|(a, b)| a == b)
        .count();

    let anchored = |c: Option<&Component<'_>>| {
        matches!(c, Some(Component::Prefix(_) | Component::RootDir))
    };
    if common == 0 && (anchored(from.first()) || anchored(to_components.first())) {
        return to.to_path_buf();
    }

    let mut out = PathBuf::new();
    for _ in &from[common..] {
        out.push("..");
    }
    for component in &to_components[common..] {
        out.push(component.as_os_str());
    }
    out
}

/// Relative path from the directory of `from_file` to `to_file`, POSIX separated.
///
/// Both paths are first resolved against `cwd`. The result is the raw
/// relative path: a sibling yields `x` and the directory itself yields `""`.
/// Callers turn it into a specifier (`./x`, `./`) with [`to_local_specifier`].
#[must_use]
pub fn relative_from(cwd: &Path, from_file: &Path, to_file: &Path) -> String {
    let from_dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    let from = resolve(cwd, from_dir);
    let to = resolve(cwd, to_file);
    to_posix_specifier(&relative(&from, &to).to_string_lossy())
}

/// Extension of the last path segment, including the dot (`path.extname` semantics).
///
/// Returns `""` when the segment has no dot or only a leading one (`.babelrc`).
#[must_use]
pub fn extension_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', MAIN_SEPARATOR]);
    let name = trimmed
        .rsplit(['/', MAIN_SEPARATOR])
        .next()
        .unwrap_or(trimmed);

    if name == ".." {
        return "";
    }

    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx..],
    }
}

/// Rewrite the extension of `path` using the first rule whose `from` suffix
/// matches its last segment. No rule matching (or no rules) leaves it unchanged.
#[must_use]
pub fn replace_extension(path: &str, rules: &[ExtensionRewrite]) -> String {
    let name_start = path.rfind(['/', MAIN_SEPARATOR]).map_or(0, |idx| idx + 1);
    let name = &path[name_start..];

    for rule in rules {
        if !rule.from.is_empty() && name.len() > rule.from.len() && name.ends_with(&rule.from) {
            let stem = &path[..path.len() - rule.from.len()];
            return format!("{stem}{}", rule.to);
        }
    }

    path.to_string()
}
