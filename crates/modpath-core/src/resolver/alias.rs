use super::{relative_specifier, ResolveContext};
use crate::config::LogLevel;
use crate::error::Result;
use modpath_util::path::{
    is_relative_specifier, relative_from, resolve, to_local_specifier, to_posix_specifier,
};
use std::path::Path;

/// Rewrite `specifier` through the first alias entry that matches it.
///
/// Relative or absolute targets become specifiers relative to the current file.
/// Bare targets are returned as is; unless disabled, they are checked for
/// existence first and a warning is emitted when they cannot be found.
pub fn resolve_from_alias(
    specifier: &str,
    current_file: &Path,
    ctx: &ResolveContext<'_>,
) -> Result<Option<String>> {
    let options = ctx.options;

    let Some((entry, caps)) = options
        .alias
        .iter()
        .find_map(|entry| entry.captures(specifier).map(|caps| (entry, caps)))
    else {
        return Ok(None);
    };

    let target = entry.substitute(&caps)?;
    if target.is_empty() {
        return Ok(None);
    }

    if is_relative_specifier(&target) {
        return Ok(Some(local_target(&target, current_file, ctx)));
    }

    if options.verify_external_aliases {
        check_package_exists(&target, current_file, ctx);
    }

    Ok(Some(target))
}

/// Specifier for a relative/absolute alias target.
///
/// When the target exists on disk as itself plus an extension, the output is
/// computed from the real file so extension rewrites apply as for roots.
fn local_target(target: &str, current_file: &Path, ctx: &ResolveContext<'_>) -> String {
    let options = ctx.options;
    let absolute = resolve(&options.cwd, Path::new(target));
    let base_dir = current_file.parent().unwrap_or(options.cwd.as_path());

    let found = ctx
        .locator
        .locate(&absolute.to_string_lossy(), base_dir, &options.extensions)
        .filter(|found| {
            found.parent() == absolute.parent()
                && found
                    .to_string_lossy()
                    .starts_with(&*absolute.to_string_lossy())
        });

    match found {
        Some(file) => relative_specifier(target, current_file, &file, options),
        None => to_local_specifier(&to_posix_specifier(&relative_from(
            &options.cwd,
            current_file,
            &absolute,
        ))),
    }
}

/// Best-effort existence check for a bare alias target. Never fails.
fn check_package_exists(target: &str, current_file: &Path, ctx: &ResolveContext<'_>) {
    let options = ctx.options;
    let base_dir = current_file.parent().unwrap_or(options.cwd.as_path());

    if ctx
        .locator
        .locate(target, base_dir, &options.extensions)
        .is_none()
        && options.loglevel != LogLevel::Silent
    {
        ctx.sink.warn(&format!(
            "Could not resolve \"{target}\" in file {}.",
            current_file.display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasEntry;
    use crate::config::{CwdOption, ResolverOptions};
    use crate::locate::NodeLocator;
    use crate::options::normalize_options;
    use crate::warn::CollectingSink;
    use modpath_util::path::ExtensionRewrite;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn never(_: &str, _: &Path, _: &[String]) -> Option<PathBuf> {
        None
    }

    fn run(
        specifier: &str,
        current_file: &Path,
        options: &ResolverOptions,
        locator: &dyn crate::locate::ModuleLocator,
        sink: &CollectingSink,
    ) -> Option<String> {
        let normalized = normalize_options(current_file, Path::new("/proj"), options);
        let ctx = ResolveContext {
            options: &normalized,
            locator,
            sink,
        };
        resolve_from_alias(specifier, current_file, &ctx).unwrap()
    }

    fn proj() -> ResolverOptions {
        ResolverOptions::new().with_cwd(CwdOption::Path(PathBuf::from("/proj")))
    }

    #[test]
    fn test_no_match_falls_through() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(AliasEntry::from_config("@utils", "./src/utils").unwrap());
        assert_eq!(
            run("lodash", Path::new("/proj/a.js"), &options, &never, &sink),
            None
        );
    }

    #[test]
    fn test_relative_target_from_nested_file() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(
            AliasEntry::regex(r"^@utils/", |caps| {
                Ok(format!("./src/utils/{}", &caps.input()[7..]))
            })
            .unwrap(),
        );
        assert_eq!(
            run(
                "@utils/helper",
                Path::new("/proj/pages/index.js"),
                &options,
                &never,
                &sink
            )
            .as_deref(),
            Some("../src/utils/helper")
        );
    }

    #[test]
    fn test_sibling_target_gets_dot_slash() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(AliasEntry::from_config("@", "./src").unwrap());
        assert_eq!(
            run("@/a", Path::new("/proj/src/b.js"), &options, &never, &sink).as_deref(),
            Some("./a")
        );
    }

    #[test]
    fn test_target_is_own_directory() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(AliasEntry::from_config("@", "./src").unwrap());
        assert_eq!(
            run("@", Path::new("/proj/src/a.js"), &options, &never, &sink).as_deref(),
            Some("./")
        );
    }

    #[test]
    fn test_target_is_own_directory_on_disk() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.js"), "").unwrap();
        fs::write(src.join("index.js"), "").unwrap();

        let options = ResolverOptions::new()
            .with_cwd(CwdOption::Path(dir.path().to_path_buf()))
            .with_alias(AliasEntry::from_config("@", "./src").unwrap());
        let current = src.join("a.js");
        let normalized = normalize_options(&current, dir.path(), &options);
        let sink = CollectingSink::new();
        let ctx = ResolveContext {
            options: &normalized,
            locator: &NodeLocator,
            sink: &sink,
        };

        assert_eq!(
            resolve_from_alias("@", &current, &ctx).unwrap().as_deref(),
            Some("./")
        );
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let sink = CollectingSink::new();
        let options = proj()
            .with_alias(AliasEntry::from_config("^@(.*)", "./first/\\1").unwrap())
            .with_alias(AliasEntry::from_config("@x", "./second").unwrap());
        assert_eq!(
            run("@x", Path::new("/proj/a.js"), &options, &never, &sink).as_deref(),
            Some("./first/x")
        );
    }

    #[test]
    fn test_bare_target_returned_and_warned() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(AliasEntry::from_config("ui", "some-ui-kit").unwrap());
        assert_eq!(
            run("ui/button", Path::new("/proj/a.js"), &options, &never, &sink).as_deref(),
            Some("some-ui-kit/button")
        );
        let warnings = sink.take();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("\"some-ui-kit/button\""));
        assert!(warnings[0].contains("/proj/a.js"));
    }

    #[test]
    fn test_bare_target_silent_loglevel() {
        let sink = CollectingSink::new();
        let options = proj()
            .with_loglevel(LogLevel::Silent)
            .with_alias(AliasEntry::from_config("ui", "some-ui-kit").unwrap());
        assert!(run("ui", Path::new("/proj/a.js"), &options, &never, &sink).is_some());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_bare_target_verification_disabled() {
        let sink = CollectingSink::new();
        let probed = std::sync::atomic::AtomicBool::new(false);
        let locator = |_: &str, _: &Path, _: &[String]| -> Option<PathBuf> {
            probed.store(true, std::sync::atomic::Ordering::SeqCst);
            None
        };
        let options = proj()
            .with_verify_external_aliases(false)
            .with_alias(AliasEntry::from_config("ui", "some-ui-kit").unwrap());
        assert!(run("ui", Path::new("/proj/a.js"), &options, &locator, &sink).is_some());
        assert!(!probed.load(std::sync::atomic::Ordering::SeqCst));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_bare_target_found_no_warning() {
        let sink = CollectingSink::new();
        let found = |_: &str, _: &Path, _: &[String]| Some(PathBuf::from("/x/index.js"));
        let options = proj().with_alias(AliasEntry::from_config("ui", "some-ui-kit").unwrap());
        assert!(run("ui", Path::new("/proj/a.js"), &options, &found, &sink).is_some());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_empty_target_falls_through() {
        let sink = CollectingSink::new();
        let options = proj().with_alias(AliasEntry::regex("^gone$", |_| Ok(String::new())).unwrap());
        assert_eq!(run("gone", Path::new("/proj/a.js"), &options, &never, &sink), None);
    }

    #[test]
    fn test_relative_target_extension_reconciled() {
        let dir = tempdir().unwrap();
        let utils = dir.path().join("src").join("utils");
        fs::create_dir_all(&utils).unwrap();
        fs::write(utils.join("helper.ts"), "").unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir_all(&pages).unwrap();

        let options = ResolverOptions::new()
            .with_cwd(CwdOption::Path(dir.path().to_path_buf()))
            .with_extensions([".js", ".ts"])
            .with_extension_rewrites(vec![ExtensionRewrite::new(".ts", ".js")])
            .with_alias(AliasEntry::from_config("@utils", "./src/utils").unwrap());

        let current = pages.join("index.js");
        let normalized = normalize_options(&current, dir.path(), &options);
        let sink = CollectingSink::new();
        let ctx = ResolveContext {
            options: &normalized,
            locator: &NodeLocator,
            sink: &sink,
        };

        assert_eq!(
            resolve_from_alias("@utils/helper", &current, &ctx)
                .unwrap()
                .as_deref(),
            Some("../src/utils/helper.js")
        );
    }

    #[test]
    fn test_relative_target_directory_index_not_reconciled() {
        let dir = tempdir().unwrap();
        let utils = dir.path().join("src").join("utils");
        fs::create_dir_all(&utils).unwrap();
        fs::write(utils.join("index.js"), "").unwrap();

        let options = ResolverOptions::new()
            .with_cwd(CwdOption::Path(dir.path().to_path_buf()))
            .with_alias(AliasEntry::from_config("@utils", "./src/utils").unwrap());

        let current = dir.path().join("main.js");
        let normalized = normalize_options(&current, dir.path(), &options);
        let sink = CollectingSink::new();
        let ctx = ResolveContext {
            options: &normalized,
            locator: &NodeLocator,
            sink: &sink,
        };

        assert_eq!(
            resolve_from_alias("@utils", &current, &ctx).unwrap().as_deref(),
            Some("./src/utils")
        );
    }
}
