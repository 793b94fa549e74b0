//! Import specifier resolution.
//!
//! Three strategies are tried in fixed order, and the first one that produces
//! a specifier wins:
//! 1. alias table (full specifier)
//! 2. root directories
//! 3. third-party module boundary (basename)
//!
//! `Ok(None)` means no strategy applied and the import should be left as is.

mod alias;
mod root;
mod third_party;

pub use alias::resolve_from_alias;
pub use root::resolve_from_roots;
pub use third_party::resolve_from_third_party;

use crate::config::ResolverOptions;
use crate::error::Result;
use crate::locate::{ModuleLocator, NodeLocator};
use crate::options::{normalize_options, NormalizedOptions};
use crate::warn::{TracingSink, WarningSink};
use modpath_util::path::{
    extension_of, relative_from, replace_extension, resolve, to_local_specifier,
    to_posix_specifier,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Everything a strategy needs for one resolution call.
pub struct ResolveContext<'a> {
    /// Options normalized for the current file.
    pub options: &'a NormalizedOptions,
    pub locator: &'a dyn ModuleLocator,
    pub sink: &'a dyn WarningSink,
}

/// A resolution strategy: `(specifier, absolute current file, context)`.
pub type Strategy = fn(&str, &Path, &ResolveContext<'_>) -> Result<Option<String>>;

/// Strategies in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("alias", resolve_from_alias),
    ("root", resolve_from_roots),
    ("third-party", third_party_step),
];

/// Resolve `specifier` imported from `current_file` with the default locator
/// and warning sink.
///
/// `current_file` may be relative; it is anchored on the process working
/// directory, never on the configured `cwd`.
pub fn resolve_path(
    specifier: &str,
    current_file: &Path,
    options: &ResolverOptions,
) -> Result<Option<String>> {
    let process_cwd = std::env::current_dir()?;
    resolve_path_from(
        specifier,
        current_file,
        &process_cwd,
        options,
        &NodeLocator,
        &TracingSink,
    )
}

/// Like [`resolve_path`] with every collaborator explicit.
pub fn resolve_path_from(
    specifier: &str,
    current_file: &Path,
    process_cwd: &Path,
    options: &ResolverOptions,
    locator: &dyn ModuleLocator,
    sink: &dyn WarningSink,
) -> Result<Option<String>> {
    let current_file = resolve(process_cwd, current_file);
    let options = normalize_options(&current_file, process_cwd, options);
    let ctx = ResolveContext {
        options: &options,
        locator,
        sink,
    };
    resolve_with_context(specifier, &current_file, &ctx)
}

/// Run the strategies against already-normalized options.
pub fn resolve_with_context(
    specifier: &str,
    current_file: &Path,
    ctx: &ResolveContext<'_>,
) -> Result<Option<String>> {
    for (name, strategy) in STRATEGIES {
        if let Some(resolved) = strategy(specifier, current_file, ctx)? {
            debug!(
                strategy = name,
                specifier,
                resolved = %resolved,
                file = %current_file.display(),
                "resolved import"
            );
            return Ok(Some(resolved));
        }
        trace!(strategy = name, specifier, "no match");
    }

    Ok(None)
}

/// Third-party step of the chain. A bare specifier passed through unchanged is
/// reported as "no change".
fn third_party_step(
    specifier: &str,
    current_file: &Path,
    ctx: &ResolveContext<'_>,
) -> Result<Option<String>> {
    Ok(resolve_from_third_party(specifier, current_file, ctx.options)
        .filter(|resolved| resolved != specifier))
}

/// Reusable resolver: options plus locator and warning sink.
pub struct Resolver {
    options: ResolverOptions,
    locator: Box<dyn ModuleLocator>,
    sink: Box<dyn WarningSink>,
    process_cwd: Option<PathBuf>,
}

impl Resolver {
    #[must_use]
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            locator: Box::new(NodeLocator),
            sink: Box::new(TracingSink),
            process_cwd: None,
        }
    }

    /// Use a custom resolution primitive.
    #[must_use]
    pub fn with_locator(mut self, locator: impl ModuleLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Use a custom warning sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl WarningSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Anchor relative current-file paths on `dir` instead of the process
    /// working directory.
    #[must_use]
    pub fn with_process_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.process_cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve one specifier.
    pub fn resolve(&self, specifier: &str, current_file: &Path) -> Result<Option<String>> {
        let process_cwd = self.process_cwd()?;
        resolve_path_from(
            specifier,
            current_file,
            &process_cwd,
            &self.options,
            self.locator.as_ref(),
            self.sink.as_ref(),
        )
    }

    /// Options as normalized for `current_file`.
    pub fn normalized_options(&self, current_file: &Path) -> Result<NormalizedOptions> {
        let process_cwd = self.process_cwd()?;
        let current_file = resolve(&process_cwd, current_file);
        Ok(normalize_options(&current_file, &process_cwd, &self.options))
    }

    fn process_cwd(&self) -> Result<PathBuf> {
        match &self.process_cwd {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Output specifier for a file found on disk.
///
/// The path is relative to the current file. If the real extension differs
/// from the one written in `source`, the configured rewrite rules apply;
/// otherwise the extension is kept as found.
fn relative_specifier(
    source: &str,
    current_file: &Path,
    found: &Path,
    options: &NormalizedOptions,
) -> String {
    let found_str = found.to_string_lossy();
    let real_extension = extension_of(&found_str);
    let written_extension = extension_of(source);

    let mut relative = relative_from(&options.cwd, current_file, found);
    if real_extension != written_extension {
        relative = replace_extension(&relative, &options.extension_rewrites);
    }

    to_local_specifier(&to_posix_specifier(&relative))
}
