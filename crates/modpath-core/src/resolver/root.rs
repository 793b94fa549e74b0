use super::{relative_specifier, ResolveContext};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Look `specifier` up in each root directory, in order; the first hit is
/// rewritten relative to the current file.
pub fn resolve_from_roots(
    specifier: &str,
    current_file: &Path,
    ctx: &ResolveContext<'_>,
) -> Result<Option<String>> {
    let Some(found) = find_in_roots(specifier, ctx) else {
        return Ok(None);
    };

    Ok(Some(relative_specifier(
        specifier,
        current_file,
        &found,
        ctx.options,
    )))
}

fn find_in_roots(specifier: &str, ctx: &ResolveContext<'_>) -> Option<PathBuf> {
    let local = format!("./{specifier}");

    ctx.options.root.iter().find_map(|dir| {
        trace!(root = %dir.display(), specifier, "probing root");
        ctx.locator.locate(&local, dir, &ctx.options.extensions)
    })
}
