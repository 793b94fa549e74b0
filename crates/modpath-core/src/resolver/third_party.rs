use crate::options::NormalizedOptions;
use modpath_util::path::is_relative_specifier;
use std::path::Path;

/// Remap relative imports made from inside the third-party module boundary.
///
/// Bare specifiers are passed through unchanged. A relative specifier is only
/// considered when the current file's path contains the boundary marker; its
/// basename is then matched against the boundary's alias table and the first
/// hit yields that entry's literal path.
#[must_use]
pub fn resolve_from_third_party(
    specifier: &str,
    current_file: &Path,
    options: &NormalizedOptions,
) -> Option<String> {
    if !is_relative_specifier(specifier) {
        return Some(specifier.to_string());
    }

    let third_party = options.third_party.as_ref()?;
    if third_party.module.is_empty()
        || !current_file
            .to_string_lossy()
            .contains(third_party.module.as_str())
    {
        return None;
    }

    let basename = specifier.rsplit('/').next().unwrap_or(specifier);

    third_party
        .alias
        .iter()
        .find(|entry| entry.captures(basename).is_some())
        .and_then(|entry| entry.literal())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResolverOptions, ThirdPartyConfig};
    use crate::options::normalize_options;

    fn options_for(file: &str) -> NormalizedOptions {
        let options = ResolverOptions::new().with_third_party(
            ThirdPartyConfig::new("node_modules/widget-kit")
                .with_alias("widget", "third-party-widget")
                .unwrap()
                .with_alias("^(button|link)$", "third-party-controls")
                .unwrap(),
        );
        normalize_options(Path::new(file), Path::new("/proj"), &options)
    }

    const INSIDE: &str = "/proj/node_modules/widget-kit/lib/index.js";
    const OUTSIDE: &str = "/proj/src/index.js";

    #[test]
    fn test_bare_specifier_passes_through() {
        for file in [INSIDE, OUTSIDE] {
            let opts = options_for(file);
            assert_eq!(
                resolve_from_third_party("lodash/map", Path::new(file), &opts).as_deref(),
                Some("lodash/map")
            );
        }
    }

    #[test]
    fn test_basename_mapped_inside_boundary() {
        let opts = options_for(INSIDE);
        assert_eq!(
            resolve_from_third_party("./widget", Path::new(INSIDE), &opts).as_deref(),
            Some("third-party-widget")
        );
        assert_eq!(
            resolve_from_third_party("../deep/button", Path::new(INSIDE), &opts).as_deref(),
            Some("third-party-controls")
        );
    }

    #[test]
    fn test_outside_boundary_is_none() {
        let opts = options_for(OUTSIDE);
        assert_eq!(
            resolve_from_third_party("./widget", Path::new(OUTSIDE), &opts),
            None
        );
    }

    #[test]
    fn test_unmapped_basename_is_none() {
        let opts = options_for(INSIDE);
        assert_eq!(
            resolve_from_third_party("./gadget", Path::new(INSIDE), &opts),
            None
        );
    }

    #[test]
    fn test_no_boundary_configured() {
        let opts = normalize_options(
            Path::new(INSIDE),
            Path::new("/proj"),
            &ResolverOptions::new(),
        );
        assert_eq!(
            resolve_from_third_party("./widget", Path::new(INSIDE), &opts),
            None
        );
        assert_eq!(
            resolve_from_third_party("react", Path::new(INSIDE), &opts).as_deref(),
            Some("react")
        );
    }
}
