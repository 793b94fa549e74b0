use miette::{IntoDiagnostic, Result};
use modpath_core::version::SCHEMA_VERSION;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ResolveReport {
    schema_version: u32,
    file: String,
    results: Vec<ResolveResult>,
}

#[derive(Debug, Serialize)]
struct ResolveResult {
    specifier: String,
    /// `None` when the import is left unchanged.
    resolved: Option<String>,
}

/// Run the resolve command.
///
/// Prints one `<specifier> -> <result>` line per specifier, or a single JSON
/// document when `json` is true.
pub fn run(
    cwd: &Path,
    specifiers: &[String],
    file: &Path,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let resolver = super::resolver(cwd, config)?;

    let results = specifiers
        .iter()
        .map(|specifier| {
            let resolved = resolver.resolve(specifier, file).into_diagnostic()?;
            Ok(ResolveResult {
                specifier: specifier.clone(),
                resolved,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        let report = ResolveReport {
            schema_version: SCHEMA_VERSION,
            file: file.display().to_string(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        return Ok(());
    }

    for result in &results {
        match &result.resolved {
            Some(resolved) => println!("{} -> {resolved}", result.specifier),
            None => println!("{} -> (unchanged)", result.specifier),
        }
    }

    Ok(())
}
