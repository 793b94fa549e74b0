use miette::{IntoDiagnostic, Result};
use std::path::Path;

/// Print the options normalized for `file` as JSON.
pub fn run(cwd: &Path, file: &Path, config: Option<&Path>) -> Result<()> {
    let resolver = super::resolver(cwd, config)?;
    let options = resolver.normalized_options(file).into_diagnostic()?;
    println!("{}", serde_json::to_string_pretty(&options).into_diagnostic()?);
    Ok(())
}
