pub mod options;
pub mod resolve;
pub mod version;

use miette::{IntoDiagnostic, Result, WrapErr};
use modpath_core::{load_options, Resolver, ResolverOptions};
use std::path::Path;

/// Build a resolver anchored on `cwd`, loading `config` when given.
fn resolver(cwd: &Path, config: Option<&Path>) -> Result<Resolver> {
    let options = match config {
        Some(path) => {
            let path = cwd.join(path);
            load_options(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to load {}", path.display()))?
        }
        None => ResolverOptions::new(),
    };

    Ok(Resolver::new(options).with_process_cwd(cwd))
}
