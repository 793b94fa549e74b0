#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Import specifier rewriting for compiler plugins.
//!
//! Given an import specifier and the file it appears in, [`resolve_path`]
//! returns the specifier that should replace it (via the alias table, root
//! directories or third-party boundary map), or `None` to leave it untouched.

pub mod alias;
pub mod config;
pub mod error;
pub mod locate;
pub mod options;
pub mod resolver;
pub mod version;
pub mod warn;

pub use alias::{AliasEntry, Captures, Matcher};
pub use config::{
    load_options, CwdOption, LogLevel, RawOptions, ResolverOptions, ScopeOptions,
    ThirdPartyConfig,
};
pub use error::{Error, Result};
pub use locate::{ModuleLocator, NodeLocator};
pub use modpath_util::path::ExtensionRewrite;
pub use options::{normalize_options, NormalizedOptions};
pub use resolver::{resolve_path, resolve_path_from, ResolveContext, Resolver};
pub use version::VERSION;
pub use warn::{CollectingSink, TracingSink, WarningSink};
