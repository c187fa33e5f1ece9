use std::path::PathBuf;
use thiserror::Error;

use crate::manifest::ManifestError;

pub type Result<T> = std::result::Result<T, LaunchError>;

/// Errors that abort a launch attempt.
///
/// Every variant is fatal to the current attempt and maps to exit code 1.
/// The conversion to a process exit happens at the top level only; the
/// launch sequence itself propagates these as ordinary results.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Invalid arguments or an explicit help request. Carries the rendered
    /// usage text, printed verbatim to stderr before exiting.
    #[error("{usage}")]
    Arguments { usage: String },

    #[error("failed loading .env configuration file: {} ({source})", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("failed resolving module search path: {} ({source})", path.display())]
    ModulePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `--require` module could not be preloaded. `module` is the path
    /// exactly as given on the command line.
    #[error("failed loading module: {module} ({cause:#})")]
    ModuleLoad { module: String, cause: anyhow::Error },

    #[error("failed loading configuration file: {} ({source})", path.display())]
    ManifestLoad {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error("failed composing server: {0:#}")]
    Compose(anyhow::Error),

    #[error("failed starting server: {0:#}")]
    Start(anyhow::Error),
}

impl LaunchError {
    pub fn module_load(module: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::ModuleLoad {
            module: module.into(),
            cause,
        }
    }
}
