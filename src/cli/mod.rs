//! Command-line argument surface
//!
//! Mirrors the flags the launcher has always exposed: a required manifest
//! path plus optional module root, preload modules, `.env` loading, and
//! worker entries. Parse failures and `-h` both surface as
//! [`LaunchError::Arguments`] carrying clap's rendered output, which the
//! top level prints before exiting with code 1.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::LaunchError;

/// Parsed launch arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "brazier",
    about = "Start a server composed from a JSON manifest",
    override_usage = "brazier -c manifest.json [-p module_path] [-r pre_load_module]..."
)]
pub struct LaunchArgs {
    /// Path to the manifest JSON configuration file
    #[arg(short = 'c', value_name = "PATH")]
    pub config: PathBuf,

    /// Module search root (defaults to the current working directory)
    #[arg(short = 'p', value_name = "DIR")]
    pub module_path: Option<PathBuf>,

    /// Module path(s) to preload before the server is composed
    #[arg(short = 'r', long = "require", value_name = "MODULE")]
    pub require: Vec<String>,

    /// Load a .env file from the module search root
    #[arg(short = 'e', long = "dotenv")]
    pub dotenv: bool,

    /// Worker entry path(s) handed to the composed server
    #[arg(short = 'w', long = "worker", value_name = "PATH")]
    pub workers: Vec<String>,
}

impl LaunchArgs {
    /// Parse an argv slice (program name included).
    ///
    /// Help requests are treated the same as parse errors: both carry the
    /// rendered usage/help text and terminate the launch with exit code 1.
    pub fn from_argv<I, T>(argv: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(argv).map_err(|err| LaunchError::Arguments {
            usage: err.render().to_string(),
        })
    }
}
