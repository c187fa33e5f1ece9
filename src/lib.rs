//! # Brazier
//!
//! A manifest-driven launcher and lifecycle manager for plugin-based web
//! servers.
//!
//! Brazier reads a declarative JSON manifest, resolves environment-variable
//! and package-metadata placeholders inside it, optionally preloads
//! auxiliary modules, composes a server through an external contract, and
//! manages its lifecycle: start, graceful stop on a termination signal,
//! full restart on SIGUSR2.
//!
//! ## Features
//!
//! - **Placeholder Resolution**: `{token}` template references resolved
//!   against package metadata then the environment, plus `$env.NAME`
//!   whole-value indirection
//! - **Module Preloading**: `--require` modules loaded before composition,
//!   with `node_modules`-style path precedence under a `plugins/` root
//! - **Signal-driven Lifecycle**: graceful stop on SIGTERM/SIGQUIT/Ctrl+C,
//!   full relaunch with the original arguments on SIGUSR2
//! - **Pluggable Composition**: the web framework lives behind the
//!   [`Composer`]/[`ServerHandle`] traits; an axum-backed default ships
//!   with the binary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brazier::compose::HttpComposer;
//! use brazier::lifecycle::LifecycleController;
//! use brazier::modules::DylibLoader;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut controller = LifecycleController::new(
//!         Arc::new(HttpComposer::new()),
//!         Arc::new(DylibLoader::new()),
//!     );
//!
//!     if let Err(err) = controller.run(std::env::args().collect()).await {
//!         eprintln!("{err}");
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! Manifest example:
//!
//! ```json
//! {
//!     "server": { "host": "$env.host", "port": "$env.port" },
//!     "register": {
//!         "plugins": [
//!             { "plugin": "./metrics", "options": { "key": "$env.metrics_key" } }
//!         ]
//!     }
//! }
//! ```

pub mod cli;
pub mod compose;
pub mod error;
pub mod lifecycle;
pub mod manifest;
pub mod modules;
pub mod resolver;

// Re-export core types
pub use cli::LaunchArgs;
pub use compose::{ComposeOptions, Composer, ServerEvent, ServerHandle, ServerInfo};
pub use error::{LaunchError, Result};
pub use lifecycle::LifecycleController;
pub use manifest::Manifest;
pub use resolver::{Context, resolve};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use brazier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cli::LaunchArgs;
    pub use crate::compose::{
        ComposeOptions, Composer, HttpComposer, Observer, ServerEvent, ServerHandle, ServerInfo,
    };
    pub use crate::error::{LaunchError, Result};
    pub use crate::lifecycle::{LifecycleController, SignalEvent, SignalListener};
    pub use crate::manifest::Manifest;
    pub use crate::modules::{DylibLoader, ModuleLoader};
    pub use crate::resolver::{Context, resolve};
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
