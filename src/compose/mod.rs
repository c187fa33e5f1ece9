//! Server Composition Contracts
//!
//! The launcher never builds a server itself; it hands the resolved
//! manifest to a [`Composer`] and drives the returned [`ServerHandle`].
//! The web framework and its plugin system live behind these traits.
//!
//! A default axum-backed composer is provided for the shipped binary;
//! embedders wire in their own framework adapter instead.

mod http;

pub use http::{HttpComposer, HttpServer, ServerSettings};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::manifest::Manifest;

/// Notifications a server handle emits to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    Start,
    Stop,
}

/// Details passed to event observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// The URI the server is reachable at.
    pub uri: String,
}

/// Callback registered for a [`ServerEvent`].
pub type Observer = Box<dyn Fn(&ServerInfo) + Send + Sync>;

/// Options forwarded to composition alongside the resolved manifest.
#[derive(Debug, Default)]
pub struct ComposeOptions {
    /// `preRegister` hook extracted from the manifest before resolution,
    /// forwarded untouched.
    pub pre_register: Option<Manifest>,

    /// Canonicalized module search root; present only when one was given
    /// on the command line.
    pub relative_to: Option<PathBuf>,

    /// Worker entry paths, resolved like preload modules. Spawning them is
    /// the composed framework's concern, not the launcher's.
    pub workers: Vec<PathBuf>,
}

/// A startable server produced by composition.
///
/// Owned exclusively by the lifecycle controller for the lifetime of the
/// process; a restart replaces the handle wholesale.
#[async_trait]
pub trait ServerHandle: Send + Sync {
    /// Begin serving. Resolves once the server is accepting connections.
    async fn start(&mut self) -> anyhow::Result<()>;

    /// Drain and stop. Resolves once shutdown has completed.
    async fn stop(&mut self) -> anyhow::Result<()>;

    /// Register an observer for start/stop notifications.
    fn on(&mut self, event: ServerEvent, observer: Observer);
}

/// Turns a resolved manifest into a server handle.
#[async_trait]
pub trait Composer: Send + Sync {
    async fn compose(
        &self,
        manifest: Manifest,
        options: ComposeOptions,
    ) -> anyhow::Result<Box<dyn ServerHandle>>;
}
