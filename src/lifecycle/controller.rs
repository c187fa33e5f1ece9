//! Lifecycle Controller
//!
//! Owns the single running server handle and sequences startup,
//! signal-driven stop, and full restart. Exactly one handle is live at a
//! time; a restart replaces the slot contents with a freshly composed
//! server rather than mutating the old one.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::LaunchArgs;
use crate::compose::{ComposeOptions, Composer, ServerEvent, ServerHandle};
use crate::error::{LaunchError, Result};
use crate::manifest::{self, Manifest};
use crate::modules::{ModuleLoader, resolve_module_path};
use crate::resolver::{Context, resolve};

use super::signals::{SignalEvent, SignalListener};

/// Drives one service through its whole life: launch, run, stop, restart.
pub struct LifecycleController {
    composer: Arc<dyn Composer>,
    modules: Arc<dyn ModuleLoader>,
    server: Option<Box<dyn ServerHandle>>,
}

impl LifecycleController {
    pub fn new(composer: Arc<dyn Composer>, modules: Arc<dyn ModuleLoader>) -> Self {
        Self {
            composer,
            modules,
            server: None,
        }
    }

    /// Run the full service lifecycle.
    ///
    /// Blocks until a termination signal has been handled; returns `Ok(())`
    /// only after the current handle's `stop()` has settled, so the caller
    /// can exit with code 0. A restart signal stops the server and re-runs
    /// the entire launch sequence with the original argument list. Any
    /// failure aborts the attempt; the conversion to an exit code happens
    /// at the top level.
    pub async fn run(&mut self, argv: Vec<String>) -> Result<()> {
        let mut signals: Option<SignalListener> = None;

        loop {
            let (manifest, options) = self.prepare(&argv).await?;

            // Registered only after the startup steps complete; a signal
            // received before this point has no effect.
            let listener = signals.get_or_insert_with(SignalListener::register);

            self.ignite(manifest, options).await?;

            match listener.recv().await {
                SignalEvent::Terminate => {
                    tracing::info!("Termination signal received");
                    self.stop_server().await;
                    return Ok(());
                }
                SignalEvent::Restart => {
                    tracing::info!("Restart signal received");
                    tracing::info!("Stopping...");
                    self.stop_server().await;
                    tracing::info!("Starting...");
                }
            }
        }
    }

    /// Startup steps up to and including placeholder resolution: parse
    /// arguments, load `.env`, preload modules, load the manifest, extract
    /// the `preRegister` hook, resolve placeholders.
    async fn prepare(&self, argv: &[String]) -> Result<(Manifest, ComposeOptions)> {
        let args = LaunchArgs::from_argv(argv)?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let module_root = match &args.module_path {
            Some(path) => Some(tokio::fs::canonicalize(path).await.map_err(|source| {
                LaunchError::ModulePath {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };

        if args.dotenv {
            let env_path = module_root.as_deref().unwrap_or(&cwd).join(".env");
            dotenvy::from_path(&env_path).map_err(|source| LaunchError::EnvFile {
                path: env_path,
                source,
            })?;
        }

        for module in &args.require {
            let path = resolve_module_path(module, &cwd, module_root.as_deref());
            self.modules
                .load(&path)
                .map_err(|source| LaunchError::module_load(module.clone(), source))?;
            tracing::debug!("Preloaded module: {}", path.display());
        }

        let manifest_path = cwd.join(&args.config);
        let mut manifest =
            manifest::load(&manifest_path)
                .await
                .map_err(|source| LaunchError::ManifestLoad {
                    path: args.config.clone(),
                    source,
                })?;

        // The hook is framework code, not configuration; it must never be
        // subjected to substitution.
        let pre_register = manifest::extract_pre_register(&mut manifest);

        let context = Context::capture(manifest_path.parent());
        resolve(&mut manifest, &context);

        let workers = args
            .workers
            .iter()
            .map(|worker| resolve_module_path(worker, &cwd, module_root.as_deref()))
            .collect();

        Ok((
            manifest,
            ComposeOptions {
                pre_register,
                relative_to: module_root,
                workers,
            },
        ))
    }

    /// Compose the server, attach status observers, and start it.
    async fn ignite(&mut self, manifest: Manifest, options: ComposeOptions) -> Result<()> {
        let mut server = self
            .composer
            .compose(manifest, options)
            .await
            .map_err(LaunchError::Compose)?;

        server.on(
            ServerEvent::Start,
            Box::new(|info| tracing::info!("Server started, listening on {}", info.uri)),
        );
        server.on(
            ServerEvent::Stop,
            Box::new(|info| tracing::info!("Server stopped ({})", info.uri)),
        );

        server.start().await.map_err(LaunchError::Start)?;
        self.server = Some(server);
        Ok(())
    }

    /// Await the current handle's `stop()` and discard it.
    ///
    /// A stop failure is logged rather than propagated: shutdown ordering
    /// (stop settles before exit or relaunch) must hold even when the
    /// drain itself reports an error.
    async fn stop_server(&mut self) {
        if let Some(mut server) = self.server.take() {
            if let Err(err) = server.stop().await {
                tracing::error!("Error stopping server: {err:#}");
            }
        }
    }
}
