//! Brazier binary: wire the default composer and module loader into a
//! lifecycle controller and run it against the process arguments.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brazier::compose::HttpComposer;
use brazier::error::LaunchError;
use brazier::lifecycle::LifecycleController;
use brazier::modules::DylibLoader;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brazier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut controller = LifecycleController::new(
        Arc::new(HttpComposer::new()),
        Arc::new(DylibLoader::new()),
    );

    match controller.run(std::env::args().collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(LaunchError::Arguments { usage }) => {
            eprintln!("{usage}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
