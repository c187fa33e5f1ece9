//! Default HTTP composition backed by axum.
//!
//! Provides the process-level serving shell: bind the address named by the
//! manifest's `server` section, serve on a background task, and drain
//! through a graceful-shutdown channel on `stop()`. Plugin registration is
//! the embedding framework's concern.

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::manifest::Manifest;

use super::{ComposeOptions, Composer, Observer, ServerEvent, ServerHandle, ServerInfo};

/// Listener settings read from `manifest.server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// Ports may arrive as numbers or strings: resolved environment values
    /// are always strings.
    fn from_manifest(manifest: &Manifest) -> anyhow::Result<Self> {
        let server = manifest.get("server");

        let host = server
            .and_then(|section| section.get("host"))
            .and_then(Manifest::as_str)
            .unwrap_or("127.0.0.1")
            .to_owned();

        let port = match server.and_then(|section| section.get("port")) {
            None | Some(Manifest::Null) => 0,
            Some(Manifest::Number(number)) => number
                .as_u64()
                .and_then(|port| u16::try_from(port).ok())
                .ok_or_else(|| anyhow!("server.port out of range: {number}"))?,
            Some(Manifest::String(text)) => text
                .parse()
                .with_context(|| format!("invalid server.port: {text:?}"))?,
            Some(other) => return Err(anyhow!("invalid server.port: {other}")),
        };

        Ok(Self { host, port })
    }
}

/// Composes a plain axum server from the manifest.
#[derive(Debug, Default)]
pub struct HttpComposer;

impl HttpComposer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Composer for HttpComposer {
    async fn compose(
        &self,
        manifest: Manifest,
        options: ComposeOptions,
    ) -> anyhow::Result<Box<dyn ServerHandle>> {
        let settings = ServerSettings::from_manifest(&manifest)?;

        if let Some(hook) = &options.pre_register {
            tracing::debug!("preRegister hook received by composition: {hook}");
        }
        if !options.workers.is_empty() {
            tracing::debug!(
                "{} worker entries registered: {:?}",
                options.workers.len(),
                options.workers
            );
        }

        Ok(Box::new(HttpServer::new(settings)))
    }
}

/// A composed HTTP server: bound lazily at `start()`, drained at `stop()`.
pub struct HttpServer {
    settings: ServerSettings,
    start_observers: Vec<Observer>,
    stop_observers: Vec<Observer>,
    running: Option<Running>,
}

struct Running {
    info: ServerInfo,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<std::io::Result<()>>,
}

impl HttpServer {
    fn new(settings: ServerSettings) -> Self {
        Self {
            settings,
            start_observers: Vec::new(),
            stop_observers: Vec::new(),
            running: None,
        }
    }

    /// The bound address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .as_ref()
            .and_then(|running| running.info.uri.strip_prefix("http://")?.parse().ok())
    }
}

#[async_trait]
impl ServerHandle for HttpServer {
    async fn start(&mut self) -> anyhow::Result<()> {
        let listener = TcpListener::bind((self.settings.host.as_str(), self.settings.port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    self.settings.host, self.settings.port
                )
            })?;
        let addr = listener.local_addr()?;

        let (shutdown, mut drain) = watch::channel(false);
        let router = Router::new();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = drain.wait_for(|stop| *stop).await;
                })
                .await
        });

        let info = ServerInfo {
            uri: format!("http://{addr}"),
        };
        for observer in &self.start_observers {
            observer(&info);
        }
        self.running = Some(Running {
            info,
            shutdown,
            task,
        });
        Ok(())
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        let _ = running.shutdown.send(true);
        running
            .task
            .await
            .context("server task panicked")?
            .context("server task failed")?;

        for observer in &self.stop_observers {
            observer(&running.info);
        }
        Ok(())
    }

    fn on(&mut self, event: ServerEvent, observer: Observer) {
        match event {
            ServerEvent::Start => self.start_observers.push(observer),
            ServerEvent::Stop => self.stop_observers.push(observer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn settings_accept_string_ports() {
        let manifest = json!({ "server": { "host": "localhost", "port": "8080" } });
        let settings = ServerSettings::from_manifest(&manifest).unwrap();
        assert_eq!(
            settings,
            ServerSettings {
                host: "localhost".to_string(),
                port: 8080
            }
        );
    }

    #[test]
    fn settings_accept_numeric_ports_and_default_the_host() {
        let manifest = json!({ "server": { "port": 9000 } });
        let settings = ServerSettings::from_manifest(&manifest).unwrap();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn missing_or_absent_ports_become_ephemeral() {
        let bare = json!({});
        assert_eq!(ServerSettings::from_manifest(&bare).unwrap().port, 0);

        let absent = json!({ "server": { "port": null } });
        assert_eq!(ServerSettings::from_manifest(&absent).unwrap().port, 0);
    }

    #[test]
    fn unparsable_ports_are_rejected() {
        let manifest = json!({ "server": { "port": "not-a-port" } });
        assert!(ServerSettings::from_manifest(&manifest).is_err());

        let out_of_range = json!({ "server": { "port": 70000 } });
        assert!(ServerSettings::from_manifest(&out_of_range).is_err());
    }

    #[tokio::test]
    async fn composes_starts_and_stops_with_observers() {
        let manifest = json!({ "server": { "host": "127.0.0.1", "port": 0 } });
        let mut server = HttpComposer::new()
            .compose(manifest, ComposeOptions::default())
            .await
            .unwrap();

        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&events);
        server.on(
            ServerEvent::Start,
            Box::new(move |info| sink.lock().unwrap().push(format!("start {}", info.uri))),
        );
        let sink = Arc::clone(&events);
        server.on(
            ServerEvent::Stop,
            Box::new(move |info| sink.lock().unwrap().push(format!("stop {}", info.uri))),
        );

        server.start().await.unwrap();
        server.stop().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("start http://127.0.0.1:"));
        assert!(events[1].starts_with("stop http://127.0.0.1:"));
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let manifest = json!({ "server": { "port": 0 } });
        let mut server = HttpComposer::new()
            .compose(manifest, ComposeOptions::default())
            .await
            .unwrap();
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn binding_an_invalid_host_fails_start() {
        let manifest = json!({ "server": { "host": "definitely.not.a.real.host.invalid", "port": 0 } });
        let mut server = HttpComposer::new()
            .compose(manifest, ComposeOptions::default())
            .await
            .unwrap();
        assert!(server.start().await.is_err());
    }
}
