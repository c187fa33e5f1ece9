//! Resolution context: environment snapshot plus package metadata.

use std::collections::HashMap;
use std::path::Path;

use crate::manifest::Manifest;

use super::template;

/// Package descriptor file searched next to the manifest, then in the
/// current working directory.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";

/// Immutable lookup context for one resolution pass.
///
/// Built once per startup attempt; read-only afterwards. The environment
/// snapshot is taken after any `.env` file has been loaded, so dotenv
/// values participate in resolution like any other variable.
#[derive(Debug, Clone, Default)]
pub struct Context {
    env: HashMap<String, String>,
    metadata: Option<Manifest>,
}

impl Context {
    pub fn new(env: HashMap<String, String>, metadata: Option<Manifest>) -> Self {
        Self { env, metadata }
    }

    /// Snapshot the process environment and discover package metadata.
    ///
    /// A missing or unparsable descriptor is not an error; the context
    /// simply carries no metadata and template lookups fall through to the
    /// environment.
    pub fn capture(manifest_dir: Option<&Path>) -> Self {
        Self {
            env: std::env::vars().collect(),
            metadata: discover_metadata(manifest_dir),
        }
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// Resolve a `{token}` reference: dotted path into package metadata
    /// first, then the token as an environment variable name.
    pub fn lookup(&self, token: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }
        if let Some(metadata) = &self.metadata {
            if let Some(text) = template::reach(metadata, token).and_then(template::scalar_text) {
                return Some(text);
            }
        }
        self.env.get(token).cloned()
    }
}

fn discover_metadata(manifest_dir: Option<&Path>) -> Option<Manifest> {
    let candidates = manifest_dir
        .map(Path::to_path_buf)
        .into_iter()
        .chain(std::env::current_dir().ok());

    for dir in candidates {
        let descriptor = dir.join(PACKAGE_DESCRIPTOR);
        let Ok(raw) = std::fs::read_to_string(&descriptor) else {
            continue;
        };
        match serde_json::from_str(&raw) {
            Ok(metadata) => return Some(metadata),
            Err(err) => {
                tracing::warn!(
                    "Ignoring unparsable package descriptor {}: {}",
                    descriptor.display(),
                    err
                );
            }
        }
    }
    None
}
