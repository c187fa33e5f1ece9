//! Manifest loading
//!
//! The manifest is an arbitrarily nested JSON tree describing server and
//! plugin configuration. No schema is enforced here; the resolver rewrites
//! string leaves in place and the composition contract consumes whatever
//! remains.

use std::path::Path;
use thiserror::Error;

/// The configuration tree handed to the composition contract.
///
/// Kept as a tagged-variant JSON value rather than a typed struct: any key
/// may hold a placeholder string and plugins define their own shapes.
pub type Manifest = serde_json::Value;

/// Manifest key extracted before placeholder resolution and forwarded to
/// the composer untouched.
pub const PRE_REGISTER_KEY: &str = "preRegister";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse a manifest file.
pub async fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Remove the `preRegister` hook field, if present, so it is not subjected
/// to placeholder substitution. Returns the extracted value.
pub fn extract_pre_register(manifest: &mut Manifest) -> Option<Manifest> {
    manifest.as_object_mut()?.remove(PRE_REGISTER_KEY)
}
