//! Extra-module preloading
//!
//! Operators can ask the launcher to load auxiliary modules before the
//! server is composed (`-r/--require`). Path resolution follows the
//! launcher's long-standing precedence: absolute paths pass through,
//! dot-prefixed paths resolve against the current working directory, and
//! bare names resolve against the module search root's `plugins/`
//! directory.

use anyhow::Context;
use dashmap::DashMap;
use libloading::Library;
use std::path::{Path, PathBuf};

/// Directory under the module search root where bare-name modules live.
pub const PLUGIN_DIR: &str = "plugins";

/// Resolve a module reference from the command line to a filesystem path.
pub fn resolve_module_path(module: &str, cwd: &Path, module_root: Option<&Path>) -> PathBuf {
    let path = Path::new(module);
    if path.is_absolute() {
        path.to_path_buf()
    } else if module.starts_with('.') {
        cwd.join(path)
    } else {
        module_root.unwrap_or(cwd).join(PLUGIN_DIR).join(path)
    }
}

/// Loads auxiliary modules ahead of server composition.
///
/// The launcher only decides *which* path to load; what loading means is
/// the loader's concern. The first failure aborts the launch.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> anyhow::Result<()>;
}

/// Default loader backed by dynamic libraries.
///
/// Loaded libraries are retained for the lifetime of the process so their
/// initializers and exported state stay valid while the server runs.
#[derive(Default)]
pub struct DylibLoader {
    loaded: DashMap<PathBuf, Library>,
}

impl DylibLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules currently held live.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

impl ModuleLoader for DylibLoader {
    fn load(&self, path: &Path) -> anyhow::Result<()> {
        // SAFETY: loading a foreign module runs its initializers, which is
        // inherently unsafe.
        let library = unsafe { Library::new(path) }
            .with_context(|| format!("failed to load module library from {}", path.display()))?;
        self.loaded.insert(path.to_path_buf(), library);
        Ok(())
    }
}
