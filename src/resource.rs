//! Bundled resources: the read-only defaults an application ships with.
//!
//! The host supplies a [`ResourceSource`]. [`EmbeddedResources`] covers assets
//! compiled into the binary with `include_bytes!`; [`DirResources`] reads them
//! from an install directory.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only lookup of bundled resources by identifier.
pub trait ResourceSource {
    /// Return the resource bytes, or `Ok(None)` when no resource has this id.
    fn read_resource(&self, id: &str) -> std::io::Result<Option<Vec<u8>>>;
}

/// Resources held in memory, typically `include_bytes!` assets.
///
/// ```ignore
/// let defaults = EmbeddedResources::new()
///     .with("config.yml", include_bytes!("../assets/config.yml").as_slice());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under `id`, replacing any previous one.
    pub fn with(mut self, id: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.entries.insert(id.to_string(), bytes.into());
        self
    }
}

impl ResourceSource for EmbeddedResources {
    fn read_resource(&self, id: &str) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(id).map(|bytes| bytes.to_vec()))
    }
}

/// Resources stored as files under a root directory; `id` is a relative path.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceSource for DirResources {
    fn read_resource(&self, id: &str) -> std::io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
