//! External config file handling: location, reading, and first-run seeding.
//!
//! # Location
//!
//! Each [`ConfigLocation`] resolves to one directory; the config file is
//! `{dir}/{file_name}`. `Platform` needs the app name to build the
//! platform-specific directory (e.g. `~/.config/{app_name}/` on Linux).
//!
//! # Seeding
//!
//! On first run the external file does not exist yet. [`seed_from_resource`]
//! copies the bundled defaults verbatim, comments included, so the user starts
//! from a documented file. An existing file is never touched.

use std::path::{Path, PathBuf};

use crate::error::MendError;
use crate::resource::ResourceSource;
use crate::types::ConfigLocation;

/// Resolve a [`ConfigLocation`] to a concrete directory.
///
/// Returns `None` if the directory cannot be determined (no home directory,
/// unreadable CWD, or `Platform` without an app name).
pub fn resolve_location(location: &ConfigLocation, app_name: Option<&str>) -> Option<PathBuf> {
    match location {
        ConfigLocation::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name?)?;
            Some(proj.config_dir().to_path_buf())
        }
        ConfigLocation::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        ConfigLocation::Cwd => std::env::current_dir().ok(),
        ConfigLocation::Path(p) => Some(p.clone()),
    }
}

/// Read an external file as text.
///
/// A missing file is [`MendError::FileNotFound`]; any other read failure is
/// [`MendError::IoError`]. Invalid UTF-8 is replaced rather than rejected.
pub fn read_external(path: &Path) -> Result<String, MendError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(MendError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(MendError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy bundled resource `id` to `path` if `path` does not exist yet.
///
/// Creates parent directories as needed. Returns `Ok(true)` when the file was
/// written, `Ok(false)` when it already existed.
pub fn seed_from_resource(
    path: &Path,
    source: &dyn ResourceSource,
    id: &str,
) -> Result<bool, MendError> {
    if path.exists() {
        return Ok(false);
    }

    let bytes = source
        .read_resource(id)
        .map_err(|e| MendError::ResourceIo {
            id: id.into(),
            source: e,
        })?
        .ok_or_else(|| MendError::ResourceNotFound { id: id.into() })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MendError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &bytes).map_err(|e| MendError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(true)
}
