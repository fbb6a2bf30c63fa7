//! Decoding documents into flat maps.
//!
//! The `try_*` functions report the failure kind. [`load_internal`] degrades
//! to an empty map, since missing defaults must never crash the host. External
//! files degrade in [`reconcile`](crate::reconcile), which needs the kind to
//! pick its fallback and log message.

use std::path::Path;

use serde_yaml::Value;

use crate::error::MendError;
use crate::file;
use crate::flatten::flatten;
use crate::resource::ResourceSource;
use crate::types::FlatMap;

/// Pure function: decode document text and flatten it.
///
/// An empty or comment-only document yields an empty map. A document whose
/// root is a scalar or sequence is a [`MendError::DecodeError`].
pub fn parse_document(text: &str, origin: &str) -> Result<FlatMap, MendError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| MendError::DecodeError {
        origin: origin.into(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Null | Value::Mapping(_) => Ok(flatten(Some(&value))),
        _ => Err(MendError::DecodeError {
            origin: origin.into(),
            reason: "document root is not a mapping".into(),
        }),
    }
}

/// Load and flatten a bundled resource.
pub fn try_load_internal(source: &dyn ResourceSource, id: &str) -> Result<FlatMap, MendError> {
    let bytes = source
        .read_resource(id)
        .map_err(|e| MendError::ResourceIo {
            id: id.into(),
            source: e,
        })?
        .ok_or_else(|| MendError::ResourceNotFound { id: id.into() })?;

    parse_document(&String::from_utf8_lossy(&bytes), id)
}

/// Load and flatten a bundled resource, logging failures and returning an
/// empty map instead.
pub fn load_internal(source: &dyn ResourceSource, id: &str) -> FlatMap {
    match try_load_internal(source, id) {
        Ok(values) => values,
        Err(e) => {
            tracing::error!(
                resource = %id,
                error = %e,
                "Unable to load bundled defaults; config values may be incomplete"
            );
            FlatMap::new()
        }
    }
}

/// Load and flatten an external config file.
///
/// Returns [`MendError::FileNotFound`], [`MendError::DecodeError`] or
/// [`MendError::IoError`].
pub fn try_load_external(path: &Path) -> Result<FlatMap, MendError> {
    let text = file::read_external(path)?;
    parse_document(&text, &path.display().to_string())
}
