//! The reconciled view a host application reads from and writes through.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::error::MendError;
use crate::flatten;
use crate::load;
use crate::persist;
use crate::reconcile::{Defaults, Outcome, reconcile};
use crate::types::FlatMap;

/// Reconciled config values backed by one external file.
#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    values: FlatMap,
    outcome: Outcome,
}

impl Settings {
    /// Reconcile `path` against `defaults` and wrap the result.
    pub fn open(path: impl Into<PathBuf>, defaults: Option<Defaults<'_>>) -> Self {
        let path = path.into();
        let reconciled = reconcile(&path, defaults);
        Self {
            path,
            values: reconciled.values,
            outcome: reconciled.outcome,
        }
    }

    /// The external file these settings read from and write to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What the reconciliation pass that produced these values did.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn values(&self) -> &FlatMap {
        &self.values
    }

    /// Look up a value by dotted key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parse the value at `key`.
    pub fn parse<T>(&self, key: &str) -> Result<T, MendError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get(key)
            .ok_or_else(|| MendError::KeyNotFound(key.into()))?;
        raw.parse().map_err(|e: T::Err| MendError::InvalidValue {
            key: key.into(),
            reason: e.to_string(),
        })
    }

    /// Parse the value at `key`, falling back to `default` with a warning.
    pub fn get_or<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + std::fmt::Display,
        T::Err: std::fmt::Display,
    {
        match self.parse(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Using default {default}");
                default
            }
        }
    }

    /// Deserialize all values into a typed struct.
    ///
    /// Values are re-typed heuristically (bool, integer, float, null, string)
    /// before deserialization, so a `String` field cannot receive a value
    /// that looks like a number.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, MendError> {
        serde_yaml::from_value(flatten::unflatten(&self.values)).map_err(|e| {
            MendError::InvalidValue {
                key: "<settings>".into(),
                reason: e.to_string(),
            }
        })
    }

    /// Patch `key` in the external file and update the in-memory value.
    ///
    /// `value` is written verbatim; the in-memory copy holds its decoded form,
    /// so `set("port", "\"80\"")` is read back as `80`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), MendError> {
        persist::patch_file(&self.path, key, value)?;
        self.values.insert(key.to_string(), decode_scalar(value));
        Ok(())
    }
}

/// Decode a single-line value the way a reload would read it.
fn decode_scalar(raw: &str) -> String {
    let line = format!("v: {raw}\n");
    load::parse_document(&line, "value")
        .ok()
        .and_then(|mut values| values.remove("v"))
        .unwrap_or_else(|| raw.to_string())
}
