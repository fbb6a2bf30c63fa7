//! Reconciliation: bring a user-owned config file up to date with the
//! shipped defaults without touching anything the user already set.
//!
//! The pass is monotonic. Keys are compared, never values, so an external key
//! is kept even when it is empty or differs from its default. Missing keys are
//! appended to the end of the file as top-level dotted lines:
//!
//! ```text
//! teleport.retryInterval: "2"
//! ```
//!
//! which read back under the same dotted path. Once the file holds every
//! default key, further passes find nothing missing and never write.
//!
//! Appended values escape `"` as `\"` and nothing else. Before anything is
//! written, the rendered lines are read back; entries carrying backslashes,
//! line breaks or other YAML-significant characters that would not survive are
//! kept in memory only and logged, so the file always stays decodable.

use std::io::Write;
use std::path::Path;

use crate::error::MendError;
use crate::file;
use crate::load;
use crate::resource::ResourceSource;
use crate::types::FlatMap;

/// A bundled defaults document to reconcile against.
#[derive(Clone, Copy)]
pub struct Defaults<'a> {
    pub source: &'a dyn ResourceSource,
    pub id: &'a str,
}

impl<'a> Defaults<'a> {
    pub fn new(source: &'a dyn ResourceSource, id: &'a str) -> Self {
        Self { source, id }
    }
}

/// What a reconciliation pass did.
#[derive(Debug)]
pub enum Outcome {
    /// No defaults were supplied; the external file was loaded as-is.
    Loaded,
    /// The external file already held every default key. Nothing was written.
    UpToDate,
    /// Missing keys were appended to the external file.
    Repaired { appended: Vec<String> },
    /// Some or all missing keys were added in memory only. `appended` were
    /// written; `keys` were not, either because the write failed or because
    /// their rendered line would not read back as the same value.
    Unpersisted {
        appended: Vec<String>,
        keys: Vec<String>,
    },
    /// The external file could not be loaded; values come from the defaults
    /// (or are empty when none were supplied).
    Fallback { cause: MendError },
}

/// The merged values plus a record of how they were obtained.
#[derive(Debug)]
pub struct Reconciliation {
    pub values: FlatMap,
    pub outcome: Outcome,
}

/// Load `external` and append any keys present in `defaults` but missing from it.
///
/// Never fails: load errors fall back to the defaults, write errors still
/// return the completed in-memory map. Failures are logged.
pub fn reconcile(external: &Path, defaults: Option<Defaults<'_>>) -> Reconciliation {
    let (text, mut values) = match load_external_text(external) {
        Ok(loaded) => loaded,
        Err(cause) => {
            match &cause {
                MendError::FileNotFound { .. } => tracing::error!(
                    path = %external.display(),
                    "Config file not found; using bundled defaults"
                ),
                MendError::DecodeError { reason, .. } => tracing::error!(
                    path = %external.display(),
                    reason = %reason,
                    "Config file could not be parsed; using bundled defaults"
                ),
                other => tracing::error!(
                    path = %external.display(),
                    error = %other,
                    "Config file could not be read; using bundled defaults"
                ),
            }
            let values = defaults
                .map(|d| load::load_internal(d.source, d.id))
                .unwrap_or_default();
            return Reconciliation {
                values,
                outcome: Outcome::Fallback { cause },
            };
        }
    };

    let Some(defaults) = defaults else {
        return Reconciliation {
            values,
            outcome: Outcome::Loaded,
        };
    };

    let internal = load::load_internal(defaults.source, defaults.id);
    let missing = missing_keys(&internal, &values);

    if missing.is_empty() {
        return Reconciliation {
            values,
            outcome: Outcome::UpToDate,
        };
    }

    let (writable, mut unwritten) = split_persistable(&text, &values, &missing);
    if !unwritten.is_empty() {
        tracing::warn!(
            path = %external.display(),
            count = unwritten.len(),
            "Some missing keys cannot be written without breaking the config file"
        );
    }

    let mut appended: Vec<String> = Vec::new();
    if !writable.is_empty() {
        match append_block(external, &render_missing(&writable)) {
            Ok(()) => {
                tracing::debug!(
                    path = %external.display(),
                    count = writable.len(),
                    "Appended missing config keys"
                );
                appended = writable.keys().cloned().collect();
            }
            Err(e) => {
                tracing::warn!(
                    path = %external.display(),
                    error = %e,
                    "Unable to add missing keys to config file; they apply to this run only"
                );
                unwritten.extend(writable);
            }
        }
    }

    for (key, value) in &unwritten {
        tracing::warn!("{key}: {value}");
    }

    let keys: Vec<String> = unwritten.keys().cloned().collect();
    values.extend(missing);

    let outcome = if keys.is_empty() {
        Outcome::Repaired { appended }
    } else {
        Outcome::Unpersisted { appended, keys }
    };
    Reconciliation { values, outcome }
}

fn load_external_text(path: &Path) -> Result<(String, FlatMap), MendError> {
    let text = file::read_external(path)?;
    let values = load::parse_document(&text, &path.display().to_string())?;
    Ok((text, values))
}

/// Split `missing` into entries safe to append to `text` and entries that are not.
///
/// An entry is safe when its rendered line reads back as exactly that key and
/// value. The safe entries must then also read back, together with every
/// existing value, from the appended document as a whole; otherwise nothing is
/// written.
fn split_persistable(text: &str, existing: &FlatMap, missing: &FlatMap) -> (FlatMap, FlatMap) {
    let (writable, mut rejected): (FlatMap, FlatMap) =
        missing.clone().into_iter().partition(|(key, value)| {
            let single = FlatMap::from([(key.clone(), value.clone())]);
            load::parse_document(&render_missing(&single), key)
                .is_ok_and(|parsed| parsed == single)
        });

    if writable.is_empty() {
        return (writable, rejected);
    }

    let candidate = format!("{text}{}", render_missing(&writable));
    let whole_reads_back = load::parse_document(&candidate, "appended config")
        .is_ok_and(|merged| {
            existing
                .iter()
                .chain(writable.iter())
                .all(|(key, value)| merged.get(key) == Some(value))
        });

    if whole_reads_back {
        (writable, rejected)
    } else {
        rejected.extend(writable);
        (FlatMap::new(), rejected)
    }
}

/// Entries of `internal` whose key is absent from `external`.
pub fn missing_keys(internal: &FlatMap, external: &FlatMap) -> FlatMap {
    internal
        .iter()
        .filter(|(key, _)| !external.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Pure function: render missing entries as a block ready to append.
///
/// The block starts with a newline so it never joins an unterminated last line.
pub fn render_missing(missing: &FlatMap) -> String {
    let mut block = String::from("\n");
    for (key, value) in missing {
        block.push_str(key);
        block.push_str(": \"");
        block.push_str(&escape_quotes(value));
        block.push_str("\"\n");
    }
    block
}

/// Escape every `"` as `\"`.
pub fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn append_block(path: &Path, block: &str) -> Result<(), MendError> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| MendError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

    file.write_all(block.as_bytes())
        .map_err(|e| MendError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
}
