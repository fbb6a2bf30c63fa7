//! Keep a user-owned YAML config file compatible with the defaults your
//! application ships, and edit single values in it, without losing the
//! user's comments or formatting.
//!
//! ```ignore
//! let mut settings = Mend::builder()
//!     .app_name("myapp")
//!     .defaults(EmbeddedResources::new().with("config.yml", DEFAULTS), "config.yml")
//!     .load()?;
//!
//! let interval: u32 = settings.get_or("teleport.retryInterval", 2);
//! settings.set("login", "never")?;
//! ```
//!
//! That call finds `config.yml` in the platform config directory, creates it
//! from the bundled defaults on first run, appends any default keys the user's
//! copy is missing, and hands back a flat `dotted.key -> value` view.
//!
//! # Why yamlmend
//!
//! A config file installed once and then hand-edited for years drifts away
//! from the keys newer releases expect. Regenerating the file destroys the
//! user's edits and comments; reparsing and re-serializing it destroys the
//! comments anyway. Yamlmend never re-serializes. It appends what is missing
//! and rewrites single value tokens in place, so every other byte survives.
//!
//! # Flat view
//!
//! Documents are flattened into [`FlatMap`]: every scalar leaf keyed by its
//! full dotted path, every value a string.
//!
//! ```text
//! default:                 default.worldName -> "world"
//!   worldName: "world"     default.y         -> "64"
//!   y: 64
//! ```
//!
//! [`Settings::parse`], [`Settings::get_or`] and [`Settings::extract`] turn
//! strings back into typed values.
//!
//! # Reconciliation
//!
//! [`reconcile`] compares keys, never values. A key the user has is kept even
//! when it is empty or differs from the default. Missing keys are appended as
//! top-level dotted lines, which read back under the same path:
//!
//! ```text
//! teleport.retryInterval: "2"
//! ```
//!
//! Once the file holds every default key, reconciliation writes nothing, so it
//! is safe to run on every start. It never fails: an unreadable or broken file
//! falls back to the defaults, and a failed append still returns the complete
//! in-memory map while logging every key that could not be written. The
//! returned [`Outcome`] says which of these happened.
//!
//! # Patching
//!
//! [`patch_file`] finds a key with an indentation-aware line scan
//! ([`locate`]) and replaces only its value token. Trailing comments, quoting
//! of neighbours, blank lines and line endings stay untouched. Patch failures
//! (missing key, unwritable file) are returned to the caller, since the caller
//! asked for that specific change.
//!
//! # Limits
//!
//! The format is the block-mapping subset of YAML: `key: value` lines nested
//! by indentation. Flow collections, multi-line scalars, anchors and multiple
//! documents are not handled by the locator. Appended values escape `"` only;
//! a missing value that would not read back intact is kept in memory and logged.
//! Nothing here locks files; serialize access to one path yourself.
//!
//! # Error handling
//!
//! All fallible operations return [`MendError`]. Recovered failures are
//! reported through [`tracing`](https://docs.rs/tracing); install a subscriber
//! in the host to see them.

pub mod error;
pub mod types;

mod builder;
mod file;
mod flatten;
mod load;
mod locate;
mod persist;
mod reconcile;
mod resource;
mod settings;

#[cfg(test)]
mod fixtures;

pub use builder::{Mend, MendBuilder};
pub use error::MendError;
pub use file::{resolve_location, seed_from_resource};
pub use flatten::{flatten, scalar_to_string, unflatten};
pub use load::{load_internal, parse_document, try_load_external, try_load_internal};
pub use locate::{KeyPath, locate, locate_path};
pub use persist::{patch_document, patch_file};
pub use reconcile::{
    Defaults, Outcome, Reconciliation, escape_quotes, missing_keys, reconcile, render_missing,
};
pub use resource::{DirResources, EmbeddedResources, ResourceSource};
pub use settings::Settings;
pub use types::{ConfigLocation, FlatMap};
