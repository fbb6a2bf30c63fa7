use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MendError {
    #[error("Bundled resource '{id}' not found")]
    ResourceNotFound { id: String },

    #[error("Failed to read bundled resource '{id}': {source}")]
    ResourceIo {
        id: String,
        source: std::io::Error,
    },

    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to decode {origin}: {reason}")]
    DecodeError { origin: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("App name is required for the platform config directory; call .app_name() on the builder")]
    AppNameRequired,

    #[error("No config file path could be resolved")]
    NoConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_formats_correctly() {
        let err = MendError::DecodeError {
            origin: "/srv/app/config.yml".into(),
            reason: "mapping values are not allowed here".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.yml"));
        assert!(msg.contains("mapping values"));
    }

    #[test]
    fn key_not_found_formats() {
        let err = MendError::KeyNotFound("server.port".into());
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn app_name_required_formats() {
        let err = MendError::AppNameRequired;
        assert!(err.to_string().contains("app_name"));
    }

    #[test]
    fn write_error_keeps_source() {
        let err = MendError::WriteError {
            path: "/ro/config.yml".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/ro/config.yml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
