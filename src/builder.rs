use std::path::PathBuf;

use crate::error::MendError;
use crate::file;
use crate::reconcile::Defaults;
use crate::resource::ResourceSource;
use crate::settings::Settings;
use crate::types::ConfigLocation;

/// Entry point for building a reconciled configuration.
pub struct Mend;

impl Mend {
    pub fn builder() -> MendBuilder {
        MendBuilder::new()
    }
}

/// Builder for locating, seeding and reconciling a user-owned config file.
///
/// - **Location**: [`location()`](Self::location) / [`file_name()`](Self::file_name),
///   or [`file_path()`](Self::file_path) to bypass resolution.
/// - **Defaults**: [`defaults()`](Self::defaults) names the bundled document the
///   file is reconciled against and falls back to.
/// - **Seeding**: [`seed_missing()`](Self::seed_missing) copies the defaults to
///   disk on first run.
pub struct MendBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    location: Option<ConfigLocation>,
    file_path: Option<PathBuf>,
    defaults: Option<(Box<dyn ResourceSource>, String)>,
    seed_missing: bool,
}

impl MendBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            location: None,
            file_path: None,
            defaults: None,
            seed_missing: true,
        }
    }

    /// Set the application name, used by [`ConfigLocation::Platform`].
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"config.yml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Directory holding the config file (default: [`ConfigLocation::Platform`]).
    pub fn location(mut self, location: ConfigLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Use this exact file, ignoring `location` and `file_name`.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Reconcile against bundled resource `id` from `source`.
    pub fn defaults(mut self, source: impl ResourceSource + 'static, id: &str) -> Self {
        self.defaults = Some((Box::new(source), id.to_string()));
        self
    }

    /// Copy the defaults to the config path when no file exists yet (default: `true`).
    pub fn seed_missing(mut self, seed: bool) -> Self {
        self.seed_missing = seed;
        self
    }

    fn effective_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("config.yml")
    }

    /// Resolve the config file path.
    fn effective_path(&self) -> Result<PathBuf, MendError> {
        if let Some(path) = &self.file_path {
            return Ok(path.clone());
        }
        let location = self.location.clone().unwrap_or(ConfigLocation::Platform);
        if location == ConfigLocation::Platform && self.app_name.is_none() {
            return Err(MendError::AppNameRequired);
        }
        file::resolve_location(&location, self.app_name.as_deref())
            .map(|dir| dir.join(self.effective_file_name()))
            .ok_or(MendError::NoConfigPath)
    }

    /// Seed (if enabled), reconcile, and return the settings.
    ///
    /// Fails only when no path can be resolved. Seeding, loading and
    /// write problems are logged and degrade as described in
    /// [`reconcile`](crate::reconcile::reconcile).
    pub fn load(self) -> Result<Settings, MendError> {
        let path = self.effective_path()?;

        let defaults = self
            .defaults
            .as_ref()
            .map(|(source, id)| Defaults::new(source.as_ref(), id.as_str()));

        if self.seed_missing
            && let Some(d) = defaults
        {
            match file::seed_from_resource(&path, d.source, d.id) {
                Ok(true) => tracing::debug!(path = %path.display(), "Seeded config file from defaults"),
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Unable to create config file from defaults"
                ),
            }
        }

        Ok(Settings::open(path, defaults))
    }
}
