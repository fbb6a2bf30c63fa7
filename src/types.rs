use std::collections::BTreeMap;
use std::path::PathBuf;

/// Dotted key path to stringified scalar, e.g. `"server.port" -> "25565"`.
///
/// Sorted so that appended blocks and listings come out in a stable order.
pub type FlatMap = BTreeMap<String, String>;

/// Directory that holds the user-owned config file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLocation {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}
