use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while managing or launching servers
pub enum LauncherError {
    #[error("Unable to read the configuration at {path}: {source}")]
    /// Occurs when the configuration file exists but isn't valid JSON of the expected shape
    ///
    /// The file is left untouched, see [`crate::store::ConfigStore::reset`] for recovering.
    ConfigRead {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unable to write the configuration at {path}: {source}")]
    /// Occurs when the configuration directory or file cannot be written
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is not a valid executable path")]
    /// Occurs when an executable path has no containing folder
    InvalidExecutable(PathBuf),

    #[error("There is no server named \"{0}\"")]
    /// Occurs when selecting a name that isn't in the configuration
    UnknownServer(String),

    #[error("No server selected")]
    NoSelection,

    #[error("Server \"{0}\" not found, please re-add it")]
    /// Occurs when the selected server was removed from the configuration after selecting it
    TargetMissing(String),

    #[error("Unable to start {exe}: {source}")]
    /// Occurs when the executable is missing, not executable or permission is denied
    Spawn {
        exe: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    /// Forwards the errors from `std::io::Error`
    Io(#[from] std::io::Error),
}

impl From<LauncherError> for inquire::InquireError {
    fn from(value: LauncherError) -> Self {
        inquire::InquireError::Custom(Box::new(value))
    }
}

/// A type alias for `Result<T, LauncherError>`
pub type LauncherResult<T> = std::result::Result<T, LauncherError>;
