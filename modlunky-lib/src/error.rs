use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ConfigDecode(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
    #[error("$HOME must exist to locate the configuration directory")]
    NoHomeDir,
    #[error("Invalid accent color {0:?}, expected the form #rrggbb")]
    InvalidColor(String),
    #[error("Failed to install the logging subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
