use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CtgError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {chart} surface: {reason}")]
    InvalidSurface { chart: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, CtgError>;
