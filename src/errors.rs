use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    #[error("Failed to start compiler '{compiler}': {source}")]
    BuildSpawn {
        compiler: String,
        source: std::io::Error,
    },

    #[error("Build failed ({status}): {command}")]
    BuildFailed { command: String, status: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Failed to render chart {path}: {detail}")]
    Render { path: PathBuf, detail: String },
}
