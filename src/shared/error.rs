use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Collection failed: {0}")]
    Collection(#[from] CollectionError),

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse data: {0}")]
    Parse(String),

    #[error("System API error: {0}")]
    SystemApi(String),
}

/// Failure of a single external diagnostic command.
///
/// The GPU collector treats every variant the same way; the distinction
/// only matters for logging.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with code {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{program}' timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("'{program}' produced non UTF-8 output")]
    Output { program: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
