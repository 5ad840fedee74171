use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("No OpenGL context is available for the canvas")]
    ContextUnavailable,
    #[error("Failed to build shader program: {0}")]
    Shader(String),
    #[error("Failed to allocate GPU resource: {0}")]
    Resource(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
