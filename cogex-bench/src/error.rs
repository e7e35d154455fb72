use cogex_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid benchmark config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}
