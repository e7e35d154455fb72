use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no installed font matches '{0}'")]
    FontNotFound(String),

    #[error("font data for '{0}' could not be parsed")]
    InvalidFont(String),

    #[error("failed to read font file {path}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("display error: {0}")]
    Display(String),
}
