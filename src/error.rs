use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unsupported chord symbol: {0:?}")]
    Chord(String),
    #[error("midi write error: {0}")]
    Midi(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
