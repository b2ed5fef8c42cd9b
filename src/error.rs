use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListeningError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown source kind: {0}")]
    UnknownSource(String),

    #[error("Malformed input: expected {expected} ({context})")]
    MalformedInput {
        expected: &'static str,
        context: String,
    },

    #[error("Batch rejected in strict mode: {fatal} fatal row errors ({total} total)")]
    StrictMode { fatal: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ListeningError>;
