use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheet download returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Sheet body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
