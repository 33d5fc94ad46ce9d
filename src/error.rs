use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoCdError {
    #[error("GoCD API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pipeline record in group '{group}' has no name")]
    MissingName { group: String },

    #[error("duplicate pipeline name '{name}' in fetched batch")]
    DuplicateName { name: String },
}

pub type Result<T> = std::result::Result<T, GoCdError>;
