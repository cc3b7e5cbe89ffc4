use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unknown {option} '{value}', choose between {allowed}.")]
    InvalidConfig {
        option: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Invalid filter pattern '{pattern}': {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cross-references were not restored after normalization: {}", .tokens.join(", "))]
    StashResidual { tokens: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
