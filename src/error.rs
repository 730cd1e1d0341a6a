use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parameter '{0}' has no candidate values")]
    EmptyDomain(String),

    #[error("Parameter '{name}' is required by {needed_by} but missing from the domain table")]
    MissingParameter { name: String, needed_by: String },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Unknown campaign '{name}'{}", did_you_mean(.suggestion))]
    UnknownCampaign {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SweepError>;
