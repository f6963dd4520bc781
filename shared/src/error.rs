use thiserror::Error;

/// Reasons the embedded population dataset cannot back a playback view.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to decode population data: {0}")]
    Decode(#[from] serde_json::Error),

    /// No records, so there is no year sequence to cycle through.
    #[error("population data contains no records")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse playback config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tick interval must be greater than zero")]
    InvalidInterval,

    #[error("query parameter name must not be empty ({field})")]
    EmptyParamName { field: &'static str },
}
