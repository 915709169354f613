#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Wrong argument count or unexpected line ending after '{0}'")]
    ArgumentCount(String),

    #[error("invalid endpoint {0:?}, expected host:port")]
    InvalidEndpoint(String),
}
