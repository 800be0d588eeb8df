use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomerowError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("logging already initialized")]
    LoggingInit,
}

pub type Result<T> = std::result::Result<T, HomerowError>;
