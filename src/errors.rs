use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchTrackError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("chart backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl BenchTrackError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::Io(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::Parse(msg.into())
    }

    pub fn missing_input<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::MissingInput(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::InvalidInput(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::Render(msg.into())
    }

    pub fn backend_unavailable<T: Into<String>>(msg: T) -> Self {
        BenchTrackError::BackendUnavailable(msg.into())
    }
}
