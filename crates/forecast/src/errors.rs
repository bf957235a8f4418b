use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    /// A mandatory identity field is absent; the run cannot proceed.
    #[error("Missing required input: {document}.{field}")]
    MissingRequiredInput {
        document: &'static str,
        field: &'static str,
    },

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GPX parsing error: {0}")]
    GpxParsing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ForecastError {
    pub fn missing(document: &'static str, field: &'static str) -> Self {
        Self::MissingRequiredInput { document, field }
    }

    /// True for failures that originate in the profile documents themselves.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForecastError::MissingRequiredInput { .. }
                | ForecastError::Json(_)
                | ForecastError::InvalidInput(_)
        )
    }
}
