use forecast::ForecastError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Forecast failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Invalid sampling distribution: {0}")]
    Sampling(String),

    #[error("Invalid scenario configuration: {0}")]
    Config(String),
}

impl From<rand_distr::NormalError> for ScenarioError {
    fn from(err: rand_distr::NormalError) -> Self {
        ScenarioError::Sampling(err.to_string())
    }
}
