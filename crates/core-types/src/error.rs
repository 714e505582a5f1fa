use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Invalid period '{0}': expected one of daily, monthly, yearly")]
    InvalidPeriod(String),
}
