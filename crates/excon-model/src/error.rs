use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("'{0}' is not a valid docker:/// locator")]
    InvalidLocator(String),
}
