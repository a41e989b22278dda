use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("User {0} already exists")]
    DuplicateUsername(String),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("registry is full ({max} users)")]
    CapacityExceeded { max: usize },
    #[error("User {0} not found")]
    UserNotFound(String),
}
