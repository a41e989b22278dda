mod error;
mod registry;
mod validation;

pub use error::RegistryError;
pub use registry::UserRegistry;
pub use validation::is_valid_email;
