mod profiling;
mod user;

pub use profiling::*;
pub use user::*;

pub const VERSION: &str = "1.0.0";
pub const MAX_USERS: usize = 1000;
