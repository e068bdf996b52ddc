pub mod error;
pub mod extract;
pub mod routes;

pub use error::ApiError;
pub use extract::authenticate;
