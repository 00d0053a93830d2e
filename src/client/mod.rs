mod error;
mod fetch;

pub use error::FetchError;
pub use fetch::{ErrorEnvelope, FetchClient};
