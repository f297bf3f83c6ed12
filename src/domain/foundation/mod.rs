//! Foundation types shared across the domain.

mod errors;
mod timestamp;
mod tokens;

pub use errors::DomainError;
pub use timestamp::Timestamp;
pub use tokens::{TokenEstimator, CHARS_PER_TOKEN};
