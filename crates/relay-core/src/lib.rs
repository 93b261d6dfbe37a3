pub mod error;
pub mod export;
pub mod session;
pub mod transport;

// Re-export common error type
pub use error::{RelayError, Result};
