pub mod clock;
pub mod codec;
pub mod config;
pub mod content;
pub mod error;
pub mod history;
pub mod session;

// Re-export common error type
pub use error::{QrError, Result};
