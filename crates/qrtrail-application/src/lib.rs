//! Application layer for qrtrail.
//!
//! Use cases that sit between the presentation front end and the
//! storage adapters: history log access, the session lifecycle and the
//! generate/scan flows that feed the log.

pub mod generate_service;
pub mod history_service;
pub mod scan_session;
pub mod session_service;

pub use generate_service::{GenerateService, GeneratedCode};
pub use history_service::{HistoryService, SeedOutcome};
pub use scan_session::{ScanOutcome, ScanSession};
pub use session_service::SessionService;
