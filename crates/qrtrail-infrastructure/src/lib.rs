pub mod config_service;
pub mod json_history_repository;
pub mod local_account_verifier;
pub mod memory_history_repository;
pub mod paths;
pub mod storage;
pub mod token_repository;

pub use crate::config_service::ConfigService;
pub use crate::json_history_repository::JsonHistoryRepository;
pub use crate::local_account_verifier::LocalAccountVerifier;
pub use crate::memory_history_repository::InMemoryHistoryRepository;
pub use crate::paths::QrtrailPaths;
pub use crate::token_repository::{FileTokenRepository, InMemoryTokenRepository};
