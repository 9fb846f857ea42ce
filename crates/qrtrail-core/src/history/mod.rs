//! History domain module.
//!
//! # Module Structure
//!
//! - `model`: `HistoryRecord` and its provenance tag
//! - `repository`: storage interface for the log
//! - `query`: filtering, ordering and pagination
//! - `seed`: synthetic first-run dataset

mod model;
mod query;
mod repository;
pub mod seed;

pub use model::{HistoryKind, HistoryRecord, NewHistoryEntry};
pub use query::{DateBounds, HistoryPage, HistoryQuery, paginate};
pub use repository::HistoryRepository;
