//! Infrastructure layer for Relay.
//!
//! File-backed history persistence, configuration loading, platform path
//! resolution, attachment loading, and export writing.

pub mod attachment;
pub mod config;
pub mod export_writer;
pub mod json_history_repository;
pub mod paths;
pub mod storage;

pub use attachment::load_attachment;
pub use config::RelayConfig;
pub use export_writer::write_export;
pub use json_history_repository::JsonHistoryRepository;
pub use paths::RelayPaths;
