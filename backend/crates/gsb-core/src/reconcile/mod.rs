pub mod applied;
pub mod directory_snapshot;
pub mod engine_command;
pub mod reconciliation_engine;
