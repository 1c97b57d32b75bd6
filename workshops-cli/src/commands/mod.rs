//! CLI command implementations

pub mod db;
pub mod serve;

pub use db::DbCommand;
pub use serve::ServeCommand;
