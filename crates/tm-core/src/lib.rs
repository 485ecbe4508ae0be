//! tm-core - Core library for Tidemark
//!
//! This crate provides the types shared by every Tidemark component:
//! migration identifiers, changelog entries, derived status items, and
//! configuration parsing for `tidemark.yml`.

pub mod changelog;
pub mod config;
pub mod error;
pub mod migration_id;
pub mod status;

pub use changelog::{ChangelogEntry, Method};
pub use config::{Config, ConfigValue, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use migration_id::MigrationId;
pub use status::{AppliedState, StatusItem};
