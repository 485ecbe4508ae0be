//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the `Database` trait, the handle every migration
//! action receives, and its DuckDB implementation. The changelog lives in a
//! table of the same database and is reached through the trait.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
