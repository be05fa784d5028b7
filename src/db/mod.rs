//! Database module: the append-only vote store.
//!
//! Layout:
//! - `actor.rs`: `DbActor` owning the SQLite pool, plus its cloneable handle
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)

pub mod actor;
pub mod models;
pub mod schema;

pub use models::{DbEditorCount, DbVote};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
