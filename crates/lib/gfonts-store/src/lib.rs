//! Storage models and schema helpers for gfonts-mcp.
//!
//! This crate defines the canonical data model shared by the catalog readers,
//! the database builder, the query layer, and the tool server.

pub mod catalog;
pub mod models;
pub mod schema;

pub use models::*;
