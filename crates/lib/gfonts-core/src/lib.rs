//! Core services for gfonts-mcp.
//!
//! This crate owns the catalog readers and the icon collector, fetches the
//! upstream font catalog, rebuilds the relational store, and exposes the
//! control-plane queries used by the CLI and the tool server.

pub mod catalog;
pub mod control;
pub mod fetch;
pub mod layout;
pub mod store;
