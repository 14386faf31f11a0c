//! Store interfaces and `SQLite` implementation.
//!
//! The store layer handles persistence of fonts, variants, tags, icons and
//! their associations, and the filtered read queries over them.

pub mod sqlite;

pub use sqlite::{
    CatalogWriter,
    FontFilter,
    IconFilter,
    InsertOutcome,
    SqliteFontStore,
    StoreError,
    StoreResult,
};
