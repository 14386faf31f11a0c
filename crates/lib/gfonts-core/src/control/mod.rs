use std::{error::Error, fmt};

use tokio::task::JoinError;

use crate::catalog::CatalogError;
use crate::store::{SqliteFontStore, StoreError};

pub mod build;
pub mod query;

pub use build::{BuildInputs, DatabaseBuilder, LoadReport, StepReport};

#[derive(Debug)]
pub enum ControlError {
    Catalog(CatalogError),
    Store(StoreError),
    Task(JoinError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "blocking task failed: {err}"),
        }
    }
}

impl Error for ControlError {}

impl From<CatalogError> for ControlError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<JoinError> for ControlError {
    fn from(err: JoinError) -> Self {
        Self::Task(err)
    }
}

/// Async facade over the font store.
///
/// Store calls are synchronous, so each operation runs on the blocking pool
/// against the shared store handle.
#[derive(Debug, Clone)]
pub struct FontsControlPlane {
    store: SqliteFontStore,
}

impl FontsControlPlane {
    #[must_use]
    pub const fn new(store: SqliteFontStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &SqliteFontStore {
        &self.store
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T, ControlError>
    where
        F: FnOnce(&SqliteFontStore) -> Result<T, ControlError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store)).await?
    }
}
