use std::sync::Arc;

use storage::repository::Storage;
use tutor_core::model::{Catalog, CatalogDraft};

use crate::error::AppServicesError;
use crate::pacing::Pacing;
use crate::presentation::PresentationSink;
use crate::progress::ProgressStore;
use crate::tutor::Tutor;
use crate::Clock;

/// Assembles storage and catalog into ready-to-use tutor sessions.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    catalog: Arc<Catalog>,
    clock: Clock,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog is invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: CatalogDraft,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(catalog.validate()?);
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self {
            storage,
            catalog,
            clock,
        })
    }

    /// Build services over volatile in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the catalog is invalid.
    pub fn in_memory(catalog: CatalogDraft, clock: Clock) -> Result<Self, AppServicesError> {
        Ok(Self {
            storage: Storage::in_memory(),
            catalog: Arc::new(catalog.validate()?),
            clock,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Restore persisted progress into a fresh store.
    pub async fn progress_store(&self) -> ProgressStore {
        ProgressStore::open(
            Arc::clone(&self.catalog),
            Arc::clone(&self.storage.kv),
            self.clock,
        )
        .await
    }

    /// Restore progress and announce the current lesson on `sink`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Progress` if the announced pointer cannot be
    /// persisted.
    pub async fn start_tutor(
        &self,
        sink: Arc<dyn PresentationSink>,
        pacing: Pacing,
    ) -> Result<Tutor, AppServicesError> {
        let store = self.progress_store().await;
        let mut tutor = Tutor::new(store, sink, pacing);
        tutor.start().await?;
        Ok(tutor)
    }
}
