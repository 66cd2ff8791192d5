use std::path::Path;
use std::sync::Arc;

use quiz_core::model::QuizCatalog;

use crate::Clock;
use crate::catalog::load_catalog;
use crate::config::StoreSettings;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::record_store::RecordStore;
use crate::sessions::QuizService;

/// Assembles app-facing services around one catalog and one record store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuizCatalog>,
    store: RecordStore,
    quizzes: Arc<QuizService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    #[must_use]
    pub fn new(catalog: QuizCatalog, store: RecordStore) -> Self {
        let catalog = Arc::new(catalog);
        let quizzes = Arc::new(QuizService::new(Arc::clone(&catalog), store.clone()));
        let dashboard = Arc::new(DashboardService::new(Arc::clone(&catalog), store.clone()));
        Self {
            catalog,
            store,
            quizzes,
            dashboard,
        }
    }

    /// Load the catalog file and open the configured record store.
    ///
    /// An unreachable or unconfigured store does not fail startup; check
    /// [`RecordStore::is_available`] on [`AppServices::store`].
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the catalog cannot be loaded.
    pub async fn open(
        catalog_path: &Path,
        settings: &StoreSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let catalog = load_catalog(catalog_path)?;
        let store = RecordStore::connect(settings, clock).await;
        tracing::info!(
            backend = %settings.backend,
            available = store.is_available(),
            "record store ready"
        );
        Ok(Self::new(catalog, store))
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
