#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod record_store;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog::{load_catalog, parse_catalog};
pub use config::{StoreBackend, StoreSettings};
pub use dashboard::{Dashboard, DashboardColumn, DashboardRow, DashboardService, QuizCell};
pub use error::{AppServicesError, CatalogError, QuizServiceError, StoreConfigError, StoreError};
pub use record_store::RecordStore;
pub use sessions::{Advance, CompletedQuiz, PersistHandle, QuizService};
