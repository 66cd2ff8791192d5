#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;
pub mod sqlite;

pub use repository::{InMemoryRepository, ResultRepository, Storage, StorageError};
pub use rest::{RestConfig, RestRepository};
pub use sqlite::{SqliteInitError, SqliteRepository};
