use std::path::Path;

use quiz_core::model::{QuizCatalog, QuizDraft};

use crate::error::CatalogError;

/// Parse a catalog from JSON: an array of quizzes in canonical order.
///
/// # Errors
///
/// Returns `CatalogError::Parse` for malformed JSON and `CatalogError::Invalid`
/// when a quiz fails validation.
pub fn parse_catalog(json: &str) -> Result<QuizCatalog, CatalogError> {
    let drafts: Vec<QuizDraft> = serde_json::from_str(json)?;
    Ok(QuizCatalog::from_drafts(drafts)?)
}

/// Read and parse a catalog file.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, otherwise as
/// [`parse_catalog`].
pub fn load_catalog(path: &Path) -> Result<QuizCatalog, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&json)?;
    tracing::info!(path = %path.display(), quizzes = catalog.len(), "loaded quiz catalog");
    Ok(catalog)
}
