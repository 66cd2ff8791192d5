use std::env;
use std::fmt;
use std::str::FromStr;

use storage::RestConfig;

use crate::error::StoreConfigError;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";

/// Which record store adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    Sqlite,
    #[default]
    Rest,
}

impl FromStr for StoreBackend {
    type Err = StoreConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "rest" | "supabase" => Ok(Self::Rest),
            other => Err(StoreConfigError::UnknownBackend(other.to_owned())),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Rest => "rest",
        })
    }
}

/// Everything needed to open the record store.
///
/// `rest` is `None` when the endpoint or key is missing. That is not an error
/// here: the store simply comes up unavailable.
#[derive(Clone, Debug)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub db_url: String,
    pub rest: Option<RestConfig>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            db_url: DEFAULT_DB_URL.into(),
            rest: None,
        }
    }
}

fn non_blank_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

impl StoreSettings {
    /// Read `QUIZ_STORE`, `QUIZ_DB_URL`, `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    /// (with `VITE_`-prefixed fallbacks).
    ///
    /// # Errors
    ///
    /// Returns `StoreConfigError::UnknownBackend` for an unrecognized `QUIZ_STORE`.
    pub fn from_env() -> Result<Self, StoreConfigError> {
        let backend = match non_blank_var(&["QUIZ_STORE"]) {
            Some(raw) => raw.parse()?,
            None => StoreBackend::default(),
        };
        let db_url = non_blank_var(&["QUIZ_DB_URL"]).unwrap_or_else(|| DEFAULT_DB_URL.into());

        Ok(Self {
            backend,
            db_url,
            rest: rest_from_env(),
        })
    }
}

/// Remote store settings, `None` unless both URL and key are set.
#[must_use]
pub fn rest_from_env() -> Option<RestConfig> {
    let url = non_blank_var(&["SUPABASE_URL", "VITE_SUPABASE_URL"])?;
    let key = non_blank_var(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"])?;
    Some(RestConfig::new(url, key))
}
