use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{MigrateError, MigrateResult};


pub const DEFAULT_DATABASE: &str = "foodpal.db";


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MigrateConf {
    /// Store path, relative to the working directory unless absolute.
    pub database: String,

    pub log_init: bool,
}

impl Default for MigrateConf {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            log_init: true,
        }
    }
}

impl MigrateConf {
    pub fn from_env() -> MigrateResult<Self> {
        dotenvy::dotenv().ok();

        #[cfg(test)]
        {
            dotenvy::from_filename_override(".env.test").ok();
        }

        #[cfg(all(debug_assertions, not(test)))]
        {
            dotenvy::from_filename_override(".env.dev").ok();
        }

        #[cfg(not(any(debug_assertions, test)))]
        {
            dotenvy::from_filename_override(".env.prod").ok();
        }

        let database = match std::env::var("DATABASE_URL") {
            Ok(url) => store_path_from_url(&url)?,
            Err(_) => DEFAULT_DATABASE.to_string(),
        };
        let log_init = std::env::var("FOODPAL_LOG_INIT")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            database,
            log_init,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database)
    }
}


/// Resolve a SQLite URL (`sqlite:///./foodpal.db`, `sqlite://foodpal.db`,
/// `sqlite:foodpal.db`) or a bare path to a filesystem path.
pub fn store_path_from_url(url: &str) -> MigrateResult<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(MigrateError::Config("DATABASE_URL is empty".to_string()));
    }

    let path = match url.strip_prefix("sqlite:") {
        Some(rest) => {
            // sqlite:/// keeps one slash for absolute paths: sqlite:////abs.db
            let rest = rest.strip_prefix("///").or_else(|| rest.strip_prefix("//")).unwrap_or(rest);
            rest.split('?').next().unwrap_or_default()
        }
        None if url.contains("://") => {
            return Err(MigrateError::Config(format!(
                "DATABASE_URL must point at a SQLite store, got {}",
                url
            )));
        }
        None => url,
    };

    if path.is_empty() || path == ":memory:" {
        return Err(MigrateError::Config(format!(
            "DATABASE_URL does not name a store file: {}",
            url
        )));
    }
    Ok(path.to_string())
}
