use std::path::PathBuf;

use thiserror::Error;

use crate::db::{DbError, DiffError};


/// A migration fault. Every variant is terminal for the run that raised it.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("store {} not found", .0.display())]
    StoreNotFound(PathBuf),

    #[error("table {0} does not exist in the store")]
    TableNotFound(String),

    #[error("fresh schema is missing column {column} on table {table}")]
    FreshSchemaIncomplete { table: String, column: String },

    #[error("improperly configured: {0}")]
    Config(String),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl MigrateError {
    pub const fn code(&self) -> &'static str {
        match self {
            MigrateError::StoreNotFound(_) => "store_not_found",
            MigrateError::TableNotFound(_) => "table_not_found",
            MigrateError::FreshSchemaIncomplete { .. } => "fresh_schema_incomplete",
            MigrateError::Config(_) => "improperly_configured",
            MigrateError::Diff(_) => "invalid_column_specs",
            MigrateError::Db(e) => e.code(),
        }
    }
}

impl From<sqlx::Error> for MigrateError {
    fn from(e: sqlx::Error) -> Self {
        MigrateError::Db(DbError::from(e))
    }
}

pub type MigrateResult<T> = Result<T, MigrateError>;
