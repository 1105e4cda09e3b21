use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use thiserror::Error;
use tracing;

use crate::db::interfaces::{ColumnInfo, TableModel};


#[derive(Debug, Error)]
pub enum DbError {
    #[error("cannot open store {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
    #[error("statement rejected: {message}")]
    Rejected {
        message: String,
        statement: Option<String>,
        #[source]
        source: sqlx::Error,
    },
    #[error("store is locked by another connection")]
    Busy(#[source] sqlx::Error),
    #[error("unhandled db error: {0}")]
    Fatal(sqlx::Error),
}

impl DbError {
    pub const fn code(&self) -> &'static str {
        match self {
            DbError::Open { .. } => "open_failed",
            DbError::Rejected { .. } => "statement_rejected",
            DbError::Busy(_) => "store_busy",
            DbError::Fatal(_) => "fatal_error",
        }
    }

    /// Attach the offending statement to a rejection.
    pub fn with_statement(self, sql: &str) -> Self {
        match self {
            DbError::Rejected { message, source, .. } => DbError::Rejected {
                message,
                statement: Some(sql.to_string()),
                source,
            },
            other => other,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // SQLITE_BUSY, SQLITE_LOCKED
                Some("5") | Some("6") => DbError::Busy(e),
                _ => DbError::Rejected {
                    message: db.message().to_string(),
                    statement: None,
                    source: e,
                },
            },
            _ => DbError::Fatal(e),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
    /// Read-write, creating the file when absent.
    Create,
}

/// Open a connection to the store file. Only `OpenMode::Create` may create it.
pub async fn open_store(path: &Path, mode: OpenMode) -> Result<SqliteConnection, DbError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(mode == OpenMode::Create)
        .read_only(mode == OpenMode::ReadOnly);

    tracing::debug!(path = %path.display(), ?mode, "opening store");
    SqliteConnection::connect_with(&options)
        .await
        .map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Private in-memory database, gone once the connection closes.
pub async fn open_memory() -> Result<SqliteConnection, DbError> {
    let options = SqliteConnectOptions::new().in_memory(true);
    SqliteConnection::connect_with(&options)
        .await
        .map_err(DbError::from)
}


const TABLE_INFO_SQL: &str =
    r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#;

/// Runs statements on a borrowed connection or transaction.
pub struct DbExecutor<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DbExecutor<'c> {

    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Execute a single statement, returning the number of rows affected.
    pub async fn execute(&mut self, sql: &str) -> Result<u64, DbError> {
        tracing::debug!(sql, "execute");
        let result = sqlx::query(sql)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| DbError::from(e).with_statement(sql))?;
        Ok(result.rows_affected())
    }

    /// Execute a script of `;`-separated statements.
    pub async fn execute_script(&mut self, sql: &str) -> Result<(), DbError> {
        sqlx::raw_sql(sql)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| DbError::from(e).with_statement(sql))?;
        Ok(())
    }

    /// Describe a table's columns. A missing table yields an empty model.
    pub async fn describe_table(&mut self, table: &str) -> Result<TableModel, DbError> {
        let columns = sqlx::query_as::<_, ColumnInfo>(TABLE_INFO_SQL)
            .bind(table)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(DbError::from)?;
        tracing::debug!(table, columns = columns.len(), "described table");
        Ok(TableModel {
            name: table.to_string(),
            columns,
        })
    }
}
