//! Schema of a newly created FoodPal store.
//!
//! A missing store is reported as "will be created" rather than migrated, so
//! the schema it will be created with must already carry every target column.
//! [`verify_fresh_schema`] checks that instead of assuming it.

use std::path::Path;

use sqlx::Connection;

use crate::checker;
use crate::db::{self, ColumnSpec, DbExecutor, OpenMode};
use crate::errors::{MigrateError, MigrateResult};


pub const FRESH_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL PRIMARY KEY,
    email VARCHAR NOT NULL,
    hashed_password VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    liked_foods TEXT DEFAULT '',
    disliked_foods TEXT DEFAULT '',
    must_use_ingredients TEXT DEFAULT '',
    created_at DATETIME,
    is_active BOOLEAN DEFAULT 1
);

CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email);

CREATE TABLE IF NOT EXISTS meal_plans (
    id INTEGER NOT NULL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id),
    name VARCHAR DEFAULT 'Meal Plan',
    serving_size INTEGER DEFAULT 4,
    recipe_count INTEGER DEFAULT 5,
    recipes_json TEXT NOT NULL,
    shopping_list_json TEXT NOT NULL,
    liked_foods_snapshot TEXT DEFAULT '',
    disliked_foods_snapshot TEXT DEFAULT '',
    must_use_ingredients_snapshot TEXT DEFAULT '',
    created_at DATETIME,
    rating INTEGER,
    notes TEXT DEFAULT ''
);
"#;


/// Build [`FRESH_SCHEMA`] in memory and check that planning against it
/// yields no alterations.
pub async fn verify_fresh_schema(specs: &[ColumnSpec]) -> MigrateResult<()> {
    let mut conn = db::open_memory().await?;
    let result = check_fresh_schema(&mut conn, specs).await;
    if let Err(e) = conn.close().await {
        tracing::warn!("closing in-memory store failed: {}", e);
    }
    result
}

async fn check_fresh_schema(
    conn: &mut sqlx::SqliteConnection,
    specs: &[ColumnSpec],
) -> MigrateResult<()> {
    let mut db = DbExecutor::new(conn);
    db.execute_script(FRESH_SCHEMA).await?;

    let tables = match checker::describe_targets(&mut db, specs).await {
        Ok(tables) => tables,
        Err(MigrateError::TableNotFound(table)) => {
            let column = specs
                .iter()
                .find(|s| s.table == table)
                .map(|s| s.column.to_string())
                .unwrap_or_default();
            return Err(MigrateError::FreshSchemaIncomplete { table, column });
        }
        Err(e) => return Err(e),
    };

    let pending = db::plan(specs, &tables)?;
    if let Some(missing) = pending.into_iter().next() {
        return Err(MigrateError::FreshSchemaIncomplete {
            table: missing.table,
            column: missing.column,
        });
    }
    tracing::debug!(specs = specs.len(), "fresh schema carries every target column");
    Ok(())
}


/// Create the store with [`FRESH_SCHEMA`]. Returns `false` and leaves the
/// file untouched when it already exists.
pub async fn init_store(path: &Path) -> MigrateResult<bool> {
    if path.exists() {
        tracing::info!(path = %path.display(), "store already exists, not initializing");
        return Ok(false);
    }

    let mut conn = db::open_store(path, OpenMode::Create).await?;
    let result = DbExecutor::new(&mut conn).execute_script(FRESH_SCHEMA).await;
    if let Err(e) = conn.close().await {
        tracing::warn!("closing store failed: {}", e);
    }
    result?;
    tracing::info!(path = %path.display(), "store initialized");
    Ok(true)
}
