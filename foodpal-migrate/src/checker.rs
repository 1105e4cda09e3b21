use std::path::Path;

use sqlx::{Connection, SqliteConnection};

use crate::bootstrap;
use crate::db::{self, ColumnSpec, DbExecutor, OpenMode, PendingAlteration, TableModel};
use crate::errors::{MigrateError, MigrateResult};
use crate::report::{ColumnOutcome, ColumnReport, MigrationReport, RunOutcome};


/// Columns added for the "must use (expiring soon)" ingredients feature.
pub const TARGET_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("users", "must_use_ingredients", ""),
    ColumnSpec::text("meal_plans", "must_use_ingredients_snapshot", ""),
];


/// Check the store and add whichever target columns are missing.
///
/// Never fails: every fault is printed and returned as [`RunOutcome::Failed`].
/// A missing store is not opened at all.
pub async fn run(path: &Path, specs: &[ColumnSpec]) -> RunOutcome {
    println!("🔄 Starting database migration for must-use ingredients feature...");

    if !path.exists() {
        return match bootstrap::verify_fresh_schema(specs).await {
            Ok(()) => {
                println!("Database file not found. New tables will be created with the correct schema.");
                RunOutcome::StoreMissing {
                    store: path.to_path_buf(),
                }
            }
            Err(e) => failed(e),
        };
    }

    match migrate(path, specs).await {
        Ok(report) => {
            println!("\n🎉 Database migration completed successfully!");
            println!("You can now use the 'Must Use (Expiring Soon)' feature in FoodPal.");
            RunOutcome::Migrated(report)
        }
        Err(e) => failed(e),
    }
}

pub(crate) fn failed(e: MigrateError) -> RunOutcome {
    println!("❌ Migration failed: {}", e);
    tracing::error!(code = e.code(), "migration failed: {:?}", e);
    RunOutcome::Failed {
        code: e.code().to_string(),
        message: e.to_string(),
    }
}


/// Add each missing column in the order given, one committed step per column.
///
/// The store must already exist; it is never created here. A fault stops
/// the run and rolls back only the step it happened in: columns added by
/// earlier steps stay. The connection is closed on every path.
pub async fn migrate(path: &Path, specs: &[ColumnSpec]) -> MigrateResult<MigrationReport> {
    if !path.exists() {
        return Err(MigrateError::StoreNotFound(path.to_path_buf()));
    }

    let mut conn = db::open_store(path, OpenMode::ReadWrite).await?;
    let mut columns = Vec::with_capacity(specs.len());
    let mut result = Ok(());
    for spec in specs {
        match apply(&mut conn, spec).await {
            Ok(outcome) => columns.push(ColumnReport {
                table: spec.table.to_string(),
                column: spec.column.to_string(),
                outcome,
            }),
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }
    close(conn).await;

    result?;
    let report = MigrationReport {
        store: path.to_path_buf(),
        columns,
    };
    tracing::info!(store = %path.display(), added = report.added(), "migration committed");
    Ok(report)
}

async fn apply(conn: &mut SqliteConnection, spec: &ColumnSpec) -> MigrateResult<ColumnOutcome> {
    let mut tx = conn.begin().await?;
    let mut db = DbExecutor::new(&mut tx);

    let specs = std::slice::from_ref(spec);
    let tables = describe_targets(&mut db, specs).await?;
    let pending = db::plan(specs, &tables)?;

    let outcome = match pending.first() {
        Some(alteration) => {
            println!("Adding {} column to {} table...", spec.column, spec.table);
            db.execute(&alteration.to_sql()).await?;
            ColumnOutcome::Added
        }
        None => ColumnOutcome::AlreadyPresent,
    };

    // dropping an uncommitted transaction rolls it back
    tx.commit().await?;
    match outcome {
        ColumnOutcome::Added => println!("✅ Added {} to {} table", spec.column, spec.table),
        ColumnOutcome::AlreadyPresent => {
            println!("✅ {} column already exists in {} table", spec.column, spec.table)
        }
    }
    Ok(outcome)
}


/// List the alterations a migration would apply, without applying them.
pub async fn check(path: &Path, specs: &[ColumnSpec]) -> MigrateResult<Vec<PendingAlteration>> {
    if !path.exists() {
        return Err(MigrateError::StoreNotFound(path.to_path_buf()));
    }

    let mut conn = db::open_store(path, OpenMode::ReadOnly).await?;
    let result = pending(&mut conn, specs).await;
    close(conn).await;
    result
}

async fn pending(conn: &mut SqliteConnection, specs: &[ColumnSpec]) -> MigrateResult<Vec<PendingAlteration>> {
    let mut db = DbExecutor::new(conn);
    let tables = describe_targets(&mut db, specs).await?;
    Ok(db::plan(specs, &tables)?)
}


/// Introspect each table named by `specs` once, in the order given.
pub(crate) async fn describe_targets(db: &mut DbExecutor<'_>, specs: &[ColumnSpec]) -> MigrateResult<Vec<TableModel>> {
    let mut tables: Vec<TableModel> = Vec::new();
    for spec in specs {
        if tables.iter().any(|t| t.name == spec.table) {
            continue;
        }
        let table = db.describe_table(spec.table).await?;
        if !table.exists() {
            return Err(MigrateError::TableNotFound(spec.table.to_string()));
        }
        tables.push(table);
    }
    Ok(tables)
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("closing store failed: {}", e);
    }
}
