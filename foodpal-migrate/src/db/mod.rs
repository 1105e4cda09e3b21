mod executor;
mod interfaces;
mod migrations;

pub use executor::{DbError, DbExecutor, OpenMode, open_memory, open_store};
pub use interfaces::{ColumnInfo, ColumnSpec, ColumnType, TableModel};
pub use migrations::{DiffError, PendingAlteration, SchemaDiff, plan};
