use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use thiserror::Error;

use crate::db::interfaces::{ColumnSpec, ColumnType, TableModel};


#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("column {column} on table {table} is specified twice")]
    DuplicateColumn { table: String, column: String },

    #[error("table {table} was not introspected")]
    TableNotLoaded { table: String },
}


/// One additive change that has not been applied yet.
/// Only built for a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAlteration {
    pub table: String,
    pub column: String,
    pub data_type: ColumnType,
    pub default: String,
}

impl PendingAlteration {
    pub fn to_sql(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {} DEFAULT {}",
            quote_ident(&self.table),
            quote_ident(&self.column),
            self.data_type,
            quote_literal(&self.default),
        )
    }

    pub fn targets(&self, spec: &ColumnSpec) -> bool {
        self.table == spec.table && self.column == spec.column
    }
}

impl fmt::Display for PendingAlteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}


/// Diffs the introspected schema (last state) against the wanted columns
/// (current state). Existing columns are never touched: columns only
/// present in the store are left alone and nothing is ever modified or
/// dropped, so the only patch kind is an addition.
/// Meant to be single-use only.
pub struct SchemaDiff<'s> {
    last_state: IndexMap<String, IndexSet<String>>,
    current_state: IndexMap<(&'s str, &'s str), &'s ColumnSpec>,
}

impl<'s> SchemaDiff<'s> {

    pub fn new() -> Self {
        Self {
            last_state: IndexMap::new(),
            current_state: IndexMap::new(),
        }
    }

    pub fn load_last_state(&mut self, tables: &[TableModel]) {
        for table in tables {
            self.last_state
                .insert(table.name.clone(), table.column_names());
        }
    }

    pub fn load_current_state(&mut self, specs: &'s [ColumnSpec]) -> Result<(), DiffError> {
        for spec in specs {
            let key = (spec.table, spec.column);
            if self.current_state.contains_key(&key) {
                return Err(DiffError::DuplicateColumn {
                    table: spec.table.to_string(),
                    column: spec.column.to_string(),
                });
            }
            self.current_state.insert(key, spec);
        }
        Ok(())
    }

    pub fn diff(&self) -> Result<Vec<PendingAlteration>, DiffError> {
        let mut pending = Vec::new();

        for ((table, column), spec) in self.current_state.iter() {
            let existing = self
                .last_state
                .get(*table)
                .ok_or_else(|| DiffError::TableNotLoaded {
                    table: table.to_string(),
                })?;

            if existing.contains(*column) {
                continue;
            }

            pending.push(PendingAlteration {
                table: table.to_string(),
                column: column.to_string(),
                data_type: spec.data_type,
                default: spec.default.to_string(),
            });
        }

        Ok(pending)
    }
}

/// Plan the alterations needed to bring `tables` up to `specs`.
pub fn plan(specs: &[ColumnSpec], tables: &[TableModel]) -> Result<Vec<PendingAlteration>, DiffError> {
    let mut engine = SchemaDiff::new();
    engine.load_last_state(tables);
    engine.load_current_state(specs)?;
    engine.diff()
}
