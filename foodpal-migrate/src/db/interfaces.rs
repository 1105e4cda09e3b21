use indexmap::IndexSet;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

/// SQLite storage classes a migrated column may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Blob,
}

/// A column that must exist on a table once the migration has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub table: &'static str,
    pub column: &'static str,
    pub data_type: ColumnType,
    /// Default value, rendered as a string literal in DDL.
    pub default: &'static str,
}

impl ColumnSpec {
    pub const fn text(table: &'static str, column: &'static str, default: &'static str) -> Self {
        Self {
            table,
            column,
            data_type: ColumnType::Text,
            default,
        }
    }
}


/// One row of `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub name: String,
    #[sqlx(rename = "type")]
    pub data_type: String,
    #[sqlx(rename = "notnull")]
    pub not_null: i64,
    /// Default expression as written in the DDL, e.g. `''` for an empty string.
    #[sqlx(rename = "dflt_value")]
    pub default: Option<String>,
    pub pk: i64,
}

impl ColumnInfo {
    pub fn is_nullable(&self) -> bool {
        self.not_null == 0
    }
}


/// Introspected view of a table. Read fresh on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModel {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableModel {
    /// SQLite reports an unknown table as one with no columns.
    pub fn exists(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> IndexSet<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}


#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn column(name: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: "TEXT".to_string(),
            not_null: 0,
            default: None,
            pk: 0,
        }
    }

    #[test]
    fn test_column_type_renders_uppercase() {
        assert_eq!(ColumnType::Text.to_string(), "TEXT");
        assert_eq!(ColumnType::Integer.as_ref(), "INTEGER");
    }

    #[test]
    fn test_column_type_parses_any_case() {
        assert_eq!(ColumnType::from_str("text").unwrap(), ColumnType::Text);
        assert_eq!(ColumnType::from_str("Blob").unwrap(), ColumnType::Blob);
        assert!(ColumnType::from_str("varchar").is_err());
    }

    // Names must come back in the order the table declares them
    #[test]
    fn test_column_names_preserve_order() {
        let table = TableModel {
            name: "users".to_string(),
            columns: vec![column("id"), column("email"), column("name")],
        };
        let names: Vec<_> = table.column_names().into_iter().collect();
        assert_eq!(names, vec!["id", "email", "name"]);
    }

    #[test]
    fn test_empty_table_does_not_exist() {
        let table = TableModel {
            name: "ghost".to_string(),
            columns: vec![],
        };
        assert!(!table.exists());
        assert!(!table.has_column("id"));
    }

    #[test]
    fn test_nullable_follows_notnull_flag() {
        let mut info = column("id");
        assert!(info.is_nullable());
        info.not_null = 1;
        assert!(!info.is_nullable());
    }
}
