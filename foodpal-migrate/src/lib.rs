mod conf;
mod cmd;
mod errors;
mod report;
pub mod db;
pub mod bootstrap;
pub mod checker;

pub use conf::{MigrateConf, DEFAULT_DATABASE, store_path_from_url};
pub use cmd::{MigrateCommand, NestedCommand, ApplyCommand, CheckCommand, InitCommand};
pub use errors::{MigrateError, MigrateResult};
pub use report::{ColumnOutcome, ColumnReport, MigrationReport, RunOutcome};
pub use checker::{TARGET_COLUMNS, check, migrate, run};
