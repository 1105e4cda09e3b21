use argh::FromArgs;

use crate::bootstrap;
use crate::checker::{self, TARGET_COLUMNS};
use crate::conf::MigrateConf;
use crate::report::RunOutcome;

#[derive(FromArgs, PartialEq, Eq, Debug, Clone)]
/// Add the must-use ingredient columns to an existing FoodPal store
pub struct MigrateCommand {
    #[argh(subcommand)]
    pub nested: Option<NestedCommand>,

    #[argh(switch, short = 'v', long = "verbose")]
    /// enable verbose output
    pub verbose: bool,

    #[argh(switch, long = "json")]
    /// print the outcome as JSON after the status lines
    pub json: bool,

    #[argh(option, long = "database")]
    /// path to the store, overrides DATABASE_URL
    pub database: Option<String>,
}


#[derive(FromArgs, PartialEq, Eq, Debug, Clone)]
#[argh(subcommand)]
pub enum NestedCommand {
    Migrate(ApplyCommand),
    Check(CheckCommand),
    Init(InitCommand),
}

#[derive(FromArgs, PartialEq, Eq, Debug, Clone)]
#[argh(subcommand, name = "migrate")]
/// Add missing columns (the default)
pub struct ApplyCommand {}

#[derive(FromArgs, PartialEq, Eq, Debug, Clone)]
#[argh(subcommand, name = "check")]
/// List missing columns without altering the store
pub struct CheckCommand {}

#[derive(FromArgs, PartialEq, Eq, Debug, Clone)]
#[argh(subcommand, name = "init")]
/// Create a missing store with the current schema
pub struct InitCommand {}


impl MigrateCommand {
    /// Fold command line overrides into the configuration.
    pub fn configure(&self, mut conf: MigrateConf) -> MigrateConf {
        if let Some(database) = &self.database {
            conf.database = database.clone();
        }
        conf
    }

    pub async fn execute(&self, conf: &MigrateConf) -> RunOutcome {
        let path = conf.database_path();
        match self.nested {
            None | Some(NestedCommand::Migrate(_)) => checker::run(&path, TARGET_COLUMNS).await,
            Some(NestedCommand::Check(_)) => match checker::check(&path, TARGET_COLUMNS).await {
                Ok(alterations) => {
                    if alterations.is_empty() {
                        println!("✅ All columns present in {}", path.display());
                    }
                    for alteration in &alterations {
                        println!("Missing {}.{}: {}", alteration.table, alteration.column, alteration);
                    }
                    RunOutcome::Pending {
                        store: path,
                        alterations,
                    }
                }
                Err(e) => checker::failed(e),
            },
            Some(NestedCommand::Init(_)) => match bootstrap::init_store(&path).await {
                Ok(created) => {
                    if created {
                        println!("✅ Created {} with the current schema", path.display());
                    } else {
                        println!("{} already exists, run `migrate` to update it", path.display());
                    }
                    RunOutcome::Initialized {
                        store: path,
                        created,
                    }
                }
                Err(e) => checker::failed(e),
            },
        }
    }
}
