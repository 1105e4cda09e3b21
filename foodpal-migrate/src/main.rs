use foodpal_migrate::{MigrateCommand, MigrateConf, RunOutcome};

fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_json(outcome: &RunOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("cannot serialize outcome: {}", e),
    }
}

// Failures are reported on stdout; the exit status is always success.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cmd: MigrateCommand = argh::from_env();

    let conf = match MigrateConf::from_env() {
        Ok(conf) => cmd.configure(conf),
        Err(e) => {
            println!("❌ Migration failed: {}", e);
            if cmd.json {
                print_json(&RunOutcome::Failed {
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
            }
            return;
        }
    };

    if conf.log_init {
        init_tracing(cmd.verbose);
    }
    tracing::debug!(database = %conf.database, "configuration loaded");

    let outcome = cmd.execute(&conf).await;
    if cmd.json {
        print_json(&outcome);
    }
}
