use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info, warn};

use aacdb_core::{
    bootstrap::{self, config::warn_insecure_defaults, Bootstrapper},
    logging,
    provisioner::MongoProvisioner,
};

#[derive(Parser, Debug)]
#[command(name = "aacdb")]
#[command(about = "Idempotent bootstrap for the shelter outcomes database", long_about = None)]
struct Args {
    /// Config file (YAML/TOML); environment variables override it
    #[arg(long, global = true, env = "AACDB_CONFIG_PATH")]
    config: Option<String>,

    /// Exit non-zero when any bootstrap step fails
    #[arg(long, global = true, env = "AACDB_STRICT")]
    strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    /// Create the application user, collection and indexes (default)
    #[default]
    Init,
    /// Report which objects already exist without changing anything
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 1. Parse arguments and load configuration
    let args = Args::parse();
    let config = bootstrap::load_config(args.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    warn_insecure_defaults(&config);

    // 3. Connect; this is the only fatal step
    let client = bootstrap::connect(&config).await.map_err(|e| {
        error!("Cannot bootstrap without a database connection");
        e
    })?;
    let provisioner = MongoProvisioner::new(client);
    let plan = config.bootstrap.plan();

    // 4. Run the requested command
    match args.command.unwrap_or_default() {
        Command::Init => {
            info!("Bootstrapping {}", plan.collection.namespace());
            let report = Bootstrapper::new(plan).run(&provisioner).await;

            if report.is_clean() {
                info!("Database initialization completed successfully");
                Ok(ExitCode::SUCCESS)
            } else if args.strict {
                error!(
                    "Database initialization finished with {} failed step(s)",
                    report.failures().count()
                );
                Ok(ExitCode::FAILURE)
            } else {
                warn!(
                    "Database initialization finished with {} failed step(s); see errors above",
                    report.failures().count()
                );
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Check => {
            let inspection = bootstrap::inspect(&provisioner, &plan).await?;
            if inspection.is_complete() {
                info!("Database is fully provisioned");
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("Database is not fully provisioned; run `aacdb init`");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
