//! `agro` executable: API server plus a few operator commands.

mod cli;

use agro_api::AppState;
use agro_core::repo::report_repo::SqliteReportRepository;
use agro_core::{
    init_logging, open_db, validate_document, AgroConfig, DashboardService, LoggingOptions,
};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use log::info;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AgroConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Dashboard => {
            dashboard(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckDocument { value } => Ok(check_document(&value, &config)),
        Command::Version => {
            println!("agro {}", agro_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn start_logging(config: &AgroConfig, echo_warnings: bool) -> Result<()> {
    let log_dir = config.log_dir()?;
    init_logging(LoggingOptions {
        level: &config.logging.level,
        log_dir: &log_dir,
        echo_warnings,
    })?;
    Ok(())
}

async fn serve(config: AgroConfig) -> Result<()> {
    start_logging(&config, true)?;
    let addr = config.bind_addr()?;
    let conn = open_db(&config.database.path).with_context(|| {
        format!("failed to open database `{}`", config.database.path.display())
    })?;
    info!(
        "event=serve module=cli status=start db_path={}",
        config.database.path.display()
    );
    agro_api::serve(AppState::new(conn, &config), addr).await?;
    Ok(())
}

fn dashboard(config: &AgroConfig) -> Result<()> {
    start_logging(config, false)?;
    let conn = open_db(&config.database.path).with_context(|| {
        format!("failed to open database `{}`", config.database.path.display())
    })?;
    let snapshot = DashboardService::new(SqliteReportRepository::try_new(&conn)?).snapshot()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn check_document(value: &str, config: &AgroConfig) -> ExitCode {
    let check = validate_document(Some(value), config.documents);
    let report = serde_json::json!({
        "normalized": check.normalized,
        "kind": check.kind,
        "valid": check.valid,
    });
    println!("{report}");
    if check.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
