//! Command-line surface of the `agro` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// agro - farm and crop records backend
#[derive(Debug, Parser)]
#[command(name = "agro")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./agro.toml)
    #[arg(short, long, global = true, value_name = "FILE", env = "AGRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding `database.path`
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the REST API
    Serve {
        /// Listen address, overriding `server.bind`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Print the dashboard snapshot as JSON
    Dashboard,

    /// Check a CPF or CNPJ and print the normalized digits
    CheckDocument {
        /// Document number, with or without punctuation
        value: String,
    },

    /// Print the core library version
    Version,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::parse_from([
            "agro",
            "--database",
            "/tmp/agro.sqlite3",
            "serve",
            "--bind",
            "0.0.0.0:9000",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/agro.sqlite3")));
        assert!(matches!(
            cli.command,
            Command::Serve { bind: Some(ref addr) } if addr == "0.0.0.0:9000"
        ));
    }

    #[test]
    fn check_document_takes_positional_value() {
        let cli = Cli::parse_from(["agro", "check-document", "951.810.400-04"]);
        assert!(matches!(
            cli.command,
            Command::CheckDocument { ref value } if value == "951.810.400-04"
        ));
    }
}
