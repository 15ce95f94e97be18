/// Command line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "overview-admin", version, about = "Overview dashboard administration")]
pub struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a login account
    CreateUser {
        #[arg(long)]
        email: String,

        #[arg(long, env = "OVERVIEW_USER_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Write the reconciled snapshot as JSON
    Export {
        /// Output file; stdout when absent
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a snapshot file
    Import {
        file: PathBuf,

        /// Merge into the current data instead of replacing it
        #[arg(long)]
        merge: bool,
    },

    /// Convert legacy assignee names and report what changed
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_user() {
        let cli = Cli::try_parse_from([
            "overview-admin",
            "--database-url",
            "postgresql://localhost/overview",
            "create-user",
            "--email",
            "ana@example.com",
            "--password",
            "a long password",
        ])
        .unwrap();

        match cli.command {
            Command::CreateUser { email, name, .. } => {
                assert_eq!(email, "ana@example.com");
                assert!(name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_import_merge() {
        let cli = Cli::try_parse_from([
            "overview-admin",
            "--database-url",
            "postgresql://localhost/overview",
            "import",
            "backup.json",
            "--merge",
        ])
        .unwrap();

        match cli.command {
            Command::Import { file, merge } => {
                assert_eq!(file, PathBuf::from("backup.json"));
                assert!(merge);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
