use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Check recreation.gov campgrounds for open campsites.
#[derive(Parser)]
#[command(
    name = "campsite_checker",
    version,
    about = "Check recreation.gov campgrounds for open campsites"
)]
pub struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run every configured task and write a status report.
    Check(CheckArgs),
    /// List the distinct campsite types of every configured asset.
    SiteTypes,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Where to write the JSON status report.
    #[arg(short, long, default_value = "status.json")]
    pub status: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["campsite_checker", "check"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(!cli.verbose);
        match cli.command {
            Command::Check(args) => assert_eq!(args.status, PathBuf::from("status.json")),
            Command::SiteTypes => panic!("expected check"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["campsite_checker", "site-types", "-v", "--config", "tasks.toml"])
                .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("tasks.toml"));
        assert!(matches!(cli.command, Command::SiteTypes));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["campsite_checker"]).is_err());
    }
}
