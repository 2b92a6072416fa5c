//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::Weekday;
use clap::{Args, Parser, Subcommand};

/// PlayTime - terminal reports over a playtime store.
#[derive(Parser, Debug)]
#[command(name = "playtime")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the playtime SQLite store
    #[arg(long, env = "PLAYTIME_DB", default_value = "storage.db")]
    pub db: PathBuf,

    /// First day of a reporting week
    #[arg(long, env = "PLAYTIME_WEEK_START", default_value = "monday")]
    pub week_start: Weekday,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Per-day playtime of the current week
    Weekly(BackArg),

    /// Per-day playtime of the current month
    Monthly(BackArg),

    /// Per-month playtime of one game over the current year
    Yearly {
        /// Game identifier as stored in the database
        game_id: String,

        #[command(flatten)]
        back: BackArg,
    },

    /// Lifetime playtime per game
    Overall,
}

/// How many pages to step back from the current period.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct BackArg {
    #[arg(long, default_value_t = 0)]
    pub back: u32,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_yearly() {
        let cli = Cli::try_parse_from([
            "playtime",
            "--db",
            "/tmp/x.db",
            "--week-start",
            "sunday",
            "yearly",
            "7",
            "--back",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
        assert_eq!(cli.week_start, Weekday::Sun);
        match cli.command {
            Commands::Yearly { game_id, back } => {
                assert_eq!(game_id, "7");
                assert_eq!(back.back, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_week_start_rejects_garbage() {
        let result =
            Cli::try_parse_from(["playtime", "--week-start", "someday", "weekly"]);

        assert!(result.is_err());
    }
}
