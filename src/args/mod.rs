pub mod validation;

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::settings::DistanceUnit;

#[must_use]
pub fn args_checks() -> Args {
    Args::parse()
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Track golf rounds, holes and tournaments.", long_about = None)]
pub struct Args {
    /// The sqlite file holding rounds, settings and onboarding state.
    #[arg(
        short = 'n',
        long,
        value_name = "DATABASE_PATH",
        default_value = "rounds.sqlite"
    )]
    pub db_path: PathBuf,
    /// Default log filter, e.g. `info` or `rusty_golf_rounds=debug`. `RUST_LOG` wins if set.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a hole record from a json file.
    ValidateHole {
        #[arg(value_name = "JSON_FILE", value_parser = validation::check_readable_file_and_json)]
        input: Value,
    },
    /// Check a full round record from a json file.
    ValidateRound {
        #[arg(value_name = "JSON_FILE", value_parser = validation::check_readable_file_and_json)]
        input: Value,
    },
    /// Start a round: course name, date and optional tournament.
    CreateRound {
        #[arg(value_name = "JSON_FILE", value_parser = validation::check_readable_file_and_json)]
        input: Value,
    },
    /// Replace a stored round with a full 18-hole record.
    SaveRound {
        id: i64,
        #[arg(value_name = "JSON_FILE", value_parser = validation::check_readable_file_and_json)]
        input: Value,
    },
    /// Record a single hole of a round in progress.
    UpdateHole {
        id: i64,
        #[arg(value_name = "JSON_FILE", value_parser = validation::check_readable_file_and_json)]
        input: Value,
    },
    FinishRound {
        id: i64,
    },
    ShowRound {
        id: i64,
    },
    ListRounds,
    /// Rounds grouped by tournament.
    Tournaments,
    DeleteRound {
        id: i64,
    },
    Onboarding {
        #[command(subcommand)]
        action: OnboardingAction,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum OnboardingAction {
    Check,
    Complete,
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        shot_tracking: Option<bool>,
        #[arg(long, value_enum)]
        distance_unit: Option<DistanceUnit>,
        #[arg(long, conflicts_with = "clear_default_course")]
        default_course: Option<String>,
        #[arg(long)]
        clear_default_course: bool,
    },
}
