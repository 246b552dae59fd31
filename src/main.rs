use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rusty_golf_rounds::args::{self, Command, OnboardingAction, SettingsAction};
use rusty_golf_rounds::db::{Database, RoundRepository};
use rusty_golf_rounds::onboarding::{
    check_onboarding_completed, mark_onboarding_complete, reset_onboarding,
};
use rusty_golf_rounds::settings::{load_settings, save_settings};
use rusty_golf_rounds::storage::SqliteKvStore;
use rusty_golf_rounds::{
    RoundDeletionHub, RoundId, safe_validate_hole, safe_validate_round, validate_create_round,
    validate_hole, validate_round,
};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::args_checks();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid --log-level filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db = Database::open(&args.db_path)
        .with_context(|| format!("opening {}", args.db_path.display()))?;
    let hub = RoundDeletionHub::new();
    let _deleted_log = hub.subscribe(|id| tracing::info!(%id, "round removed"));
    let rounds = RoundRepository::new(db.clone(), hub);
    let kv = SqliteKvStore::new(&db);

    match args.command {
        Command::ValidateHole { input } => {
            let result = safe_validate_hole(&input);
            print_json(&result)?;
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Command::ValidateRound { input } => {
            let result = safe_validate_round(&input);
            print_json(&result)?;
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Command::CreateRound { input } => {
            let round = validate_create_round(&input)?;
            let id = rounds.create_round(&round).await?;
            print_json(&serde_json::json!({ "id": id }))?;
        }
        Command::SaveRound { id, input } => {
            let round = validate_round(&input)?;
            rounds.save_round(RoundId(id), &round).await?;
        }
        Command::UpdateHole { id, input } => {
            let hole = validate_hole(&input)?;
            let totals = rounds.update_hole(RoundId(id), &hole).await?;
            print_json(&totals)?;
        }
        Command::FinishRound { id } => {
            let totals = rounds.finish_round(RoundId(id)).await?;
            print_json(&totals)?;
        }
        Command::ShowRound { id } => match rounds.get_round(RoundId(id)).await? {
            Some(stored) => print_json(&stored)?,
            None => bail!("round {id} not found"),
        },
        Command::ListRounds => print_json(&rounds.list_rounds().await?)?,
        Command::Tournaments => print_json(&rounds.list_tournaments().await?)?,
        Command::DeleteRound { id } => {
            if !rounds.delete_round(RoundId(id)).await? {
                bail!("round {id} not found");
            }
        }
        Command::Onboarding { action } => match action {
            OnboardingAction::Check => {
                print_json(&serde_json::json!({
                    "completed": check_onboarding_completed(&kv).await
                }))?;
            }
            OnboardingAction::Complete => mark_onboarding_complete(&kv).await,
            OnboardingAction::Reset => reset_onboarding(&kv).await,
        },
        Command::Settings { action } => match action {
            SettingsAction::Show => print_json(&load_settings(&kv).await)?,
            SettingsAction::Set {
                shot_tracking,
                distance_unit,
                default_course,
                clear_default_course,
            } => {
                let mut settings = load_settings(&kv).await;
                if let Some(show) = shot_tracking {
                    settings.show_shot_tracking = show;
                }
                if let Some(unit) = distance_unit {
                    settings.distance_unit = unit;
                }
                if clear_default_course {
                    settings.default_course = None;
                } else if default_course.is_some() {
                    settings.default_course = default_course;
                }
                save_settings(&kv, &settings).await?;
                print_json(&settings)?;
            }
        },
    }

    Ok(())
}
