use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

pub const SETTINGS_KEY: &str = "app_settings";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Yards,
    Meters,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_shot_tracking: bool,
    pub distance_unit: DistanceUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_course: Option<String>,
}

/// Stored settings, or the defaults when nothing usable is stored.
pub async fn load_settings(store: &dyn KeyValueStore) -> Settings {
    let raw = match store.get_item(SETTINGS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Settings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read settings, using defaults");
            return Settings::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "stored settings are unreadable, using defaults");
        Settings::default()
    })
}

/// # Errors
///
/// Will return `Err` if the store rejects the write.
pub async fn save_settings(
    store: &dyn KeyValueStore,
    settings: &Settings,
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(settings).map_err(|e| StorageError::new(e.to_string()))?;
    store.set_item(SETTINGS_KEY, &payload).await
}
