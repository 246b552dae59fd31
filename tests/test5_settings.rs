mod common;
use crate::common::BrokenStore;

use rusty_golf_rounds::db::Database;
use rusty_golf_rounds::settings::{
    DistanceUnit, SETTINGS_KEY, Settings, load_settings, save_settings,
};
use rusty_golf_rounds::storage::{KeyValueStore, MemoryStore, SqliteKvStore};

#[tokio::test]
async fn test5_defaults_when_nothing_stored() {
    let store = MemoryStore::new();
    let settings = load_settings(&store).await;
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.distance_unit, DistanceUnit::Yards);
    assert!(!settings.show_shot_tracking);
}

#[tokio::test]
async fn test5_save_then_load() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let store = SqliteKvStore::new(&db);
    let settings = Settings {
        show_shot_tracking: true,
        distance_unit: DistanceUnit::Meters,
        default_course: Some("Royal Birkdale".to_string()),
    };

    save_settings(&store, &settings).await?;
    assert_eq!(load_settings(&store).await, settings);

    let raw = store.get_item(SETTINGS_KEY).await?.unwrap_or_default();
    let stored: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(stored["distanceUnit"], "meters");
    Ok(())
}

#[tokio::test]
async fn test5_corrupt_or_partial_values() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::new();

    store.set_item(SETTINGS_KEY, "{ definitely not json").await?;
    assert_eq!(load_settings(&store).await, Settings::default());

    store
        .set_item(SETTINGS_KEY, r#"{"showShotTracking": true}"#)
        .await?;
    let settings = load_settings(&store).await;
    assert!(settings.show_shot_tracking);
    assert_eq!(settings.distance_unit, DistanceUnit::Yards);
    Ok(())
}

#[tokio::test]
async fn test5_unreadable_store() {
    assert_eq!(load_settings(&BrokenStore).await, Settings::default());
    assert!(save_settings(&BrokenStore, &Settings::default()).await.is_err());
}
