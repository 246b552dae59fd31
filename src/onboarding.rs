//! First-run flag. Storage failures never block the app: reads fall back to
//! "not completed" and writes are best effort.

use crate::storage::KeyValueStore;

pub const ONBOARDING_KEY: &str = "onboarding_completed";
const COMPLETED: &str = "true";

pub async fn check_onboarding_completed(store: &dyn KeyValueStore) -> bool {
    match store.get_item(ONBOARDING_KEY).await {
        Ok(value) => value.as_deref() == Some(COMPLETED),
        Err(e) => {
            tracing::warn!(error = %e, "could not read onboarding status");
            false
        }
    }
}

pub async fn mark_onboarding_complete(store: &dyn KeyValueStore) {
    if let Err(e) = store.set_item(ONBOARDING_KEY, COMPLETED).await {
        tracing::warn!(error = %e, "could not save onboarding status");
    }
}

pub async fn reset_onboarding(store: &dyn KeyValueStore) {
    if let Err(e) = store.remove_item(ONBOARDING_KEY).await {
        tracing::warn!(error = %e, "could not reset onboarding status");
    }
}
