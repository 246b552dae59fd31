//! Round-deletion notifications.
//!
//! A [`RoundDeletionHub`] is created once by the application and cloned into whatever needs
//! it: the repository publishes through it after a delete commits, screens subscribe to
//! refresh their lists. Clones share one registry.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::model::RoundId;

pub type Listener = Arc<dyn Fn(RoundId) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // listeners never run under the lock, so a poisoned registry is still consistent
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct RoundDeletionHub {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for RoundDeletionHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundDeletionHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl RoundDeletionHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. Dropping the returned handle keeps the listener registered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(RoundId) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(listener))
    }

    /// Registers an already shared listener. Registering the same `Arc` twice creates two
    /// independent registrations, each fired and removed on its own.
    pub fn subscribe_shared(&self, listener: Listener) -> Subscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Calls every listener registered at the moment of the call, in registration order.
    /// A panicking listener stops the remaining ones.
    pub fn notify_round_deleted(&self, round_id: RoundId) {
        let snapshot: Vec<Listener> = lock(&self.registry)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(%round_id, listeners = snapshot.len(), "round deleted");
        for listener in snapshot {
            listener(round_id);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

/// Handle for one registration.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes this registration. Calling it again, or after the hub is gone, does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).entries.retain(|(id, _)| *id != self.id);
        }
    }
}
