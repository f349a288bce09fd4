use std::sync::{Arc, Mutex, PoisonError};

use crate::reading::SensorReading;

/// Shared holder of the most recent sensor reading.
///
/// Single writer (the acquisition loop), many readers (display loop, web
/// layer). The lock is held only for the duration of the copy or replace;
/// callers never get an alias into the guarded value.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<Mutex<SensorReading>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, reading: SensorReading) {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = reading;
    }

    pub fn snapshot(&self) -> SensorReading {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::SensorStatus;

    #[test]
    fn starts_zeroed_with_starting_status() {
        let store = StateStore::new();
        let snapshot = store.snapshot();

        assert_eq!(snapshot, SensorReading::default());
        assert_eq!(snapshot.status, SensorStatus::Starting);
    }

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        let store = StateStore::new();

        let before = store.snapshot();

        let updated = SensorReading {
            pm2_5: 12.3,
            status: SensorStatus::Active,
            timestamp: Some("2026-08-29 12:00:00".to_string()),
            ..SensorReading::default()
        };
        store.update(updated.clone());

        // The earlier snapshot keeps its original values.
        assert_eq!(before, SensorReading::default());
        assert_eq!(store.snapshot(), updated);
    }

    #[test]
    fn mutating_a_snapshot_does_not_touch_the_store() {
        let store = StateStore::new();
        store.update(SensorReading {
            pm2_5: 7.0,
            ..SensorReading::default()
        });

        let mut snapshot = store.snapshot();
        snapshot.pm2_5 = 99.9;

        assert_eq!(store.snapshot().pm2_5, 7.0);
    }

    #[test]
    fn cloned_handles_share_the_same_store() {
        let store = StateStore::new();
        let other = store.clone();

        store.update(SensorReading {
            voc_index: 120.0,
            ..SensorReading::default()
        });

        assert_eq!(other.snapshot().voc_index, 120.0);
    }
}
