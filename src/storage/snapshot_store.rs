use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::tracker::entities::{PartialSnapshot, Snapshot};

use super::kv_store::KeyValueStore;

/// Key the whole tracker state is stored under.
pub const STORAGE_KEY: &str = "raidCalculatorData";

/// Persists a [Snapshot] as a single json value in a [KeyValueStore].
pub struct SnapshotStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Returns the stored snapshot, or the defaults if nothing usable is stored. Fields missing
    /// from the stored value fall back to their defaults one by one.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Result<Snapshot> {
        let Some(raw) = self.store.get(&self.key).await? else {
            info!("Nothing stored yet, starting from defaults");
            return Ok(Snapshot::default_snapshot());
        };
        Ok(parse_snapshot(&raw))
    }

    #[instrument(skip_all, fields(key = %self.key))]
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &raw).await?;
        debug!("Saved snapshot");
        Ok(())
    }

    /// Forgets the stored snapshot. There is no way back.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn reset(&self) -> Result<Snapshot> {
        self.store.remove(&self.key).await?;
        info!("Stored snapshot removed");
        Ok(Snapshot::default_snapshot())
    }
}

fn parse_snapshot(raw: &str) -> Snapshot {
    let parsed = match serde_json::from_str::<PartialSnapshot>(raw) {
        Ok(v) => v,
        Err(e) => {
            // Broken payloads are treated like a missing one.
            warn!("Stored snapshot can't be parsed, using defaults: {e}");
            return Snapshot::default_snapshot();
        }
    };
    let defaults = Snapshot::default_snapshot();
    Snapshot {
        characters: parsed.characters.unwrap_or(defaults.characters),
        activities: parsed.raids.unwrap_or(defaults.activities),
        selections: parsed.selections.unwrap_or(defaults.selections),
    }
    .normalized()
}
