use tracing::{debug, warn};

use crate::error::Result;
use crate::progress::ProgressStore;
use crate::store::KeyValueStore;

/// Key under which the whole progress record is stored.
pub const PROGRESS_KEY: &str = "courseProgress";

/// Round-trips a `ProgressStore` through a key-value store under `PROGRESS_KEY`.
pub struct ProgressAdapter<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reads the saved progress. A missing key and unparseable data both yield
    /// an empty store; storage errors propagate.
    pub fn load(&self) -> Result<ProgressStore> {
        let Some(raw) = self.store.get(PROGRESS_KEY)? else {
            debug!("no saved progress, starting empty");
            return Ok(ProgressStore::default());
        };

        match serde_json::from_str::<ProgressStore>(&raw) {
            Ok(progress) => {
                debug!(
                    courses = progress.course_count(),
                    completed = progress.total_completed(),
                    "progress loaded"
                );
                Ok(progress)
            }
            Err(e) => {
                warn!(error = %e, "saved progress is unreadable, starting empty");
                Ok(ProgressStore::default())
            }
        }
    }

    /// Serializes the full store and overwrites the previous value.
    pub fn save(&mut self, progress: &ProgressStore) -> Result<()> {
        let raw = serde_json::to_string(progress)?;
        self.store.set(PROGRESS_KEY, &raw)
    }
}
