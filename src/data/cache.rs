use std::path::{Path, PathBuf};

use super::loader::{self, LoadOptions, LoadOutcome};

// ---------------------------------------------------------------------------
// DatasetCache – one disk read per data directory
// ---------------------------------------------------------------------------

/// Explicit memo of [`loader::load`], keyed by the data directory.
///
/// The dashboard re-renders every frame; the cache guarantees the file is
/// read once per key, not once per frame. Write-once read-many: the entry
/// only changes through [`DatasetCache::invalidate`] (the Refresh action) or
/// a key change.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    key: PathBuf,
    outcome: LoadOutcome,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `data_dir`, loading it on a miss.
    pub fn get_or_load(&mut self, data_dir: &Path, options: &LoadOptions) -> &LoadOutcome {
        let stale = match &self.entry {
            Some(entry) => entry.key != data_dir,
            None => true,
        };
        if stale {
            self.entry = Some(CacheEntry {
                key: data_dir.to_path_buf(),
                outcome: loader::load(data_dir, options),
            });
        }
        &self
            .entry
            .as_ref()
            .expect("entry populated above")
            .outcome
    }

    /// Drop the cached outcome; the next [`DatasetCache::get_or_load`] hits
    /// the disk again.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::CSV_FALLBACK_NAME;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn cached_outcome_survives_file_deletion_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join(CSV_FALLBACK_NAME);
        fs::write(&csv_path, "a,b\n1,2\n").unwrap();

        let options = LoadOptions::default();
        let mut cache = DatasetCache::new();

        assert_eq!(cache.get_or_load(dir.path(), &options).table.n_rows(), 1);

        // The source disappearing does not touch the cached table.
        fs::remove_file(&csv_path).unwrap();
        assert_eq!(cache.get_or_load(dir.path(), &options).table.n_rows(), 1);

        // An explicit invalidation re-reads the (now missing) file.
        cache.invalidate();
        assert!(cache.get_or_load(dir.path(), &options).table.is_empty());
    }

    #[test]
    fn key_change_reloads() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join(CSV_FALLBACK_NAME), "a\n1\n").unwrap();
        fs::write(second.path().join(CSV_FALLBACK_NAME), "a\n1\n2\n").unwrap();

        let options = LoadOptions::default();
        let mut cache = DatasetCache::new();

        assert_eq!(cache.get_or_load(first.path(), &options).table.n_rows(), 1);
        assert_eq!(cache.get_or_load(second.path(), &options).table.n_rows(), 2);
    }
}
