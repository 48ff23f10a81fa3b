// src/services/reconciliation.rs
//
// Three-way set reconciliation between the files currently on disk under a
// series root and the companion records previously persisted for it:
//
//   files_on_disk       = disk \ recorded   (candidates for import)
//   previously_imported = records whose backing path is still on disk
//   orphans             = records whose backing path is gone → deleted here
//
// Generic over the companion-file kind: any record/store pair implementing
// the two traits below reuses the algorithm unchanged.

use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::companion::CompanionFileRecord;
use crate::domain::series::Series;
use crate::error::AppResult;
use crate::repositories::CompanionFileRepository;

/// A persisted record the filter can reconcile
pub trait ReconcilableRecord {
    fn record_id(&self) -> Uuid;

    /// Stored path, relative to the owning series root
    fn stored_relative_path(&self) -> &str;
}

/// The store the filter reads records from and deletes orphans through
pub trait ReconcilableStore<R>: Send + Sync {
    fn records_for_series(&self, series_id: Uuid) -> AppResult<Vec<R>>;
    fn delete_records(&self, ids: &[Uuid]) -> AppResult<()>;
}

/// Result of one reconciliation pass
#[derive(Debug)]
pub struct ReconciliationOutcome<R> {
    /// Disk paths with no persisted record and not already claimed by an
    /// earlier importer in this run
    pub files_on_disk: Vec<PathBuf>,

    /// Persisted records whose backing path still exists on disk, kept
    /// as-is and not re-processed
    pub previously_imported: Vec<R>,
}

/// Run the three-way diff and delete orphaned records in the same call.
pub fn filter_and_clean<R, S>(
    store: &S,
    series: &Series,
    files_on_disk: &[PathBuf],
    already_imported: &[PathBuf],
) -> AppResult<ReconciliationOutcome<R>>
where
    R: ReconcilableRecord,
    S: ReconcilableStore<R> + ?Sized,
{
    let records = store.records_for_series(series.id)?;

    let disk_set: HashSet<&PathBuf> = files_on_disk.iter().collect();
    let imported_set: HashSet<&PathBuf> = already_imported.iter().collect();

    let mut recorded_paths: HashSet<PathBuf> = HashSet::new();
    let mut previously_imported = Vec::new();
    let mut orphans = Vec::new();

    for record in records {
        let absolute = series.absolute_path_of(record.stored_relative_path());
        if disk_set.contains(&absolute) {
            recorded_paths.insert(absolute);
            previously_imported.push(record);
        } else {
            orphans.push(record.record_id());
        }
    }

    if !orphans.is_empty() {
        log::debug!(
            "Deleting {} orphaned companion records for series {}",
            orphans.len(),
            series.id
        );
        store.delete_records(&orphans)?;
    }

    let files_on_disk = files_on_disk
        .iter()
        .filter(|path| !recorded_paths.contains(*path) && !imported_set.contains(path))
        .cloned()
        .collect();

    Ok(ReconciliationOutcome {
        files_on_disk,
        previously_imported,
    })
}

impl ReconcilableRecord for CompanionFileRecord {
    fn record_id(&self) -> Uuid {
        self.id
    }

    fn stored_relative_path(&self) -> &str {
        &self.relative_path
    }
}

impl<T> ReconcilableStore<CompanionFileRecord> for T
where
    T: CompanionFileRepository + ?Sized,
{
    fn records_for_series(&self, series_id: Uuid) -> AppResult<Vec<CompanionFileRecord>> {
        self.list_by_series(series_id)
    }

    fn delete_records(&self, ids: &[Uuid]) -> AppResult<()> {
        self.delete_many(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// A record kind with nothing to do with subtitles, proving the filter
    /// is reusable beyond its companion-file specialization.
    #[derive(Debug, Clone, PartialEq)]
    struct ArtworkRecord {
        id: Uuid,
        relative_path: String,
    }

    impl ReconcilableRecord for ArtworkRecord {
        fn record_id(&self) -> Uuid {
            self.id
        }
        fn stored_relative_path(&self) -> &str {
            &self.relative_path
        }
    }

    struct InMemoryStore {
        records: Mutex<Vec<ArtworkRecord>>,
    }

    impl InMemoryStore {
        fn with(records: Vec<ArtworkRecord>) -> Self {
            Self {
                records: Mutex::new(records),
            }
        }

        fn remaining(&self) -> Vec<ArtworkRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl ReconcilableStore<ArtworkRecord> for InMemoryStore {
        fn records_for_series(&self, _series_id: Uuid) -> AppResult<Vec<ArtworkRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        fn delete_records(&self, ids: &[Uuid]) -> AppResult<()> {
            self.records
                .lock()
                .unwrap()
                .retain(|r| !ids.contains(&r.id));
            Ok(())
        }
    }

    fn series() -> Series {
        Series::new("Show".to_string(), PathBuf::from("/library/Show"))
    }

    fn record(rel: &str) -> ArtworkRecord {
        ArtworkRecord {
            id: Uuid::new_v4(),
            relative_path: rel.to_string(),
        }
    }

    #[test]
    fn test_unrecorded_disk_files_become_candidates() {
        let series = series();
        let store = InMemoryStore::with(vec![]);
        let on_disk = vec![
            series.path.join("Season 01/a.srt"),
            series.path.join("Season 01/b.srt"),
        ];

        let outcome = filter_and_clean(&store, &series, &on_disk, &[]).unwrap();

        assert_eq!(outcome.files_on_disk, on_disk);
        assert!(outcome.previously_imported.is_empty());
    }

    #[test]
    fn test_recorded_files_still_on_disk_are_previously_imported() {
        let series = series();
        let kept = record("Season 01/a.srt");
        let store = InMemoryStore::with(vec![kept.clone()]);
        let on_disk = vec![series.path.join("Season 01/a.srt")];

        let outcome = filter_and_clean(&store, &series, &on_disk, &[]).unwrap();

        assert!(outcome.files_on_disk.is_empty());
        assert_eq!(outcome.previously_imported, vec![kept.clone()]);
        // Record survives the cleanup
        assert_eq!(store.remaining(), vec![kept]);
    }

    #[test]
    fn test_orphaned_records_are_deleted() {
        let series = series();
        let gone = record("Season 01/deleted.srt");
        let kept = record("Season 01/a.srt");
        let store = InMemoryStore::with(vec![gone, kept.clone()]);
        let on_disk = vec![series.path.join("Season 01/a.srt")];

        let outcome = filter_and_clean(&store, &series, &on_disk, &[]).unwrap();

        assert_eq!(outcome.previously_imported, vec![kept.clone()]);
        assert_eq!(store.remaining(), vec![kept]);
    }

    #[test]
    fn test_already_imported_paths_are_not_candidates() {
        let series = series();
        let store = InMemoryStore::with(vec![]);
        let claimed = series.path.join("Season 01/claimed.srt");
        let fresh = series.path.join("Season 01/fresh.srt");
        let on_disk = vec![claimed.clone(), fresh.clone()];

        let outcome = filter_and_clean(&store, &series, &on_disk, &[claimed]).unwrap();

        assert_eq!(outcome.files_on_disk, vec![fresh]);
    }

    #[test]
    fn test_set_identities_hold() {
        // files_on_disk = D \ paths(P); previously_imported = {r : path(r) ∈ D};
        // every record with path ∉ D is deleted.
        let series = series();
        let r1 = record("Season 01/one.srt");
        let r2 = record("Season 01/two.srt");
        let r3 = record("Season 02/three.srt");
        let store = InMemoryStore::with(vec![r1.clone(), r2.clone(), r3]);

        let on_disk = vec![
            series.path.join("Season 01/one.srt"),
            series.path.join("Season 01/two.srt"),
            series.path.join("Season 02/new.srt"),
        ];

        let outcome = filter_and_clean(&store, &series, &on_disk, &[]).unwrap();

        assert_eq!(
            outcome.files_on_disk,
            vec![series.path.join("Season 02/new.srt")]
        );
        assert_eq!(outcome.previously_imported, vec![r1.clone(), r2.clone()]);
        assert_eq!(store.remaining(), vec![r1, r2]);
    }
}
