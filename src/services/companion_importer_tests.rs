// src/services/companion_importer_tests.rs
//
// End-to-end importer tests against a real SQLite store and a real series
// root on disk.

use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{create_connection_pool, get_connection, initialize_database, ConnectionPool};
use crate::domain::{Episode, MediaFileRecord, Series};
use crate::events::create_event_bus;
use crate::repositories::{
    CompanionFileRepository, EpisodeRepository, MediaFileRepository, SeriesRepository,
    SqliteCompanionFileRepository, SqliteEpisodeRepository, SqliteMediaFileRepository,
    SqliteSeriesRepository,
};
use crate::services::aggregation_service::CatalogAggregationService;
use crate::services::companion_importer::ExistingCompanionImporter;

struct Fixture {
    _dir: tempfile::TempDir,
    series: Series,
    companion_repo: Arc<SqliteCompanionFileRepository>,
    episode_repo: Arc<SqliteEpisodeRepository>,
    media_file_repo: Arc<SqliteMediaFileRepository>,
    importer: ExistingCompanionImporter,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();

    let pool: Arc<ConnectionPool> =
        Arc::new(create_connection_pool(&dir.path().join("vault.db")).unwrap());
    initialize_database(&get_connection(&pool).unwrap()).unwrap();

    let series_root = dir.path().join("Show");
    std::fs::create_dir_all(series_root.join("Season 01")).unwrap();
    let series = Series::new("Show".to_string(), series_root);
    SqliteSeriesRepository::new(Arc::clone(&pool))
        .save(&series)
        .unwrap();

    let companion_repo = Arc::new(SqliteCompanionFileRepository::new(Arc::clone(&pool)));
    let episode_repo = Arc::new(SqliteEpisodeRepository::new(Arc::clone(&pool)));
    let media_file_repo = Arc::new(SqliteMediaFileRepository::new(Arc::clone(&pool)));

    let importer = ExistingCompanionImporter::new(
        Arc::clone(&companion_repo) as Arc<dyn CompanionFileRepository>,
        Arc::clone(&media_file_repo) as Arc<dyn MediaFileRepository>,
        Arc::new(CatalogAggregationService::new(
            Arc::clone(&episode_repo) as Arc<dyn EpisodeRepository>
        )),
        Arc::new(create_event_bus()),
    );

    Fixture {
        _dir: dir,
        series,
        companion_repo,
        episode_repo,
        media_file_repo,
        importer,
    }
}

impl Fixture {
    /// Catalog one episode backed by one media file record.
    fn seed_episode(&self, season: u32, number: u32, media_relative: &str) -> (Episode, Uuid) {
        let mut media_file = MediaFileRecord::new(
            self.series.id,
            self.series.absolute_path_of(media_relative),
            1024,
        );
        media_file.relative_path = Some(media_relative.to_string());
        media_file.path = None;

        let episode =
            Episode::new(self.series.id, season, number).with_media_file(media_file.id);
        media_file.episode_ids = vec![episode.id];

        self.media_file_repo.save(&media_file).unwrap();
        self.episode_repo.save(&episode).unwrap();

        (episode, media_file.id)
    }

    fn touch(&self, relative: &str) -> PathBuf {
        let path = self.series.absolute_path_of(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"subtitle payload").unwrap();
        path
    }
}

#[test]
fn test_new_subtitle_is_imported() {
    // Scenario: disk has Show.S01E02.srt with no prior record; the parser
    // resolves S1E2 and the aggregator matches exactly one episode/file.
    let fx = fixture();
    let (_, media_file_id) = fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E02.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert_eq!(result.len(), 1);
    let record = &result[0];
    assert_eq!(record.season_number, 1);
    assert_eq!(record.media_file_id, media_file_id);
    assert_eq!(record.extension, ".srt");
    assert!(!record.copy);
    assert_eq!(record.relative_path, "Season 01/Show.S01E02.srt");

    let stored = fx.companion_repo.list_by_series(fx.series.id).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn test_reimport_is_idempotent() {
    // Scenario: the same path already has a matching record; a re-run
    // yields zero new records and the file surfaces as previously imported.
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E02.srt");

    let first = fx
        .importer
        .process_files(&fx.series, &[subtitle.clone()], &[])
        .unwrap();
    let first_id = first[0].id;

    let second = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, first_id);

    let stored = fx.companion_repo.list_by_series(fx.series.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, first_id);
}

#[test]
fn test_orphaned_record_is_deleted_on_reconcile() {
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E02.srt");

    fx.importer
        .process_files(&fx.series, &[subtitle.clone()], &[])
        .unwrap();

    // The subtitle disappears from disk; the next pass must drop its record.
    std::fs::remove_file(&subtitle).unwrap();
    let result = fx.importer.process_files(&fx.series, &[], &[]).unwrap();

    assert!(result.is_empty());
    assert!(fx
        .companion_repo
        .list_by_series(fx.series.id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_ambiguous_subtitle_is_skipped() {
    // A companion spanning episodes backed by two different media files
    // is never imported.
    let fx = fixture();
    fx.seed_episode(1, 1, "Season 01/Show.S01E01.mkv");
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E01E02.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert!(result.is_empty());
    assert!(fx
        .companion_repo
        .list_by_series(fx.series.id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_episode_without_media_file_is_skipped() {
    let fx = fixture();
    let episode = Episode::new(fx.series.id, 1, 2);
    fx.episode_repo.save(&episode).unwrap();
    let subtitle = fx.touch("Season 01/Show.S01E02.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert!(result.is_empty());
}

#[test]
fn test_copy_marker_in_title_sets_flag_and_strips_marker() {
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E02.!Director Cut.en.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert_eq!(result.len(), 1);
    let record = &result[0];
    assert!(record.copy);
    assert_eq!(record.title.as_deref(), Some("Director Cut"));
    assert_eq!(record.language, "en");
}

#[test]
fn test_unmarked_title_leaves_flag_unset() {
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Show.S01E02.Director Cut.en.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert_eq!(result.len(), 1);
    assert!(!result[0].copy);
    assert_eq!(result[0].title.as_deref(), Some("Director Cut"));
}

#[test]
fn test_unanchored_name_degrades_to_language_only() {
    // The subtitle's stem is not anchored on the media file's stem, so
    // title-aware parsing degrades: language and tags survive, no title.
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let subtitle = fx.touch("Season 01/Different.Name.S01E02.en.forced.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[subtitle], &[])
        .unwrap();

    assert_eq!(result.len(), 1);
    let record = &result[0];
    assert_eq!(record.language, "en");
    assert_eq!(record.language_tags, vec!["forced"]);
    assert_eq!(record.title, None);
}

#[test]
fn test_bad_files_do_not_abort_the_batch() {
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");

    let unparseable = fx.touch("Season 01/garbage.srt");
    let unmatched = fx.touch("Season 01/Show.S09E09.srt");
    let good = fx.touch("Season 01/Show.S01E02.srt");

    let result = fx
        .importer
        .process_files(&fx.series, &[unparseable, unmatched, good], &[])
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].relative_path, "Season 01/Show.S01E02.srt");
}

#[test]
fn test_unrecognized_extension_is_ignored() {
    let fx = fixture();
    fx.seed_episode(1, 2, "Season 01/Show.S01E02.mkv");
    let not_a_subtitle = fx.touch("Season 01/Show.S01E02.nfo");

    let result = fx
        .importer
        .process_files(&fx.series, &[not_a_subtitle], &[])
        .unwrap();

    assert!(result.is_empty());
}
