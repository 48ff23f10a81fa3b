// src/repositories/companion_file_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::companion::CompanionFileRecord;
use crate::error::AppResult;

pub trait CompanionFileRepository: Send + Sync {
    /// Upsert a batch atomically, keyed by (series_id, relative_path):
    /// a record imported at an already-known path replaces the old one.
    fn upsert_many(&self, files: &[CompanionFileRecord]) -> AppResult<()>;
    fn delete_many(&self, ids: &[Uuid]) -> AppResult<()>;
    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<CompanionFileRecord>>;
}

pub struct SqliteCompanionFileRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCompanionFileRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_companion_file(row: &Row) -> Result<CompanionFileRecord, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let series_id = Uuid::parse_str(&row.get::<_, String>("series_id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let media_file_id = Uuid::parse_str(&row.get::<_, String>("media_file_id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let language_tags: Vec<String> =
            serde_json::from_str(&row.get::<_, String>("language_tags")?)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let added = DateTime::parse_from_rfc3339(&row.get::<_, String>("added")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(CompanionFileRecord {
            id,
            series_id,
            media_file_id,
            season_number: row.get::<_, i64>("season_number")? as u32,
            relative_path: row.get("relative_path")?,
            language: row.get("language")?,
            language_tags,
            title: row.get("title")?,
            extension: row.get("extension")?,
            copy: row.get::<_, i64>("copy_flag")? == 1,
            added,
        })
    }
}

impl CompanionFileRepository for SqliteCompanionFileRepository {
    fn upsert_many(&self, files: &[CompanionFileRecord]) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        for file in files {
            let language_tags_json = serde_json::to_string(&file.language_tags)?;

            tx.execute(
                "INSERT OR REPLACE INTO companion_files (
                    id, series_id, media_file_id, season_number, relative_path,
                    language, language_tags, title, extension, copy_flag, added
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    file.id.to_string(),
                    file.series_id.to_string(),
                    file.media_file_id.to_string(),
                    file.season_number as i64,
                    &file.relative_path,
                    &file.language,
                    language_tags_json,
                    file.title,
                    &file.extension,
                    file.copy as i64,
                    file.added.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_many(&self, ids: &[Uuid]) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        for id in ids {
            tx.execute(
                "DELETE FROM companion_files WHERE id = ?1",
                params![id.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<CompanionFileRecord>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT * FROM companion_files WHERE series_id = ?1 ORDER BY relative_path",
        )?;

        let files: Vec<CompanionFileRecord> = stmt
            .query_map(params![series_id.to_string()], Self::row_to_companion_file)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(files)
    }
}
