// src/repositories/media_file_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::media_file::{MediaFileRecord, MediaInfo};
use crate::error::{AppError, AppResult};

pub trait MediaFileRepository: Send + Sync {
    fn save(&self, file: &MediaFileRecord) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<MediaFileRecord>>;
    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<MediaFileRecord>>;
}

pub struct SqliteMediaFileRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMediaFileRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_media_file(row: &Row) -> Result<MediaFileRecord, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let series_id = Uuid::parse_str(&row.get::<_, String>("series_id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let media_info: Option<MediaInfo> = match row.get::<_, Option<String>>("media_info")? {
            Some(raw) => Some(
                serde_json::from_str(&raw)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
            ),
            None => None,
        };

        let episode_ids: Vec<Uuid> =
            serde_json::from_str(&row.get::<_, String>("episode_ids")?)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let added = DateTime::parse_from_rfc3339(&row.get::<_, String>("added")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(MediaFileRecord {
            id,
            series_id,
            relative_path: row.get("relative_path")?,
            // The import-time absolute location is transient and never persisted
            path: None,
            size: row.get::<_, i64>("size")? as u64,
            media_info,
            episode_ids,
            added,
        })
    }
}

impl MediaFileRepository for SqliteMediaFileRepository {
    fn save(&self, file: &MediaFileRecord) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;

        let media_info_json = file
            .media_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let episode_ids_json = serde_json::to_string(&file.episode_ids)?;

        conn.execute(
            "INSERT OR REPLACE INTO media_files (
                id, series_id, relative_path, size, media_info, episode_ids, added
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                file.id.to_string(),
                file.series_id.to_string(),
                file.relative_path,
                file.size as i64,
                media_info_json,
                episode_ids_json,
                file.added.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<MediaFileRecord>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT * FROM media_files WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_media_file) {
            Ok(file) => Ok(Some(file)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<MediaFileRecord>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT * FROM media_files WHERE series_id = ?1")?;

        let files: Vec<MediaFileRecord> = stmt
            .query_map(params![series_id.to_string()], Self::row_to_media_file)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(files)
    }
}
