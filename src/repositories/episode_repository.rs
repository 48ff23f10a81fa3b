// src/repositories/episode_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::episode::Episode;
use crate::error::{AppError, AppResult};

pub trait EpisodeRepository: Send + Sync {
    fn save(&self, episode: &Episode) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Episode>>;
    fn find_by_number(
        &self,
        series_id: Uuid,
        season_number: u32,
        episode_number: u32,
    ) -> AppResult<Option<Episode>>;
    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<Episode>>;
    fn list_by_media_file(&self, media_file_id: Uuid) -> AppResult<Vec<Episode>>;
}

pub struct SqliteEpisodeRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteEpisodeRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_episode(row: &Row) -> Result<Episode, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let series_id = Uuid::parse_str(&row.get::<_, String>("series_id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let media_file_id = match row.get::<_, Option<String>>("media_file_id")? {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
            ),
            None => None,
        };

        let added = DateTime::parse_from_rfc3339(&row.get::<_, String>("added")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Episode {
            id,
            series_id,
            season_number: row.get::<_, i64>("season_number")? as u32,
            episode_number: row.get::<_, i64>("episode_number")? as u32,
            media_file_id,
            added,
        })
    }
}

impl EpisodeRepository for SqliteEpisodeRepository {
    fn save(&self, episode: &Episode) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;

        conn.execute(
            "INSERT OR REPLACE INTO episodes (
                id, series_id, season_number, episode_number, media_file_id, added
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                episode.id.to_string(),
                episode.series_id.to_string(),
                episode.season_number as i64,
                episode.episode_number as i64,
                episode.media_file_id.map(|id| id.to_string()),
                episode.added.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Episode>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT * FROM episodes WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_episode) {
            Ok(episode) => Ok(Some(episode)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn find_by_number(
        &self,
        series_id: Uuid,
        season_number: u32,
        episode_number: u32,
    ) -> AppResult<Option<Episode>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT * FROM episodes
             WHERE series_id = ?1 AND season_number = ?2 AND episode_number = ?3",
        )?;

        match stmt.query_row(
            params![
                series_id.to_string(),
                season_number as i64,
                episode_number as i64
            ],
            Self::row_to_episode,
        ) {
            Ok(episode) => Ok(Some(episode)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_series(&self, series_id: Uuid) -> AppResult<Vec<Episode>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT * FROM episodes WHERE series_id = ?1
             ORDER BY season_number, episode_number",
        )?;

        let episodes: Vec<Episode> = stmt
            .query_map(params![series_id.to_string()], Self::row_to_episode)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(episodes)
    }

    fn list_by_media_file(&self, media_file_id: Uuid) -> AppResult<Vec<Episode>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT * FROM episodes WHERE media_file_id = ?1
             ORDER BY season_number, episode_number",
        )?;

        let episodes: Vec<Episode> = stmt
            .query_map(params![media_file_id.to_string()], Self::row_to_episode)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(episodes)
    }
}
