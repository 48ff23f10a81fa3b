// src/repositories/series_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};

pub trait SeriesRepository: Send + Sync {
    fn save(&self, series: &Series) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>>;
    fn list_all(&self) -> AppResult<Vec<Series>>;
}

pub struct SqliteSeriesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSeriesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_series(row: &Row) -> Result<Series, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let added = DateTime::parse_from_rfc3339(&row.get::<_, String>("added")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Series {
            id,
            title: row.get("title")?,
            path: PathBuf::from(row.get::<_, String>("path")?),
            added,
        })
    }
}

impl SeriesRepository for SqliteSeriesRepository {
    fn save(&self, series: &Series) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;

        conn.execute(
            "INSERT OR REPLACE INTO series (id, title, path, added)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                series.id.to_string(),
                &series.title,
                series.path.to_string_lossy(),
                series.added.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT * FROM series WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_series) {
            Ok(series) => Ok(Some(series)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Series>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT * FROM series ORDER BY title")?;

        let series: Vec<Series> = stmt
            .query_map([], Self::row_to_series)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(series)
    }
}
