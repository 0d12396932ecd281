//! PostgreSQL implementation of CatalogReader.
//!
//! The catalog is read-only from this service's side.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{Module, Series, Video, VideoSummary};
use crate::domain::foundation::{DomainError, ErrorCode, ModuleId, SeriesId, VideoId};
use crate::ports::CatalogReader;

/// PostgreSQL catalog reader.
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: i64,
    title: String,
    playback_ref: String,
    is_premium: bool,
    price_id: Option<String>,
    series: Option<String>,
    module: Option<String>,
}

impl TryFrom<VideoRow> for Video {
    type Error = DomainError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        Ok(Video {
            id: VideoId::parse_positive(row.id).map_err(corrupt_row)?,
            title: row.title,
            playback_ref: row.playback_ref,
            is_premium: row.is_premium,
            price_id: row.price_id,
            series: row.series,
            module: row.module,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    playback_ref: String,
    is_premium: bool,
}

impl TryFrom<SummaryRow> for VideoSummary {
    type Error = DomainError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(VideoSummary {
            id: VideoId::parse_positive(row.id).map_err(corrupt_row)?,
            title: row.title,
            playback_ref: row.playback_ref,
            is_premium: row.is_premium,
        })
    }
}

/// Shared shape of `series` and `modules` rows.
#[derive(Debug, sqlx::FromRow)]
struct GroupingRow {
    id: i64,
    name: String,
    price_id: Option<String>,
}

impl TryFrom<GroupingRow> for Series {
    type Error = DomainError;

    fn try_from(row: GroupingRow) -> Result<Self, Self::Error> {
        Ok(Series {
            id: SeriesId::parse_positive(row.id).map_err(corrupt_row)?,
            name: row.name,
            price_id: row.price_id,
        })
    }
}

impl TryFrom<GroupingRow> for Module {
    type Error = DomainError;

    fn try_from(row: GroupingRow) -> Result<Self, Self::Error> {
        Ok(Module {
            id: ModuleId::parse_positive(row.id).map_err(corrupt_row)?,
            name: row.name,
            price_id: row.price_id,
        })
    }
}

fn corrupt_row(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Corrupt catalog row: {}", err))
}

fn query_failed(what: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", what, err))
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, DomainError> {
        let row: Option<VideoRow> = sqlx::query_as(
            r#"
            SELECT id, title, playback_ref, is_premium, price_id, series, module
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("fetch video", e))?;

        row.map(Video::try_from).transpose()
    }

    async fn get_series_by_name(&self, name: &str) -> Result<Option<Series>, DomainError> {
        let row: Option<GroupingRow> =
            sqlx::query_as("SELECT id, name, price_id FROM series WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| query_failed("fetch series", e))?;

        row.map(Series::try_from).transpose()
    }

    async fn get_module_by_name(&self, name: &str) -> Result<Option<Module>, DomainError> {
        let row: Option<GroupingRow> =
            sqlx::query_as("SELECT id, name, price_id FROM modules WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| query_failed("fetch module", e))?;

        row.map(Module::try_from).transpose()
    }

    async fn list_videos(&self) -> Result<Vec<VideoSummary>, DomainError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            "SELECT id, title, playback_ref, is_premium FROM videos ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list videos", e))?;

        rows.into_iter().map(VideoSummary::try_from).collect()
    }
}
