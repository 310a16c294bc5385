use quiz_core::model::LeaderboardEntry;

use super::{SqliteRepository, mapping};
use crate::repository::{ScoreRepository, ScoreRow, StorageError};

#[async_trait::async_trait]
impl ScoreRepository for SqliteRepository {
    async fn append_score(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO scores (player_name, score, created_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(entry.player_name().as_str())
        .bind(i64::from(entry.score()))
        .bind(entry.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn top_scores(&self, limit: u32) -> Result<Vec<ScoreRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, player_name, score, created_at
                FROM scores
                ORDER BY score DESC, id ASC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(mapping::map_score_row(&row)?);
        }
        Ok(out)
    }
}
