use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::PlayerName;
use storage::repository::{ScoreRepository, ScoreRow};

use crate::error::SessionError;

/// Storage identifier for a persisted score.
///
/// NOTE: This is currently `i64` to match `SQLite` row IDs.
pub type ScoreId = i64;

/// Presentation-agnostic list item for a leaderboard row.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no rank column (the UI derives rank from list position)
///
/// The UI may format timestamps (e.g., relative time, locale) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardListItem {
    pub id: ScoreId,
    pub player_name: String,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

impl LeaderboardListItem {
    #[must_use]
    pub fn from_row(row: &ScoreRow) -> Self {
        Self {
            id: row.id,
            player_name: row.entry.player_name().as_str().to_string(),
            score: row.entry.score(),
            created_at: row.entry.created_at(),
        }
    }
}

/// Presentation-facing leaderboard facade that hides repositories and time
/// from the UI.
///
/// This service owns:
/// - the time source (`Clock`)
/// - repository access
///
/// It does **not** own UI formatting.
#[derive(Clone)]
pub struct LeaderboardService {
    clock: Clock,
    scores: Arc<dyn ScoreRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(clock: Clock, scores: Arc<dyn ScoreRepository>) -> Self {
        Self { clock, scores }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            clock,
            Arc::new(storage::repository::InMemoryRepository::new()),
        )
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Append one score, stamped with the service clock.
    ///
    /// A failure here is non-fatal to gameplay: the session that produced
    /// the score has already ended.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn submit_score(
        &self,
        player_name: &PlayerName,
        score: u32,
    ) -> Result<ScoreId, SessionError> {
        let entry = quiz_core::model::LeaderboardEntry::new(
            player_name.clone(),
            score,
            self.clock.now(),
        );
        Ok(self.scores.append_score(&entry).await?)
    }

    /// The top `limit` rows, best first; ties keep insertion order. An empty
    /// store yields an empty list (the UI renders its "no scores yet"
    /// placeholder).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn top_scores(
        &self,
        limit: u32,
    ) -> Result<Vec<LeaderboardListItem>, SessionError> {
        let rows = self.scores.top_scores(limit).await?;
        Ok(rows.iter().map(LeaderboardListItem::from_row).collect())
    }
}
