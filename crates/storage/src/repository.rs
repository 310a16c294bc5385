use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{
    LeaderboardEntry, PlayerName, Question, QuestionError, QuestionId, QuestionKind,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a question.
///
/// This mirrors the domain `Question` as one flat record (the four answer
/// columns plus one prompt column per type) so repositories and wire
/// clients can serialize without leaking storage concerns into the domain
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question_type: String,
    pub question_text: Option<String>,
    pub image_url: Option<String>,
    pub correct_answer: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let [_, b, c, d] = question.options();
        Self {
            id: question.id(),
            question_type: question.kind().as_str().to_string(),
            question_text: question.prompt().text().map(str::to_string),
            image_url: question
                .prompt()
                .image_url()
                .map(|u| u.as_str().to_string()),
            correct_answer: question.correct_answer().to_string(),
            option_b: b.to_string(),
            option_c: c.to_string(),
            option_d: d.to_string(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// Unknown type strings are treated as image questions, matching the
    /// pool partition rule.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt column for the declared type is
    /// missing or any answer column is blank.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let kind = QuestionKind::classify(&self.question_type);
        Question::from_persisted(
            self.id,
            kind,
            self.question_text,
            self.image_url,
            self.correct_answer,
            [self.option_b, self.option_c, self.option_d],
        )
    }
}

/// Persisted shape for a leaderboard score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub player_name: String,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    #[must_use]
    pub fn from_entry(entry: &LeaderboardEntry) -> Self {
        Self {
            id: None,
            player_name: entry.player_name().as_str().to_string(),
            score: entry.score(),
            created_at: entry.created_at(),
        }
    }

    /// Convert the record into a ranked row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the row id is missing or the
    /// persisted player name fails validation.
    pub fn into_row(self) -> Result<ScoreRow, StorageError> {
        let id = self
            .id
            .ok_or_else(|| StorageError::Serialization("score row has no id".into()))?;
        let name = PlayerName::new(self.player_name)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(ScoreRow::new(
            id,
            LeaderboardEntry::new(name, self.score, self.created_at),
        ))
    }
}

/// A leaderboard entry together with its storage row id.
///
/// The row id doubles as the tie-breaker: rows are appended in insertion
/// order and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub id: i64,
    pub entry: LeaderboardEntry,
}

impl ScoreRow {
    #[must_use]
    pub fn new(id: i64, entry: LeaderboardEntry) -> Self {
        Self { id, entry }
    }
}

/// Repository contract for the question corpus.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Fetch the full corpus in stable (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Image URLs of the corpus, for presentation-layer preloading.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn image_urls(&self) -> Result<Vec<String>, StorageError>;
}

/// Repository contract for the append-only score log.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Append one leaderboard entry and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_score(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError>;

    /// The top `limit` rows, descending by score, ties broken by insertion
    /// order (earliest first). An empty store yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn top_scores(&self, limit: u32) -> Result<Vec<ScoreRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    scores: Arc<Mutex<Vec<ScoreRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(Vec::new())),
            scores: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|q| q.id() == question.id()) {
            Some(existing) => *existing = question.clone(),
            None => guard.push(question.clone()),
        }
        Ok(())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn image_urls(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter_map(|q| q.prompt().image_url())
            .map(|u| u.as_str().to_string())
            .collect())
    }
}

#[async_trait]
impl ScoreRepository for InMemoryRepository {
    async fn append_score(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len() + 1)
            .map_err(|_| StorageError::Serialization("score id overflow".into()))?;
        guard.push(ScoreRow::new(id, entry.clone()));
        Ok(id)
    }

    async fn top_scores(&self, limit: u32) -> Result<Vec<ScoreRow>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.clone();
        // Stable sort keeps insertion order within equal scores.
        rows.sort_by(|a, b| b.entry.score().cmp(&a.entry.score()));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates the two record collections behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub scores: Arc<dyn ScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let scores: Arc<dyn ScoreRepository> = Arc::new(repo);
        Self { questions, scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn build_question(id: u64) -> Question {
        Question::text(
            QuestionId::new(id),
            format!("Question {id}"),
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap()
    }

    fn build_entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(PlayerName::new(name).unwrap(), score, fixed_now())
    }

    #[tokio::test]
    async fn upsert_replaces_in_place_and_keeps_order() {
        let repo = InMemoryRepository::new();
        repo.upsert_question(&build_question(1)).await.unwrap();
        repo.upsert_question(&build_question(2)).await.unwrap();

        let replacement = Question::text(
            QuestionId::new(1),
            "Rewritten",
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap();
        repo.upsert_question(&replacement).await.unwrap();

        let all = repo.all_questions().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].prompt().text(), Some("Rewritten"));
        assert_eq!(all[1].id(), QuestionId::new(2));
    }

    #[tokio::test]
    async fn image_urls_skips_text_questions() {
        let repo = InMemoryRepository::new();
        repo.upsert_question(&build_question(1)).await.unwrap();
        let image = Question::image(
            QuestionId::new(2),
            "https://example.com/q2.png",
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap();
        repo.upsert_question(&image).await.unwrap();

        let urls = repo.image_urls().await.unwrap();
        assert_eq!(urls, vec!["https://example.com/q2.png".to_string()]);
    }

    #[tokio::test]
    async fn top_scores_orders_desc_with_insertion_tie_break() {
        let repo = InMemoryRepository::new();
        repo.append_score(&build_entry("A", 50)).await.unwrap();
        repo.append_score(&build_entry("B", 80)).await.unwrap();
        repo.append_score(&build_entry("C", 80)).await.unwrap();

        let top = repo.top_scores(3).await.unwrap();
        let names: Vec<&str> = top
            .iter()
            .map(|r| r.entry.player_name().as_str())
            .collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn top_scores_on_empty_store_is_empty() {
        let repo = InMemoryRepository::new();
        assert!(repo.top_scores(5).await.unwrap().is_empty());
    }

    #[test]
    fn question_record_round_trips() {
        let question = Question::image(
            QuestionId::new(7),
            "https://example.com/q7.png",
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap();
        let record = QuestionRecord::from_question(&question);
        assert_eq!(record.question_type, "image");
        assert!(record.question_text.is_none());

        let back = record.into_question().unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn score_record_requires_id_for_row() {
        let record = ScoreRecord::from_entry(&build_entry("A", 10));
        assert!(record.into_row().is_err());
    }
}
