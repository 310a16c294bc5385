//! Hosted-backend client for the two record collections.
//!
//! Speaks the PostgREST dialect, so hosted deployments can keep the
//! `questions` and `scores` tables behind a REST API. Slots behind the same
//! repository traits as the local backends, so the rest of the stack cannot
//! tell the difference.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use quiz_core::model::{LeaderboardEntry, Question};
use storage::repository::{
    QuestionRecord, QuestionRepository, ScoreRecord, ScoreRepository, ScoreRow, StorageError,
};

#[derive(Clone, Debug)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteStoreConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("QUIZ_API_KEY").unwrap_or_default();
        Some(Self { base_url, api_key })
    }
}

fn conn(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Deserialize)]
struct ImageUrlRow {
    image_url: Option<String>,
}

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    config: RemoteStoreConfig,
}

impl RemoteStore {
    #[must_use]
    pub fn new(config: RemoteStoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        RemoteStoreConfig::from_env().map(Self::new)
    }

    fn endpoint(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StorageError> {
        let response = self
            .client
            .get(self.endpoint(table))
            .query(query)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(conn)?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "{table} request failed with status {}",
                response.status()
            )));
        }

        response.json::<T>().await.map_err(ser)
    }
}

#[async_trait]
impl QuestionRepository for RemoteStore {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let record = QuestionRecord::from_question(question);
        let response = self
            .client
            .post(self.endpoint("questions"))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[record])
            .send()
            .await
            .map_err(conn)?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "question upsert failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let records: Vec<QuestionRecord> = self
            .fetch("questions", &[("select", "*"), ("order", "id.asc")])
            .await?;

        let mut questions = Vec::with_capacity(records.len());
        for record in records {
            questions.push(record.into_question().map_err(ser)?);
        }
        Ok(questions)
    }

    async fn image_urls(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<ImageUrlRow> = self
            .fetch(
                "questions",
                &[
                    ("select", "image_url"),
                    ("question_type", "neq.text"),
                    ("order", "id.asc"),
                ],
            )
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.image_url).collect())
    }
}

#[async_trait]
impl ScoreRepository for RemoteStore {
    async fn append_score(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError> {
        let record = ScoreRecord::from_entry(entry);
        let response = self
            .client
            .post(self.endpoint("scores"))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(conn)?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "score insert failed with status {}",
                response.status()
            )));
        }

        let mut inserted: Vec<ScoreRecord> = response.json().await.map_err(ser)?;
        let record = if inserted.is_empty() {
            return Err(StorageError::Serialization(
                "score insert returned no rows".into(),
            ));
        } else {
            inserted.swap_remove(0)
        };
        Ok(record.into_row()?.id)
    }

    async fn top_scores(&self, limit: u32) -> Result<Vec<ScoreRow>, StorageError> {
        let limit = limit.to_string();
        let records: Vec<ScoreRecord> = self
            .fetch(
                "scores",
                &[
                    ("select", "*"),
                    ("order", "score.desc,id.asc"),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(record.into_row()?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        let store = RemoteStore::new(RemoteStoreConfig {
            base_url: "https://example.supabase.co/".into(),
            api_key: "key".into(),
        });
        assert_eq!(
            store.endpoint("questions"),
            "https://example.supabase.co/rest/v1/questions"
        );
    }

    #[test]
    fn question_rows_decode_from_the_wire_shape() {
        let body = r#"[
            {
                "id": 3,
                "question_type": "image",
                "question_text": null,
                "image_url": "https://example.com/quiz/flag-jp.png",
                "correct_answer": "Japan",
                "option_b": "China",
                "option_c": "South Korea",
                "option_d": "Vietnam"
            }
        ]"#;

        let records: Vec<QuestionRecord> = serde_json::from_str(body).unwrap();
        let question = records.into_iter().next().unwrap().into_question().unwrap();
        assert_eq!(question.correct_answer(), "Japan");
        assert!(question.prompt().image_url().is_some());
    }

    #[test]
    fn score_rows_decode_with_their_ids() {
        let body = r#"[
            {
                "id": 12,
                "player_name": "Riley",
                "score": 170,
                "created_at": "2025-06-15T15:06:40Z"
            }
        ]"#;

        let records: Vec<ScoreRecord> = serde_json::from_str(body).unwrap();
        let row = records.into_iter().next().unwrap().into_row().unwrap();
        assert_eq!(row.id, 12);
        assert_eq!(row.entry.score(), 170);
        assert_eq!(row.entry.player_name().as_str(), "Riley");
    }
}
