use sqlx::Row;

use quiz_core::model::{LeaderboardEntry, PlayerName, Question, QuestionId, QuestionKind};

use crate::repository::{ScoreRow, StorageError};

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(super) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    u64::try_from(v)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid question id: {v}")))
}

pub(super) fn score_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid score: {v}")))
}

pub(super) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let question_type: String = row.try_get("question_type").map_err(ser)?;
    let question_text: Option<String> = row.try_get("question_text").map_err(ser)?;
    let image_url: Option<String> = row.try_get("image_url").map_err(ser)?;
    let correct_answer: String = row.try_get("correct_answer").map_err(ser)?;
    let option_b: String = row.try_get("option_b").map_err(ser)?;
    let option_c: String = row.try_get("option_c").map_err(ser)?;
    let option_d: String = row.try_get("option_d").map_err(ser)?;

    Question::from_persisted(
        id,
        QuestionKind::classify(&question_type),
        question_text,
        image_url,
        correct_answer,
        [option_b, option_c, option_d],
    )
    .map_err(ser)
}

pub(super) fn map_score_row(row: &sqlx::sqlite::SqliteRow) -> Result<ScoreRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let player_name: String = row.try_get("player_name").map_err(ser)?;
    let score = score_from_i64(row.try_get::<i64, _>("score").map_err(ser)?)?;
    let created_at = row.try_get("created_at").map_err(ser)?;

    let name = PlayerName::new(player_name).map_err(ser)?;
    Ok(ScoreRow::new(
        id,
        LeaderboardEntry::new(name, score, created_at),
    ))
}
