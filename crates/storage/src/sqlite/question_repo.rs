use quiz_core::model::Question;

use super::{SqliteRepository, mapping};
use crate::repository::{QuestionRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let record = QuestionRecord::from_question(question);

        sqlx::query(
            r"
            INSERT INTO questions (
                id, question_type, question_text, image_url,
                correct_answer, option_b, option_c, option_d
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                question_type = excluded.question_type,
                question_text = excluded.question_text,
                image_url = excluded.image_url,
                correct_answer = excluded.correct_answer,
                option_b = excluded.option_b,
                option_c = excluded.option_c,
                option_d = excluded.option_d
            ",
        )
        .bind(mapping::id_i64("question_id", record.id.value())?)
        .bind(record.question_type)
        .bind(record.question_text)
        .bind(record.image_url)
        .bind(record.correct_answer)
        .bind(record.option_b)
        .bind(record.option_c)
        .bind(record.option_d)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                id, question_type, question_text, image_url,
                correct_answer, option_b, option_c, option_d
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(mapping::map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn image_urls(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT image_url
            FROM questions
            WHERE question_type != 'text' AND image_url IS NOT NULL
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut urls = Vec::with_capacity(rows.len());
        for row in rows {
            let url: String = sqlx::Row::try_get(&row, "image_url").map_err(mapping::ser)?;
            urls.push(url);
        }
        Ok(urls)
    }
}
