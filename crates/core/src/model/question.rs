use thiserror::Error;
use url::Url;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question image url is not valid: {raw}")]
    InvalidImageUrl { raw: String },

    #[error("answer option cannot be empty")]
    EmptyOption,

    #[error("persisted question has no prompt matching its type")]
    MissingPrompt,
}

//
// ─── QUESTION KIND & PROMPT ────────────────────────────────────────────────────
//

/// The two prompt families a question can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Text,
    Image,
}

impl QuestionKind {
    /// Stable string form used by storage and wire formats.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::Image => "image",
        }
    }

    /// Classify a persisted type string.
    ///
    /// Anything other than `"text"` counts as an image question, matching the
    /// pool partition rule.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if raw == "text" {
            QuestionKind::Text
        } else {
            QuestionKind::Image
        }
    }
}

/// What the player is shown: either prompt text or an image to identify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionPrompt {
    Text(String),
    Image(Url),
}

impl QuestionPrompt {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionPrompt::Text(_) => QuestionKind::Text,
            QuestionPrompt::Image(_) => QuestionKind::Image,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            QuestionPrompt::Text(t) => Some(t),
            QuestionPrompt::Image(_) => None,
        }
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        match self {
            QuestionPrompt::Text(_) => None,
            QuestionPrompt::Image(u) => Some(u),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with one correct answer and three distractors.
///
/// The four candidate strings are `correct_answer` plus the distractors.
/// Duplicate option text is a pool-data defect and is not rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: QuestionPrompt,
    correct_answer: String,
    distractors: [String; 3],
}

fn validated_option(raw: impl Into<String>) -> Result<String, QuestionError> {
    let s = raw.into();
    if s.trim().is_empty() {
        return Err(QuestionError::EmptyOption);
    }
    Ok(s)
}

impl Question {
    /// Create a text question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt text is blank, or
    /// `QuestionError::EmptyOption` if any answer string is blank.
    pub fn text(
        id: QuestionId,
        question_text: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: [&str; 3],
    ) -> Result<Self, QuestionError> {
        let text = question_text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        Self::with_prompt(id, QuestionPrompt::Text(text), correct_answer, distractors)
    }

    /// Create an image question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidImageUrl` if the URL does not parse, or
    /// `QuestionError::EmptyOption` if any answer string is blank.
    pub fn image(
        id: QuestionId,
        image_url: impl AsRef<str>,
        correct_answer: impl Into<String>,
        distractors: [&str; 3],
    ) -> Result<Self, QuestionError> {
        let raw = image_url.as_ref().trim();
        if raw.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let url = Url::parse(raw).map_err(|_| QuestionError::InvalidImageUrl {
            raw: raw.to_string(),
        })?;
        Self::with_prompt(id, QuestionPrompt::Image(url), correct_answer, distractors)
    }

    fn with_prompt(
        id: QuestionId,
        prompt: QuestionPrompt,
        correct_answer: impl Into<String>,
        distractors: [&str; 3],
    ) -> Result<Self, QuestionError> {
        let correct_answer = validated_option(correct_answer)?;
        let [b, c, d] = distractors;
        let distractors = [
            validated_option(b)?,
            validated_option(c)?,
            validated_option(d)?,
        ];
        Ok(Self {
            id,
            prompt,
            correct_answer,
            distractors,
        })
    }

    /// Rehydrate a question from persisted storage.
    ///
    /// The record's declared kind decides which prompt column is meaningful;
    /// a missing or blank column for that kind is rejected.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingPrompt` if the prompt column for the
    /// declared kind is absent, and the constructor errors otherwise.
    pub fn from_persisted(
        id: QuestionId,
        kind: QuestionKind,
        question_text: Option<String>,
        image_url: Option<String>,
        correct_answer: String,
        distractors: [String; 3],
    ) -> Result<Self, QuestionError> {
        let [b, c, d] = &distractors;
        let options = [b.as_str(), c.as_str(), d.as_str()];
        match kind {
            QuestionKind::Text => {
                let text = question_text.ok_or(QuestionError::MissingPrompt)?;
                Self::text(id, text, correct_answer, options)
            }
            QuestionKind::Image => {
                let url = image_url.ok_or(QuestionError::MissingPrompt)?;
                Self::image(id, url, correct_answer, options)
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &QuestionPrompt {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.prompt.kind()
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn distractors(&self) -> &[String; 3] {
        &self.distractors
    }

    /// The four candidate answers in canonical (stored) order.
    #[must_use]
    pub fn options(&self) -> [&str; 4] {
        [
            &self.correct_answer,
            &self.distractors[0],
            &self.distractors[1],
            &self.distractors[2],
        ]
    }

    /// Whether a selected option matches the correct answer exactly.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
