use thiserror::Error;

use crate::scoring;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question timer must be > 0 seconds")]
    InvalidQuestionSecs,

    #[error("at least one question slot must be configured")]
    NoQuestionSlots,

    #[error("timer bands must satisfy danger <= warning < duration")]
    InvalidTimerBands,
}

//
// ─── TIMER BANDS ───────────────────────────────────────────────────────────────
//

/// Urgency band for the remaining time, used by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerBand {
    Ok,
    Warning,
    Danger,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for one quiz session.
///
/// Controls pool composition, the per-question countdown, and scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    text_question_count: u32,
    image_question_count: u32,
    question_secs: u32,
    base_points: u32,
    warn_below_secs: u32,
    danger_below_secs: u32,
}

impl QuizSettings {
    /// The standard game: 5 text + 5 image questions, 20 seconds each,
    /// 10 base points, three timer bands (green above 10 s, yellow above
    /// 5 s, red below).
    #[must_use]
    pub fn standard() -> Self {
        Self {
            text_question_count: 5,
            image_question_count: 5,
            question_secs: 20,
            base_points: 10,
            warn_below_secs: 10,
            danger_below_secs: 5,
        }
    }

    /// The rapid variant: same pool, 10 seconds per question and only two
    /// timer bands (the warning band collapses into danger at 5 s).
    #[must_use]
    pub fn rapid() -> Self {
        Self {
            text_question_count: 5,
            image_question_count: 5,
            question_secs: 10,
            base_points: 10,
            warn_below_secs: 5,
            danger_below_secs: 5,
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is zero, both question counts are zero,
    /// or the band thresholds are not ordered below the duration.
    pub fn new(
        text_question_count: u32,
        image_question_count: u32,
        question_secs: u32,
        base_points: u32,
        warn_below_secs: u32,
        danger_below_secs: u32,
    ) -> Result<Self, SettingsError> {
        if question_secs == 0 {
            return Err(SettingsError::InvalidQuestionSecs);
        }
        if text_question_count == 0 && image_question_count == 0 {
            return Err(SettingsError::NoQuestionSlots);
        }
        if danger_below_secs > warn_below_secs || warn_below_secs >= question_secs {
            return Err(SettingsError::InvalidTimerBands);
        }

        Ok(Self {
            text_question_count,
            image_question_count,
            question_secs,
            base_points,
            warn_below_secs,
            danger_below_secs,
        })
    }

    // Accessors
    #[must_use]
    pub fn text_question_count(&self) -> u32 {
        self.text_question_count
    }

    #[must_use]
    pub fn image_question_count(&self) -> u32 {
        self.image_question_count
    }

    #[must_use]
    pub fn question_secs(&self) -> u32 {
        self.question_secs
    }

    #[must_use]
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    /// Upper bound on the pool size for one session.
    #[must_use]
    pub fn pool_cap(&self) -> u32 {
        self.text_question_count + self.image_question_count
    }

    /// Urgency band for a remaining-seconds value.
    #[must_use]
    pub fn band(&self, time_remaining: u32) -> TimerBand {
        if time_remaining > self.warn_below_secs {
            TimerBand::Ok
        } else if time_remaining > self.danger_below_secs {
            TimerBand::Warning
        } else {
            TimerBand::Danger
        }
    }

    /// Points awarded for one answer under these settings.
    #[must_use]
    pub fn award(&self, correct: bool, time_remaining: u32) -> u32 {
        scoring::points_awarded(correct, self.base_points, time_remaining)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::standard()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
