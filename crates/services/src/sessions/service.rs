use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use quiz_core::model::{PlayerName, Question, QuestionPrompt, QuizSettings, TimerBand};

use super::pool::PoolPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::shuffle;

//
// ─── TURN TOKEN ────────────────────────────────────────────────────────────────
//

/// Generation guard for timer and delayed-advance callbacks.
///
/// Every presented question gets a fresh token; a callback carrying a stale
/// token is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken(u64);

//
// ─── OPERATION RESULTS ─────────────────────────────────────────────────────────
//

/// One presented question, ready for rendering.
///
/// The options are the four candidates in unbiased shuffled order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTurn {
    pub token: TurnToken,
    pub index: usize,
    pub total: usize,
    pub prompt: QuestionPrompt,
    pub options: Vec<String>,
    pub seconds: u32,
    pub band: TimerBand,
}

/// Outcome of resolving one question, by submission or by timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvaluation {
    pub correct: bool,
    pub points_awarded: u32,
    pub correct_answer: String,
    pub score_total: u32,
}

/// Result of one cooperative timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown continues.
    Counted { remaining: u32, band: TimerBand },
    /// Time ran out; the question was resolved as unanswered (zero points).
    /// The caller advances next, exactly as after a submitted answer.
    Expired(AnswerEvaluation),
    /// The tick referred to an earlier question or a resolved turn; nothing
    /// happened.
    Stale,
}

/// Result of advancing past a resolved question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A cancelled delayed advance; nothing happened.
    Stale,
    /// The session moved to the next question; present it to the player.
    Next,
    /// That was the last question.
    Finished(SessionEnded),
}

/// Terminal event of a session, carrying what the leaderboard needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnded {
    pub player_name: PlayerName,
    pub final_score: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz run.
///
/// Owns the player, the immutable question pool, the cursor, the score and
/// the per-question countdown. All mutation goes through `&mut self`
/// methods; a failed operation leaves the state unchanged. The session
/// exists only while in progress or finished; "idle" is the absence of a
/// session.
pub struct QuizSession {
    player: PlayerName,
    settings: QuizSettings,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    time_remaining: u32,
    answered: bool,
    turn: u64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    score_id: Option<i64>,
}

impl QuizSession {
    /// Start a session over a built pool.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if the plan holds no questions.
    pub fn start(
        player: PlayerName,
        plan: PoolPlan,
        settings: QuizSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let time_remaining = settings.question_secs();
        Ok(Self {
            player,
            settings,
            questions: plan.questions,
            current: 0,
            score: 0,
            time_remaining,
            answered: false,
            turn: 0,
            started_at,
            completed_at: None,
            score_id: None,
        })
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn score_id(&self) -> Option<i64> {
        self.score_id
    }

    /// Token identifying the currently presented question generation.
    #[must_use]
    pub fn turn_token(&self) -> TurnToken {
        TurnToken(self.turn)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions that have been resolved.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.current + usize::from(self.answered)
    }

    /// Number of questions still unresolved.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.answered_count())
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.remaining(),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.current < self.questions.len() {
            Some(&self.questions[self.current])
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Build the presentation view of the current question, with the answer
    /// options in unbiased shuffled order.
    ///
    /// Returns `None` once the session is finished.
    #[must_use]
    pub fn present_current<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<QuestionTurn> {
        if self.is_complete() {
            return None;
        }
        let question = self.current_question()?;
        let options: Vec<String> = shuffle::shuffled(&question.options(), rng)
            .into_iter()
            .map(str::to_string)
            .collect();

        Some(QuestionTurn {
            token: self.turn_token(),
            index: self.current,
            total: self.questions.len(),
            prompt: question.prompt().clone(),
            options,
            seconds: self.time_remaining,
            band: self.settings.band(self.time_remaining),
        })
    }

    /// One cooperative countdown step for the given question generation.
    ///
    /// Stale tokens, resolved turns, and finished sessions are no-ops. When
    /// the countdown reaches zero the question is resolved as unanswered:
    /// the evaluation is identical to an incorrect answer with no time
    /// bonus, and the caller advances just as after a submission.
    pub fn tick(&mut self, token: TurnToken) -> TickOutcome {
        if self.is_complete() || self.answered || token != self.turn_token() {
            return TickOutcome::Stale;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return TickOutcome::Counted {
                remaining: self.time_remaining,
                band: self.settings.band(self.time_remaining),
            };
        }

        TickOutcome::Expired(self.resolve(None))
    }

    /// Resolve the current question with the player's selected option.
    ///
    /// Resolution freezes the countdown: any tick for this turn is stale
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last question,
    /// `SessionError::StaleTurn` for an outdated token, and
    /// `SessionError::AlreadyAnswered` if this turn was already resolved
    /// (the double-scoring guard).
    pub fn submit_answer(
        &mut self,
        token: TurnToken,
        selected: &str,
    ) -> Result<AnswerEvaluation, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if token != self.turn_token() {
            return Err(SessionError::StaleTurn);
        }
        if self.answered {
            return Err(SessionError::AlreadyAnswered);
        }

        Ok(self.resolve(Some(selected)))
    }

    fn resolve(&mut self, selected: Option<&str>) -> AnswerEvaluation {
        let question = &self.questions[self.current];
        let correct = selected.is_some_and(|s| question.is_correct(s));
        let points = self.settings.award(correct, self.time_remaining);
        let correct_answer = question.correct_answer().to_string();

        self.score += points;
        self.answered = true;

        AnswerEvaluation {
            correct,
            points_awarded: points,
            correct_answer,
            score_total: self.score,
        }
    }

    /// Move past a resolved question.
    ///
    /// The token names the turn being left behind, so a delayed advance that
    /// was cancelled (by timeout-driven advancement or a replay) is a
    /// harmless `AdvanceOutcome::Stale`. On the last question the session
    /// finishes and yields the `SessionEnded` event for the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session finished and
    /// `SessionError::AnswerPending` when the current turn is unresolved.
    pub fn advance(
        &mut self,
        token: TurnToken,
        now: DateTime<Utc>,
    ) -> Result<AdvanceOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if token != self.turn_token() {
            return Ok(AdvanceOutcome::Stale);
        }
        if !self.answered {
            return Err(SessionError::AnswerPending);
        }

        self.current += 1;
        self.turn += 1;
        self.answered = false;

        if self.current >= self.questions.len() {
            self.completed_at = Some(now);
            return Ok(AdvanceOutcome::Finished(SessionEnded {
                player_name: self.player.clone(),
                final_score: self.score,
            }));
        }

        self.time_remaining = self.settings.question_secs();
        Ok(AdvanceOutcome::Next)
    }

    pub(crate) fn set_score_id(&mut self, id: i64) {
        self.score_id = Some(id);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("player", &self.player)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .field("answered", &self.answered)
            .field("completed_at", &self.completed_at)
            .field("score_id", &self.score_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
