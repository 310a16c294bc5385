use std::sync::Arc;

use log::{info, warn};

use quiz_core::Clock;
use quiz_core::model::{LeaderboardEntry, PlayerName, QuizSettings};
use storage::repository::{QuestionRepository, ScoreRepository};

use super::pool::PoolBuilder;
use super::service::{AdvanceOutcome, QuestionTurn, QuizSession, SessionEnded};
use crate::error::SessionError;
use crate::leaderboard::ScoreId;

/// A freshly started session together with its first presented question.
#[derive(Debug)]
pub struct SessionStart {
    pub session: QuizSession,
    pub first_turn: QuestionTurn,
}

/// What the session moved to after leaving a resolved question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    Question(QuestionTurn),
    Ended(SessionEnded),
}

/// Orchestrates session start, advancement, and score persistence.
///
/// The service never blocks a finished session on storage: `advance`
/// produces the `SessionEnded` result before any persistence happens, and
/// `finalize_score` runs separately (typically as a detached task).
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    questions: Arc<dyn QuestionRepository>,
    scores: Arc<dyn ScoreRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        questions: Arc<dyn QuestionRepository>,
        scores: Arc<dyn ScoreRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            questions,
            scores,
        }
    }

    /// Start a new session for the given raw player name.
    ///
    /// Loads the corpus, builds a fresh pool, and presents the first
    /// question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidName` for a blank name,
    /// `SessionError::EmptyPool` when no questions are available, and
    /// `SessionError::Storage` on repository failures.
    pub async fn start_session(&self, player_name: &str) -> Result<SessionStart, SessionError> {
        let player = PlayerName::new(player_name)?;
        self.start_for(player).await
    }

    /// Start another run for the player of a finished session.
    ///
    /// Rebuilds the pool from storage so a replay gets a fresh selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` if the session has not finished,
    /// plus the `start_session` failure modes.
    pub async fn play_again(&self, session: &QuizSession) -> Result<SessionStart, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::InProgress);
        }
        self.start_for(session.player().clone()).await
    }

    async fn start_for(&self, player: PlayerName) -> Result<SessionStart, SessionError> {
        let all = self.questions.all_questions().await?;
        let mut rng = rand::rng();
        let plan = PoolBuilder::new(&self.settings).build(all, &mut rng);

        info!(
            "starting session for {player}: {} text + {} image questions",
            plan.text_selected, plan.image_selected
        );

        let session = QuizSession::start(player, plan, self.settings.clone(), self.clock.now())?;
        let first_turn = session
            .present_current(&mut rng)
            .ok_or(SessionError::EmptyPool)?;
        Ok(SessionStart {
            session,
            first_turn,
        })
    }

    /// Leave the current resolved question: present the next one or finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerPending` if the current question has not
    /// been resolved and `SessionError::Completed` after the session ended.
    pub fn advance(&self, session: &mut QuizSession) -> Result<SessionTransition, SessionError> {
        let token = session.turn_token();
        match session.advance(token, self.clock.now())? {
            AdvanceOutcome::Finished(ended) => Ok(SessionTransition::Ended(ended)),
            AdvanceOutcome::Next | AdvanceOutcome::Stale => {
                let mut rng = rand::rng();
                let turn = session
                    .present_current(&mut rng)
                    .ok_or(SessionError::Completed)?;
                Ok(SessionTransition::Question(turn))
            }
        }
    }

    /// Persist the final score of a completed session, once.
    ///
    /// Idempotent: a session that already has a score row returns its id.
    /// Useful as a retry when the first append failed (e.g. transient
    /// storage error); the session stays finished either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` before completion and
    /// `SessionError::Storage` if persistence fails.
    pub async fn finalize_score(
        &self,
        session: &mut QuizSession,
    ) -> Result<ScoreId, SessionError> {
        if let Some(id) = session.score_id() {
            return Ok(id);
        }
        if !session.is_complete() {
            return Err(SessionError::InProgress);
        }

        let entry = LeaderboardEntry::new(
            session.player().clone(),
            session.score(),
            self.clock.now(),
        );
        let id = match self.scores.append_score(&entry).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    "failed to persist score {} for {}: {err}",
                    session.score(),
                    session.player()
                );
                return Err(err.into());
            }
        };
        session.set_score_id(id);
        Ok(id)
    }
}
