#![forbid(unsafe_code)]

pub mod error;
pub mod leaderboard;
pub mod remote;
pub mod sessions;
pub mod shuffle;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use leaderboard::{LeaderboardListItem, LeaderboardService, ScoreId};
pub use remote::{RemoteStore, RemoteStoreConfig};

pub use sessions::{
    AdvanceOutcome, AnswerEvaluation, PoolBuilder, PoolPlan, QuestionTurn, QuizLoopService,
    QuizSession, SessionEnded, SessionProgress, SessionStart, SessionTransition, TickOutcome,
    TurnToken,
};
