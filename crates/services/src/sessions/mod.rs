mod pool;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use pool::{PoolBuilder, PoolPlan};
pub use progress::SessionProgress;
pub use service::{
    AdvanceOutcome, AnswerEvaluation, QuestionTurn, QuizSession, SessionEnded, TickOutcome,
    TurnToken,
};
pub use workflow::{QuizLoopService, SessionStart, SessionTransition};
