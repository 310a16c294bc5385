//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::PlayerNameError;
use storage::repository::StorageError;

/// Errors emitted by session services.
///
/// The ordering variants (`AlreadyAnswered`, `StaleTurn`, `AnswerPending`)
/// flag scheduling defects and should never reach a player; callers treat
/// them as assertions or cancellation no-ops. `Storage` failures after a
/// finished session are logged and surfaced without undoing the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    InvalidName(#[from] PlayerNameError),

    #[error("no questions available for session")]
    EmptyPool,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("command referred to a question that is no longer current")]
    StaleTurn,

    #[error("current question has not been resolved yet")]
    AnswerPending,

    #[error("session already finished")]
    Completed,

    #[error("session is still in progress")]
    InProgress,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
