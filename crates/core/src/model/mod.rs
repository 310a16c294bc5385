mod ids;
mod leaderboard;
mod player;
mod question;
mod settings;

pub use ids::{ParseIdError, QuestionId};
pub use leaderboard::LeaderboardEntry;
pub use player::{PlayerName, PlayerNameError};
pub use question::{Question, QuestionError, QuestionKind, QuestionPrompt};
pub use settings::{QuizSettings, SettingsError, TimerBand};
