use chrono::{DateTime, Utc};

use crate::model::player::PlayerName;

/// One persisted leaderboard record.
///
/// Entries are append-only: once written they are never mutated or deleted,
/// and the storage layer is their sole writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    player_name: PlayerName,
    score: u32,
    created_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    #[must_use]
    pub fn new(player_name: PlayerName, score: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            player_name,
            score,
            created_at,
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &PlayerName {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn entry_carries_its_fields() {
        let name = PlayerName::new("Iris").unwrap();
        let entry = LeaderboardEntry::new(name.clone(), 42, fixed_now());

        assert_eq!(entry.player_name(), &name);
        assert_eq!(entry.score(), 42);
        assert_eq!(entry.created_at(), fixed_now());
    }
}
