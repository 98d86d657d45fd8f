use serde::{Deserialize, Serialize};
use std::fmt;

/// Presence of a player in the lobby. Stored as a lowercase string in `player.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// In the lobby; counts toward the capacity cap
    Online,
    /// Playing a match
    InGame,
    /// Connected but idle
    Away,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlayerStatus {
    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::InGame => "ingame",
            Self::Away => "away",
        }
    }
}
