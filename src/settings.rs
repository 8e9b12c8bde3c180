//! Match settings a client sends with `NEW_GAME_PVE`.

use serde::{Deserialize, Serialize};

use crate::common::BoardError;
use crate::config::{board_size_supported, DEFAULT_BOARD_SIZE};

/// Opponent difficulty. Accepted and logged; every level plays the same
/// uniform random strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub board_size: usize,
    pub best_of: u32,
    /// Not enforced by the server.
    pub turn_time_seconds: u32,
    pub difficulty: Difficulty,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            best_of: 3,
            turn_time_seconds: 60,
            difficulty: Difficulty::Normal,
        }
    }
}

impl GameSettings {
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        if board_size_supported(self.board_size) {
            Ok(())
        } else {
            Err(BoardError::UnsupportedSize(self.board_size))
        }
    }
}
