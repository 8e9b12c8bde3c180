//! Ship catalogue and placement orientation.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];
}

/// Type of ship from the fixed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Carrier,
    Battleship,
    Cruiser,
    Destroyer,
}

impl ShipType {
    /// Number of cells the ship occupies.
    pub const fn length(self) -> usize {
        match self {
            ShipType::Carrier => 5,
            ShipType::Battleship => 4,
            ShipType::Cruiser => 3,
            ShipType::Destroyer => 2,
        }
    }

    /// Wire name of the ship.
    pub const fn name(self) -> &'static str {
        match self {
            ShipType::Carrier => "CARRIER",
            ShipType::Battleship => "BATTLESHIP",
            ShipType::Cruiser => "CRUISER",
            ShipType::Destroyer => "DESTROYER",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
