//! Common types for the board model: board errors and attack outcomes.

use crate::position::Position;
use crate::ship::ShipType;

/// Result of resolving a single-cell attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// The cell held an unhit ship segment.
    pub hit: bool,
    /// The hit removed the last remaining cell of its ship.
    pub sunk: bool,
    /// Type of the ship that sank, only set when `sunk` is true.
    pub sunk_ship: Option<ShipType>,
}

impl AttackOutcome {
    pub const MISS: AttackOutcome = AttackOutcome {
        hit: false,
        sunk: false,
        sunk_ship: None,
    };
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Number of cells does not match the ship's length.
    WrongLength { ship: ShipType, expected: usize, got: usize },
    /// Cell lies outside the board.
    OutOfBounds(Position),
    /// Cell is already occupied by another ship.
    ShipOverlaps(Position),
    /// Board size is outside the supported range.
    UnsupportedSize(usize),
    /// Random layout could not fit the fleet.
    UnableToPlaceShip(ShipType),
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::WrongLength { ship, expected, got } => {
                write!(f, "{} needs {} cells, got {}", ship, expected, got)
            }
            BoardError::OutOfBounds(pos) => {
                write!(f, "Cell (row={}, col={}) is out of bounds", pos.row, pos.col)
            }
            BoardError::ShipOverlaps(pos) => write!(f, "Ship placement overlaps at {}", pos),
            BoardError::UnsupportedSize(size) => write!(f, "Unsupported board size {}", size),
            BoardError::UnableToPlaceShip(ship) => write!(f, "Unable to place {}", ship),
        }
    }
}

impl std::error::Error for BoardError {}
