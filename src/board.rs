//! Game board state: ship occupancy, shot tracking and random fleet layout.

use std::collections::BTreeSet;

use crate::common::{AttackOutcome, BoardError};
use crate::config::{board_size_supported, FLEET};
use crate::position::Position;
use crate::ship::{Orientation, ShipType};
use core::fmt;
use rand::seq::SliceRandom;
use rand::Rng;

/// Index of a placed ship, in placement order.
pub type ShipId = usize;

/// Full layouts tried before giving up on a random board.
const MAX_LAYOUT_ATTEMPTS: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
struct PlacedShip {
    ship_type: ShipType,
    cells: Vec<Position>,
    remaining: BTreeSet<Position>,
}

/// Main board state: ship placements and attacked cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    occupancy: Vec<Option<ShipId>>,
    attacked: Vec<bool>,
    ships: Vec<PlacedShip>,
}

/// Cells covered by a ship of `len` anchored at `anchor`, extending right
/// (horizontal) or down (vertical). Cells may fall off the board.
pub fn ship_cells(anchor: Position, orientation: Orientation, len: usize) -> Vec<Position> {
    (0..len)
        .map(|i| match orientation {
            Orientation::Horizontal => Position::new(anchor.row, anchor.col + i),
            Orientation::Vertical => Position::new(anchor.row + i, anchor.col),
        })
        .collect()
}

impl Board {
    /// Create an empty `size`×`size` board (no ships placed).
    pub fn new(size: usize) -> Self {
        Board {
            size,
            occupancy: vec![None; size * size],
            attacked: vec![false; size * size],
            ships: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn check_bounds(&self, pos: Position) -> Result<usize, BoardError> {
        if pos.in_bounds(self.size) {
            Ok(self.index(pos))
        } else {
            Err(BoardError::OutOfBounds(pos))
        }
    }

    /// Place `ship` on exactly `cells`. The board is left untouched on error.
    pub fn place_ship(&mut self, ship: ShipType, cells: &[Position]) -> Result<ShipId, BoardError> {
        if cells.len() != ship.length() {
            return Err(BoardError::WrongLength {
                ship,
                expected: ship.length(),
                got: cells.len(),
            });
        }
        let mut remaining = BTreeSet::new();
        for &pos in cells {
            let idx = self.check_bounds(pos)?;
            if self.occupancy[idx].is_some() || !remaining.insert(pos) {
                return Err(BoardError::ShipOverlaps(pos));
            }
        }
        let id = self.ships.len();
        for &pos in cells {
            let idx = self.index(pos);
            self.occupancy[idx] = Some(id);
        }
        self.ships.push(PlacedShip {
            ship_type: ship,
            cells: cells.to_vec(),
            remaining,
        });
        Ok(id)
    }

    /// Resolve an attack on `pos`.
    ///
    /// A cell that was already attacked reports a plain miss and changes
    /// nothing, whatever it holds.
    pub fn attack(&mut self, pos: Position) -> Result<AttackOutcome, BoardError> {
        let idx = self.check_bounds(pos)?;
        if self.attacked[idx] {
            return Ok(AttackOutcome::MISS);
        }
        self.attacked[idx] = true;
        let Some(id) = self.occupancy[idx] else {
            return Ok(AttackOutcome::MISS);
        };
        let ship = &mut self.ships[id];
        ship.remaining.remove(&pos);
        let sunk = ship.remaining.is_empty();
        Ok(AttackOutcome {
            hit: true,
            sunk,
            sunk_ship: sunk.then_some(ship.ship_type),
        })
    }

    /// Returns `true` when every placed ship is sunk.
    pub fn all_defeated(&self) -> bool {
        self.ships.iter().all(|s| s.remaining.is_empty())
    }

    /// Whether ship `id` is sunk, `None` for an unknown id.
    pub fn is_sunk(&self, id: ShipId) -> Option<bool> {
        self.ships.get(id).map(|s| s.remaining.is_empty())
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Number of ship cells not yet hit.
    pub fn remaining_cells(&self) -> usize {
        self.ships.iter().map(|s| s.remaining.len()).sum()
    }

    /// Type of the ship occupying `pos`, if any.
    pub fn occupant(&self, pos: Position) -> Option<ShipType> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.occupancy[self.index(pos)].map(|id| self.ships[id].ship_type)
    }

    pub fn was_attacked(&self, pos: Position) -> bool {
        pos.in_bounds(self.size) && self.attacked[self.index(pos)]
    }

    /// Each ship with the cells it was placed on, in placement order.
    pub fn placements(&self) -> Vec<(ShipType, Vec<Position>)> {
        self.ships
            .iter()
            .map(|s| (s.ship_type, s.cells.clone()))
            .collect()
    }

    /// Lay out the standard fleet at random on a new `size`×`size` board.
    ///
    /// Every ship picks uniformly among the in-bounds runs that do not overlap
    /// the ships already placed. If an earlier choice leaves no room for a
    /// later ship the whole layout starts over, up to a fixed number of times.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        if !board_size_supported(size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        let mut last_err = BoardError::UnableToPlaceShip(FLEET[0]);
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            match Self::try_random_layout(size, rng) {
                Ok(board) => return Ok(board),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    fn try_random_layout<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        let mut board = Board::new(size);
        for ship in FLEET {
            let mut candidates = board.candidate_runs(ship.length());
            candidates.shuffle(rng);
            let cells = candidates
                .into_iter()
                .find(|cells| cells.iter().all(|&p| board.occupant(p).is_none()))
                .ok_or(BoardError::UnableToPlaceShip(ship))?;
            board.place_ship(ship, &cells)?;
        }
        Ok(board)
    }

    /// Every in-bounds run of `len` cells in either orientation.
    fn candidate_runs(&self, len: usize) -> Vec<Vec<Position>> {
        let mut runs = Vec::new();
        if len == 0 || len > self.size {
            return runs;
        }
        for orientation in Orientation::ALL {
            let (max_r, max_c) = match orientation {
                Orientation::Horizontal => (self.size, self.size - len + 1),
                Orientation::Vertical => (self.size - len + 1, self.size),
            };
            for r in 0..max_r {
                for c in 0..max_c {
                    runs.push(ship_cells(Position::new(r, c), orientation, len));
                }
            }
        }
        runs
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ size: {}, ships: {} }}", self.size, self.ships.len())?;
        for r in 0..self.size {
            for c in 0..self.size {
                let pos = Position::new(r, c);
                let ch = match (self.occupant(pos), self.was_attacked(pos)) {
                    (Some(_), true) => 'X',
                    (Some(_), false) => '#',
                    (None, true) => 'o',
                    (None, false) => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
