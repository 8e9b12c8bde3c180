use crate::ship::ShipType;

pub const DEFAULT_BOARD_SIZE: usize = 10;
/// Smallest board on which the full fleet is laid out reliably.
pub const MIN_BOARD_SIZE: usize = 7;
/// Columns are single letters `A..=Z`.
pub const MAX_BOARD_SIZE: usize = 26;

pub const NUM_SHIPS: usize = 10;
pub const FLEET: [ShipType; NUM_SHIPS] = [
    ShipType::Carrier,
    ShipType::Battleship,
    ShipType::Battleship,
    ShipType::Cruiser,
    ShipType::Cruiser,
    ShipType::Cruiser,
    ShipType::Destroyer,
    ShipType::Destroyer,
    ShipType::Destroyer,
    ShipType::Destroyer,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 2 * 4 + 3 * 3 + 4 * 2;

/// Whether `size` is an accepted board size.
pub fn board_size_supported(size: usize) -> bool {
    (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
}
