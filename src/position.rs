//! Board coordinates and their `C4`-style text form.
//!
//! Internally a position is a 0-indexed `(row, col)` pair. On the wire the
//! column is a letter (`A` = 0) followed by the 1-based row number, so `C4`
//! is row 3, column 2.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Reasons a position text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// Not a letter followed by a row number.
    Malformed(String),
    /// Well formed but outside an N×N board.
    OutOfBounds { text: String, size: usize },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Malformed(text) => write!(f, "Invalid position: {}", text),
            PositionError::OutOfBounds { text, size } => {
                write!(f, "Invalid position: {} is outside the {}x{} board", text, size, size)
            }
        }
    }
}

impl std::error::Error for PositionError {}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse `text` (case-insensitive, surrounding whitespace ignored) for a
    /// board of `size`×`size`.
    pub fn parse(text: &str, size: usize) -> Result<Self, PositionError> {
        let normalized = text.trim().to_ascii_uppercase();
        let mut chars = normalized.chars();
        let letter = match chars.next() {
            Some(c) if c.is_ascii_uppercase() => c,
            _ => return Err(PositionError::Malformed(text.trim().to_string())),
        };
        let row_number: usize = chars
            .as_str()
            .parse()
            .map_err(|_| PositionError::Malformed(text.trim().to_string()))?;
        let col = (letter as u8 - b'A') as usize;
        if row_number == 0 || row_number > size || col >= size {
            return Err(PositionError::OutOfBounds {
                text: normalized,
                size,
            });
        }
        Ok(Self::new(row_number - 1, col))
    }

    /// Whether the position lies on a `size`×`size` board.
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Columns past Z never occur on supported boards.
        let letter = (b'A' + (self.col as u8 % 26)) as char;
        write!(f, "{}{}", letter, self.row + 1)
    }
}
