//! Board Codec
//!
//! Canonical 8×8 grid representation. Construction checks the shape only;
//! cell values are checked by the explicit [`Board::validate`] pass so that
//! out-of-range values can be represented, reported, and rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::error::{FormatError, ValidationError};

/// Board edge length.
pub const BOARD_SIZE: usize = 8;

/// Raw cell storage, row-major.
pub type Cells = [[u32; BOARD_SIZE]; BOARD_SIZE];

/// An N×N grid of cell values.
///
/// Well-formed boards hold only 0 (dead) and 1 (alive), but any `u32` can be
/// stored. Equality is element-wise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: Cells,
}

impl Board {
    /// All-dead board.
    pub const fn empty() -> Self {
        Self { cells: [[0; BOARD_SIZE]; BOARD_SIZE] }
    }

    /// Wrap fixed-size cells. Shape is correct by type.
    pub const fn from_cells(cells: Cells) -> Self {
        Self { cells }
    }

    /// Build from a rectangular grid of raw values.
    ///
    /// Fails if the grid is not exactly N×N. Values are not checked.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, FormatError> {
        if rows.len() != BOARD_SIZE {
            return Err(FormatError::RowCount {
                expected: BOARD_SIZE,
                got: rows.len(),
            });
        }

        let mut cells = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != BOARD_SIZE {
                return Err(FormatError::RowLength {
                    row: i,
                    expected: BOARD_SIZE,
                    got: row.len(),
                });
            }
            cells[i].copy_from_slice(row);
        }

        Ok(Self { cells })
    }

    /// Board with the given cells alive and the rest dead.
    ///
    /// # Panics
    /// Panics if a coordinate is outside the board.
    pub fn with_live_cells(live: &[(usize, usize)]) -> Self {
        let mut board = Self::empty();
        for &(row, col) in live {
            board.cells[row][col] = 1;
        }
        board
    }

    /// Copy of this board with one cell replaced.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the board.
    pub fn with_cell(mut self, row: usize, col: usize, value: u32) -> Self {
        self.cells[row][col] = value;
        self
    }

    /// Raw value at (row, col).
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    /// Raw cell storage.
    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Rows as owned vectors, the shape `from_rows` accepts.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }

    /// Number of cells holding exactly 1.
    pub fn live_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v == 1).count()
    }

    /// Assert every cell is 0 or 1.
    ///
    /// Scans in row-major order and reports the first offending coordinate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 && value != 1 {
                    return Err(ValidationError::InvalidCell { row, col, value });
                }
            }
        }
        Ok(())
    }

    /// Feed all cells, row-major, into a statement hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for value in self.cells.iter().flatten() {
            hasher.update_u32(*value);
        }
    }

    /// Domain-separated digest of the board.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_board();
        self.hash_into(&mut hasher);
        hasher.finalize()
    }
}

impl From<Cells> for Board {
    fn from(cells: Cells) -> Self {
        Self::from_cells(cells)
    }
}

/// One line per row, one digit per cell.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for value in row {
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

/// Parses the `Display` form. Blank lines and surrounding whitespace are
/// ignored; every other character must be a decimal digit.
impl FromStr for Board {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::with_capacity(BOARD_SIZE);
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row_idx = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(col, c)| {
                    c.to_digit(10).ok_or_else(|| FormatError::Parse {
                        row: row_idx,
                        col,
                        reason: format!("unexpected character {:?}", c),
                    })
                })
                .collect::<Result<Vec<u32>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}
