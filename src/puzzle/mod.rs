pub mod grid;
pub mod loader;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Across => "across",
            Direction::Down => "down",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Across => "Across",
            Direction::Down => "Down",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Unit step `(d_row, d_col)` along this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta. `None` when the result would be negative;
    /// the upper bound is checked by the grid.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("layout has {actual} rows, expected {expected}")]
    RowCount { expected: usize, actual: usize },
    #[error("layout row {row} has {actual} cells, expected {expected}")]
    ColCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{direction} {number} starts at ({row}, {col}), which is not an open cell")]
    BadNumbering {
        direction: Direction,
        number: u32,
        row: usize,
        col: usize,
    },
    #[error("layout row {row} has a multi-character cell {cell:?}")]
    BadCell { row: usize, cell: String },
    #[error("failed to parse puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Black/open map of the grid. Rows arrive either as strings (`"..#"`)
/// or as arrays of one-character strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayoutRow>", into = "Vec<String>")]
pub struct Layout {
    black: Vec<Vec<bool>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutRow {
    Text(String),
    Cells(Vec<String>),
}

impl TryFrom<Vec<LayoutRow>> for Layout {
    type Error = PuzzleError;

    fn try_from(rows: Vec<LayoutRow>) -> Result<Self, Self::Error> {
        let mut black = Vec::with_capacity(rows.len());
        for (r, row) in rows.into_iter().enumerate() {
            let cells = match row {
                LayoutRow::Text(text) => text.chars().map(|ch| ch == '#').collect(),
                LayoutRow::Cells(cells) => {
                    let mut out = Vec::with_capacity(cells.len());
                    for cell in cells {
                        if cell.chars().count() > 1 {
                            return Err(PuzzleError::BadCell { row: r, cell });
                        }
                        out.push(cell == "#");
                    }
                    out
                }
            };
            black.push(cells);
        }
        Ok(Self { black })
    }
}

impl From<Layout> for Vec<String> {
    fn from(layout: Layout) -> Self {
        layout
            .black
            .iter()
            .map(|row| row.iter().map(|&b| if b { '#' } else { '.' }).collect())
            .collect()
    }
}

impl Layout {
    pub fn from_rows(rows: &[&str]) -> Self {
        Self {
            black: rows
                .iter()
                .map(|row| row.chars().map(|ch| ch == '#').collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.black.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.black.get(row).map_or(0, Vec::len)
    }

    /// Out-of-range cells count as black.
    pub fn is_black(&self, pos: Pos) -> bool {
        self.black
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    pub rows: usize,
    pub cols: usize,
    pub layout: Layout,
    #[serde(default)]
    pub cell_numbers: HashMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub number: u32,
    #[serde(alias = "clue", alias = "text")]
    pub clue_text: String,
    #[serde(default)]
    pub enumeration: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingEntry {
    pub number: u32,
    pub row: usize,
    pub col: usize,
    pub length: usize,
}

impl NumberingEntry {
    pub fn start(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    pub fn contains(&self, direction: Direction, pos: Pos) -> bool {
        match direction {
            Direction::Across => {
                pos.row == self.row && pos.col >= self.col && pos.col < self.col + self.length
            }
            Direction::Down => {
                pos.col == self.col && pos.row >= self.row && pos.row < self.row + self.length
            }
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ByDirection<T> {
    #[serde(default)]
    pub across: Vec<T>,
    #[serde(default)]
    pub down: Vec<T>,
}

impl<T> ByDirection<T> {
    pub fn get(&self, direction: Direction) -> &[T] {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }
}

/// Puzzle identity: `series` + `number`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleId {
    pub series: String,
    pub number: u32,
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.series, self.number)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Puzzle {
    pub series: String,
    pub number: u32,
    pub grid: GridData,
    pub clues: ByDirection<Clue>,
    pub numbering: ByDirection<NumberingEntry>,
}

impl Puzzle {
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let puzzle: Puzzle = serde_json::from_str(json)?;
        puzzle.validate()?;
        Ok(puzzle)
    }

    pub fn id(&self) -> PuzzleId {
        PuzzleId {
            series: self.series.clone(),
            number: self.number,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    pub fn cols(&self) -> usize {
        self.grid.cols
    }

    pub fn layout(&self) -> &Layout {
        &self.grid.layout
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    pub fn is_black(&self, pos: Pos) -> bool {
        self.grid.layout.is_black(pos)
    }

    pub fn clue(&self, direction: Direction, number: u32) -> Option<&Clue> {
        self.clues.get(direction).iter().find(|c| c.number == number)
    }

    pub fn numbering_entry(&self, direction: Direction, number: u32) -> Option<&NumberingEntry> {
        self.numbering
            .get(direction)
            .iter()
            .find(|e| e.number == number)
    }

    /// Number printed in the corner of a cell. Falls back to the numbering
    /// lists when the puzzle ships without `cellNumbers`.
    pub fn cell_number(&self, pos: Pos) -> Option<u32> {
        if !self.grid.cell_numbers.is_empty() {
            return self
                .grid
                .cell_numbers
                .get(&format!("{},{}", pos.row, pos.col))
                .copied();
        }
        [Direction::Across, Direction::Down]
            .into_iter()
            .flat_map(|d| self.numbering.get(d))
            .find(|e| e.start() == pos)
            .map(|e| e.number)
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        let layout = &self.grid.layout;
        if layout.rows() != self.grid.rows {
            return Err(PuzzleError::RowCount {
                expected: self.grid.rows,
                actual: layout.rows(),
            });
        }
        for row in 0..layout.rows() {
            if layout.row_len(row) != self.grid.cols {
                return Err(PuzzleError::ColCount {
                    row,
                    expected: self.grid.cols,
                    actual: layout.row_len(row),
                });
            }
        }
        for direction in [Direction::Across, Direction::Down] {
            for entry in self.numbering.get(direction) {
                if layout.is_black(entry.start()) {
                    return Err(PuzzleError::BadNumbering {
                        direction,
                        number: entry.number,
                        row: entry.row,
                        col: entry.col,
                    });
                }
            }
        }
        Ok(())
    }
}
