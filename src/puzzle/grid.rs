use serde::{Deserialize, Serialize};

use crate::puzzle::{Direction, Layout, Pos, Puzzle};

/// One cell of the solver's grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cell {
    Black,
    Empty,
    Letter(char),
}

impl TryFrom<String> for Cell {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Cell::Empty),
            (Some('#'), None) => Ok(Cell::Black),
            (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(Cell::Letter(ch.to_ascii_uppercase())),
            _ => Err(format!("invalid grid cell {value:?}")),
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Black => "#".to_string(),
            Cell::Empty => String::new(),
            Cell::Letter(ch) => ch.to_string(),
        }
    }
}

/// Letters entered by the solver, shaped like the puzzle layout.
/// Black cells are fixed at construction and never change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserGrid {
    cells: Vec<Vec<Cell>>,
}

impl UserGrid {
    pub fn new(layout: &Layout) -> Self {
        let cells = (0..layout.rows())
            .map(|row| {
                (0..layout.row_len(row))
                    .map(|col| {
                        if layout.is_black(Pos::new(row, col)) {
                            Cell::Black
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    pub fn letter(&self, pos: Pos) -> Option<char> {
        match self.get(pos) {
            Some(Cell::Letter(ch)) => Some(ch),
            _ => None,
        }
    }

    /// Store `ch` uppercased. Returns whether the cell changed; black and
    /// out-of-range cells are left alone, as is anything but an ASCII letter.
    pub fn set_letter(&mut self, pos: Pos, ch: char) -> bool {
        if !ch.is_ascii_alphabetic() {
            return false;
        }
        self.put(pos, Cell::Letter(ch.to_ascii_uppercase()))
    }

    pub fn clear(&mut self, pos: Pos) -> bool {
        self.put(pos, Cell::Empty)
    }

    fn put(&mut self, pos: Pos, value: Cell) -> bool {
        let Some(cell) = self.cells.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) else {
            return false;
        };
        if *cell == Cell::Black || *cell == value {
            return false;
        }
        *cell = value;
        true
    }

    /// Outer and inner dimensions match `layout`.
    pub fn same_dimensions(&self, layout: &Layout) -> bool {
        self.rows() == layout.rows() && (0..self.rows()).all(|r| self.row_len(r) == layout.row_len(r))
    }

    /// Same dimensions and black cells exactly where `layout` has them.
    pub fn matches_layout(&self, layout: &Layout) -> bool {
        self.same_dimensions(layout)
            && self.cells.iter().enumerate().all(|(r, row)| {
                row.iter().enumerate().all(|(c, cell)| {
                    (*cell == Cell::Black) == layout.is_black(Pos::new(r, c))
                })
            })
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Letter(_)))
            .count()
    }

    pub fn open_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c != Cell::Black)
            .count()
    }
}

impl Puzzle {
    pub fn is_open(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_black(pos)
    }

    fn open_neighbor(&self, pos: Pos, d_row: isize, d_col: isize) -> Option<Pos> {
        pos.offset(d_row, d_col).filter(|&p| self.is_open(p))
    }

    /// Maximal run of open cells through `pos` along `direction`, in
    /// reading order. Empty for black or out-of-range cells.
    pub fn word_cells(&self, pos: Pos, direction: Direction) -> Vec<Pos> {
        if !self.is_open(pos) {
            return Vec::new();
        }
        let (dr, dc) = direction.delta();
        let mut start = pos;
        while let Some(prev) = self.open_neighbor(start, -dr, -dc) {
            start = prev;
        }
        let mut cells = vec![start];
        let mut cur = start;
        while let Some(next) = self.open_neighbor(cur, dr, dc) {
            cells.push(next);
            cur = next;
        }
        cells
    }

    /// Number of the clue whose numbered span covers `pos`.
    pub fn clue_number_at(&self, pos: Pos, direction: Direction) -> Option<u32> {
        self.numbering
            .get(direction)
            .iter()
            .find(|e| e.contains(direction, pos))
            .map(|e| e.number)
    }

    /// True when `pos` has an open neighbour along `direction`'s axis.
    pub fn is_part_of(&self, direction: Direction, pos: Pos) -> bool {
        if !self.is_open(pos) {
            return false;
        }
        let (dr, dc) = direction.delta();
        self.open_neighbor(pos, -dr, -dc).is_some() || self.open_neighbor(pos, dr, dc).is_some()
    }

    pub fn can_start(&self, direction: Direction, pos: Pos) -> bool {
        self.numbering
            .get(direction)
            .iter()
            .any(|e| e.start() == pos)
    }

    /// A cell supports a direction if a word starts there or runs through it.
    pub fn supports(&self, direction: Direction, pos: Pos) -> bool {
        self.can_start(direction, pos) || self.is_part_of(direction, pos)
    }

    /// Letters currently in `cells`, `None` where blank.
    pub fn letters_in(&self, grid: &UserGrid, cells: &[Pos]) -> Vec<Option<char>> {
        cells.iter().map(|&p| grid.letter(p)).collect()
    }

}
