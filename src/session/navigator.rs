use crate::puzzle::grid::UserGrid;
use crate::puzzle::{Clue, Direction, Pos, Puzzle};

/// Discrete grid input, already decoded from the keyboard or pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavCommand {
    Select(Pos),
    ToggleDirection,
    Move { d_row: isize, d_col: isize },
    Letter(char),
    Backspace,
    Delete,
    NextClue,
    PrevClue,
}

/// What a transition changed. Callers persist and repaint when
/// [`Transition::changed`] is true.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub mutated: Option<Pos>,
    pub moved: bool,
    pub direction_changed: bool,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.mutated.is_some() || self.moved || self.direction_changed
    }

    fn merge(self, other: Transition) -> Transition {
        Transition {
            mutated: other.mutated.or(self.mutated),
            moved: self.moved || other.moved,
            direction_changed: self.direction_changed || other.direction_changed,
        }
    }
}

/// Cursor/direction state machine over a puzzle and the solver's letters.
pub struct Navigator {
    puzzle: Puzzle,
    grid: UserGrid,
    cursor: Option<Pos>,
    direction: Direction,
}

impl Navigator {
    pub fn new(puzzle: Puzzle) -> Self {
        let grid = UserGrid::new(puzzle.layout());
        Self {
            puzzle,
            grid,
            cursor: None,
            direction: Direction::Across,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn grid(&self) -> &UserGrid {
        &self.grid
    }

    pub fn cursor(&self) -> Option<Pos> {
        self.cursor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Replace letters, cursor and direction wholesale, e.g. from saved
    /// progress. A grid that doesn't match the layout is refused, and a
    /// cursor on a closed cell is dropped.
    pub fn restore(&mut self, grid: UserGrid, cursor: Option<Pos>, direction: Direction) -> bool {
        if !grid.matches_layout(self.puzzle.layout()) {
            return false;
        }
        self.grid = grid;
        self.cursor = cursor.filter(|&p| self.puzzle.is_open(p));
        self.direction = direction;
        true
    }

    /// Back to an empty grid with no selection.
    pub fn reset(&mut self) {
        self.grid = UserGrid::new(self.puzzle.layout());
        self.cursor = None;
        self.direction = Direction::Across;
    }

    pub fn apply(&mut self, command: NavCommand) -> Transition {
        match command {
            NavCommand::Select(pos) => self.select(pos),
            NavCommand::ToggleDirection => self.toggle_direction(),
            NavCommand::Move { d_row, d_col } => self.move_by(d_row, d_col),
            NavCommand::Letter(ch) => self.set_letter(ch),
            NavCommand::Backspace => self.backspace(),
            NavCommand::Delete => self.clear_letter(),
            NavCommand::NextClue => self.cycle_clue(true),
            NavCommand::PrevClue => self.cycle_clue(false),
        }
    }

    pub fn select(&mut self, pos: Pos) -> Transition {
        if !self.puzzle.is_open(pos) {
            return Transition::default();
        }
        if self.cursor == Some(pos) {
            return self.toggle_direction();
        }
        self.cursor = Some(pos);
        let mut transition = Transition {
            moved: true,
            ..Transition::default()
        };
        let across = self.puzzle.supports(Direction::Across, pos);
        let down = self.puzzle.supports(Direction::Down, pos);
        let forced = match (across, down) {
            (true, false) => Some(Direction::Across),
            (false, true) => Some(Direction::Down),
            _ => None,
        };
        if let Some(direction) = forced
            && direction != self.direction
        {
            self.direction = direction;
            transition.direction_changed = true;
        }
        transition
    }

    pub fn toggle_direction(&mut self) -> Transition {
        let Some(pos) = self.cursor else {
            return Transition::default();
        };
        if self.puzzle.supports(Direction::Across, pos) && self.puzzle.supports(Direction::Down, pos) {
            self.direction = self.direction.flip();
            Transition {
                direction_changed: true,
                ..Transition::default()
            }
        } else {
            Transition::default()
        }
    }

    /// Arrow-key step. The travel axis decides the direction.
    pub fn move_by(&mut self, d_row: isize, d_col: isize) -> Transition {
        let Some(target) = self.cursor.and_then(|p| p.offset(d_row, d_col)) else {
            return Transition::default();
        };
        if !self.puzzle.is_open(target) {
            return Transition::default();
        }
        let direction = if d_row != 0 {
            Direction::Down
        } else {
            Direction::Across
        };
        let direction_changed = direction != self.direction;
        self.direction = direction;
        self.cursor = Some(target);
        Transition {
            mutated: None,
            moved: true,
            direction_changed,
        }
    }

    /// One cell forward in the active direction; never leaves the word.
    pub fn advance_in_word(&mut self) -> Transition {
        self.step_in_word(1)
    }

    pub fn retreat_in_word(&mut self) -> Transition {
        self.step_in_word(-1)
    }

    fn step_in_word(&mut self, sign: isize) -> Transition {
        let (dr, dc) = self.direction.delta();
        let Some(target) = self.cursor.and_then(|p| p.offset(dr * sign, dc * sign)) else {
            return Transition::default();
        };
        if !self.puzzle.is_open(target) {
            return Transition::default();
        }
        self.cursor = Some(target);
        Transition {
            moved: true,
            ..Transition::default()
        }
    }

    pub fn set_letter(&mut self, ch: char) -> Transition {
        let Some(pos) = self.cursor else {
            return Transition::default();
        };
        let mut transition = Transition::default();
        if self.grid.set_letter(pos, ch) {
            transition.mutated = Some(pos);
        }
        transition.merge(self.advance_in_word())
    }

    pub fn clear_letter(&mut self) -> Transition {
        let Some(pos) = self.cursor else {
            return Transition::default();
        };
        Transition {
            mutated: self.grid.clear(pos).then_some(pos),
            ..Transition::default()
        }
    }

    /// Clears a filled cell in place; on an empty cell steps back first
    /// and clears that one.
    pub fn backspace(&mut self) -> Transition {
        let Some(pos) = self.cursor else {
            return Transition::default();
        };
        if self.grid.letter(pos).is_some() {
            return self.clear_letter();
        }
        let step = self.retreat_in_word();
        step.merge(self.clear_letter())
    }

    /// Write one cell directly without moving the cursor.
    pub fn set_cell(&mut self, pos: Pos, ch: char) -> bool {
        self.grid.set_letter(pos, ch)
    }

    fn cycle_clue(&mut self, forward: bool) -> Transition {
        let direction = self.direction;
        let clues = self.puzzle.clues.get(direction);
        if clues.is_empty() {
            return Transition::default();
        }
        let len = clues.len();
        let current = self
            .cursor
            .and_then(|p| self.puzzle.clue_number_at(p, direction))
            .and_then(|n| clues.iter().position(|c| c.number == n));
        let mut idx = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        for _ in 0..len {
            let number = clues[idx].number;
            if let Some(entry) = self.puzzle.numbering_entry(direction, number) {
                let start = entry.start();
                let moved = self.cursor != Some(start);
                self.cursor = Some(start);
                return Transition {
                    moved,
                    ..Transition::default()
                };
            }
            idx = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
        }
        Transition::default()
    }

    /// Cells of the word under the cursor in the active direction.
    pub fn current_word(&self) -> Vec<Pos> {
        self.cursor
            .map(|p| self.puzzle.word_cells(p, self.direction))
            .unwrap_or_default()
    }

    pub fn current_clue(&self) -> Option<&Clue> {
        let pos = self.cursor?;
        let number = self.puzzle.clue_number_at(pos, self.direction)?;
        self.puzzle.clue(self.direction, number)
    }
}
