use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::puzzle::grid::UserGrid;
use crate::puzzle::{Direction, Pos};

/// Snapshot of a solver's position in one puzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    pub user_grid: UserGrid,
    pub cursor: Option<Pos>,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
}

impl SavedProgress {
    pub fn new(user_grid: UserGrid, cursor: Option<Pos>, direction: Direction) -> Self {
        Self {
            user_grid,
            cursor,
            direction,
            timestamp: Utc::now(),
        }
    }
}
