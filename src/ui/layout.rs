use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

use crate::puzzle::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: grid + clue list side by side
    Narrow, // <100 cols: grid only, active clue in the header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_clue_list(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub grid: Rect,
    pub clues: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        if tier.show_clue_list() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                grid: horizontal[0],
                clues: Some(horizontal[1]),
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                grid: vertical[1],
                clues: None,
                footer: vertical[2],
                tier,
            }
        }
    }

    /// Area inside the grid's border.
    pub fn grid_inner(&self) -> Rect {
        self.grid.inner(Margin::new(1, 1))
    }
}

/// Where each grid cell lands on screen. Large cells carry clue numbers on
/// their top line; cramped terminals fall back to one-line cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub x: u16,
    pub y: u16,
    pub cell_w: u16,
    pub cell_h: u16,
    pub rows: usize,
    pub cols: usize,
}

impl GridGeometry {
    pub fn fit(area: Rect, rows: usize, cols: usize) -> Self {
        let rows_u = u16::try_from(rows).unwrap_or(u16::MAX);
        let cols_u = u16::try_from(cols).unwrap_or(u16::MAX);
        let (cell_w, cell_h) = [(4u16, 2u16), (3, 1), (2, 1)]
            .into_iter()
            .find(|&(w, h)| {
                cols_u.saturating_mul(w) <= area.width && rows_u.saturating_mul(h) <= area.height
            })
            .unwrap_or((2, 1));
        let width = cols_u.saturating_mul(cell_w).min(area.width);
        let height = rows_u.saturating_mul(cell_h).min(area.height);
        Self {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            cell_w,
            cell_h,
            rows,
            cols,
        }
    }

    pub fn shows_numbers(&self) -> bool {
        self.cell_h >= 2
    }

    pub fn cell_rect(&self, pos: Pos) -> Rect {
        Rect::new(
            self.x + (pos.col as u16) * self.cell_w,
            self.y + (pos.row as u16) * self.cell_h,
            self.cell_w,
            self.cell_h,
        )
    }

    /// Grid cell under a screen coordinate.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Pos> {
        if x < self.x || y < self.y {
            return None;
        }
        let col = usize::from((x - self.x) / self.cell_w);
        let row = usize::from((y - self.y) / self.cell_h);
        (row < self.rows && col < self.cols).then_some(Pos::new(row, col))
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
