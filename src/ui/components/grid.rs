use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::puzzle::Pos;
use crate::ui::layout::GridGeometry;
use crate::ui::theme::Theme;
use crate::ui::view_model::{CellHighlight, CellView, GridView};

pub struct GridWidget<'a> {
    view: &'a GridView,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> GridWidget<'a> {
    pub fn new(view: &'a GridView, title: &'a str, theme: &'a Theme) -> Self {
        Self { view, title, theme }
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.view.cells.len();
        let cols = self.view.cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 || inner.width == 0 || inner.height == 0 {
            return;
        }
        let geometry = GridGeometry::fit(inner, rows, cols);

        for (r, row) in self.view.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let rect = geometry.cell_rect(Pos::new(r, c)).intersection(inner);
                if rect.is_empty() {
                    continue;
                }
                paint_cell(buf, rect, cell, &geometry, self.theme);
            }
        }
    }
}

fn paint_cell(buf: &mut Buffer, rect: Rect, cell: &CellView, geometry: &GridGeometry, theme: &Theme) {
    let colors = &theme.colors;
    let (letter, number, highlight) = match *cell {
        CellView::Black => {
            buf.set_style(rect, Style::default().bg(colors.black_cell()));
            return;
        }
        CellView::Open {
            letter,
            number,
            highlight,
        } => (letter, number, highlight),
    };

    let (fg, bg) = match highlight {
        CellHighlight::Cursor => (colors.cursor_fg(), colors.cursor_bg()),
        CellHighlight::Word => (colors.cell_fg(), colors.word_bg()),
        CellHighlight::None => (colors.cell_fg(), colors.cell_bg()),
    };
    buf.set_style(rect, Style::default().bg(bg));

    // Rightmost column stays blank as a gutter between cells.
    let text_width = rect.width.saturating_sub(1).max(1);
    let letter_row = rect.y + rect.height.saturating_sub(1);
    if geometry.shows_numbers()
        && let Some(n) = number
    {
        let label: String = n.to_string().chars().take(usize::from(text_width)).collect();
        buf.set_string(rect.x, rect.y, label, Style::default().fg(colors.number_fg()).bg(bg));
    }
    if let Some(ch) = letter {
        let x = rect.x + text_width / 2;
        buf.set_string(
            x,
            letter_row,
            ch.to_string(),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_letters_and_numbers_painted() {
        let view = GridView {
            cells: vec![vec![
                CellView::Open {
                    letter: Some('A'),
                    number: Some(1),
                    highlight: CellHighlight::Cursor,
                },
                CellView::Black,
            ]],
            clue_label: None,
            filled: 1,
            open: 1,
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        GridWidget::new(&view, "t-1", &theme).render(area, &mut buf);
        let lines = buffer_text(&buf);
        // inner area is 8x2; two 4x2 cells start at x=1
        assert_eq!(lines[1].chars().nth(1), Some('1'));
        assert_eq!(lines[2].chars().nth(2), Some('A'));
    }
}
