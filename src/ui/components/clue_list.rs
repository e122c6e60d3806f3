use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::ui::view_model::{ClueLine, ClueListView};

pub struct CluePanel<'a> {
    view: &'a ClueListView,
    theme: &'a Theme,
}

impl<'a> CluePanel<'a> {
    pub fn new(view: &'a ClueListView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn lines(&self, clues: &[ClueLine]) -> (Vec<Line<'static>>, usize) {
        let colors = &self.theme.colors;
        let mut active_idx = 0;
        let lines: Vec<Line<'static>> = clues
            .iter()
            .enumerate()
            .map(|(i, clue)| {
                let style = if clue.active {
                    active_idx = i;
                    Style::default()
                        .fg(colors.cursor_fg())
                        .bg(colors.cursor_bg())
                        .add_modifier(Modifier::BOLD)
                } else if clue.filled {
                    Style::default().fg(colors.text_muted())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(format!("{:>3} ", clue.number), style.add_modifier(Modifier::BOLD)),
                    Span::styled(clue.text.clone(), style),
                ])
            })
            .collect();
        (lines, active_idx)
    }

    fn render_column(&self, title: &str, clues: &[ClueLine], area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let focused = clues.iter().any(|c| c.active);
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (lines, active_idx) = self.lines(clues);
        // Keep the active clue in view.
        let visible = usize::from(inner.height);
        let scroll = if visible > 0 && active_idx >= visible {
            active_idx + 1 - visible
        } else {
            0
        };
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(inner, buf);
    }
}

impl Widget for CluePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        self.render_column("Across", &self.view.across, halves[0], buf);
        self.render_column("Down", &self.view.down, halves[1], buf);
    }
}
