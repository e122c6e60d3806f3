use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::trainer::protocol::StepStatus;
use crate::trainer::session::Focus;
use crate::ui::layout::pack_hint_lines;
use crate::ui::theme::Theme;
use crate::ui::view_model::{AnswerBox, InputView, StepLine, TrainerView};

pub struct TrainerPanel<'a> {
    view: &'a TrainerView,
    theme: &'a Theme,
}

impl<'a> TrainerPanel<'a> {
    pub fn new(view: &'a TrainerView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn step_lines(&self, steps: &[StepLine], out: &mut Vec<Line<'static>>) {
        let colors = &self.theme.colors;
        for step in steps {
            let (marker, style) = match step.status {
                StepStatus::Completed => ("✓", Style::default().fg(colors.success())),
                StepStatus::Active => (
                    "▶",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                StepStatus::Pending => ("·", Style::default().fg(colors.text_muted())),
            };
            out.push(Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(step.prompt.clone(), style),
            ]));
            if let Some(detail) = &step.detail {
                out.push(Line::from(Span::styled(
                    format!("     {detail}"),
                    Style::default().fg(colors.text_muted()),
                )));
            }
            if let Some(hint) = &step.hint {
                out.push(Line::from(Span::styled(
                    format!("     Hint: {hint}"),
                    Style::default().fg(colors.warning()),
                )));
            }
        }
    }

    fn input_lines(&self, input: &InputView, focus: Focus, out: &mut Vec<Line<'static>>) {
        let colors = &self.theme.colors;
        let focused = focus == Focus::Step;
        match input {
            InputView::TapWords(chips) => {
                let mut spans = vec![Span::raw("   ")];
                for chip in chips {
                    let mut style = Style::default().fg(colors.fg());
                    if chip.highlighted {
                        style = style.fg(colors.accent());
                    }
                    if chip.selected {
                        style = style.fg(colors.bg()).bg(colors.selected_bg());
                    }
                    if chip.focused {
                        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                    }
                    spans.push(Span::styled(chip.text.clone(), style));
                    spans.push(Span::raw(" "));
                }
                out.push(Line::from(spans));
            }
            InputView::Text { buffer } => {
                let cursor = if focused { "_" } else { "" };
                out.push(Line::from(vec![
                    Span::styled("   > ", Style::default().fg(colors.accent())),
                    Span::styled(format!("{buffer}{cursor}"), Style::default().fg(colors.fg())),
                ]));
            }
            InputView::Choices { options, focused: chosen } => {
                for (i, option) in options.iter().enumerate() {
                    let selected = i == *chosen;
                    let style = if selected {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    let marker = if selected { "(•)" } else { "( )" };
                    out.push(Line::from(Span::styled(format!("   {marker} {option}"), style)));
                }
            }
            InputView::None => {}
        }
    }

    fn answer_line(&self, boxes: &[AnswerBox], locked: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::raw("   ")];
        for b in boxes {
            let mut style = Style::default().fg(colors.cell_fg()).bg(colors.cell_bg());
            if b.cross {
                style = style.fg(colors.cross_fg());
            }
            if locked {
                style = style.fg(colors.success());
            }
            if b.focused {
                style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
            }
            spans.push(Span::styled(format!(" {} ", b.letter.unwrap_or('_')), style));
            spans.push(Span::raw(" "));
        }
        if locked {
            spans.push(Span::styled(" locked", Style::default().fg(colors.success())));
        }
        Line::from(spans)
    }
}

impl Widget for TrainerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let clue = match self.view {
            TrainerView::Loading { clue }
            | TrainerView::Message { clue, .. }
            | TrainerView::Active { clue, .. }
            | TrainerView::Complete { clue, .. } => clue.as_str(),
        };
        let block = Block::bordered()
            .title(" Clue trainer ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled(
                clue.to_string(),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let hints: &[&str] = match self.view {
            TrainerView::Loading { .. } => {
                lines.push(Line::from(Span::styled(
                    "Loading...",
                    Style::default().fg(colors.text_muted()),
                )));
                &["[Esc] close"]
            }
            TrainerView::Message { text, is_error, .. } => {
                let fg = if *is_error { colors.error() } else { colors.warning() };
                lines.push(Line::from(Span::styled(text.clone(), Style::default().fg(fg))));
                &["[Esc] close"]
            }
            TrainerView::Active {
                steps,
                input,
                answer,
                answer_locked,
                focus,
                feedback,
                error,
                ..
            } => {
                self.step_lines(steps, &mut lines);
                lines.push(Line::from(""));
                self.input_lines(input, *focus, &mut lines);
                lines.push(Line::from(""));
                lines.push(self.answer_line(answer, *answer_locked));
                if let Some(message) = feedback {
                    lines.push(Line::from(Span::styled(
                        message.clone(),
                        Style::default()
                            .fg(colors.warning())
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                if let Some(message) = error {
                    lines.push(Line::from(Span::styled(
                        message.clone(),
                        Style::default().fg(colors.error()),
                    )));
                }
                &[
                    "[Enter] submit",
                    "[Tab] steps/answer",
                    "[^H] hint",
                    "[^N] solve step",
                    "[^R] reveal",
                    "[^K] check",
                    "[^Y] hypothesis",
                    "[^O] continue",
                    "[^E] expand step",
                    "[Esc] close",
                ]
            }
            TrainerView::Complete {
                answer,
                explanation,
                steps,
                ..
            } => {
                lines.push(Line::from(Span::styled(
                    answer.clone(),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )));
                if let Some(text) = explanation {
                    lines.push(Line::from(Span::styled(
                        text.clone(),
                        Style::default().fg(colors.fg()),
                    )));
                }
                lines.push(Line::from(""));
                self.step_lines(steps, &mut lines);
                &["Answer copied to the grid", "[Esc] close"]
            }
        };

        let footer = pack_hint_lines(hints, usize::from(inner.width));
        let footer_height = u16::try_from(footer.len()).unwrap_or(0).min(inner.height);
        let body = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(footer_height),
        );
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(body, buf);

        let footer_area = Rect::new(
            inner.x,
            inner.y + body.height,
            inner.width,
            footer_height,
        );
        let footer_lines: Vec<Line> = footer
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
            .collect();
        Paragraph::new(footer_lines)
            .alignment(Alignment::Left)
            .render(footer_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::view_model::WordChip;

    fn buffer_text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn paint(view: &TrainerView) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 72, 20);
        let mut buf = Buffer::empty(area);
        TrainerPanel::new(view, &theme).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_active_view_shows_steps_words_and_feedback() {
        let view = TrainerView::Active {
            clue: "3 Across: Pale beer (3)".to_string(),
            steps: vec![StepLine {
                index: 0,
                status: StepStatus::Active,
                prompt: "Find the definition".to_string(),
                hint: Some("It's at one end".to_string()),
                detail: None,
            }],
            input: InputView::TapWords(vec![
                WordChip {
                    text: "Pale".to_string(),
                    selected: true,
                    highlighted: false,
                    focused: true,
                },
                WordChip {
                    text: "beer".to_string(),
                    selected: false,
                    highlighted: false,
                    focused: false,
                },
            ]),
            answer: vec![
                AnswerBox {
                    letter: None,
                    cross: false,
                    focused: false,
                },
                AnswerBox {
                    letter: Some('L'),
                    cross: true,
                    focused: false,
                },
            ],
            answer_locked: false,
            focus: Focus::Step,
            feedback: Some("Not quite, try again".to_string()),
            error: None,
        };
        let text = paint(&view);
        assert!(text.contains("Clue trainer"));
        assert!(text.contains("3 Across: Pale beer (3)"));
        assert!(text.contains("▶ Find the definition"));
        assert!(text.contains("Hint: It's at one end"));
        assert!(text.contains("Pale beer"));
        assert!(text.contains(" _   L "));
        assert!(text.contains("Not quite, try again"));
    }

    #[test]
    fn test_complete_view_shows_answer() {
        let view = TrainerView::Complete {
            clue: "3 Across: Pale beer (3)".to_string(),
            answer: "ALE".to_string(),
            explanation: Some("Pale minus P".to_string()),
            steps: Vec::new(),
        };
        let text = paint(&view);
        assert!(text.contains("ALE"));
        assert!(text.contains("Pale minus P"));
        assert!(text.contains("Answer copied to the grid"));
    }
}
