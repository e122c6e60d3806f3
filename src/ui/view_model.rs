//! Pure projections of engine state into what the widgets paint.
//! Nothing here touches the terminal, so it is tested without one.

use std::time::Instant;

use crate::puzzle::{Direction, Pos};
use crate::session::navigator::Navigator;
use crate::trainer::protocol::{ActiveRender, StartRequest, StepInput, StepStatus, TrainerRender};
use crate::trainer::session::{Focus, SessionStatus, TrainerSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellHighlight {
    None,
    Word,
    Cursor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellView {
    Black,
    Open {
        letter: Option<char>,
        number: Option<u32>,
        highlight: CellHighlight,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridView {
    pub cells: Vec<Vec<CellView>>,
    pub clue_label: Option<String>,
    pub filled: usize,
    pub open: usize,
}

pub fn clue_label(number: u32, direction: Direction, text: &str, enumeration: &str) -> String {
    if enumeration.is_empty() {
        format!("{number} {direction}: {text}")
    } else {
        format!("{number} {direction}: {text} ({enumeration})")
    }
}

pub fn grid_view(nav: &Navigator) -> GridView {
    let puzzle = nav.puzzle();
    let grid = nav.grid();
    let word = nav.current_word();
    let cursor = nav.cursor();

    let cells = (0..puzzle.rows())
        .map(|r| {
            (0..puzzle.cols())
                .map(|c| {
                    let pos = Pos::new(r, c);
                    if puzzle.is_black(pos) {
                        return CellView::Black;
                    }
                    let highlight = if cursor == Some(pos) {
                        CellHighlight::Cursor
                    } else if word.contains(&pos) {
                        CellHighlight::Word
                    } else {
                        CellHighlight::None
                    };
                    CellView::Open {
                        letter: grid.letter(pos),
                        number: puzzle.cell_number(pos),
                        highlight,
                    }
                })
                .collect()
        })
        .collect();

    let clue_label = nav.current_clue().map(|clue| {
        clue_label(clue.number, nav.direction(), &clue.clue_text, &clue.enumeration)
    });

    GridView {
        cells,
        clue_label,
        filled: grid.filled_count(),
        open: grid.open_count(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClueLine {
    pub number: u32,
    pub text: String,
    pub active: bool,
    pub filled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClueListView {
    pub across: Vec<ClueLine>,
    pub down: Vec<ClueLine>,
}

pub fn clue_list_view(nav: &Navigator) -> ClueListView {
    let puzzle = nav.puzzle();
    let active = nav
        .cursor()
        .and_then(|p| puzzle.clue_number_at(p, nav.direction()))
        .map(|n| (nav.direction(), n));
    let lines = |direction: Direction| {
        puzzle
            .clues
            .get(direction)
            .iter()
            .map(|clue| {
                let filled = puzzle
                    .numbering_entry(direction, clue.number)
                    .map(|e| puzzle.word_cells(e.start(), direction))
                    .is_some_and(|cells| cells.iter().all(|&p| nav.grid().letter(p).is_some()));
                let text = if clue.enumeration.is_empty() {
                    clue.clue_text.clone()
                } else {
                    format!("{} ({})", clue.clue_text, clue.enumeration)
                };
                ClueLine {
                    number: clue.number,
                    text,
                    active: active == Some((direction, clue.number)),
                    filled,
                }
            })
            .collect()
    };
    ClueListView {
        across: lines(Direction::Across),
        down: lines(Direction::Down),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepLine {
    pub index: usize,
    pub status: StepStatus,
    pub prompt: String,
    pub hint: Option<String>,
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordChip {
    pub text: String,
    pub selected: bool,
    pub highlighted: bool,
    pub focused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputView {
    TapWords(Vec<WordChip>),
    Text { buffer: String },
    Choices { options: Vec<String>, focused: usize },
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerBox {
    pub letter: Option<char>,
    pub cross: bool,
    pub focused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerView {
    Loading {
        clue: String,
    },
    Message {
        clue: String,
        text: String,
        is_error: bool,
    },
    Active {
        clue: String,
        steps: Vec<StepLine>,
        input: InputView,
        answer: Vec<AnswerBox>,
        answer_locked: bool,
        focus: Focus,
        feedback: Option<String>,
        error: Option<String>,
    },
    Complete {
        clue: String,
        answer: String,
        explanation: Option<String>,
        steps: Vec<StepLine>,
    },
}

fn start_label(start: Option<&StartRequest>) -> String {
    start
        .map(|s| clue_label(s.clue_number, s.direction, &s.clue_text, &s.enumeration))
        .unwrap_or_default()
}

fn step_lines(render: &TrainerRender) -> Vec<StepLine> {
    render
        .steps()
        .iter()
        .map(|s| StepLine {
            index: s.index,
            status: s.status,
            prompt: s.prompt.clone(),
            hint: s.hint.clone().filter(|_| s.hint_visible),
            detail: s.completion_text.clone().filter(|_| s.expanded),
        })
        .collect()
}

/// `None` when the trainer is closed.
pub fn trainer_view(session: &TrainerSession, now: Instant) -> Option<TrainerView> {
    let clue = start_label(session.clue());
    let view = match session.status() {
        SessionStatus::Idle => return None,
        SessionStatus::Loading => TrainerView::Loading { clue },
        SessionStatus::Unavailable(text) => TrainerView::Message {
            clue,
            text: format!("Trainer not available for this clue: {text}"),
            is_error: false,
        },
        SessionStatus::Failed(text) => TrainerView::Message {
            clue,
            text: text.clone(),
            is_error: true,
        },
        SessionStatus::Ready => {
            let render = session.render()?;
            match render {
                TrainerRender::Complete(done) => TrainerView::Complete {
                    clue,
                    answer: done.answer.clone(),
                    explanation: done.explanation.clone(),
                    steps: step_lines(render),
                },
                TrainerRender::InProgress(active) => active_view(session, render, active, clue, now),
            }
        }
    };
    Some(view)
}

fn active_view(
    session: &TrainerSession,
    render: &TrainerRender,
    active: &ActiveRender,
    clue: String,
    now: Instant,
) -> TrainerView {
    let local = session.local();
    let input = match &active.step_input {
        StepInput::TapWords {
            words,
            highlights,
            selected,
        } => InputView::TapWords(
            words
                .iter()
                .enumerate()
                .map(|(i, w)| WordChip {
                    text: w.clone(),
                    selected: selected.contains(&i),
                    highlighted: highlights.contains(&i),
                    focused: local.focus == Focus::Step && local.word_focus == i,
                })
                .collect(),
        ),
        StepInput::Text => InputView::Text {
            buffer: local.step_text.clone(),
        },
        StepInput::MultipleChoice { options } => InputView::Choices {
            options: options.clone(),
            focused: local.choice,
        },
        StepInput::None => InputView::None,
    };
    let boxes = &active.answer;
    let answer = (0..boxes.len())
        .map(|i| AnswerBox {
            letter: boxes.shown_at(i),
            cross: boxes.cross_at(i).is_some(),
            focused: local.focus == Focus::Answer
                && !boxes.locked
                && local.answer_focus == i,
        })
        .collect();
    TrainerView::Active {
        clue,
        steps: step_lines(render),
        input,
        answer,
        answer_locked: boxes.locked,
        focus: local.focus,
        feedback: session.feedback(now).map(str::to_string),
        error: session.error().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Puzzle;
    use crate::puzzle::tests::SMALL_PUZZLE;
    use crate::trainer::protocol::RawRender;
    use crate::trainer::transport::TrainerReply;
    use serde_json::json;

    fn nav() -> Navigator {
        Navigator::new(Puzzle::from_json(SMALL_PUZZLE).unwrap())
    }

    #[test]
    fn test_grid_view_highlights_word_and_cursor() {
        let mut n = nav();
        n.select(Pos::new(1, 1));
        n.set_letter('a');
        let view = grid_view(&n);
        assert_eq!(view.cells[0][2], CellView::Black);
        assert_eq!(
            view.cells[1][1],
            CellView::Open {
                letter: Some('A'),
                number: None,
                highlight: CellHighlight::Word
            }
        );
        assert!(matches!(
            view.cells[1][2],
            CellView::Open {
                highlight: CellHighlight::Cursor,
                ..
            }
        ));
        assert!(matches!(
            view.cells[0][0],
            CellView::Open {
                number: Some(1),
                highlight: CellHighlight::None,
                ..
            }
        ));
        assert_eq!(view.clue_label.as_deref(), Some("3 Across: Bottom row (3)"));
        assert_eq!((view.filled, view.open), (1, 5));
    }

    #[test]
    fn test_clue_list_marks_active_and_filled() {
        let mut n = nav();
        n.select(Pos::new(0, 0));
        n.set_letter('x');
        n.set_letter('y');
        let view = clue_list_view(&n);
        assert!(view.across[0].active);
        assert!(view.across[0].filled);
        assert!(!view.across[1].filled);
        assert!(!view.down.iter().any(|c| c.active));
        assert_eq!(view.down[1].text, "Middle column (2)");
    }

    #[test]
    fn test_trainer_view_closed_and_loading() {
        let mut session = TrainerSession::default();
        assert_eq!(trainer_view(&session, Instant::now()), None);
        session.start(StartRequest {
            clue_text: "Bottom row".into(),
            enumeration: "3".into(),
            cross_letters: vec![None; 3],
            puzzle_number: 7,
            clue_number: 3,
            direction: Direction::Across,
        });
        assert_eq!(
            trainer_view(&session, Instant::now()),
            Some(TrainerView::Loading {
                clue: "3 Across: Bottom row (3)".into()
            })
        );
    }

    #[test]
    fn test_trainer_view_hides_unrevealed_hint() {
        let mut session = TrainerSession::default();
        let out = session.start(StartRequest {
            clue_text: "Bottom row".into(),
            enumeration: "3".into(),
            cross_letters: vec![None, Some('B'), None],
            puzzle_number: 7,
            clue_number: 3,
            direction: Direction::Across,
        });
        session.receive(
            TrainerReply {
                generation: out.generation,
                kind: out.request.kind(),
                result: Ok(json!({
                    "clue_id": "c3",
                    "inputMode": "tap_words",
                    "words": ["Bottom", "row"],
                    "selectedIndices": [1],
                    "userAnswer": ["", "", ""],
                    "crossLetters": ["", "B", ""],
                    "steps": [
                        {"index": 0, "status": "completed", "prompt": "Type?", "completionText": "Charade"},
                        {"index": 1, "status": "active", "prompt": "Definition?", "hint": "last word", "hintVisible": false}
                    ]
                })),
            },
            Instant::now(),
        );
        let Some(TrainerView::Active {
            steps,
            input,
            answer,
            ..
        }) = trainer_view(&session, Instant::now())
        else {
            panic!("expected active view");
        };
        assert_eq!(steps[0].detail, None);
        assert_eq!(steps[1].hint, None);
        let InputView::TapWords(chips) = input else {
            panic!("expected tap words");
        };
        assert!(chips[0].focused && !chips[0].selected);
        assert!(chips[1].selected);
        assert!(answer[1].cross);
        assert_eq!(answer[1].letter, Some('B'));
    }

    #[test]
    fn test_completion_text_only_when_expanded() {
        let raw: RawRender = serde_json::from_value(json!({
            "inputMode": "text",
            "steps": [
                {"index": 0, "status": "completed", "prompt": "Type?",
                 "completionText": "Charade", "expanded": true},
                {"index": 1, "status": "completed", "prompt": "Definition?",
                 "completionText": "Last word"},
                {"index": 2, "status": "active", "prompt": "Answer?"}
            ]
        }))
        .unwrap();
        let lines = step_lines(&TrainerRender::from(raw));
        assert_eq!(lines[0].detail.as_deref(), Some("Charade"));
        assert_eq!(lines[1].detail, None);
        assert_eq!(lines[2].status, StepStatus::Active);
    }
}
