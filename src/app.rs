use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::Config;
use crate::puzzle::{Pos, Puzzle, PuzzleId};
use crate::session::answer_bridge;
use crate::session::navigator::{NavCommand, Navigator, Transition};
use crate::store::json_store::{ProgressStore, StartFresh};
use crate::store::schema::SavedProgress;
use crate::trainer::protocol::{StartRequest, StepInput, TrainerRender};
use crate::trainer::session::{Focus, ReplyOutcome, TrainerSession};
use crate::trainer::transport::{Dispatcher, Outgoing, TrainerReply};
use crate::ui::layout::{AppLayout, GridGeometry};
use crate::ui::theme::Theme;

pub struct App {
    pub navigator: Navigator,
    pub trainer: TrainerSession,
    pub theme: &'static Theme,
    pub config: Config,
    pub status: Option<String>,
    pub should_quit: bool,
    pub terminal_size: Rect,
    store: Option<ProgressStore>,
    dispatcher: Option<Dispatcher>,
    // Word the open trainer session was started for.
    trainer_cells: Vec<Pos>,
}

impl App {
    pub fn new(puzzle: Puzzle, config: Config, theme: &'static Theme) -> Self {
        let store = ProgressStore::with_base_dir(config.progress_dir.clone().into())
            .map_err(|e| log::warn!("progress will not be saved: {e:#}"))
            .ok();
        let trainer = TrainerSession::new(config.feedback_flash());

        let mut app = Self {
            navigator: Navigator::new(puzzle),
            trainer,
            theme,
            config,
            status: None,
            should_quit: false,
            terminal_size: Rect::default(),
            store,
            dispatcher: None,
            trainer_cells: Vec::new(),
        };
        app.restore_progress();
        app
    }

    pub fn set_dispatcher(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = Some(dispatcher);
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.navigator.puzzle()
    }

    pub fn puzzle_id(&self) -> PuzzleId {
        self.navigator.puzzle().id()
    }

    /// Pick up where the solver left off, or start fresh.
    pub fn restore_progress(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let id = self.puzzle_id();
        match store.load(&id, self.navigator.puzzle().layout()) {
            Ok(saved) => {
                if self
                    .navigator
                    .restore(saved.user_grid, saved.cursor, saved.direction)
                {
                    log::info!("restored progress for {id}");
                } else {
                    store.clear(&id);
                }
            }
            Err(StartFresh::NothingSaved) => {}
            Err(reason) => {
                log::info!("starting {id} fresh: {reason:?}");
                self.status = Some("Saved progress did not match this puzzle".to_string());
            }
        }
    }

    fn save_progress(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = SavedProgress::new(
            self.navigator.grid().clone(),
            self.navigator.cursor(),
            self.navigator.direction(),
        );
        store.save(&self.puzzle_id(), &data);
    }

    pub fn handle_nav(&mut self, command: NavCommand) -> Transition {
        let transition = self.navigator.apply(command);
        if transition.changed() {
            self.save_progress();
        }
        transition
    }

    pub fn clear_progress(&mut self) {
        if let Some(store) = &self.store {
            store.clear(&self.puzzle_id());
        }
        self.close_trainer();
        self.navigator.reset();
        self.status = Some("Progress cleared".to_string());
    }

    /// Map a left click to a grid cell using the geometry the painter uses.
    pub fn click(&mut self, x: u16, y: u16) {
        let inner = AppLayout::new(self.terminal_size).grid_inner();
        let puzzle = self.navigator.puzzle();
        let geometry = GridGeometry::fit(inner, puzzle.rows(), puzzle.cols());
        if let Some(pos) = geometry.cell_at(x, y) {
            self.handle_nav(NavCommand::Select(pos));
        }
    }

    // --- trainer ---

    pub fn open_trainer(&mut self) {
        let Some(clue) = self.navigator.current_clue().cloned() else {
            self.status = Some("Select a clue first".to_string());
            return;
        };
        let cells = self.navigator.current_word();
        let puzzle = self.navigator.puzzle();
        let request = StartRequest {
            clue_text: clue.clue_text,
            enumeration: clue.enumeration,
            cross_letters: puzzle.letters_in(self.navigator.grid(), &cells),
            puzzle_number: puzzle.number,
            clue_number: clue.number,
            direction: self.navigator.direction(),
        };
        self.trainer_cells = cells;
        self.status = None;
        let outgoing = self.trainer.start(request);
        self.send(Some(outgoing));
    }

    pub fn close_trainer(&mut self) {
        self.trainer.close();
        self.trainer_cells.clear();
    }

    pub fn send(&mut self, outgoing: Option<Outgoing>) {
        let Some(outgoing) = outgoing else {
            return;
        };
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch(outgoing),
            None => {
                log::warn!("no trainer connection; dropping {}", outgoing.request.kind().path());
                self.status = Some("Trainer is offline".to_string());
            }
        }
    }

    /// Enter in the panel: submit the step, continue a step that takes no
    /// input, or check the answer when the answer boxes have focus.
    pub fn trainer_enter(&mut self) {
        let outgoing = if self.trainer.local().focus == Focus::Answer {
            self.trainer.check_answer()
        } else {
            match self.trainer.render() {
                Some(TrainerRender::InProgress(active))
                    if matches!(active.step_input, StepInput::None) =>
                {
                    self.trainer.continue_step()
                }
                _ => self.trainer.submit(),
            }
        };
        self.send(outgoing);
    }

    pub fn on_trainer_reply(&mut self, reply: TrainerReply, now: Instant) {
        if let ReplyOutcome::Completed { answer } = self.trainer.receive(reply, now) {
            let cells = std::mem::take(&mut self.trainer_cells);
            let written = answer_bridge::apply(&mut self.navigator, &cells, &answer);
            if !written.is_empty() {
                self.save_progress();
            }
            self.status = Some(format!("Solved: {answer}"));
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.trainer.expire_feedback(now);
    }
}
