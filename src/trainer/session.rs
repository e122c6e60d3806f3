use std::time::{Duration, Instant};

use crate::trainer::TrainerError;
use crate::trainer::protocol::{
    self, ActiveRender, AnswerRequest, ClueRequest, InputRequest, RequestKind, StartRequest,
    StepInput, SubmitValue, TrainerRender, TrainerRequest, UiAction, UiStateRequest,
};
use crate::trainer::transport::{Outgoing, TrainerReply};

pub const DEFAULT_FEEDBACK_FLASH: Duration = Duration::from_millis(1500);
const TRY_AGAIN: &str = "Not quite, try again";
const CONNECT_FAILED: &str = "Could not connect to the trainer";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No session; the trainer panel is closed.
    Idle,
    /// Waiting for the start reply.
    Loading,
    Ready,
    /// The server has no walkthrough for this clue.
    Unavailable(String),
    /// Transport or decode failure while starting. Reopen to retry.
    Failed(String),
}

/// Short-lived "try again" message. Cosmetic only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub until: Instant,
}

/// Which part of the panel receives typed keys. Purely local.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Step,
    Answer,
}

/// Presentation-only state that never reaches the server on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalInput {
    pub focus: Focus,
    pub word_focus: usize,
    pub step_text: String,
    pub choice: usize,
    pub answer_focus: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// From a superseded or closed session; ignored.
    Stale,
    Updated,
    /// The render just became complete; hand `answer` to the grid.
    Completed { answer: String },
    Unavailable,
    Failed,
}

/// Client half of a clue-training session.
///
/// Holds the last render the server sent and turns gestures into requests.
/// Every reply replaces the render wholesale. Step correctness is never
/// decided here.
pub struct TrainerSession {
    generation: u64,
    status: SessionStatus,
    start: Option<StartRequest>,
    clue_id: Option<String>,
    render: Option<TrainerRender>,
    feedback: Option<Feedback>,
    error: Option<String>,
    local: LocalInput,
    flash: Duration,
}

impl Default for TrainerSession {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK_FLASH)
    }
}

impl TrainerSession {
    pub fn new(flash: Duration) -> Self {
        Self {
            generation: 0,
            status: SessionStatus::Idle,
            start: None,
            clue_id: None,
            render: None,
            feedback: None,
            error: None,
            local: LocalInput::default(),
            flash,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_open(&self) -> bool {
        self.status != SessionStatus::Idle
    }

    pub fn clue(&self) -> Option<&StartRequest> {
        self.start.as_ref()
    }

    pub fn render(&self) -> Option<&TrainerRender> {
        self.render.as_ref()
    }

    pub fn local(&self) -> &LocalInput {
        &self.local
    }

    /// Last non-fatal error from a request after the session started.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn feedback(&self, now: Instant) -> Option<&str> {
        self.feedback
            .as_ref()
            .filter(|f| now < f.until)
            .map(|f| f.message.as_str())
    }

    /// Drop an expired feedback flash. Returns true if one was removed.
    pub fn expire_feedback(&mut self, now: Instant) -> bool {
        if self.feedback.as_ref().is_some_and(|f| now >= f.until) {
            self.feedback = None;
            return true;
        }
        false
    }

    /// Begin a new session, superseding any previous one.
    pub fn start(&mut self, request: StartRequest) -> Outgoing {
        self.reset();
        self.generation += 1;
        self.status = SessionStatus::Loading;
        self.start = Some(request.clone());
        log::info!(
            "starting trainer for {} {} (generation {})",
            request.clue_number,
            request.direction,
            self.generation
        );
        Outgoing {
            generation: self.generation,
            request: TrainerRequest::Start(request),
        }
    }

    /// Forget the session locally. The server is not told; in-flight
    /// replies become stale.
    pub fn close(&mut self) {
        self.reset();
        self.generation += 1;
    }

    fn reset(&mut self) {
        self.status = SessionStatus::Idle;
        self.start = None;
        self.clue_id = None;
        self.render = None;
        self.feedback = None;
        self.error = None;
        self.local = LocalInput::default();
    }

    /// The in-progress render, if gestures are currently accepted.
    fn active(&self) -> Option<(&str, &ActiveRender)> {
        if self.status != SessionStatus::Ready {
            return None;
        }
        match (&self.clue_id, &self.render) {
            (Some(id), Some(TrainerRender::InProgress(render))) => Some((id.as_str(), render)),
            _ => None,
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.active().is_some()
    }

    fn outgoing(&self, request: TrainerRequest) -> Outgoing {
        Outgoing {
            generation: self.generation,
            request,
        }
    }

    fn clue_request(&self) -> Option<ClueRequest> {
        let (clue_id, _) = self.active()?;
        Some(ClueRequest {
            clue_id: clue_id.to_string(),
        })
    }

    fn ui_state(&self, action: UiAction) -> Option<Outgoing> {
        let (clue_id, _) = self.active()?;
        Some(self.outgoing(TrainerRequest::UiState(UiStateRequest {
            clue_id: clue_id.to_string(),
            action,
        })))
    }

    /// Toggle a clue word in the pending selection. The server decides
    /// the new selection.
    pub fn select_word(&mut self, index: usize) -> Option<Outgoing> {
        let (_, render) = self.active()?;
        let StepInput::TapWords { words, .. } = &render.step_input else {
            return None;
        };
        if index >= words.len() {
            return None;
        }
        self.local.word_focus = index;
        self.ui_state(UiAction::SelectWord { index })
    }

    pub fn select_focused_word(&mut self) -> Option<Outgoing> {
        self.select_word(self.local.word_focus)
    }

    /// Submit the current step's value, shaped by its input mode.
    pub fn submit(&mut self) -> Option<Outgoing> {
        let (clue_id, render) = self.active()?;
        let value = match &render.step_input {
            StepInput::TapWords { selected, .. } => SubmitValue::Indices(selected.clone()),
            StepInput::Text => {
                if self.local.step_text.trim().is_empty() {
                    return None;
                }
                SubmitValue::Text(self.local.step_text.clone())
            }
            StepInput::MultipleChoice { options } => {
                if self.local.choice >= options.len() {
                    return None;
                }
                SubmitValue::Choice(self.local.choice)
            }
            StepInput::None => return None,
        };
        let start = self.start.as_ref()?;
        let request = TrainerRequest::Input(InputRequest {
            clue_id: clue_id.to_string(),
            value,
            cross_letters: start.cross_letters.clone(),
            enumeration: start.enumeration.clone(),
        });
        Some(self.outgoing(request))
    }

    /// Set one answer box. Locked boxes and cross-letter boxes are
    /// read-only.
    pub fn type_answer_letter(&mut self, position: usize, letter: char) -> Option<Outgoing> {
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        let next = {
            let (_, render) = self.active()?;
            let boxes = &render.answer;
            if boxes.locked || position >= boxes.len() || boxes.cross_at(position).is_some() {
                return None;
            }
            (position + 1..boxes.len())
                .find(|&p| boxes.cross_at(p).is_none())
                .unwrap_or(position)
        };
        self.local.answer_focus = next;
        self.ui_state(UiAction::TypeAnswer {
            position,
            letter: letter.to_ascii_uppercase().to_string(),
        })
    }

    pub fn type_focused_letter(&mut self, letter: char) -> Option<Outgoing> {
        self.type_answer_letter(self.local.answer_focus, letter)
    }

    /// Blank the focused answer box, or the previous one if already blank.
    pub fn erase_answer_letter(&mut self) -> Option<Outgoing> {
        let position = {
            let (_, render) = self.active()?;
            let boxes = &render.answer;
            if boxes.locked || boxes.is_empty() {
                return None;
            }
            let focus = self.local.answer_focus.min(boxes.len() - 1);
            let writable = |p: usize| boxes.cross_at(p).is_none();
            if writable(focus) && boxes.letters.get(focus).copied().flatten().is_some() {
                focus
            } else {
                (0..focus).rev().find(|&p| writable(p))?
            }
        };
        self.local.answer_focus = position;
        self.ui_state(UiAction::TypeAnswer {
            position,
            letter: String::new(),
        })
    }

    pub fn toggle_hint(&mut self) -> Option<Outgoing> {
        let (_, render) = self.active()?;
        let step_index = render.active_step()?.index;
        self.ui_state(UiAction::ToggleHint { step_index })
    }

    pub fn expand_step(&mut self, step_index: usize) -> Option<Outgoing> {
        let (_, render) = self.active()?;
        render.steps.iter().find(|s| s.index == step_index)?;
        self.ui_state(UiAction::ExpandStep { step_index })
    }

    pub fn reveal_step(&mut self) -> Option<Outgoing> {
        let request = self.clue_request()?;
        Some(self.outgoing(TrainerRequest::SolveStep(request)))
    }

    pub fn reveal_full(&mut self) -> Option<Outgoing> {
        let request = self.clue_request()?;
        Some(self.outgoing(TrainerRequest::Reveal(request)))
    }

    pub fn continue_step(&mut self) -> Option<Outgoing> {
        let request = self.clue_request()?;
        Some(self.outgoing(TrainerRequest::Continue(request)))
    }

    fn answer_request(&self) -> Option<AnswerRequest> {
        let (clue_id, render) = self.active()?;
        let answer = render.answer.text();
        if answer.is_empty() {
            return None;
        }
        Some(AnswerRequest {
            clue_id: clue_id.to_string(),
            answer,
        })
    }

    pub fn check_answer(&mut self) -> Option<Outgoing> {
        let request = self.answer_request()?;
        Some(self.outgoing(TrainerRequest::CheckAnswer(request)))
    }

    pub fn hypothesis(&mut self) -> Option<Outgoing> {
        let request = self.answer_request()?;
        Some(self.outgoing(TrainerRequest::Hypothesis(request)))
    }

    // Local-only edits below: focus movement and text buffers.

    pub fn toggle_focus(&mut self) {
        self.local.focus = match self.local.focus {
            Focus::Step => Focus::Answer,
            Focus::Answer => Focus::Step,
        };
    }

    pub fn move_word_focus(&mut self, forward: bool) {
        let Some((_, render)) = self.active() else {
            return;
        };
        let StepInput::TapWords { words, .. } = &render.step_input else {
            return;
        };
        if words.is_empty() {
            return;
        }
        let len = words.len();
        self.local.word_focus = if forward {
            (self.local.word_focus + 1) % len
        } else {
            (self.local.word_focus + len - 1) % len
        };
    }

    pub fn move_choice(&mut self, forward: bool) {
        let Some((_, render)) = self.active() else {
            return;
        };
        let StepInput::MultipleChoice { options } = &render.step_input else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let len = options.len();
        self.local.choice = if forward {
            (self.local.choice + 1) % len
        } else {
            (self.local.choice + len - 1) % len
        };
    }

    pub fn move_answer_focus(&mut self, forward: bool) {
        let Some((_, render)) = self.active() else {
            return;
        };
        let boxes = &render.answer;
        let focus = self.local.answer_focus;
        let next = if forward {
            (focus + 1..boxes.len()).find(|&p| boxes.is_writable(p))
        } else {
            (0..focus).rev().find(|&p| boxes.is_writable(p))
        };
        if let Some(next) = next {
            self.local.answer_focus = next;
        }
    }

    pub fn push_step_char(&mut self, ch: char) {
        if self.accepts_input() {
            self.local.step_text.push(ch);
        }
    }

    pub fn pop_step_char(&mut self) {
        self.local.step_text.pop();
    }

    /// Apply a reply. Replies from a superseded generation are dropped.
    pub fn receive(&mut self, reply: TrainerReply, now: Instant) -> ReplyOutcome {
        if reply.generation != self.generation || !self.is_open() {
            log::debug!(
                "ignoring stale {} reply (generation {}, current {})",
                reply.kind.path(),
                reply.generation,
                self.generation
            );
            return ReplyOutcome::Stale;
        }
        let value = match reply.result {
            Ok(value) => value,
            Err(e) => return self.fail(reply.kind, &TrainerError::from(e)),
        };
        match reply.kind {
            RequestKind::Start => match protocol::parse_start(value) {
                Ok(resp) => {
                    self.clue_id = Some(resp.clue_id);
                    self.status = SessionStatus::Ready;
                    self.replace_render(resp.render.into())
                }
                Err(TrainerError::Protocol(message)) => {
                    log::info!("trainer unavailable: {message}");
                    self.status = SessionStatus::Unavailable(message);
                    ReplyOutcome::Unavailable
                }
                Err(e) => self.fail(reply.kind, &e),
            },
            RequestKind::Input => match protocol::parse_input(value) {
                Ok(resp) => {
                    if resp.correct {
                        self.local.step_text.clear();
                        self.local.choice = 0;
                        self.feedback = None;
                    } else {
                        self.feedback = Some(Feedback {
                            message: resp.message.unwrap_or_else(|| TRY_AGAIN.to_string()),
                            until: now + self.flash,
                        });
                    }
                    match resp.render {
                        Some(raw) => self.replace_render(raw.into()),
                        None => ReplyOutcome::Updated,
                    }
                }
                Err(e) => self.fail(reply.kind, &e),
            },
            _ => match protocol::parse_render(value) {
                Ok(raw) => self.replace_render(raw.into()),
                Err(e) => self.fail(reply.kind, &e),
            },
        }
    }

    fn replace_render(&mut self, render: TrainerRender) -> ReplyOutcome {
        let was_complete = self.render.as_ref().is_some_and(TrainerRender::is_complete);
        self.error = None;
        if let TrainerRender::InProgress(active) = &render {
            if let StepInput::TapWords { words, .. } = &active.step_input {
                self.local.word_focus = self.local.word_focus.min(words.len().saturating_sub(1));
            }
            self.local.answer_focus = active
                .answer
                .writable_near(self.local.answer_focus)
                .unwrap_or(0);
        }
        let outcome = match &render {
            TrainerRender::Complete(done) if !was_complete => ReplyOutcome::Completed {
                answer: done.answer.clone(),
            },
            _ => ReplyOutcome::Updated,
        };
        self.render = Some(render);
        outcome
    }

    fn fail(&mut self, kind: RequestKind, error: &TrainerError) -> ReplyOutcome {
        let message = match error {
            TrainerError::Protocol(message) => message.clone(),
            _ => CONNECT_FAILED.to_string(),
        };
        log::warn!("trainer {} failed: {error}", kind.path());
        if kind == RequestKind::Start {
            self.status = SessionStatus::Failed(message);
        } else {
            self.error = Some(message);
        }
        ReplyOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Direction;
    use crate::trainer::transport::TransportError;
    use serde_json::{Value, json};

    fn start_request() -> StartRequest {
        StartRequest {
            clue_text: "Flower of London (6)".into(),
            enumeration: "6".into(),
            cross_letters: vec![Some('T'), None, None, None, None, None],
            puzzle_number: 29001,
            clue_number: 4,
            direction: Direction::Down,
        }
    }

    fn reply(out: &Outgoing, result: Result<Value, TransportError>) -> TrainerReply {
        TrainerReply {
            generation: out.generation,
            kind: out.request.kind(),
            result,
        }
    }

    fn started(render: Value) -> TrainerSession {
        let mut session = TrainerSession::default();
        let out = session.start(start_request());
        let mut body = render;
        body["clue_id"] = json!("c1");
        session.receive(reply(&out, Ok(body)), Instant::now());
        assert_eq!(session.status(), &SessionStatus::Ready);
        session
    }

    #[test]
    fn test_start_unavailable() {
        let mut session = TrainerSession::default();
        let out = session.start(start_request());
        assert_eq!(session.status(), &SessionStatus::Loading);
        let outcome = session.receive(reply(&out, Ok(json!({"error": "Clue not annotated"}))), Instant::now());
        assert_eq!(outcome, ReplyOutcome::Unavailable);
        assert_eq!(
            session.status(),
            &SessionStatus::Unavailable("Clue not annotated".into())
        );
        assert!(!session.accepts_input());
    }

    #[test]
    fn test_start_transport_failure() {
        let mut session = TrainerSession::default();
        let out = session.start(start_request());
        let outcome = session.receive(
            reply(&out, Err(TransportError::Connect("refused".into()))),
            Instant::now(),
        );
        assert_eq!(outcome, ReplyOutcome::Failed);
        assert_eq!(session.status(), &SessionStatus::Failed(CONNECT_FAILED.into()));
    }

    #[test]
    fn test_stale_reply_after_restart_ignored() {
        let mut session = TrainerSession::default();
        let first = session.start(start_request());
        let second = session.start(start_request());
        let outcome = session.receive(
            reply(&first, Ok(json!({"clue_id": "old", "inputMode": "text"}))),
            Instant::now(),
        );
        assert_eq!(outcome, ReplyOutcome::Stale);
        assert_eq!(session.status(), &SessionStatus::Loading);
        session.receive(
            reply(&second, Ok(json!({"clue_id": "new", "inputMode": "text"}))),
            Instant::now(),
        );
        assert!(session.accepts_input());
    }

    #[test]
    fn test_reply_after_close_ignored() {
        let mut session = TrainerSession::default();
        let out = session.start(start_request());
        session.close();
        let outcome = session.receive(reply(&out, Ok(json!({"clue_id": "c1"}))), Instant::now());
        assert_eq!(outcome, ReplyOutcome::Stale);
        assert!(!session.is_open());
    }

    #[test]
    fn test_tap_words_submit_sends_server_selection() {
        let mut session = started(json!({
            "inputMode": "tap_words",
            "words": ["Flower", "of", "London"],
            "selectedIndices": [0, 2]
        }));
        let out = session.submit().unwrap();
        let body = out.request.body().unwrap();
        assert_eq!(out.request.kind(), RequestKind::Input);
        assert_eq!(body["value"], json!([0, 2]));
        assert_eq!(body["crossLetters"], json!(["T", "", "", "", "", ""]));
        assert_eq!(body["enumeration"], json!("6"));
    }

    #[test]
    fn test_select_word_round_trips_without_local_change() {
        let mut session = started(json!({
            "inputMode": "tap_words",
            "words": ["Flower", "of", "London"],
            "selectedIndices": []
        }));
        let out = session.select_word(1).unwrap();
        assert_eq!(
            out.request.body().unwrap(),
            json!({"clue_id": "c1", "action": "select_word", "index": 1})
        );
        let Some(TrainerRender::InProgress(r)) = session.render() else {
            panic!("expected in-progress render");
        };
        assert_eq!(
            r.step_input,
            StepInput::TapWords {
                words: vec!["Flower".into(), "of".into(), "London".into()],
                highlights: vec![],
                selected: vec![],
            }
        );
        assert!(session.select_word(3).is_none());
    }

    #[test]
    fn test_text_submit_concatenates_buffer() {
        let mut session = started(json!({"inputMode": "text"}));
        assert!(session.submit().is_none());
        for ch in "LON".chars() {
            session.push_step_char(ch);
        }
        session.push_step_char('X');
        session.pop_step_char();
        session.push_step_char('D');
        let out = session.submit().unwrap();
        assert_eq!(out.request.body().unwrap()["value"], json!("LOND"));
    }

    #[test]
    fn test_multiple_choice_submit_sends_index() {
        let mut session = started(json!({
            "inputMode": "multiple_choice",
            "options": ["anagram", "hidden word", "charade"]
        }));
        session.move_choice(false);
        let out = session.submit().unwrap();
        assert_eq!(out.request.body().unwrap()["value"], json!(2));
    }

    #[test]
    fn test_wrong_answer_flash_expires() {
        let mut session = started(json!({"inputMode": "text"}));
        session.push_step_char('A');
        let out = session.submit().unwrap();
        let now = Instant::now();
        let outcome = session.receive(
            reply(&out, Ok(json!({"correct": false, "render": {"inputMode": "text"}}))),
            now,
        );
        assert_eq!(outcome, ReplyOutcome::Updated);
        assert_eq!(session.feedback(now), Some(TRY_AGAIN));
        assert_eq!(session.local().step_text, "A");
        let later = now + DEFAULT_FEEDBACK_FLASH;
        assert_eq!(session.feedback(later), None);
        assert!(session.expire_feedback(later));
        assert!(session.accepts_input());
    }

    #[test]
    fn test_typing_skips_cross_letters_and_respects_lock() {
        let mut session = started(json!({
            "inputMode": "none",
            "userAnswer": ["", "", ""],
            "crossLetters": ["", "H", ""]
        }));
        session.toggle_focus();
        let out = session.type_focused_letter('t').unwrap();
        assert_eq!(
            out.request.body().unwrap(),
            json!({"clue_id": "c1", "action": "type_answer", "position": 0, "letter": "T"})
        );
        assert_eq!(session.local().answer_focus, 2);
        assert!(session.type_answer_letter(1, 'x').is_none());

        let locked = session.receive(
            reply(&out, Ok(json!({
                "inputMode": "none",
                "userAnswer": ["T", "", "E"],
                "crossLetters": ["", "H", ""],
                "answerLocked": true
            }))),
            Instant::now(),
        );
        assert_eq!(locked, ReplyOutcome::Updated);
        assert!(session.type_answer_letter(2, 'e').is_none());
        assert!(session.erase_answer_letter().is_none());
    }

    #[test]
    fn test_answer_focus_avoids_cross_letters() {
        let mut session = started(json!({
            "inputMode": "none",
            "userAnswer": ["", "", "", ""],
            "crossLetters": ["T", "", "H", ""]
        }));
        assert_eq!(session.local().answer_focus, 1);
        session.move_answer_focus(false);
        assert_eq!(session.local().answer_focus, 1);
        session.move_answer_focus(true);
        assert_eq!(session.local().answer_focus, 3);
        session.move_answer_focus(true);
        assert_eq!(session.local().answer_focus, 3);
        session.move_answer_focus(false);
        assert_eq!(session.local().answer_focus, 1);

        session.toggle_focus();
        let out = session.type_focused_letter('a').unwrap();
        assert_eq!(out.request.body().unwrap()["position"], json!(1));
        assert_eq!(session.local().answer_focus, 3);
    }

    #[test]
    fn test_erase_steps_back_over_cross_letters() {
        let mut session = started(json!({
            "userAnswer": ["T", "", ""],
            "crossLetters": ["", "H", ""]
        }));
        session.move_answer_focus(true);
        session.move_answer_focus(true);
        let out = session.erase_answer_letter().unwrap();
        assert_eq!(out.request.body().unwrap()["position"], json!(0));
        assert_eq!(out.request.body().unwrap()["letter"], json!(""));
    }

    #[test]
    fn test_reveal_completes_once_and_locks_input() {
        let mut session = started(json!({
            "inputMode": "text",
            "steps": [{"index": 0, "status": "active", "prompt": "Definition?", "hint": "river"}]
        }));
        let hint = session.toggle_hint().unwrap();
        assert_eq!(
            hint.request.body().unwrap(),
            json!({"clue_id": "c1", "action": "toggle_hint", "step_index": 0})
        );
        let out = session.reveal_full().unwrap();
        assert_eq!(out.request.kind().path(), "/trainer/reveal");
        let done = json!({"complete": true, "answer": "THAMES", "explanation": "Flower = river"});
        let outcome = session.receive(reply(&out, Ok(done.clone())), Instant::now());
        assert_eq!(
            outcome,
            ReplyOutcome::Completed {
                answer: "THAMES".into()
            }
        );
        assert!(!session.accepts_input());
        assert!(session.submit().is_none());
        assert!(session.reveal_step().is_none());
        assert_eq!(session.receive(reply(&out, Ok(done)), Instant::now()), ReplyOutcome::Updated);
    }

    #[test]
    fn test_later_request_failure_keeps_render() {
        let mut session = started(json!({"inputMode": "text"}));
        let out = session.continue_step().unwrap();
        let outcome = session.receive(
            reply(&out, Ok(json!({"success": false, "error": "Nothing to continue"}))),
            Instant::now(),
        );
        assert_eq!(outcome, ReplyOutcome::Failed);
        assert_eq!(session.error(), Some("Nothing to continue"));
        assert!(session.accepts_input());
    }

    #[test]
    fn test_check_answer_sends_box_text() {
        let mut session = started(json!({
            "userAnswer": ["", "H", "A", "M", "E", "S"],
            "crossLetters": ["T", "", "", "", "", ""]
        }));
        let out = session.check_answer().unwrap();
        assert_eq!(
            out.request.body().unwrap(),
            json!({"clue_id": "c1", "answer": "THAMES"})
        );
        let out = session.hypothesis().unwrap();
        assert_eq!(out.request.kind().path(), "/trainer/hypothesis");
    }
}
