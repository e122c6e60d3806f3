//! Wire types for the clue trainer endpoints.
//!
//! The server owns every field of a render descriptor. Responses are read
//! into permissive `Raw*` structs and then converted into [`TrainerRender`],
//! whose variants carry only the fields that matter for that state.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::puzzle::Direction;
use crate::trainer::TrainerError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    TapWords,
    Text,
    MultipleChoice,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Active,
    Completed,
    #[default]
    #[serde(other)]
    Pending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Step {
    pub index: usize,
    pub status: StepStatus,
    pub input_mode: InputMode,
    pub prompt: String,
    pub hint: Option<String>,
    pub hint_visible: bool,
    pub completion_text: Option<String>,
    pub expanded: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRender {
    pub input_mode: InputMode,
    pub phase_id: Option<String>,
    pub words: Vec<String>,
    pub highlights: Vec<usize>,
    pub selected_indices: Vec<usize>,
    pub options: Vec<String>,
    pub user_answer: Vec<String>,
    pub cross_letters: Vec<String>,
    pub enumeration: String,
    pub answer_locked: bool,
    pub complete: bool,
    pub answer: Option<String>,
    #[serde(alias = "breakdown")]
    pub explanation: Option<String>,
    pub steps: Vec<Step>,
}

/// Input the current step expects, with only the data it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepInput {
    TapWords {
        words: Vec<String>,
        highlights: Vec<usize>,
        selected: Vec<usize>,
    },
    Text,
    MultipleChoice {
        options: Vec<String>,
    },
    None,
}

/// Answer entry boxes. Cross letters are fixed and never typed over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerBoxes {
    pub letters: Vec<Option<char>>,
    pub cross_letters: Vec<Option<char>>,
    pub enumeration: String,
    pub locked: bool,
}

impl AnswerBoxes {
    pub fn len(&self) -> usize {
        self.letters.len().max(self.cross_letters.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cross_at(&self, position: usize) -> Option<char> {
        self.cross_letters.get(position).copied().flatten()
    }

    pub fn is_writable(&self, position: usize) -> bool {
        position < self.len() && self.cross_at(position).is_none()
    }

    /// Nearest writable box at or after `from`, else the last one before it.
    pub fn writable_near(&self, from: usize) -> Option<usize> {
        let len = self.len();
        (from..len)
            .find(|&p| self.is_writable(p))
            .or_else(|| (0..from.min(len)).rev().find(|&p| self.is_writable(p)))
    }

    /// Letter shown in a box: the cross letter wins.
    pub fn shown_at(&self, position: usize) -> Option<char> {
        self.cross_at(position)
            .or_else(|| self.letters.get(position).copied().flatten())
    }

    /// Leading run of filled boxes; stops at the first blank so later
    /// letters keep their positions.
    pub fn filled_prefix(&self) -> String {
        (0..self.len()).map_while(|i| self.shown_at(i)).collect()
    }

    pub fn text(&self) -> String {
        (0..self.len())
            .map(|i| self.shown_at(i).unwrap_or(' '))
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveRender {
    pub phase_id: Option<String>,
    pub step_input: StepInput,
    pub answer: AnswerBoxes,
    pub steps: Vec<Step>,
}

impl ActiveRender {
    pub fn active_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.status == StepStatus::Active)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompleteRender {
    pub answer: String,
    pub explanation: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerRender {
    InProgress(ActiveRender),
    Complete(CompleteRender),
}

impl TrainerRender {
    pub fn is_complete(&self) -> bool {
        matches!(self, TrainerRender::Complete(_))
    }

    pub fn steps(&self) -> &[Step] {
        match self {
            TrainerRender::InProgress(r) => &r.steps,
            TrainerRender::Complete(r) => &r.steps,
        }
    }
}

fn letter_slot(s: &str) -> Option<char> {
    s.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
}

impl From<RawRender> for TrainerRender {
    fn from(raw: RawRender) -> Self {
        let answer = AnswerBoxes {
            letters: raw.user_answer.iter().map(|s| letter_slot(s)).collect(),
            cross_letters: raw.cross_letters.iter().map(|s| letter_slot(s)).collect(),
            enumeration: raw.enumeration,
            locked: raw.answer_locked,
        };
        if raw.complete {
            let answer = raw.answer.unwrap_or_else(|| answer.filled_prefix());
            return TrainerRender::Complete(CompleteRender {
                answer,
                explanation: raw.explanation,
                steps: raw.steps,
            });
        }
        let step_input = match raw.input_mode {
            InputMode::TapWords => StepInput::TapWords {
                words: raw.words,
                highlights: raw.highlights,
                selected: raw.selected_indices,
            },
            InputMode::Text => StepInput::Text,
            InputMode::MultipleChoice => StepInput::MultipleChoice {
                options: raw.options,
            },
            InputMode::None => StepInput::None,
        };
        TrainerRender::InProgress(ActiveRender {
            phase_id: raw.phase_id,
            step_input,
            answer,
            steps: raw.steps,
        })
    }
}

#[allow(clippy::ptr_arg)]
fn cross_letter_strings<S: serde::Serializer>(
    letters: &Vec<Option<char>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(letters.iter().map(|l| l.map(String::from).unwrap_or_default()))
}

/// Identity and text of the clue a session is started for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StartRequest {
    pub clue_text: String,
    pub enumeration: String,
    #[serde(serialize_with = "cross_letter_strings")]
    pub cross_letters: Vec<Option<char>>,
    pub puzzle_number: u32,
    pub clue_number: u32,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubmitValue {
    Indices(Vec<usize>),
    Text(String),
    Choice(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputRequest {
    pub clue_id: String,
    pub value: SubmitValue,
    #[serde(rename = "crossLetters", serialize_with = "cross_letter_strings")]
    pub cross_letters: Vec<Option<char>>,
    pub enumeration: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    SelectWord { index: usize },
    ToggleHint { step_index: usize },
    ExpandStep { step_index: usize },
    TypeAnswer { position: usize, letter: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UiStateRequest {
    pub clue_id: String,
    #[serde(flatten)]
    pub action: UiAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClueRequest {
    pub clue_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerRequest {
    pub clue_id: String,
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Start,
    Input,
    UiState,
    Continue,
    SolveStep,
    Reveal,
    CheckAnswer,
    Hypothesis,
}

impl RequestKind {
    pub fn path(self) -> &'static str {
        match self {
            RequestKind::Start => "/trainer/start",
            RequestKind::Input => "/trainer/input",
            RequestKind::UiState => "/trainer/ui-state",
            RequestKind::Continue => "/trainer/continue",
            RequestKind::SolveStep => "/trainer/solve-step",
            RequestKind::Reveal => "/trainer/reveal",
            RequestKind::CheckAnswer => "/trainer/check-answer",
            RequestKind::Hypothesis => "/trainer/hypothesis",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerRequest {
    Start(StartRequest),
    Input(InputRequest),
    UiState(UiStateRequest),
    Continue(ClueRequest),
    SolveStep(ClueRequest),
    Reveal(ClueRequest),
    CheckAnswer(AnswerRequest),
    Hypothesis(AnswerRequest),
}

impl TrainerRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            TrainerRequest::Start(_) => RequestKind::Start,
            TrainerRequest::Input(_) => RequestKind::Input,
            TrainerRequest::UiState(_) => RequestKind::UiState,
            TrainerRequest::Continue(_) => RequestKind::Continue,
            TrainerRequest::SolveStep(_) => RequestKind::SolveStep,
            TrainerRequest::Reveal(_) => RequestKind::Reveal,
            TrainerRequest::CheckAnswer(_) => RequestKind::CheckAnswer,
            TrainerRequest::Hypothesis(_) => RequestKind::Hypothesis,
        }
    }

    pub fn body(&self) -> serde_json::Result<Value> {
        match self {
            TrainerRequest::Start(r) => serde_json::to_value(r),
            TrainerRequest::Input(r) => serde_json::to_value(r),
            TrainerRequest::UiState(r) => serde_json::to_value(r),
            TrainerRequest::Continue(r) | TrainerRequest::SolveStep(r) | TrainerRequest::Reveal(r) => {
                serde_json::to_value(r)
            }
            TrainerRequest::CheckAnswer(r) | TrainerRequest::Hypothesis(r) => serde_json::to_value(r),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected clue_id {other}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct StartResponse {
    #[serde(deserialize_with = "id_string")]
    pub clue_id: String,
    #[serde(flatten)]
    pub render: RawRender,
}

#[derive(Debug, Deserialize)]
pub struct InputResponse {
    #[serde(default)]
    pub correct: bool,
    pub message: Option<String>,
    pub render: Option<RawRender>,
}

/// `{error}` or `{success: false, ...}` bodies.
fn protocol_error(value: &Value) -> Option<String> {
    let error = value.get("error").and_then(Value::as_str).map(str::to_string);
    let failed = value.get("success").and_then(Value::as_bool) == Some(false);
    match (error, failed) {
        (Some(e), _) => Some(e),
        (None, true) => Some("request failed".to_string()),
        (None, false) => None,
    }
}

pub fn parse_start(value: Value) -> Result<StartResponse, TrainerError> {
    if let Some(message) = protocol_error(&value) {
        return Err(TrainerError::Protocol(message));
    }
    Ok(serde_json::from_value(value)?)
}

pub fn parse_input(value: Value) -> Result<InputResponse, TrainerError> {
    if let Some(message) = protocol_error(&value) {
        return Err(TrainerError::Protocol(message));
    }
    Ok(serde_json::from_value(value)?)
}

/// A bare render descriptor, or one wrapped as `{success, render}`.
pub fn parse_render(mut value: Value) -> Result<RawRender, TrainerError> {
    if let Some(message) = protocol_error(&value) {
        return Err(TrainerError::Protocol(message));
    }
    if let Some(inner) = value.get_mut("render").filter(|v| v.is_object()) {
        let inner = inner.take();
        return Ok(serde_json::from_value(inner)?);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_input_mode_is_none() {
        let raw: RawRender = serde_json::from_value(json!({"inputMode": "drag_drop"})).unwrap();
        assert_eq!(raw.input_mode, InputMode::None);
    }

    #[test]
    fn test_tap_words_render() {
        let raw: RawRender = serde_json::from_value(json!({
            "inputMode": "tap_words",
            "words": ["Flower", "of", "London"],
            "selectedIndices": [2],
            "userAnswer": ["", "H", ""],
            "crossLetters": ["T", "", ""],
            "enumeration": "3",
            "steps": [{"index": 0, "status": "active", "inputMode": "tap_words", "prompt": "Find the definition"}]
        }))
        .unwrap();
        let TrainerRender::InProgress(r) = TrainerRender::from(raw) else {
            panic!("expected in-progress render");
        };
        assert_eq!(
            r.step_input,
            StepInput::TapWords {
                words: vec!["Flower".into(), "of".into(), "London".into()],
                highlights: vec![],
                selected: vec![2],
            }
        );
        assert_eq!(r.answer.shown_at(0), Some('T'));
        assert_eq!(r.answer.shown_at(1), Some('H'));
        assert_eq!(r.answer.text(), "TH");
        assert_eq!(r.active_step().unwrap().prompt, "Find the definition");
    }

    #[test]
    fn test_complete_render_falls_back_to_boxes() {
        let raw: RawRender = serde_json::from_value(json!({
            "complete": true,
            "userAnswer": ["", "H", "A", "M", "E", "S"],
            "crossLetters": ["T"],
            "breakdown": "Flower of London = THAMES"
        }))
        .unwrap();
        let TrainerRender::Complete(r) = TrainerRender::from(raw) else {
            panic!("expected complete render");
        };
        assert_eq!(r.answer, "THAMES");
        assert_eq!(r.explanation.as_deref(), Some("Flower of London = THAMES"));
    }

    fn complete_answer(value: Value) -> String {
        let raw: RawRender = serde_json::from_value(value).unwrap();
        match TrainerRender::from(raw) {
            TrainerRender::Complete(r) => r.answer,
            other => panic!("expected complete render, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_fallback_keeps_positions() {
        // A blank box ends the answer rather than shifting later letters left
        let answer = complete_answer(json!({"complete": true, "userAnswer": ["C", "", "T"]}));
        assert_eq!(answer, "C");

        let answer = complete_answer(json!({
            "complete": true,
            "userAnswer": [],
            "crossLetters": ["C", "A", "T"]
        }));
        assert_eq!(answer, "CAT");
    }

    #[test]
    fn test_step_status_unknown_is_pending() {
        let step: Step =
            serde_json::from_value(json!({"index": 2, "status": "skipped"})).unwrap();
        assert_eq!(step.status, StepStatus::Pending);
        let step: Step = serde_json::from_value(json!({"status": "completed"})).unwrap();
        assert_eq!(step.status, StepStatus::Completed);
    }

    #[test]
    fn test_start_body_field_names() {
        let req = TrainerRequest::Start(StartRequest {
            clue_text: "Flower of London (6)".into(),
            enumeration: "6".into(),
            cross_letters: vec![Some('T'), None],
            puzzle_number: 29001,
            clue_number: 4,
            direction: Direction::Down,
        });
        assert_eq!(
            req.body().unwrap(),
            json!({
                "clue_text": "Flower of London (6)",
                "enumeration": "6",
                "cross_letters": ["T", ""],
                "puzzle_number": 29001,
                "clue_number": 4,
                "direction": "down"
            })
        );
    }

    #[test]
    fn test_ui_state_body_is_flat() {
        let req = TrainerRequest::UiState(UiStateRequest {
            clue_id: "c1".into(),
            action: UiAction::TypeAnswer {
                position: 3,
                letter: "M".into(),
            },
        });
        assert_eq!(
            req.body().unwrap(),
            json!({"clue_id": "c1", "action": "type_answer", "position": 3, "letter": "M"})
        );
        assert_eq!(req.kind().path(), "/trainer/ui-state");
    }

    #[test]
    fn test_parse_start_error() {
        let err = parse_start(json!({"error": "Clue not annotated"})).unwrap_err();
        assert!(matches!(err, TrainerError::Protocol(m) if m == "Clue not annotated"));
    }

    #[test]
    fn test_parse_start_numeric_id() {
        let resp = parse_start(json!({"clue_id": 17, "inputMode": "text"})).unwrap();
        assert_eq!(resp.clue_id, "17");
        assert_eq!(resp.render.input_mode, InputMode::Text);
    }

    #[test]
    fn test_parse_render_failure_and_wrapped() {
        assert!(matches!(
            parse_render(json!({"success": false, "error": "no session"})),
            Err(TrainerError::Protocol(m)) if m == "no session"
        ));
        let raw = parse_render(json!({"success": true, "render": {"complete": true}})).unwrap();
        assert!(raw.complete);
    }
}
