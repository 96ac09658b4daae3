//! Read-only snapshot of everything a frame needs to draw.

use stroop_core::{Palette, Trial};
use stroop_experiment::{Analysis, PhaseStatistics};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub focused: bool,
    /// Choice fields cycle with Left/Right instead of taking typed text.
    pub is_choice: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    pub participant: &'a str,
    pub congruent: PhaseStatistics,
    pub incongruent: PhaseStatistics,
    pub analysis: Analysis,
    pub comment: &'a str,
    /// Export outcome or validation message.
    pub status: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<'a> {
    pub palette: &'a Palette,
    pub trial: Option<&'a Trial>,
    /// `(current, total)`, one-based.
    pub progress: Option<(usize, usize)>,
    pub overall_progress: f32,
    pub trials_per_phase: usize,
    pub form: Option<FormView>,
    pub result: Option<ResultView<'a>>,
}

impl<'a> SessionView<'a> {
    pub fn new(palette: &'a Palette, trials_per_phase: usize) -> Self {
        Self {
            palette,
            trial: None,
            progress: None,
            overall_progress: 0.0,
            trials_per_phase,
            form: None,
            result: None,
        }
    }
}
