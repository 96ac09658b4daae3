//! Keyboard-driven participant intake form.

use stroop_core::{
    Education, Gender, ParticipantDraft, ProfileField, SocioeconomicLevel, ValidationError,
};
use stroop_render::{FieldView, FormView};

const MAX_TEXT_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Gender,
    Education,
    Socioeconomic,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::Name,
        FormField::Age,
        FormField::Gender,
        FormField::Education,
        FormField::Socioeconomic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name *",
            FormField::Age => "Age *",
            FormField::Gender => "Gender *",
            FormField::Education => "Education *",
            FormField::Socioeconomic => "Socioeconomic level",
        }
    }

    pub fn is_choice(&self) -> bool {
        !matches!(self, FormField::Name | FormField::Age)
    }
}

impl From<ProfileField> for FormField {
    fn from(field: ProfileField) -> Self {
        match field {
            ProfileField::Name => FormField::Name,
            ProfileField::Age => FormField::Age,
            ProfileField::Gender => FormField::Gender,
            ProfileField::Education => FormField::Education,
        }
    }
}

/// Steps through `all`, wrapping at both ends. An empty choice starts at
/// the first entry going forward and the last going back.
fn cycle_choice<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> Option<T> {
    let len = all.len();
    if len == 0 {
        return None;
    }
    let next = match current.and_then(|c| all.iter().position(|v| *v == c)) {
        None if forward => 0,
        None => len - 1,
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
    };
    Some(all[next])
}

#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    draft: ParticipantDraft,
    focus: usize,
    error: Option<String>,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> FormField {
        FormField::ORDER[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        let len = FormField::ORDER.len();
        self.focus = (self.focus + len - 1) % len;
    }

    fn focus_on(&mut self, field: FormField) {
        if let Some(i) = FormField::ORDER.iter().position(|f| *f == field) {
            self.focus = i;
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            FormField::Name => Some(&mut self.draft.name),
            FormField::Age => Some(&mut self.draft.age),
            _ => None,
        }
    }

    /// Appends typed characters to the focused text field. Control
    /// characters are dropped.
    pub fn type_text(&mut self, text: &str) {
        if let Some(value) = self.text_mut() {
            for c in text.chars().filter(|c| !c.is_control()) {
                if value.chars().count() >= MAX_TEXT_LEN {
                    break;
                }
                value.push(c);
            }
        }
    }

    /// Deletes the last character, or clears a choice.
    pub fn backspace(&mut self) {
        match self.focused() {
            FormField::Name | FormField::Age => {
                if let Some(value) = self.text_mut() {
                    value.pop();
                }
            }
            FormField::Gender => self.draft.gender = None,
            FormField::Education => self.draft.education = None,
            FormField::Socioeconomic => self.draft.socioeconomic = None,
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        let d = &mut self.draft;
        match FormField::ORDER[self.focus] {
            FormField::Gender => d.gender = cycle_choice(Gender::ALL, d.gender, forward),
            FormField::Education => {
                d.education = cycle_choice(Education::ALL, d.education, forward)
            }
            FormField::Socioeconomic => {
                d.socioeconomic = cycle_choice(SocioeconomicLevel::ALL, d.socioeconomic, forward)
            }
            FormField::Name | FormField::Age => {}
        }
    }

    pub fn draft(&self) -> ParticipantDraft {
        self.draft.clone()
    }

    /// Shows a rejected submission and jumps to the offending field.
    pub fn reject(&mut self, error: &ValidationError) {
        if let ValidationError::MissingField(field) = error {
            self.focus_on((*field).into());
        }
        self.error = Some(error.to_string());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn view(&self) -> FormView {
        let d = &self.draft;
        let fields = FormField::ORDER
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match field {
                    FormField::Name => Some(d.name.clone()),
                    FormField::Age => Some(d.age.clone()),
                    FormField::Gender => d.gender.map(|g| g.label().to_string()),
                    FormField::Education => d.education.map(|e| e.label().to_string()),
                    FormField::Socioeconomic => d.socioeconomic.map(|s| s.label().to_string()),
                }
                .unwrap_or_default();
                FieldView {
                    label: field.label(),
                    value,
                    focused: i == self.focus,
                    is_choice: field.is_choice(),
                }
            })
            .collect();
        FormView {
            fields,
            error: self.error.clone(),
        }
    }
}
