//! Error types shared by the session core.
//!
//! None of these errors leave session state inconsistent: a rejected event
//! changes nothing, and statistics are always recomputed from the result log.

use std::fmt;
use thiserror::Error;

/// Participant profile fields that must be filled in before the result step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    Gender,
    Education,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::Education => "education",
        })
    }
}

/// User-facing input was incomplete. Recovered locally by showing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in the {0} field")]
    MissingField(ProfileField),

    #[error("please add a comment before exporting the report")]
    EmptyComment,

    #[error("the report is only available once the session has finished")]
    NotReady,
}

/// A response arrived while no trial could accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidResponseState {
    #[error("response received before the trial timer started")]
    TimerNotStarted,

    #[error("response received with no active trial")]
    NoActiveTrial,
}

/// The palette cannot support stimulus generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette needs at least 2 colors for incongruent trials, got {0}")]
    TooFewColors(usize),

    #[error("duplicate color name in palette: {0}")]
    DuplicateName(String),

    #[error("invalid hex color {hex:?} for {name}")]
    InvalidHex { name: String, hex: String },
}
