use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines session steps and their behavior
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    /// Congruency condition of an instructions or testing step.
    fn condition(&self) -> Option<Condition> {
        None
    }

    fn is_welcome(&self) -> bool {
        false
    }
    fn is_instructions(&self) -> bool {
        false
    }
    fn is_testing(&self) -> bool {
        false
    }
    fn is_intake(&self) -> bool {
        false
    }
    fn is_result(&self) -> bool {
        false
    }
}

/// Congruency of the word with its ink color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Congruent,
    Incongruent,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::Congruent, Condition::Incongruent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Congruent => "congruent",
            Condition::Incongruent => "incongruent",
        }
    }

    /// Zero-based position of this condition in the session order.
    pub fn ordinal(&self) -> usize {
        match self {
            Condition::Congruent => 0,
            Condition::Incongruent => 1,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "step", content = "condition", rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    Instructions(Condition),
    Testing(Condition),
    ParticipantIntake,
    Result,
}

impl Phase for Step {
    fn next(&self) -> Option<Self> {
        use Condition::*;
        use Step::*;
        Some(match self {
            Welcome => Instructions(Congruent),
            Instructions(c) => Testing(*c),
            Testing(Congruent) => Instructions(Incongruent),
            Testing(Incongruent) => ParticipantIntake,
            ParticipantIntake => Result,
            Result => return None,
        })
    }

    fn condition(&self) -> Option<Condition> {
        match self {
            Step::Instructions(c) | Step::Testing(c) => Some(*c),
            _ => None,
        }
    }

    fn is_welcome(&self) -> bool {
        matches!(self, Step::Welcome)
    }

    fn is_instructions(&self) -> bool {
        matches!(self, Step::Instructions(_))
    }

    fn is_testing(&self) -> bool {
        matches!(self, Step::Testing(_))
    }

    fn is_intake(&self) -> bool {
        matches!(self, Step::ParticipantIntake)
    }

    fn is_result(&self) -> bool {
        matches!(self, Step::Result)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Welcome => f.write_str("welcome"),
            Step::Instructions(c) => write!(f, "instructions({c})"),
            Step::Testing(c) => write!(f, "testing({c})"),
            Step::ParticipantIntake => f.write_str("participant_intake"),
            Step::Result => f.write_str("result"),
        }
    }
}
