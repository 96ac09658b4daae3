use crate::phase::Condition;
use serde::{Deserialize, Serialize};

/// Where the live trial is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    /// Stimulus is on screen, timer not yet armed.
    Settling,
    /// Timer armed, waiting for the participant.
    AwaitingResponse,
}

/// Recorded result per trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub response_time_ms: u64,
    pub is_correct: bool,
}

impl TrialResult {
    pub fn new(response_time_ms: u64, is_correct: bool) -> Self {
        Self {
            response_time_ms,
            is_correct,
        }
    }
}

/// Append-only result sequences, one per condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLog {
    congruent: Vec<TrialResult>,
    incongruent: Vec<TrialResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: Condition, result: TrialResult) {
        match condition {
            Condition::Congruent => self.congruent.push(result),
            Condition::Incongruent => self.incongruent.push(result),
        }
    }

    pub fn get(&self, condition: Condition) -> &[TrialResult] {
        match condition {
            Condition::Congruent => &self.congruent,
            Condition::Incongruent => &self.incongruent,
        }
    }

    pub fn len(&self) -> usize {
        self.congruent.len() + self.incongruent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.congruent.clear();
        self.incongruent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_kept_per_condition() {
        let mut log = ResultLog::new();
        log.push(Condition::Congruent, TrialResult::new(500, true));
        log.push(Condition::Incongruent, TrialResult::new(700, false));
        log.push(Condition::Congruent, TrialResult::new(450, true));

        assert_eq!(
            log.get(Condition::Congruent),
            &[TrialResult::new(500, true), TrialResult::new(450, true)]
        );
        assert_eq!(log.get(Condition::Incongruent).len(), 1);
        assert_eq!(log.len(), 3);

        log.clear();
        assert!(log.is_empty());
    }
}
