//! Qualitative interpretation of the congruent/incongruent comparison.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. incongruent accuracy below `low_accuracy_percent` → [`NarrativeCategory::LowReliability`]
//! 2. negative interference, if enabled → [`NarrativeCategory::NegativeInterference`]
//! 3. interference above `high_interference_ms` → [`NarrativeCategory::HighInterference`]
//! 4. interference above `typical_interference_ms` → [`NarrativeCategory::TypicalInterference`]
//! 5. otherwise → [`NarrativeCategory::StrongControl`]

use crate::scoring::PhaseStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativeCategory {
    LowReliability,
    NegativeInterference,
    HighInterference,
    TypicalInterference,
    StrongControl,
}

impl NarrativeCategory {
    pub fn title(&self) -> &'static str {
        match self {
            NarrativeCategory::LowReliability => "Low reliability",
            NarrativeCategory::NegativeInterference => "Negative interference",
            NarrativeCategory::HighInterference => "High interference",
            NarrativeCategory::TypicalInterference => "Typical Stroop effect",
            NarrativeCategory::StrongControl => "Strong cognitive control",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            NarrativeCategory::LowReliability => {
                "Your accuracy on the conflicting trials was low. You were either confused \
                 by the mismatch between word and ink or answered too quickly, so the timing \
                 comparison is not a reliable measure of cognitive control. Take the test \
                 again and aim for correct answers first."
            }
            NarrativeCategory::NegativeInterference => {
                "You answered faster when the word and the ink disagreed than when they \
                 matched. This is unusual and most often reflects practice effects from the \
                 first phase or a change in strategy rather than an absence of interference."
            }
            NarrativeCategory::HighInterference => {
                "Cognitive interference was pronounced. You took considerably longer in the \
                 second phase, which shows your brain had to work hard to separate the \
                 meaning of the word from the color of its ink."
            }
            NarrativeCategory::TypicalInterference => {
                "Your result shows a typical Stroop effect. The mismatch between word meaning \
                 and ink color slowed your processing somewhat, which is a normal property of \
                 human attention."
            }
            NarrativeCategory::StrongControl => {
                "Excellent! Your cognitive control is very strong. Even with conflicting \
                 information you kept your accuracy high and decided quickly."
            }
        }
    }
}

impl fmt::Display for NarrativeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Decision table for [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// Incongruent accuracy below this marks the result unreliable.
    pub low_accuracy_percent: u32,
    pub high_interference_ms: i64,
    pub typical_interference_ms: i64,
    /// Report faster incongruent responses as their own category.
    pub negative_interference: bool,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            low_accuracy_percent: 60,
            high_interference_ms: 500,
            typical_interference_ms: 150,
            negative_interference: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub category: NarrativeCategory,
    /// Incongruent minus congruent mean correct response time.
    pub interference_ms: i64,
}

pub fn interference_ms(congruent: &PhaseStatistics, incongruent: &PhaseStatistics) -> i64 {
    incongruent.mean_correct_rt_ms as i64 - congruent.mean_correct_rt_ms as i64
}

pub fn classify(
    congruent: &PhaseStatistics,
    incongruent: &PhaseStatistics,
    thresholds: &AnalysisThresholds,
) -> Analysis {
    let diff = interference_ms(congruent, incongruent);

    let category = if incongruent.accuracy_percent < thresholds.low_accuracy_percent {
        NarrativeCategory::LowReliability
    } else if thresholds.negative_interference && diff < 0 {
        NarrativeCategory::NegativeInterference
    } else if diff > thresholds.high_interference_ms {
        NarrativeCategory::HighInterference
    } else if diff > thresholds.typical_interference_ms {
        NarrativeCategory::TypicalInterference
    } else {
        NarrativeCategory::StrongControl
    };

    Analysis {
        category,
        interference_ms: diff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: u64, accuracy: u32) -> PhaseStatistics {
        PhaseStatistics {
            mean_correct_rt_ms: mean,
            correct_count: 0,
            incorrect_count: 0,
            accuracy_percent: accuracy,
        }
    }

    fn category(c: (u64, u32), i: (u64, u32)) -> NarrativeCategory {
        classify(
            &stats(c.0, c.1),
            &stats(i.0, i.1),
            &AnalysisThresholds::default(),
        )
        .category
    }

    #[test]
    fn typical_interference_between_bands() {
        let analysis = classify(
            &stats(500, 100),
            &stats(900, 90),
            &AnalysisThresholds::default(),
        );
        assert_eq!(analysis.interference_ms, 400);
        assert_eq!(analysis.category, NarrativeCategory::TypicalInterference);
    }

    #[test]
    fn low_accuracy_overrides_timing() {
        assert_eq!(category((500, 100), (1500, 50)), NarrativeCategory::LowReliability);
        assert_eq!(category((500, 100), (520, 59)), NarrativeCategory::LowReliability);
        assert_eq!(category((900, 100), (500, 50)), NarrativeCategory::LowReliability);
    }

    #[test]
    fn sixty_percent_is_reliable() {
        assert_ne!(category((500, 100), (900, 60)), NarrativeCategory::LowReliability);
    }

    #[test]
    fn faster_incongruent_is_negative_interference() {
        let analysis = classify(
            &stats(700, 95),
            &stats(650, 95),
            &AnalysisThresholds::default(),
        );
        assert_eq!(analysis.interference_ms, -50);
        assert_eq!(analysis.category, NarrativeCategory::NegativeInterference);
    }

    #[test]
    fn negative_branch_can_be_disabled() {
        let thresholds = AnalysisThresholds {
            negative_interference: false,
            ..AnalysisThresholds::default()
        };
        let analysis = classify(&stats(700, 95), &stats(650, 95), &thresholds);
        assert_eq!(analysis.category, NarrativeCategory::StrongControl);
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(category((500, 100), (1000, 100)), NarrativeCategory::TypicalInterference);
        assert_eq!(category((500, 100), (1001, 100)), NarrativeCategory::HighInterference);
        assert_eq!(category((500, 100), (650, 100)), NarrativeCategory::StrongControl);
        assert_eq!(category((500, 100), (651, 100)), NarrativeCategory::TypicalInterference);
        assert_eq!(category((500, 100), (500, 100)), NarrativeCategory::StrongControl);
    }

    #[test]
    fn every_category_has_text() {
        for category in [
            NarrativeCategory::LowReliability,
            NarrativeCategory::NegativeInterference,
            NarrativeCategory::HighInterference,
            NarrativeCategory::TypicalInterference,
            NarrativeCategory::StrongControl,
        ] {
            assert!(!category.title().is_empty());
            assert!(category.narrative().len() > 40);
        }
    }

    #[test]
    fn thresholds_fill_missing_keys_with_defaults() {
        let thresholds: AnalysisThresholds =
            toml::from_str("typical_interference_ms = 200").unwrap();
        assert_eq!(thresholds.typical_interference_ms, 200);
        assert_eq!(thresholds.low_accuracy_percent, 60);
        assert!(thresholds.negative_interference);
    }
}
