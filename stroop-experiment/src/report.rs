//! Finished-session snapshot handed to the document exporter.

use crate::analysis::{Analysis, NarrativeCategory};
use crate::scoring::PhaseStatistics;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use stroop_core::ParticipantProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub category: NarrativeCategory,
    pub title: String,
    pub narrative: String,
    pub interference_ms: i64,
}

impl From<Analysis> for AnalysisSummary {
    fn from(analysis: Analysis) -> Self {
        Self {
            category: analysis.category,
            title: analysis.category.title().to_string(),
            narrative: analysis.category.narrative().to_string(),
            interference_ms: analysis.interference_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub participant: ParticipantProfile,
    pub congruent: PhaseStatistics,
    pub incongruent: PhaseStatistics,
    pub analysis: AnalysisSummary,
    pub comment: String,
    pub generated_at: DateTime<Local>,
    pub trials_per_phase: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stroop_core::{Education, Gender};

    fn payload() -> ReportPayload {
        let congruent = PhaseStatistics {
            mean_correct_rt_ms: 540,
            correct_count: 20,
            incorrect_count: 0,
            accuracy_percent: 100,
        };
        let incongruent = PhaseStatistics {
            mean_correct_rt_ms: 740,
            correct_count: 18,
            incorrect_count: 2,
            accuracy_percent: 90,
        };
        ReportPayload {
            participant: ParticipantProfile {
                name: "Ada Lovelace".into(),
                age: "36".into(),
                gender: Gender::Female,
                education: Education::Phd,
                socioeconomic: None,
            },
            congruent,
            incongruent,
            analysis: Analysis {
                category: NarrativeCategory::TypicalInterference,
                interference_ms: 200,
            }
            .into(),
            comment: "Felt harder in the second half.".into(),
            generated_at: Local.with_ymd_and_hms(2026, 3, 14, 10, 30, 0).unwrap(),
            trials_per_phase: 20,
        }
    }

    #[test]
    fn summary_carries_title_and_narrative() {
        let summary = payload().analysis;
        assert_eq!(summary.title, "Typical Stroop effect");
        assert_eq!(
            summary.narrative,
            NarrativeCategory::TypicalInterference.narrative()
        );
        assert_eq!(summary.interference_ms, 200);
    }

    #[test]
    fn json_uses_stable_keys() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["analysis"]["category"], "TYPICAL_INTERFERENCE");
        assert_eq!(json["participant"]["gender"], "female");
        assert_eq!(json["participant"]["education"], "phd");
        assert!(json["participant"].get("socioeconomic").is_none());
        assert_eq!(json["incongruent"]["accuracy_percent"], 90);
    }

    #[test]
    fn json_round_trips() {
        let original = payload();
        let text = serde_json::to_string(&original).unwrap();
        let parsed: ReportPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }
}
