//! Writes finished Stroop sessions to disk as HTML or JSON documents.

pub mod html;
pub mod naming;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread::{self, JoinHandle};
use stroop_experiment::ReportPayload;
use thiserror::Error;
use tracing::{error, info};

pub use html::generate_html;
pub use naming::{report_file_name, sanitize_name};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 2] = [ReportFormat::Html, ReportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    pub fn render(&self, payload: &ReportPayload) -> Result<String, ReportError> {
        match self {
            ReportFormat::Html => Ok(generate_html(payload)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(payload)?),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format {other:?}, expected html or json")),
        }
    }
}

/// Renders `payload` and writes it into `dir`, creating the directory if needed.
/// Returns the path of the written file.
pub fn export(
    payload: &ReportPayload,
    format: ReportFormat,
    dir: &Path,
) -> Result<PathBuf, ReportError> {
    let body = format.render(payload)?;
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let name = report_file_name(
        &payload.participant.name,
        payload.generated_at.date_naive(),
        format,
    );
    let path = dir.join(name);
    std::fs::write(&path, body).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), %format, "report written");
    Ok(path)
}

/// Exports on a background thread. The session never waits for the result;
/// failures are only logged. The handle is returned for callers that do.
pub fn spawn_export(
    payload: ReportPayload,
    formats: Vec<ReportFormat>,
    dir: PathBuf,
) -> Result<JoinHandle<Vec<PathBuf>>, ReportError> {
    thread::Builder::new()
        .name("report-export".into())
        .spawn(move || {
            formats
                .into_iter()
                .filter_map(|format| match export(&payload, format, &dir) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        error!(error = %e, %format, "report export failed");
                        None
                    }
                })
                .collect()
        })
        .map_err(|source| ReportError::Io {
            path: PathBuf::from("report-export"),
            source,
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use stroop_core::{Education, Gender, ParticipantProfile};
    use stroop_experiment::{
        AnalysisSummary, AnalysisThresholds, PhaseStatistics, classify,
    };

    pub(crate) fn sample_payload() -> ReportPayload {
        let congruent = PhaseStatistics {
            mean_correct_rt_ms: 500,
            correct_count: 20,
            incorrect_count: 0,
            accuracy_percent: 100,
        };
        let incongruent = PhaseStatistics {
            mean_correct_rt_ms: 900,
            correct_count: 18,
            incorrect_count: 2,
            accuracy_percent: 90,
        };
        let analysis = classify(&congruent, &incongruent, &AnalysisThresholds::default());
        ReportPayload {
            participant: ParticipantProfile {
                name: "Ada Lovelace".into(),
                age: "36".into(),
                gender: Gender::Female,
                education: Education::Masters,
                socioeconomic: None,
            },
            congruent,
            incongruent,
            analysis: AnalysisSummary::from(analysis),
            comment: "The second phase felt much harder.".into(),
            generated_at: Local.with_ymd_and_hms(2026, 3, 14, 10, 30, 0).unwrap(),
            trials_per_phase: 20,
        }
    }

    #[test]
    fn export_writes_named_file_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports").join("nested");

        let path = export(&sample_payload(), ReportFormat::Html, &out).unwrap();
        assert_eq!(
            path,
            out.join("Stroop_Test_Ada_Lovelace_2026-03-14.html")
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ada Lovelace"));
    }

    #[test]
    fn json_export_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let payload = sample_payload();
        let path = export(&payload, ReportFormat::Json, dir.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["analysis"]["category"], "TYPICAL_INTERFERENCE");
        assert_eq!(value["analysis"]["interference_ms"], 400);
        assert_eq!(value["participant"]["gender"], "female");
        assert_eq!(value["incongruent"]["accuracy_percent"], 90);

        let parsed: ReportPayload = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn spawned_export_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let handle = spawn_export(
            sample_payload(),
            ReportFormat::ALL.to_vec(),
            dir.path().to_path_buf(),
        )
        .unwrap();

        let written = handle.join().unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn unwritable_target_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = export(&sample_payload(), ReportFormat::Json, &blocker).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("HTML".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!(" json ".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
