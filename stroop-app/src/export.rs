//! Background report export as seen from the result screen.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use stroop_experiment::ReportPayload;
use stroop_report::{ReportError, ReportFormat, spawn_export};
use tracing::error;

/// A running export. Poll it each frame until it yields its outcome.
pub struct PendingExport {
    handle: Option<JoinHandle<Vec<PathBuf>>>,
    expected: usize,
    dir: PathBuf,
}

impl PendingExport {
    pub fn start(
        payload: ReportPayload,
        formats: Vec<ReportFormat>,
        dir: PathBuf,
    ) -> Result<Self, ReportError> {
        let expected = formats.len();
        let handle = spawn_export(payload, formats, dir.clone())?;
        Ok(Self {
            handle: Some(handle),
            expected,
            dir,
        })
    }

    /// Status line while the worker is still writing.
    pub fn progress_message(&self) -> String {
        format!("Exporting report to {}...", self.dir.display())
    }

    /// `None` while running; the outcome message once, after the worker ends.
    pub fn poll(&mut self) -> Option<String> {
        if !self.handle.as_ref()?.is_finished() {
            return None;
        }
        let written = match self.handle.take()?.join() {
            Ok(paths) => paths,
            Err(_) => {
                error!("report export thread panicked");
                Vec::new()
            }
        };
        Some(outcome_message(&written, self.expected, &self.dir))
    }
}

fn outcome_message(written: &[PathBuf], expected: usize, dir: &Path) -> String {
    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    match written.len() {
        0 => format!("Export failed, nothing written to {}", dir.display()),
        n if n < expected => format!("Export partly failed, saved {}", names.join(", ")),
        _ => format!("Report saved: {}", names.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::simulate::run_session;
    use std::time::{Duration, Instant};
    use stroop_core::{Education, Gender, ParticipantDraft};

    fn payload() -> ReportPayload {
        let mut settings = Settings::default();
        settings.experiment.trials_per_phase = 2;
        let draft = ParticipantDraft {
            name: "Export Test".into(),
            age: "40".into(),
            gender: Some(Gender::Female),
            education: Some(Education::Hsc),
            socioeconomic: None,
        };
        run_session(&settings, draft, "fine", 5, 0.0).unwrap()
    }

    fn wait(export: &mut PendingExport) -> String {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(message) = export.poll() {
                return message;
            }
            assert!(Instant::now() < deadline, "export did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn success_is_reported_after_the_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let mut export =
            PendingExport::start(payload(), ReportFormat::ALL.to_vec(), out.clone()).unwrap();
        assert!(export.progress_message().starts_with("Exporting report to"));

        let message = wait(&mut export);
        assert!(message.starts_with("Report saved: Stroop_Test_Export_Test_"));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
        assert_eq!(export.poll(), None);
    }

    #[test]
    fn failed_write_is_reported_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let mut export =
            PendingExport::start(payload(), vec![ReportFormat::Html], blocker.join("reports"))
                .unwrap();
        let message = wait(&mut export);
        assert!(message.starts_with("Export failed"), "{message}");
    }

    #[test]
    fn partial_outcome_names_what_was_written() {
        let written = vec![PathBuf::from("/tmp/r/Stroop_Test_A_2026-01-01.html")];
        let message = outcome_message(&written, 2, Path::new("/tmp/r"));
        assert_eq!(
            message,
            "Export partly failed, saved Stroop_Test_A_2026-01-01.html"
        );
    }
}
