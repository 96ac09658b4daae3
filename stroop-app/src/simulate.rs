//! Headless sessions driven by a scripted participant on a manual clock.

use crate::settings::Settings;
use anyhow::{Context, Result, bail};
use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stroop_core::{Palette, ParticipantDraft, Phase, Trial};
use stroop_experiment::{ReportPayload, SessionEvent, SessionStateMachine};
use stroop_timing::ManualTimer;
use tracing::{debug, info};

/// Answers trials with plausible reaction times. Incongruent trials are
/// slower, and with probability `error_rate` the answer is wrong.
pub struct SimulatedParticipant<R: Rng> {
    rng: R,
    error_rate: f64,
}

impl<R: Rng> SimulatedParticipant<R> {
    pub fn new(rng: R, error_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            bail!("error rate must be between 0 and 1, got {error_rate}");
        }
        Ok(Self { rng, error_rate })
    }

    pub fn reaction_time_ms(&mut self, trial: &Trial) -> u64 {
        let base = self.rng.random_range(420..=620);
        if trial.is_congruent() {
            base
        } else {
            base + self.rng.random_range(80..=320)
        }
    }

    /// Ink name, or a wrong color name on an error. Incongruent errors read
    /// the word aloud instead of naming the ink.
    pub fn answer(&mut self, trial: &Trial, palette: &Palette) -> String {
        if !self.rng.random_bool(self.error_rate) {
            return trial.correct_answer.to_string();
        }
        if !trial.is_congruent() {
            return trial.displayed_word.to_string();
        }
        let wrong: Vec<&str> = palette
            .swatches()
            .iter()
            .map(|s| s.name)
            .filter(|name| *name != trial.correct_answer)
            .collect();
        match wrong.len() {
            0 => trial.correct_answer.to_string(),
            n => wrong[self.rng.random_range(0..n)].to_string(),
        }
    }
}

/// Runs a complete session from the welcome screen to the report payload.
pub fn run_session(
    settings: &Settings,
    draft: ParticipantDraft,
    comment: &str,
    seed: u64,
    error_rate: f64,
) -> Result<ReportPayload> {
    let timer = ManualTimer::new();
    let mut session = SessionStateMachine::new(
        settings.experiment.clone(),
        timer.clone(),
        StdRng::seed_from_u64(seed),
    )?
    .with_thresholds(settings.analysis);
    let mut participant =
        SimulatedParticipant::new(StdRng::seed_from_u64(seed.wrapping_add(1)), error_rate)?;

    info!(seed, error_rate, "simulated session started");
    session.handle_event(SessionEvent::Start)?;

    while session.step().is_instructions() {
        session.handle_event(SessionEvent::Ready)?;
        timer.advance_ms(settings.experiment.settle_delay_ms);
        for event in session.update() {
            session.handle_event(event)?;
        }

        while session.step().is_testing() {
            let trial = session
                .current_trial()
                .cloned()
                .context("testing step without a trial")?;
            let rt = participant.reaction_time_ms(&trial);
            let answer = participant.answer(&trial, session.palette());
            timer.advance_ms(rt);
            debug!(word = trial.displayed_word, %answer, rt_ms = rt, "simulated response");
            session.handle_event(SessionEvent::Response(answer))?;
        }
    }

    session.handle_event(SessionEvent::SubmitProfile(draft))?;
    session.set_comment(comment);
    let payload = session.report_payload(Local::now())?;
    info!(
        category = %payload.analysis.category,
        interference_ms = payload.analysis.interference_ms,
        "simulated session finished"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroop_core::{Education, Gender, STANDARD_SWATCHES};
    use stroop_experiment::NarrativeCategory;

    fn draft() -> ParticipantDraft {
        ParticipantDraft {
            name: "Sim".into(),
            age: "30".into(),
            gender: Some(Gender::Other),
            education: Some(Education::Graduation),
            socioeconomic: None,
        }
    }

    fn settings(trials: usize) -> Settings {
        let mut settings = Settings::default();
        settings.experiment.trials_per_phase = trials;
        settings
    }

    #[test]
    fn same_seed_gives_same_results() {
        let a = run_session(&settings(10), draft(), "ok", 7, 0.1).unwrap();
        let b = run_session(&settings(10), draft(), "ok", 7, 0.1).unwrap();
        assert_eq!(a.congruent, b.congruent);
        assert_eq!(a.incongruent, b.incongruent);
        assert_eq!(a.analysis, b.analysis);
    }

    #[test]
    fn error_free_session_scores_full_accuracy() {
        let payload = run_session(&settings(8), draft(), "ok", 3, 0.0).unwrap();
        assert_eq!(payload.trials_per_phase, 8);
        assert_eq!(payload.congruent.correct_count, 8);
        assert_eq!(payload.incongruent.correct_count, 8);
        assert_eq!(payload.congruent.accuracy_percent, 100);
        assert!(payload.analysis.interference_ms > 0);
        assert_eq!(payload.comment, "ok");
    }

    #[test]
    fn always_wrong_is_low_reliability() {
        let payload = run_session(&settings(5), draft(), "ok", 11, 1.0).unwrap();
        assert_eq!(payload.congruent.correct_count, 0);
        assert_eq!(payload.incongruent.correct_count, 0);
        assert_eq!(payload.analysis.category, NarrativeCategory::LowReliability);
    }

    #[test]
    fn incomplete_profile_is_rejected() {
        let mut incomplete = draft();
        incomplete.education = None;
        let err = run_session(&settings(2), incomplete, "ok", 1, 0.0).unwrap_err();
        assert!(err.to_string().contains("education"));
    }

    #[test]
    fn blank_comment_is_rejected() {
        let err = run_session(&settings(2), draft(), "   ", 1, 0.0).unwrap_err();
        assert!(err.to_string().contains("comment"));
    }

    #[test]
    fn out_of_range_error_rate_is_rejected() {
        assert!(SimulatedParticipant::new(StdRng::seed_from_u64(0), 1.5).is_err());
        assert!(SimulatedParticipant::new(StdRng::seed_from_u64(0), -0.1).is_err());
    }

    #[test]
    fn incongruent_mistake_reads_the_word() {
        let palette = Palette::standard().unwrap();
        let trial = Trial::from_swatches(&STANDARD_SWATCHES[0], &STANDARD_SWATCHES[1]);
        let mut participant = SimulatedParticipant::new(StdRng::seed_from_u64(0), 1.0).unwrap();
        assert_eq!(participant.answer(&trial, &palette), trial.displayed_word);

        let congruent = Trial::from_swatches(&STANDARD_SWATCHES[2], &STANDARD_SWATCHES[2]);
        let answer = participant.answer(&congruent, &palette);
        assert_ne!(answer, congruent.correct_answer);
        assert!(palette.by_name(&answer).is_some());
    }
}
