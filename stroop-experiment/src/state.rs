use crate::analysis::{Analysis, AnalysisThresholds, classify};
use crate::config::{ConfigError, ExperimentConfig};
use crate::generator::StimulusGenerator;
use crate::report::ReportPayload;
use crate::scoring::{PhaseStatistics, compute_statistics};
use chrono::{DateTime, Local};
use rand::Rng;
use std::time::Duration;
use stroop_core::{
    ColorSwatch, Condition, InvalidResponseState, Palette, PaletteError, ParticipantDraft,
    ParticipantProfile, Phase, ResultLog, STANDARD_SWATCHES, Step, Trial, TrialResult, TrialState,
    ValidationError,
};
use stroop_timing::{CancelToken, Deferred, Epoch, Timer};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Leave the welcome screen.
    Start,
    /// Participant has read the instructions for the upcoming phase.
    Ready,
    /// The settle delay scheduled by `Ready` has run out.
    SettleElapsed(CancelToken),
    /// Participant picked a color by name.
    Response(String),
    SubmitProfile(ParticipantDraft),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidResponse(#[from] InvalidResponseState),
}

/// A session could not be built from its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error("invalid experiment config: {0}")]
    Config(#[from] ConfigError),
}

/// The trial currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrial {
    /// Zero-based position within the phase.
    pub index: usize,
    pub trial: Trial,
    pub state: TrialState,
}

/// Owns all session data; mutated only through events.
pub struct SessionStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    step: Step,
    timer: T,
    generator: StimulusGenerator<R>,
    config: ExperimentConfig,
    thresholds: AnalysisThresholds,
    current: Option<ActiveTrial>,
    phase_start: Option<u64>,
    settle: Option<Deferred<u64>>,
    epoch: Epoch,
    results: ResultLog,
    profile: Option<ParticipantProfile>,
    comment: String,
}

impl<T, R> SessionStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    /// Session over the standard palette.
    pub fn new(config: ExperimentConfig, timer: T, rng: R) -> Result<Self, SetupError> {
        Self::with_swatches(config, STANDARD_SWATCHES.to_vec(), timer, rng)
    }

    /// Validates the palette and the config before anything is shown.
    pub fn with_swatches(
        config: ExperimentConfig,
        swatches: Vec<ColorSwatch>,
        timer: T,
        rng: R,
    ) -> Result<Self, SetupError> {
        let palette = Palette::new(swatches)?;
        config.validate()?;
        Ok(Self {
            step: Step::default(),
            timer,
            generator: StimulusGenerator::new(palette, rng),
            config,
            thresholds: AnalysisThresholds::default(),
            current: None,
            phase_start: None,
            settle: None,
            epoch: Epoch::new(),
            results: ResultLog::new(),
            profile: None,
            comment: String::new(),
        })
    }

    pub fn with_thresholds(mut self, thresholds: AnalysisThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Polls scheduled work; feed the returned events back into `handle_event`.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(task) = &self.settle {
            if task.is_due(&self.timer) {
                events.push(SessionEvent::SettleElapsed(task.token()));
            }
        }
        events
    }

    /// Applies one event. `Ok(false)` means the event does not apply to the
    /// current step and was ignored.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<bool, SessionError> {
        match (self.step, event) {
            (Step::Welcome, SessionEvent::Start) => {
                self.transition(Step::Instructions(Condition::Congruent));
                Ok(true)
            }

            (Step::Instructions(condition), SessionEvent::Ready) => {
                self.begin_phase(condition);
                Ok(true)
            }

            (Step::Testing(_), SessionEvent::SettleElapsed(token)) => Ok(self.arm_timer(token)),

            (Step::Testing(condition), SessionEvent::Response(choice)) => {
                self.record_response(condition, &choice).inspect_err(|e| {
                    warn!(error = %e, choice = %choice, "response rejected");
                })?;
                Ok(true)
            }

            (step, SessionEvent::Response(choice)) => {
                warn!(%step, choice = %choice, "response outside a testing phase");
                Err(InvalidResponseState::NoActiveTrial.into())
            }

            (Step::ParticipantIntake, SessionEvent::SubmitProfile(draft)) => {
                let profile = draft.validate().inspect_err(|e| {
                    warn!(error = %e, "participant profile rejected");
                })?;
                info!(participant = %profile.name, "participant profile accepted");
                self.profile = Some(profile);
                self.transition(Step::Result);
                Ok(true)
            }

            (_, SessionEvent::Reset) => {
                self.reset();
                Ok(true)
            }

            (step, event) => {
                debug!(%step, ?event, "event ignored");
                Ok(false)
            }
        }
    }

    fn transition(&mut self, next: Step) {
        info!(from = %self.step, to = %next, "session step");
        self.step = next;
    }

    fn begin_phase(&mut self, condition: Condition) {
        self.epoch.bump();
        let trial = self.generator.generate(condition);
        debug!(?trial, "first trial of phase");
        self.current = Some(ActiveTrial {
            index: 0,
            trial,
            state: TrialState::Settling,
        });
        self.phase_start = None;
        self.settle = Some(Deferred::schedule(
            &self.timer,
            Duration::from_millis(self.config.settle_delay_ms),
            self.epoch.token(),
        ));
        self.transition(Step::Testing(condition));
    }

    fn arm_timer(&mut self, token: CancelToken) -> bool {
        let pending = self.settle.as_ref().map(|task| task.token());
        if !self.epoch.is_live(token) || pending != Some(token) {
            debug!(?token, "stale settle task ignored");
            return false;
        }
        self.settle = None;
        let start = self.timer.start();
        self.phase_start = Some(start);
        if let Some(active) = &mut self.current {
            active.state = TrialState::AwaitingResponse;
        }
        debug!(start_ns = start, "trial timer armed");
        true
    }

    fn record_response(
        &mut self,
        condition: Condition,
        choice: &str,
    ) -> Result<(), InvalidResponseState> {
        let active = self
            .current
            .as_ref()
            .ok_or(InvalidResponseState::NoActiveTrial)?;
        let start = self
            .phase_start
            .ok_or(InvalidResponseState::TimerNotStarted)?;

        let index = active.index;
        let result = TrialResult::new(
            self.timer.elapsed_ms(start),
            choice == active.trial.correct_answer,
        );
        self.results.push(condition, result);
        debug!(
            %condition,
            trial = index + 1,
            rt_ms = result.response_time_ms,
            correct = result.is_correct,
            "response recorded"
        );

        if index + 1 < self.config.trials_per_phase {
            let trial = self.generator.generate(condition);
            self.current = Some(ActiveTrial {
                index: index + 1,
                trial,
                state: TrialState::AwaitingResponse,
            });
            self.phase_start = Some(self.timer.start());
        } else {
            self.current = None;
            self.phase_start = None;
            if let Some(next) = self.step.next() {
                self.transition(next);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.epoch.bump();
        self.results.clear();
        self.profile = None;
        self.comment.clear();
        self.current = None;
        self.phase_start = None;
        self.settle = None;
        self.transition(Step::Welcome);
    }

    /// Replaces the free-text comment. Only allowed on the result step.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> bool {
        if !self.step.is_result() {
            return false;
        }
        self.comment = comment.into();
        true
    }

    /// Snapshot for the document exporter.
    pub fn report_payload(
        &self,
        generated_at: DateTime<Local>,
    ) -> Result<ReportPayload, ValidationError> {
        let profile = match (&self.profile, self.step.is_result()) {
            (Some(profile), true) => profile,
            _ => return Err(ValidationError::NotReady),
        };
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ValidationError::EmptyComment);
        }

        Ok(ReportPayload {
            participant: profile.clone(),
            congruent: self.statistics(Condition::Congruent),
            incongruent: self.statistics(Condition::Incongruent),
            analysis: self.analysis().into(),
            comment: comment.to_string(),
            generated_at,
            trials_per_phase: self.config.trials_per_phase,
        })
    }

    pub fn statistics(&self, condition: Condition) -> PhaseStatistics {
        compute_statistics(self.results.get(condition))
    }

    pub fn analysis(&self) -> Analysis {
        classify(
            &self.statistics(Condition::Congruent),
            &self.statistics(Condition::Incongruent),
            &self.thresholds,
        )
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref().map(|active| &active.trial)
    }

    pub fn trial_state(&self) -> Option<TrialState> {
        self.current.as_ref().map(|active| active.state)
    }

    pub fn is_timer_armed(&self) -> bool {
        self.phase_start.is_some()
    }

    /// `(current, total)` with `current` one-based, while testing.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match (self.step.is_testing(), &self.current) {
            (true, Some(active)) => Some((active.index + 1, self.config.trials_per_phase)),
            _ => None,
        }
    }

    /// Completed trials over all trials of both phases, in `[0, 1]`.
    pub fn overall_progress(&self) -> f32 {
        let total = Condition::ALL.len() * self.config.trials_per_phase;
        if total == 0 {
            return 0.0;
        }
        (self.results.len() as f32 / total as f32).clamp(0.0, 1.0)
    }

    pub fn results(&self) -> &ResultLog {
        &self.results
    }

    pub fn profile(&self) -> Option<&ParticipantProfile> {
        self.profile.as_ref()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        self.generator.palette()
    }
}
