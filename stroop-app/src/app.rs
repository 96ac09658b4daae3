use crate::export::PendingExport;
use crate::form::IntakeForm;
use crate::settings::Settings;
use anyhow::{Result, anyhow};
use chrono::Local;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use std::sync::Arc;
use stroop_core::{Condition, Phase};
use stroop_experiment::{SessionError, SessionEvent, SessionStateMachine};
use stroop_render::{ResultView, SessionView, SkiaRenderer};
use stroop_timing::HighPrecisionTimer;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalSize, Size},
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Fullscreen, Window, WindowId},
};

const MAX_COMMENT_LEN: usize = 2000;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: SkiaRenderer,
    session: SessionStateMachine<HighPrecisionTimer, ThreadRng>,
    form: IntakeForm,
    settings: Settings,
    /// Export progress or outcome, or a validation message, on the result screen.
    status: Option<String>,
    export: Option<PendingExport>,
}

impl App {
    /// Fails early on an unreadable font so no window is opened for nothing.
    pub fn new(settings: Settings, font: Vec<u8>) -> Result<Self> {
        let renderer =
            SkiaRenderer::from_font_data(settings.display.width, settings.display.height, font)?;
        let session = SessionStateMachine::new(
            settings.experiment.clone(),
            HighPrecisionTimer::new(),
            rand::rng(),
        )?
        .with_thresholds(settings.analysis);

        Ok(Self {
            window: None,
            pixels: None,
            renderer,
            session,
            form: IntakeForm::new(),
            settings,
            status: None,
            export: None,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "starting session window"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let display = &self.settings.display;
        let mut attributes = Window::default_attributes().with_title("Stroop Color-Word Test");

        if display.fullscreen {
            let monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next())
                .ok_or_else(|| anyhow!("no monitor available"))?;
            if let Some(mhz) = monitor.refresh_rate_millihertz() {
                info!(refresh_hz = mhz as f64 / 1000.0, "display refresh rate");
            }
            attributes = attributes
                .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
                .with_resizable(false);
        } else {
            attributes = attributes.with_inner_size(Size::Physical(PhysicalSize::new(
                display.width,
                display.height,
            )));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            "window created"
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);
        self.renderer.resize(size.width, size.height)?;

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn update(&mut self) {
        for event in self.session.update() {
            if let Err(e) = self.session.handle_event(event) {
                warn!(error = %e, "scheduled event failed");
            }
        }
        if let Some(outcome) = self.export.as_mut().and_then(PendingExport::poll) {
            self.status = Some(outcome);
            self.export = None;
        }
    }

    fn render(&mut self) -> Result<()> {
        let Self {
            pixels,
            renderer,
            session,
            form,
            status,
            ..
        } = self;
        let Some(pixels) = pixels.as_mut() else {
            return Ok(());
        };

        let step = session.step();
        let mut view = SessionView::new(session.palette(), session.config().trials_per_phase);
        view.trial = session.current_trial();
        view.progress = session.trial_progress();
        view.overall_progress = session.overall_progress();
        if step.is_intake() {
            view.form = Some(form.view());
        }
        if step.is_result() {
            view.result = Some(ResultView {
                participant: session.profile().map_or("", |p| p.name.as_str()),
                congruent: session.statistics(Condition::Congruent),
                incongruent: session.statistics(Condition::Incongruent),
                analysis: session.analysis(),
                comment: session.comment(),
                status: status.as_deref(),
            });
        }

        renderer.render_frame(&step, &view, pixels.frame_mut())?;
        pixels.render()?;
        Ok(())
    }

    fn dispatch(&mut self, event: SessionEvent) {
        match self.session.handle_event(event) {
            Ok(true) => {}
            Ok(false) => debug!(step = %self.session.step(), "key ignored"),
            Err(SessionError::Validation(e)) => self.form.reject(&e),
            // already logged by the session; the trial simply keeps waiting
            Err(SessionError::InvalidResponse(_)) => {}
        }
    }

    fn handle_key(&mut self, event: KeyEvent, event_loop: &ActiveEventLoop) {
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => return self.cleanup_and_exit(event_loop),
            Key::Named(NamedKey::F5) => {
                self.dispatch(SessionEvent::Reset);
                self.form.reset();
                self.status = None;
                self.export = None;
                return;
            }
            _ => {}
        }

        let step = self.session.step();
        if step.is_welcome() || step.is_instructions() {
            if matches!(
                event.logical_key,
                Key::Named(NamedKey::Space | NamedKey::Enter)
            ) && !event.repeat
            {
                let next = if step.is_welcome() {
                    SessionEvent::Start
                } else {
                    SessionEvent::Ready
                };
                self.dispatch(next);
            }
        } else if step.is_testing() {
            if !event.repeat {
                self.handle_response_key(&event.logical_key);
            }
        } else if step.is_intake() {
            self.handle_form_key(&event);
        } else if step.is_result() {
            self.handle_result_key(&event);
        }
    }

    /// Digits pick a color by its position in the on-screen key legend.
    fn handle_response_key(&mut self, key: &Key) {
        let Key::Character(text) = key else {
            return;
        };
        let choice = text
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.session.palette().get(i))
            .map(|swatch| swatch.name.to_string());
        if let Some(choice) = choice {
            self.dispatch(SessionEvent::Response(choice));
        }
    }

    fn handle_form_key(&mut self, event: &KeyEvent) {
        match &event.logical_key {
            Key::Named(NamedKey::Tab | NamedKey::ArrowDown) => self.form.focus_next(),
            Key::Named(NamedKey::ArrowUp) => self.form.focus_prev(),
            Key::Named(NamedKey::ArrowRight) => self.form.cycle(true),
            Key::Named(NamedKey::ArrowLeft) => self.form.cycle(false),
            Key::Named(NamedKey::Backspace) => self.form.backspace(),
            Key::Named(NamedKey::Enter) if !event.repeat => {
                self.dispatch(SessionEvent::SubmitProfile(self.form.draft()));
            }
            _ => {
                if let Some(text) = &event.text {
                    self.form.type_text(text);
                }
            }
        }
    }

    fn handle_result_key(&mut self, event: &KeyEvent) {
        let mut comment = self.session.comment().to_string();
        match &event.logical_key {
            Key::Named(NamedKey::F2) if !event.repeat => return self.export_report(),
            Key::Named(NamedKey::Backspace) => {
                comment.pop();
            }
            Key::Named(NamedKey::Enter) => comment.push('\n'),
            _ => match &event.text {
                Some(text) => comment.extend(text.chars().filter(|c| !c.is_control())),
                None => return,
            },
        }
        if comment.chars().count() <= MAX_COMMENT_LEN {
            self.session.set_comment(comment);
        }
    }

    fn export_report(&mut self) {
        if self.export.is_some() {
            return;
        }
        let payload = match self.session.report_payload(Local::now()) {
            Ok(payload) => payload,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        let dir = self.settings.report.output_dir.clone();
        let formats = self.settings.report.format.formats();
        match PendingExport::start(payload, formats, dir) {
            Ok(export) => {
                self.status = Some(export.progress_message());
                self.export = Some(export);
            }
            Err(e) => {
                error!(error = %e, "could not start report export");
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                error!(error = %e, "failed to resize buffer");
            }
        }
        if let Err(e) = self.renderer.resize(size.width, size.height) {
            error!(error = %e, "failed to resize canvas");
        }
        debug!(width = size.width, height = size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }
        info!(step = %self.session.step(), "session window closed");
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %e, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_key(event, event_loop);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }
}
