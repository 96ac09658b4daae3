use crate::text::{TextBitmap, line_height, measure_text, render_text_pixmap, wrap_lines};
use crate::view::{FormView, ResultView, SessionView};
use ab_glyph::{Font, FontVec, InvalidFont};
use std::collections::HashMap;
use std::sync::Arc;
use stroop_cache::{TextId, intern_all, lookup_text};
use stroop_core::{Condition, Palette, Phase};
use thiserror::Error;
use tiny_skia::{Color, Pixmap, PixmapPaint, Rect, Transform};
use theme::color;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid font data: {0}")]
    Font(#[from] InvalidFont),

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
}

pub mod theme {
    use tiny_skia::Color;

    pub const BACKGROUND: [u8; 4] = [248, 250, 252, 255];
    pub const TEXT: [u8; 4] = [15, 23, 42, 255];
    pub const MUTED: [u8; 4] = [100, 116, 139, 255];
    pub const ACCENT: [u8; 4] = [79, 70, 229, 255];
    pub const PANEL: [u8; 4] = [226, 232, 240, 255];
    pub const ERROR: [u8; 4] = [220, 38, 38, 255];
    pub const CONGRUENT: [u8; 4] = [34, 197, 94, 255];
    pub const INCONGRUENT: [u8; 4] = [245, 158, 11, 255];

    pub fn color([r, g, b, a]: [u8; 4]) -> Color {
        Color::from_rgba8(r, g, b, a)
    }
}

const TITLE: &str = "Stroop Color-Word Test";
const WELCOME_BODY: &str = "You will see color names printed in colored ink. Name the INK color \
     as quickly and accurately as you can, whatever the word says.";
const PRESS_SPACE_BEGIN: &str = "Press Space to begin";
const PRESS_SPACE_READY: &str = "Press Space when ready";
const CONGRUENT_BODY: &str =
    "In this phase the word and its ink color match. Press the number key of the ink color.";
const INCONGRUENT_BODY: &str = "Now the word names a different color than its ink. Respond to \
     the INK color and ignore the word.";
const FORM_TITLE: &str = "About you";
const FORM_HELP: &str = "Tab / Up / Down: move   Left / Right: choose   Enter: submit";
const RESULT_HELP: &str = "F2: export report   F5: new session   Esc: quit";
const QUIT_HINT: &str = "Esc to quit";

const STATIC_LABELS: &[&str] = &[
    TITLE,
    PRESS_SPACE_BEGIN,
    PRESS_SPACE_READY,
    FORM_TITLE,
    FORM_HELP,
    RESULT_HELP,
    QUIT_HINT,
    "CONGRUENT",
    "INCONGRUENT",
];

/// Horizontal anchor for [`Renderer::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    /// Draws one line of text with its top at `pos.1`.
    fn draw_text(&mut self, text: &str, pos: (f32, f32), size: f32, color: Color, align: Align);
}

pub trait PhaseRenderer<P: Phase>: Renderer {
    fn render_phase(&mut self, phase: &P, view: &SessionView<'_>) -> Result<(), RenderError>;
}

/// Static labels are interned at startup. Anything else (trial counters,
/// typed form values, the comment) is keyed by its contents so the global
/// interner does not grow with every keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TextRef {
    Interned(TextId),
    Dynamic(Box<str>),
}

fn text_ref(text: &str) -> TextRef {
    match lookup_text(text) {
        Some(id) => TextRef::Interned(id),
        None => TextRef::Dynamic(text.into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    text: TextRef,
    /// Size in tenths of a pixel.
    size: u32,
    rgba: [u8; 4],
}

struct TextCache {
    map: HashMap<TextKey, Option<Arc<TextBitmap>>>,
    capacity: usize,
}

impl TextCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    fn get_or_render<F: Font>(
        &mut self,
        font: &F,
        text: &str,
        size: f32,
        color: Color,
    ) -> Option<Arc<TextBitmap>> {
        let c = color.to_color_u8();
        let key = TextKey {
            text: text_ref(text),
            size: (size * 10.0).round() as u32,
            rgba: [c.red(), c.green(), c.blue(), c.alpha()],
        };
        if let Some(hit) = self.map.get(&key) {
            return hit.clone();
        }
        if self.map.len() >= self.capacity {
            debug!(entries = self.map.len(), "text cache full, flushing");
            self.map.clear();
        }
        let rendered = render_text_pixmap(text, size, font, color).map(Arc::new);
        self.map.insert(key, rendered.clone());
        rendered
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

pub struct SkiaRenderer<F: Font = FontVec> {
    width: u32,
    height: u32,
    font: F,
    canvas: Pixmap,
    text_cache: TextCache,
}

impl SkiaRenderer<FontVec> {
    /// Builds a renderer from the raw bytes of a TrueType/OpenType font.
    pub fn from_font_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(data)?;
        Self::new(width, height, font)
    }
}

impl<F: Font> SkiaRenderer<F> {
    pub fn new(width: u32, height: u32, font: F) -> Result<Self, RenderError> {
        intern_all(STATIC_LABELS.iter().copied());
        Ok(Self {
            width,
            height,
            font,
            canvas: Self::blank_canvas(width, height)?,
            text_cache: TextCache::new(1024),
        })
    }

    fn blank_canvas(width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        canvas.fill(color(theme::BACKGROUND));
        Ok(canvas)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.canvas = Self::blank_canvas(width, height)?;
        self.width = width;
        self.height = height;
        // sizes scale with the window, old rasters will not be hit again
        self.text_cache.clear();
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    /// Draws `view` for `phase` and copies the result into an RGBA8 frame.
    pub fn render_frame<P: Phase>(
        &mut self,
        phase: &P,
        view: &SessionView<'_>,
        frame_buffer: &mut [u8],
    ) -> Result<(), RenderError> {
        let expected = self.canvas.data().len();
        if frame_buffer.len() != expected {
            return Err(RenderError::FrameSize {
                expected,
                actual: frame_buffer.len(),
            });
        }
        self.clear(color(theme::BACKGROUND));
        self.render_phase(phase, view)?;
        // the canvas is opaque, so premultiplied and straight RGBA agree
        frame_buffer.copy_from_slice(self.canvas.data());
        Ok(())
    }

    /// Layout unit relative to a 1280x720 design.
    fn scale(&self) -> f32 {
        (self.height as f32 / 720.0)
            .min(self.width as f32 / 1280.0)
            .clamp(0.5, 3.0)
    }

    fn center_x(&self) -> f32 {
        self.width as f32 * 0.5
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        measure_text(text, size, &self.font)
    }

    fn line_height(&self, size: f32) -> f32 {
        line_height(size, &self.font)
    }

    /// Word-wrapped paragraph; returns the y below the last line.
    fn draw_paragraph(
        &mut self,
        text: &str,
        top: f32,
        size: f32,
        max_width: f32,
        color: Color,
        (x, align): (f32, Align),
    ) -> f32 {
        let lines = wrap_lines(text, max_width, |line| self.text_width(line, size));
        let step = self.line_height(size) * 1.15;
        let mut y = top;
        for line in &lines {
            self.draw_text(line, (x, y), size, color, align);
            y += step;
        }
        y
    }

    fn draw_welcome(&mut self, view: &SessionView<'_>) {
        let s = self.scale();
        let cx = self.center_x();
        let max_width = 900.0 * s;
        let mut y = self.height as f32 * 0.22;

        self.draw_text(TITLE, (cx, y), 48.0 * s, color(theme::TEXT), Align::Center);
        y += 100.0 * s;
        y = self.draw_paragraph(
            WELCOME_BODY,
            y,
            24.0 * s,
            max_width,
            color(theme::TEXT),
            (cx, Align::Center),
        );
        y += 16.0 * s;
        let phases = format!(
            "The test has two phases of {} trials each. Answer with the number keys 1 to {}.",
            view.trials_per_phase,
            view.palette.len()
        );
        y = self.draw_paragraph(
            &phases,
            y,
            22.0 * s,
            max_width,
            color(theme::MUTED),
            (cx, Align::Center),
        );
        y += 48.0 * s;
        self.draw_text(PRESS_SPACE_BEGIN, (cx, y), 28.0 * s, color(theme::ACCENT), Align::Center);
        self.draw_hint(QUIT_HINT);
    }

    fn draw_instructions(&mut self, condition: Condition, view: &SessionView<'_>) {
        let s = self.scale();
        let cx = self.center_x();
        let mut y = self.height as f32 * 0.15;

        let heading = format!(
            "Phase {} of {}: {}",
            condition.ordinal() + 1,
            Condition::ALL.len(),
            condition_label(condition)
        );
        self.draw_text(&heading, (cx, y), 40.0 * s, color(theme::TEXT), Align::Center);
        y += 80.0 * s;
        let body = match condition {
            Condition::Congruent => CONGRUENT_BODY,
            Condition::Incongruent => INCONGRUENT_BODY,
        };
        y = self.draw_paragraph(
            body,
            y,
            24.0 * s,
            900.0 * s,
            color(theme::TEXT),
            (cx, Align::Center),
        );
        y += 24.0 * s;
        self.draw_text(PRESS_SPACE_READY, (cx, y), 28.0 * s, color(theme::ACCENT), Align::Center);

        self.draw_key_legend(view.palette);
    }

    fn draw_testing(&mut self, condition: Option<Condition>, view: &SessionView<'_>) {
        let s = self.scale();
        let margin = 32.0 * s;
        let top = 28.0 * s;

        if let Some(condition) = condition {
            let badge = match condition {
                Condition::Congruent => theme::CONGRUENT,
                Condition::Incongruent => theme::INCONGRUENT,
            };
            let dot = 14.0 * s;
            let label_size = 18.0 * s;
            let label_top = top + (dot - self.line_height(label_size)) * 0.5;
            self.fill_rect(margin, top, dot, dot, color(badge));
            let label = condition.as_str().to_ascii_uppercase();
            self.draw_text(
                &label,
                (margin + dot * 2.0, label_top),
                label_size,
                color(theme::MUTED),
                Align::Left,
            );
        }

        if let Some((current, total)) = view.progress {
            let counter = format!("Trial {current} / {total}");
            self.draw_text(
                &counter,
                (self.width as f32 - margin, top - 6.0 * s),
                24.0 * s,
                color(theme::ACCENT),
                Align::Right,
            );
        }

        let bar_y = top + 44.0 * s;
        let bar_w = self.width as f32 - 2.0 * margin;
        self.fill_rect(margin, bar_y, bar_w, 6.0 * s, color(theme::PANEL));
        self.fill_rect(
            margin,
            bar_y,
            bar_w * view.overall_progress.clamp(0.0, 1.0),
            6.0 * s,
            color(theme::ACCENT),
        );

        if let Some(trial) = view.trial {
            let [r, g, b, a] = trial.ink_rgba();
            let size = 120.0 * s;
            let y = self.height as f32 * 0.38 - self.line_height(size) * 0.5;
            self.draw_text(
                trial.displayed_word,
                (self.center_x(), y),
                size,
                Color::from_rgba8(r, g, b, a),
                Align::Center,
            );
        }

        self.draw_key_legend(view.palette);
    }

    /// Neutral response buttons, three per row, numbered from 1.
    fn draw_key_legend(&mut self, palette: &Palette) {
        let s = self.scale();
        let cols = 3usize;
        let rows = palette.len().div_ceil(cols);
        let gap = 14.0 * s;
        let cell_w = 220.0 * s;
        let cell_h = 56.0 * s;
        let grid_w = cols as f32 * cell_w + (cols - 1) as f32 * gap;
        let x0 = self.center_x() - grid_w * 0.5;
        let y0 = self.height as f32 - 48.0 * s - rows as f32 * (cell_h + gap);
        let label_size = 24.0 * s;

        for (i, swatch) in palette.swatches().iter().enumerate() {
            let x = x0 + (i % cols) as f32 * (cell_w + gap);
            let y = y0 + (i / cols) as f32 * (cell_h + gap);
            self.fill_rect(x, y, cell_w, cell_h, color(theme::PANEL));
            let label = format!("{}   {}", i + 1, swatch.name);
            let text_top = y + (cell_h - self.line_height(label_size)) * 0.5;
            self.draw_text(
                &label,
                (x + cell_w * 0.5, text_top),
                label_size,
                color(theme::TEXT),
                Align::Center,
            );
        }
    }

    fn draw_form(&mut self, form: &FormView) {
        let s = self.scale();
        let cx = self.center_x();
        let mut y = self.height as f32 * 0.1;
        self.draw_text(FORM_TITLE, (cx, y), 40.0 * s, color(theme::TEXT), Align::Center);
        y += 90.0 * s;

        let label_size = 22.0 * s;
        let box_w = 480.0 * s;
        let box_h = 48.0 * s;
        let label_x = cx - 40.0 * s;
        let box_x = cx;
        let border = 2.0 * s;

        for field in &form.fields {
            let text_top = y + (box_h - self.line_height(label_size)) * 0.5;
            self.draw_text(
                field.label,
                (label_x, text_top),
                label_size,
                color(theme::TEXT),
                Align::Right,
            );
            if field.focused {
                self.fill_rect(
                    box_x - border,
                    y - border,
                    box_w + 2.0 * border,
                    box_h + 2.0 * border,
                    color(theme::ACCENT),
                );
            }
            self.fill_rect(box_x, y, box_w, box_h, color(theme::PANEL));

            let (value, ink) = match (field.value.is_empty(), field.is_choice) {
                (true, true) => ("< select >".to_string(), color(theme::MUTED)),
                (false, true) => (format!("< {} >", field.value), color(theme::TEXT)),
                (_, false) if field.focused => (format!("{}_", field.value), color(theme::TEXT)),
                (_, false) => (field.value.clone(), color(theme::TEXT)),
            };
            self.draw_text(&value, (box_x + 14.0 * s, text_top), label_size, ink, Align::Left);
            y += box_h + 20.0 * s;
        }

        if let Some(error) = &form.error {
            y += 10.0 * s;
            self.draw_text(error, (cx, y), 22.0 * s, color(theme::ERROR), Align::Center);
        }
        self.draw_hint(FORM_HELP);
    }

    fn draw_result(&mut self, result: &ResultView<'_>) {
        let s = self.scale();
        let cx = self.center_x();
        let max_width = 1000.0 * s;
        let left = cx - max_width * 0.5;
        let mut y = self.height as f32 * 0.06;

        let heading = format!("Results for {}", result.participant);
        self.draw_text(&heading, (cx, y), 36.0 * s, color(theme::TEXT), Align::Center);
        y += 70.0 * s;

        let row_size = 22.0 * s;
        for (condition, stats) in [
            (Condition::Congruent, &result.congruent),
            (Condition::Incongruent, &result.incongruent),
        ] {
            let row = format!(
                "{}: mean {} ms   accuracy {}%   {} correct, {} incorrect",
                condition_label(condition),
                stats.mean_correct_rt_ms,
                stats.accuracy_percent,
                stats.correct_count,
                stats.incorrect_count
            );
            self.draw_text(&row, (left, y), row_size, color(theme::TEXT), Align::Left);
            y += self.line_height(row_size) * 1.3;
        }
        let interference = format!(
            "Interference effect: {:+} ms",
            result.analysis.interference_ms
        );
        self.draw_text(&interference, (left, y), row_size, color(theme::ACCENT), Align::Left);
        y += 56.0 * s;

        let category = result.analysis.category;
        self.draw_text(category.title(), (left, y), 28.0 * s, color(theme::TEXT), Align::Left);
        y += 44.0 * s;
        y = self.draw_paragraph(
            category.narrative(),
            y,
            20.0 * s,
            max_width,
            color(theme::TEXT),
            (left, Align::Left),
        );
        y += 24.0 * s;

        self.draw_text("Your comment:", (left, y), 20.0 * s, color(theme::MUTED), Align::Left);
        y += 34.0 * s;
        let box_h = 110.0 * s;
        self.fill_rect(left, y, max_width, box_h, color(theme::PANEL));
        let comment = format!("{}_", result.comment);
        self.draw_paragraph(
            &comment,
            y + 10.0 * s,
            20.0 * s,
            max_width - 28.0 * s,
            color(theme::TEXT),
            (left + 14.0 * s, Align::Left),
        );
        y += box_h + 20.0 * s;

        if let Some(status) = result.status {
            self.draw_text(status, (cx, y), 20.0 * s, color(theme::ACCENT), Align::Center);
        }
        self.draw_hint(RESULT_HELP);
    }

    fn draw_hint(&mut self, hint: &str) {
        let s = self.scale();
        let y = self.height as f32 - 36.0 * s;
        self.draw_text(hint, (self.center_x(), y), 16.0 * s, color(theme::MUTED), Align::Center);
    }
}

fn condition_label(condition: Condition) -> &'static str {
    match condition {
        Condition::Congruent => "Congruent",
        Condition::Incongruent => "Incongruent",
    }
}

impl<F: Font> Renderer for SkiaRenderer<F> {
    fn clear(&mut self, color: Color) {
        self.canvas.fill(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(color);
        paint.anti_alias = false;
        self.canvas.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_text(&mut self, text: &str, pos: (f32, f32), size: f32, color: Color, align: Align) {
        let Some(bitmap) = self.text_cache.get_or_render(&self.font, text, size, color) else {
            return;
        };
        let width = self.text_width(text, size);
        let origin_x = match align {
            Align::Left => pos.0,
            Align::Center => pos.0 - width * 0.5,
            Align::Right => pos.0 - width,
        };
        self.canvas.draw_pixmap(
            origin_x.round() as i32 + bitmap.left,
            pos.1.round() as i32 + bitmap.top,
            bitmap.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

impl<F, P> PhaseRenderer<P> for SkiaRenderer<F>
where
    F: Font,
    P: Phase,
{
    fn render_phase(&mut self, phase: &P, view: &SessionView<'_>) -> Result<(), RenderError> {
        match phase {
            p if p.is_welcome() => self.draw_welcome(view),
            p if p.is_instructions() => {
                if let Some(condition) = p.condition() {
                    self.draw_instructions(condition, view);
                }
            }
            p if p.is_testing() => self.draw_testing(p.condition(), view),
            p if p.is_intake() => {
                if let Some(form) = &view.form {
                    self.draw_form(form);
                }
            }
            p if p.is_result() => {
                if let Some(result) = &view.result {
                    self.draw_result(result);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
