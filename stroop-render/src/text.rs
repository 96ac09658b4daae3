use ab_glyph::{Font, Glyph, PxScale, ScaleFont, point};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

fn layout<F: Font>(text: &str, font_size: f32, font: &F) -> (Vec<Glyph>, f32) {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::with_capacity(text.len());
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }
    (glyphs, pen_x)
}

/// Advance width of `text` in pixels.
pub fn measure_text<F: Font>(text: &str, font_size: f32, font: &F) -> f32 {
    layout(text, font_size, font).1
}

/// A cropped text raster and where its top-left corner sits relative to the
/// line origin (pen start, top of the ascent).
pub struct TextBitmap {
    pub pixmap: Pixmap,
    pub left: i32,
    pub top: i32,
}

/// Rasterizes `text` into a tightly cropped transparent pixmap.
/// Returns `None` when nothing would be drawn (empty or whitespace-only text).
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<TextBitmap> {
    let (glyphs, _) = layout(text, font_size, font);

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return None;
    }

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;

    let stride = w as usize;
    let dst = pm.pixels_mut();
    let cu = color.to_color_u8();

    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // source over, premultiplied
            let a = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
            let inv = 1.0 - a;
            let bg = dst[i];
            let blend = |s: u8, d: u8| (s as f32 * a + d as f32 * inv).round().min(255.0) as u8;
            let sa = (a * 255.0 + bg.alpha() as f32 * inv).round().min(255.0) as u8;
            let px = PremultipliedColorU8::from_rgba(
                blend(cu.red(), bg.red()).min(sa),
                blend(cu.green(), bg.green()).min(sa),
                blend(cu.blue(), bg.blue()).min(sa),
                sa,
            );
            if let Some(px) = px {
                dst[i] = px;
            }
        });
    }

    Some(TextBitmap {
        pixmap: pm,
        left: min_x.floor() as i32,
        top: min_y.floor() as i32,
    })
}

/// Distance between consecutive baselines.
pub fn line_height<F: Font>(font_size: f32, font: &F) -> f32 {
    font.as_scaled(PxScale::from(font_size)).height()
}

/// Greedy word wrap. `width_of` measures a candidate line.
pub fn wrap_lines(text: &str, max_width: f32, width_of: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if width_of(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monospace(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn wrap_breaks_between_words() {
        let lines = wrap_lines("the quick brown fox jumps", 110.0, monospace);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_lines("a interference b", 50.0, monospace);
        assert_eq!(lines, vec!["a", "interference", "b"]);
    }

    #[test]
    fn newlines_start_new_paragraphs() {
        let lines = wrap_lines("first\n\nthird", 500.0, monospace);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_lines("", 100.0, monospace), vec![String::new()]);
    }
}
