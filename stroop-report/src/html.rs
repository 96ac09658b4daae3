//! Self-contained HTML report. All styling is inlined so the file can be
//! opened offline and printed to PDF from any browser.

use stroop_core::Condition;
use stroop_experiment::{PhaseStatistics, ReportPayload};

const CONGRUENT_COLOR: &str = "#22c55e";
const INCONGRUENT_COLOR: &str = "#ef4444";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn generate_html(payload: &ReportPayload) -> String {
    let participant = &payload.participant;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Stroop Test: {}</title>\n",
        html_escape(&participant.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<header>\n<h1>Stroop Color-Word Test</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Generated {} | {} trials per phase</p>\n",
        payload.generated_at.format("%Y-%m-%d %H:%M"),
        payload.trials_per_phase
    ));
    html.push_str("</header>\n");

    html.push_str("<section>\n<h2>Participant</h2>\n<table class=\"profile\">\n");
    let socioeconomic = participant
        .socioeconomic
        .map(|level| level.label())
        .unwrap_or("not specified");
    for (label, value) in [
        ("Name", participant.name.as_str()),
        ("Age", participant.age.as_str()),
        ("Gender", participant.gender.label()),
        ("Education", participant.education.label()),
        ("Socioeconomic level", socioeconomic),
    ] {
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            label,
            html_escape(value)
        ));
    }
    html.push_str("</table>\n</section>\n");

    html.push_str("<section>\n<h2>Results</h2>\n<table class=\"results\">\n");
    html.push_str("<thead><tr><th>Phase</th><th>Mean RT (correct)</th><th>Correct</th><th>Incorrect</th><th>Accuracy</th></tr></thead>\n<tbody>\n");
    for (condition, stats) in phases(payload) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{} ms</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
            phase_label(condition),
            stats.mean_correct_rt_ms,
            stats.correct_count,
            stats.incorrect_count,
            stats.accuracy_percent
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str(&generate_rt_chart(payload));
    html.push_str(&format!(
        "<p class=\"interference\">Interference effect: <strong>{:+} ms</strong></p>\n",
        payload.analysis.interference_ms
    ));
    html.push_str("</section>\n");

    html.push_str("<section class=\"analysis\">\n<h2>Analysis</h2>\n");
    html.push_str(&format!(
        "<h3>{}</h3>\n<p>{}</p>\n",
        html_escape(&payload.analysis.title),
        html_escape(&payload.analysis.narrative)
    ));
    html.push_str("</section>\n");

    html.push_str("<section class=\"comment\">\n<h2>Participant comment</h2>\n");
    html.push_str(&format!(
        "<blockquote>{}</blockquote>\n",
        html_escape(&payload.comment).replace('\n', "<br>\n")
    ));
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

fn phases(payload: &ReportPayload) -> [(Condition, &PhaseStatistics); 2] {
    [
        (Condition::Congruent, &payload.congruent),
        (Condition::Incongruent, &payload.incongruent),
    ]
}

fn phase_label(condition: Condition) -> &'static str {
    match condition {
        Condition::Congruent => "Congruent",
        Condition::Incongruent => "Incongruent",
    }
}

/// Horizontal bars of the two mean response times.
fn generate_rt_chart(payload: &ReportPayload) -> String {
    let bar_height = 28;
    let max_width = 360;
    let padding = 10;
    let label_width = 120;

    let longest = payload
        .congruent
        .mean_correct_rt_ms
        .max(payload.incongruent.mean_correct_rt_ms)
        .max(1);

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        2 * (bar_height + padding) + padding
    );

    for (i, (condition, stats)) in phases(payload).into_iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (stats.mean_correct_rt_ms * max_width as u64 / longest) as usize;
        let color = match condition {
            Condition::Congruent => CONGRUENT_COLOR,
            Condition::Incongruent => INCONGRUENT_COLOR,
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            phase_label(condition)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" dominant-baseline=\"middle\">{} ms</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.mean_correct_rt_ms
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; max-width: 52rem; margin: 0 auto; padding: 2rem; color: #1a1a1a; }
h1 { margin-bottom: 0.25rem; }
h2 { margin-top: 2rem; border-bottom: 1px solid #e5e7eb; padding-bottom: 0.25rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #e5e7eb; padding: 0.5rem 1rem; text-align: left; }
.profile th { width: 14rem; background: #f3f4f6; }
.results th { background: #f3f4f6; }
.interference { font-size: 1.1rem; }
.analysis h3 { margin-bottom: 0.25rem; }
blockquote { margin: 0; padding: 0.75rem 1rem; border-left: 4px solid #3b82f6; background: #f9fafb; }
svg { margin: 0.5rem 0; }
@media print { body { padding: 0; } }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_payload;

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&sample_payload());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("<td>Postgraduate</td>"));
        assert!(html.contains("<td>500 ms</td>"));
        assert!(html.contains("<td>900 ms</td>"));
        assert!(html.contains("<td>90%</td>"));
        assert!(html.contains("+400 ms"));
        assert!(html.contains("Typical Stroop effect"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut payload = sample_payload();
        payload.comment = "<script>alert(1)</script>\nsecond line".into();
        let html = generate_html(&payload);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;<br>\nsecond line"));
    }

    #[test]
    fn chart_scales_to_slower_phase() {
        let svg = generate_rt_chart(&sample_payload());
        assert!(svg.contains("width=\"360\" height=\"28\" fill=\"#ef4444\""));
        assert!(svg.contains("width=\"200\" height=\"28\" fill=\"#22c55e\""));
    }

    #[test]
    fn missing_socioeconomic_level_is_labelled() {
        let html = generate_html(&sample_payload());
        assert!(html.contains("<td>not specified</td>"));
    }
}
