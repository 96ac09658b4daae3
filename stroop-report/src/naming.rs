use crate::ReportFormat;
use chrono::NaiveDate;

/// Makes a participant name usable inside a file name.
///
/// Whitespace runs become a single `_`; anything other than letters, digits,
/// `-` and `_` is replaced with `_`.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split_whitespace() {
        if !out.is_empty() {
            out.push('_');
        }
        out.extend(word.chars().map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        }));
    }
    if out.is_empty() {
        out.push_str("participant");
    }
    out
}

/// `Stroop_Test_<name>_<YYYY-MM-DD>.<ext>`
pub fn report_file_name(name: &str, date: NaiveDate, format: ReportFormat) -> String {
    format!(
        "Stroop_Test_{}_{}.{}",
        sanitize_name(name),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
