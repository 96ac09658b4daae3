//! The `stroop simulate` command: a full session without a window.

use crate::settings::{FormatChoice, Settings};
use crate::simulate::run_session;
use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use rand::Rng;
use std::path::PathBuf;
use stroop_core::{Education, Gender, ParticipantDraft, SocioeconomicLevel};
use stroop_experiment::ReportPayload;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Seed for stimuli and simulated answers (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Participant name
    #[arg(long, default_value = "Simulated Participant")]
    pub name: String,

    #[arg(long, default_value = "30")]
    pub age: String,

    /// male, female or other
    #[arg(long, default_value = "other")]
    pub gender: Gender,

    /// hsc, graduation, masters or phd
    #[arg(long, default_value = "graduation")]
    pub education: Education,

    /// low, middle or high
    #[arg(long)]
    pub socioeconomic: Option<SocioeconomicLevel>,

    /// Comment written into the report
    #[arg(long, default_value = "Simulated session.")]
    pub comment: String,

    /// Probability of a wrong answer on each trial
    #[arg(long, default_value = "0.05")]
    pub error_rate: f64,

    /// Report format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<FormatChoice>,

    /// Output directory (overrides the config file)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    let draft = ParticipantDraft {
        name: args.name,
        age: args.age,
        gender: Some(args.gender),
        education: Some(args.education),
        socioeconomic: args.socioeconomic,
    };
    let payload = run_session(&settings, draft, &args.comment, seed, args.error_rate)?;

    println!("Seed: {seed}");
    print_summary(&payload);

    let format = args.format.unwrap_or(settings.report.format);
    let dir = args.output.unwrap_or(settings.report.output_dir);
    for format in format.formats() {
        let path = stroop_report::export(&payload, format, &dir)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_summary(payload: &ReportPayload) {
    let mut table = Table::new();
    table.set_header(vec!["Phase", "Mean RT (correct)", "Correct", "Incorrect", "Accuracy"]);

    for (phase, stats) in [
        ("Congruent", &payload.congruent),
        ("Incongruent", &payload.incongruent),
    ] {
        table.add_row(vec![
            Cell::new(phase),
            Cell::new(format!("{} ms", stats.mean_correct_rt_ms)),
            Cell::new(stats.correct_count),
            Cell::new(stats.incorrect_count),
            Cell::new(format!("{}%", stats.accuracy_percent)),
        ]);
    }

    println!("\n{table}");
    println!("\nInterference: {:+} ms", payload.analysis.interference_ms);
    println!("{}", payload.analysis.title);
    println!("{}\n", payload.analysis.narrative);
}
