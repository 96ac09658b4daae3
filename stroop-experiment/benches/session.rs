use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pprof::criterion::{Output, PProfProfiler};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use stroop_core::{Condition, Palette, TrialResult};
use stroop_experiment::{
    ExperimentConfig, SessionEvent, SessionStateMachine, StimulusGenerator, compute_statistics,
};
use stroop_timing::ManualTimer;

/// Trial generation, incongruent trials include the rejection loop.
pub fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_trial");
    for condition in Condition::ALL {
        group.bench_function(condition.as_str(), |b| {
            let palette = Palette::standard().unwrap();
            let mut generator = StimulusGenerator::new(palette, StdRng::seed_from_u64(7));
            b.iter(|| black_box(generator.generate(black_box(condition))));
        });
    }
    group.finish();
}

/// A complete two-phase run driven through the event interface.
pub fn bench_full_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(5));

    group.bench_function("two_phases", |b| {
        b.iter_batched(
            || {
                let timer = ManualTimer::new();
                let sm = SessionStateMachine::new(
                    ExperimentConfig::default(),
                    timer.clone(),
                    StdRng::seed_from_u64(11),
                )
                .unwrap();
                (sm, timer)
            },
            |(mut sm, timer)| {
                sm.handle_event(SessionEvent::Start).ok();
                for _ in Condition::ALL {
                    sm.handle_event(SessionEvent::Ready).ok();
                    timer.advance_ms(150);
                    for event in sm.update() {
                        sm.handle_event(event).ok();
                    }
                    while let Some(trial) = sm.current_trial() {
                        let choice = trial.correct_answer.to_string();
                        timer.advance_ms(480);
                        sm.handle_event(SessionEvent::Response(choice)).ok();
                    }
                }
                black_box(sm.analysis())
            },
            BatchSize::SmallInput,
        );
    });

    let results: Vec<_> = (0..20u64)
        .map(|i| TrialResult::new(400 + i * 17, i % 4 != 0))
        .collect();
    group.bench_function("statistics", |b| {
        b.iter(|| black_box(compute_statistics(black_box(&results))));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
        .noise_threshold(0.02);
    targets = bench_generate, bench_full_session
}

criterion_main!(benches);
