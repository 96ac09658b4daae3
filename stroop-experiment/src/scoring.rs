use serde::{Deserialize, Serialize};
use stroop_core::TrialResult;

/// Summary of one phase, derived from its result sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatistics {
    /// Mean response time over correct trials, 0 when none were correct.
    pub mean_correct_rt_ms: u64,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Share of correct trials, 0 for an empty phase.
    pub accuracy_percent: u32,
}

impl PhaseStatistics {
    pub fn total(&self) -> usize {
        self.correct_count + self.incorrect_count
    }
}

/// Integer division, halves round up.
fn div_round(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

pub fn compute_statistics(results: &[TrialResult]) -> PhaseStatistics {
    if results.is_empty() {
        return PhaseStatistics::default();
    }

    let (correct, sum_ms) = results
        .iter()
        .filter(|r| r.is_correct)
        .fold((0u64, 0u64), |(n, sum), r| (n + 1, sum + r.response_time_ms));
    let total = results.len() as u64;

    PhaseStatistics {
        mean_correct_rt_ms: if correct > 0 { div_round(sum_ms, correct) } else { 0 },
        correct_count: correct as usize,
        incorrect_count: (total - correct) as usize,
        accuracy_percent: div_round(100 * correct, total) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(rows: &[(u64, bool)]) -> Vec<TrialResult> {
        rows.iter().map(|&(ms, ok)| TrialResult::new(ms, ok)).collect()
    }

    #[test]
    fn empty_sequence_is_all_zero() {
        assert_eq!(compute_statistics(&[]), PhaseStatistics::default());
    }

    #[test]
    fn twenty_correct_at_500ms() {
        let stats = compute_statistics(&vec![TrialResult::new(500, true); 20]);
        assert_eq!(stats.mean_correct_rt_ms, 500);
        assert_eq!(stats.accuracy_percent, 100);
        assert_eq!(stats.correct_count, 20);
        assert_eq!(stats.incorrect_count, 0);
    }

    #[test]
    fn mean_ignores_incorrect_trials() {
        let stats = compute_statistics(&results(&[(400, true), (600, true), (5000, false)]));
        assert_eq!(stats.mean_correct_rt_ms, 500);
        assert_eq!(stats.correct_count, 2);
        assert_eq!(stats.incorrect_count, 1);
        assert_eq!(stats.accuracy_percent, 67);
    }

    #[test]
    fn no_correct_trials_gives_zero_mean() {
        let stats = compute_statistics(&results(&[(800, false), (900, false)]));
        assert_eq!(stats.mean_correct_rt_ms, 0);
        assert_eq!(stats.accuracy_percent, 0);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn halves_round_up() {
        let stats = compute_statistics(&results(&[(500, true), (501, true)]));
        assert_eq!(stats.mean_correct_rt_ms, 501);

        // 1 of 8 correct is 12.5%
        let mut seq = vec![TrialResult::new(300, false); 7];
        seq.push(TrialResult::new(300, true));
        assert_eq!(compute_statistics(&seq).accuracy_percent, 13);
    }

    #[test]
    fn counts_partition_the_sequence() {
        for n in 0..30u64 {
            let seq: Vec<_> = (0..n).map(|i| TrialResult::new(i * 10, i % 3 != 0)).collect();
            let stats = compute_statistics(&seq);
            assert_eq!(stats.correct_count + stats.incorrect_count, seq.len());
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        let seq = results(&[(512, true), (733, false), (498, true)]);
        assert_eq!(compute_statistics(&seq), compute_statistics(&seq));
    }
}
