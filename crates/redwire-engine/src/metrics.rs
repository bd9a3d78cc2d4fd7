//! Cumulative counters for an engine.
//!
//! [`EngineMetrics`] folds every evaluator [`EvaluationReport`] together
//! with the scheduler's [`UpdaterStats`], so callers can see how much
//! work a change set off without instrumenting the world.

use redwire_core::UpdaterStats;
use redwire_wire::EvaluationReport;

/// Work done since the engine was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Evaluator calls that returned successfully.
    pub evaluations: u64,
    /// Sum of [`EvaluationReport::turn_off_visits`].
    pub turn_off_visits: u64,
    /// Sum of [`EvaluationReport::turn_on_visits`].
    pub turn_on_visits: u64,
    /// Sum of [`EvaluationReport::writes`].
    pub wire_writes: u64,
    /// Report of the most recently finished evaluator call.
    pub last_evaluation: Option<EvaluationReport>,
    /// Scheduler counters.
    pub scheduler: UpdaterStats,
}

impl EngineMetrics {
    pub(crate) fn record(&mut self, report: EvaluationReport) {
        self.evaluations += 1;
        self.turn_off_visits += report.turn_off_visits as u64;
        self.turn_on_visits += report.turn_on_visits as u64;
        self.wire_writes += report.writes as u64;
        self.last_evaluation = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = EngineMetrics::default();
        assert_eq!(m.evaluations, 0);
        assert_eq!(m.wire_writes, 0);
        assert!(m.last_evaluation.is_none());
        assert_eq!(m.scheduler, UpdaterStats::default());
    }

    #[test]
    fn record_accumulates_and_keeps_last() {
        let mut m = EngineMetrics::default();
        m.record(EvaluationReport {
            turn_off_visits: 5,
            turn_on_visits: 0,
            writes: 5,
        });
        let second = EvaluationReport {
            turn_off_visits: 1,
            turn_on_visits: 4,
            writes: 5,
        };
        m.record(second);
        assert_eq!(m.evaluations, 2);
        assert_eq!(m.turn_off_visits, 6);
        assert_eq!(m.turn_on_visits, 4);
        assert_eq!(m.wire_writes, 10);
        assert_eq!(m.last_evaluation, Some(second));
    }
}
