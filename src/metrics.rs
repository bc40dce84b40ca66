use serde::Serialize;

use crate::session::{HistoryEntry, SlotStatus};

/// Final results of a timed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Correct words per minute of the configured duration.
    pub wpm: u32,
    /// Percentage of committed words that were correct.
    pub accuracy: u32,
    pub correct: usize,
    pub attempted: usize,
}

impl Metrics {
    /// Derive results from the commit history against the full configured duration.
    pub fn compute(history: &[HistoryEntry], duration_secs: u64) -> Self {
        let correct = history
            .iter()
            .filter(|entry| entry.status == SlotStatus::Correct)
            .count();
        let attempted = history.len();

        let minutes = duration_secs as f64 / 60.0;
        let wpm = if minutes > 0.0 {
            let raw = (correct as f64 / minutes).round();
            if raw.is_finite() {
                raw as u32
            } else {
                0
            }
        } else {
            0
        };

        let accuracy = if attempted == 0 {
            0
        } else {
            ((correct as f64 / attempted as f64) * 100.0).round() as u32
        };

        Self {
            wpm,
            accuracy,
            correct,
            attempted,
        }
    }
}

/// Result of asking a session for its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsStatus {
    /// The session has not finished yet.
    Unavailable,
    Ready(Metrics),
}

impl MetricsStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, MetricsStatus::Ready(_))
    }

    pub fn ready(self) -> Option<Metrics> {
        match self {
            MetricsStatus::Ready(metrics) => Some(metrics),
            MetricsStatus::Unavailable => None,
        }
    }
}
