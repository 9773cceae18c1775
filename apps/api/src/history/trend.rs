use serde::{Deserialize, Serialize};

use crate::history::ScoreRecord;
use crate::screening::ats_score::round2;

/// Progress charts need at least two points.
pub const MIN_CHART_SAMPLES: usize = 2;

/// Summary of a candidate's score history, in append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrend {
    pub samples: usize,
    pub first: f64,
    pub latest: f64,
    pub best: f64,
    /// latest - first
    pub change: f64,
    pub chart_ready: bool,
}

impl ScoreTrend {
    /// Returns `None` for an empty history.
    pub fn from_records(records: &[ScoreRecord]) -> Option<Self> {
        let first = records.first()?.score;
        let latest = records.last()?.score;
        let best = records
            .iter()
            .map(|r| r.score)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            samples: records.len(),
            first,
            latest,
            best,
            change: round2(latest - first),
            chart_ready: records.len() >= MIN_CHART_SAMPLES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(scores: &[f64]) -> Vec<ScoreRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoreRecord {
                timestamp: format!("2026-01-{:02}T00:00:00Z", i + 1),
                score: *s,
            })
            .collect()
    }

    #[test]
    fn test_empty_history_has_no_trend() {
        assert!(ScoreTrend::from_records(&[]).is_none());
    }

    #[test]
    fn test_single_sample_not_chart_ready() {
        let trend = ScoreTrend::from_records(&records(&[40.0])).unwrap();
        assert_eq!(trend.samples, 1);
        assert_eq!(trend.change, 0.0);
        assert!(!trend.chart_ready);
    }

    #[test]
    fn test_trend_tracks_first_latest_best() {
        let trend = ScoreTrend::from_records(&records(&[40.0, 72.5, 61.1])).unwrap();
        assert_eq!(trend.first, 40.0);
        assert_eq!(trend.latest, 61.1);
        assert_eq!(trend.best, 72.5);
        assert_eq!(trend.change, 21.1);
        assert!(trend.chart_ready);
    }

    #[test]
    fn test_negative_change() {
        let trend = ScoreTrend::from_records(&records(&[80.0, 33.33])).unwrap();
        assert_eq!(trend.change, -46.67);
    }
}
