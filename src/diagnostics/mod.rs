//! Structured report of one detection run.
//!
//! [`DetectionReport`] carries the final rectangles together with wall-clock
//! timings of each phase and per-scale scan counters. Everything serialises
//! to camelCase JSON for offline inspection.
use crate::cascade::ScanStats;
use crate::types::Rectangle;
use serde::Serialize;
use std::time::Instant;

/// Wall-clock duration of one named phase.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub phases: Vec<PhaseTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.phases.push(PhaseTiming {
            label: label.into(),
            elapsed_ms,
        });
    }

    /// Run `f` and record its duration under `label`.
    pub fn measure<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.push(label, elapsed_ms(start));
        out
    }

    pub fn phase_ms(&self, label: &str) -> Option<f64> {
        self.phases
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.elapsed_ms)
    }
}

/// Counters of one scale of the search.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub index: usize,
    pub scale: f64,
    pub width: usize,
    pub height: usize,
    #[serde(flatten)]
    pub stats: ScanStats,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub rectangles: Vec<Rectangle>,
    /// Detections before grouping, summed over scales.
    pub raw_detections: usize,
    pub timing: TimingBreakdown,
    pub scales: Vec<ScaleReport>,
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_phase() {
        let mut timing = TimingBreakdown::default();
        let v = timing.measure("work", || 41 + 1);
        assert_eq!(v, 42);
        assert!(timing.phase_ms("work").is_some());
        assert!(timing.phase_ms("other").is_none());
    }

    #[test]
    fn report_serialises_camel_case() {
        let report = DetectionReport {
            rectangles: vec![Rectangle::new(1.0, 2.0, 3.0, 4.0)],
            raw_detections: 5,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rawDetections"], 5);
        assert_eq!(json["rectangles"][0]["width"], 3.0);
        assert!(json["timing"]["totalMs"].is_number());
    }
}
