//! Analysis report: statistics plus one outcome per control chart

use shewhart_core::{Sample, ShewhartError, StatsError};
use shewhart_stats::{ChartEvaluation, ChartKind, StatisticsRecord};
use serde_json::{json, Value as JsonValue};

/// Result of analyzing one sample
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub sample: Sample,
    pub statistics: StatisticsRecord,
    /// X, P, R, C in that order
    pub charts: Vec<(ChartKind, Result<ChartEvaluation, StatsError>)>,
}

impl AnalysisReport {
    pub fn chart(&self, kind: ChartKind) -> Option<&Result<ChartEvaluation, StatsError>> {
        self.charts.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    /// Charts that computed and came out of control
    pub fn out_of_control(&self) -> Vec<ChartKind> {
        self.charts
            .iter()
            .filter_map(|(kind, result)| match result {
                Ok(eval) if !eval.result.status.is_in_control() => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> JsonValue {
        let charts: Vec<JsonValue> = self
            .charts
            .iter()
            .map(|(kind, result)| match result {
                Ok(eval) => json!({
                    "chart": kind,
                    "title": kind.title(),
                    "label": kind.value_label(),
                    "evaluation": eval,
                }),
                Err(e) => json!({
                    "chart": kind,
                    "title": kind.title(),
                    "label": kind.value_label(),
                    "error": ShewhartError::from(e.clone()),
                }),
            })
            .collect();

        json!({
            "sample": self.sample,
            "statistics": {
                "count": self.statistics.count,
                "min": self.statistics.min,
                "max": self.statistics.max,
                "mean": self.statistics.mean,
                "median": self.statistics.median,
                "mode": self.statistics.mode.to_string(),
                "mode_values": self.statistics.mode.values(),
                "stddev": self.statistics.stddev,
                "quartile_deviation": self.statistics.quartile_deviation,
            },
            "charts": charts,
        })
    }
}
