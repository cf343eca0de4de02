//! Markdown renderer
//!
//! Renders statistics and control chart outcomes as markdown tables.

use crate::AnalysisReport;
use shewhart_core::{ShewhartError, StatsError};
use shewhart_stats::{ChartEvaluation, ChartKind, StatisticsRecord};

/// Report renderer
pub struct Renderer {
    decimals: usize,
}

impl Renderer {
    pub fn new(decimals: usize) -> Self {
        Self { decimals }
    }

    /// Render statistics and chart tables
    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut output = self.render_statistics(&report.statistics);
        output.push_str(&self.render_charts(&report.charts));
        output
    }

    pub fn render_statistics(&self, stats: &StatisticsRecord) -> String {
        let mut output = String::new();
        output.push_str("## Statistics\n\n");
        output.push_str("| statistic | value |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| count | {} |\n", stats.count));
        output.push_str(&format!("| mean | {} |\n", self.number(stats.mean)));
        output.push_str(&format!("| median | {} |\n", self.number(stats.median)));
        output.push_str(&format!("| mode | {} |\n", stats.mode));
        output.push_str(&format!("| standard deviation | {} |\n", self.number(stats.stddev)));
        output.push_str(&format!("| quartile deviation | {} |\n", self.number(stats.quartile_deviation)));
        output.push_str(&format!("| min | {} |\n", self.number(stats.min)));
        output.push_str(&format!("| max | {} |\n", self.number(stats.max)));
        output.push('\n');
        output
    }

    /// One row per chart. Failed charts show their error code in the status column.
    pub fn render_charts(&self, charts: &[(ChartKind, Result<ChartEvaluation, StatsError>)]) -> String {
        let mut output = String::new();
        output.push_str("## Control Charts\n\n");
        output.push_str("| chart | center | ucl | lcl | status |\n");
        output.push_str("|-------|--------|-----|-----|--------|\n");
        for (kind, result) in charts {
            match result {
                Ok(eval) => {
                    let r = &eval.result;
                    output.push_str(&format!(
                        "| {} | {} | {} | {} | {} |\n",
                        kind.title(),
                        self.number(r.center),
                        self.number(r.ucl),
                        self.number(r.lcl),
                        r.status
                    ));
                }
                Err(e) => {
                    let err = ShewhartError::from(e.clone());
                    output.push_str(&format!(
                        "| {} | | | | #ERROR: {} ({}) |\n",
                        kind.title(),
                        err.code,
                        err.message
                    ));
                }
            }
        }
        output.push('\n');
        output
    }

    fn number(&self, n: f64) -> String {
        format!("{:.*}", self.decimals, n)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(4)
    }
}
