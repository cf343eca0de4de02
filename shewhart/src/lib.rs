//! Shewhart - SPC statistics and control-limit engine
//!
//! Takes a sample (directly entered values and/or grouped frequency data),
//! computes its descriptive statistics and evaluates the X, P, R and C
//! control charts against it.

mod input;
mod render;
mod report;

pub use input::{parse_grouped, parse_grouped_entry, parse_values, SampleInput};
pub use render::Renderer;
pub use report::AnalysisReport;

pub use shewhart_stats::{
    ChartEvaluation, ChartKind, ControlResult, ControlStatus, ModeReport, StatisticsRecord,
};

use shewhart_core::{Sample, ShewhartError, Value};
use shewhart_plugin::{EvalContext, PluginRegistry, DEFAULT_SIGMA};
use std::sync::Arc;
use tracing::debug;

/// Main Shewhart engine
pub struct Shewhart {
    registry: Arc<PluginRegistry>,
    sigma: f64,
    decimals: usize,
}

impl Shewhart {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            sigma: DEFAULT_SIGMA,
            decimals: 4,
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(shewhart_stats::stats_registry())
    }

    /// Control band width in sigma units
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Decimal places in rendered output
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Parse the request fields and analyze the resulting sample
    pub fn analyze(&self, input: &SampleInput) -> Result<AnalysisReport, ShewhartError> {
        let sample = input.to_sample()?;
        self.analyze_sample(&sample)
    }

    /// Statistics must succeed; each chart failure is kept in the report
    pub fn analyze_sample(&self, sample: &Sample) -> Result<AnalysisReport, ShewhartError> {
        debug!(count = sample.len(), sigma = self.sigma, "analyzing sample");

        let statistics = shewhart_stats::describe(sample.as_slice())?;
        let charts = shewhart_stats::evaluate_all(sample.as_slice(), self.sigma);

        for (kind, result) in &charts {
            match result {
                Ok(eval) => debug!(chart = kind.title(), status = %eval.result.status, "chart evaluated"),
                Err(e) => debug!(chart = kind.title(), error = %e, "chart skipped"),
            }
        }

        Ok(AnalysisReport {
            sample: sample.clone(),
            statistics,
            charts,
        })
    }

    pub fn describe(&self, sample: &Sample) -> Result<StatisticsRecord, ShewhartError> {
        Ok(shewhart_stats::describe(sample.as_slice())?)
    }

    pub fn chart(&self, sample: &Sample, kind: ChartKind) -> Result<ChartEvaluation, ShewhartError> {
        Ok(shewhart_stats::evaluate_with_sigma(sample.as_slice(), kind, self.sigma)?)
    }

    /// Call a registered function by name
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        let ctx = EvalContext::new(self.registry.clone()).with_sigma(self.sigma);
        let result = self.registry.call_function(name, args, &ctx);
        if let Value::Error(e) = &result {
            debug!(function = name, code = %e.code, "function returned error");
        }
        result
    }

    /// Markdown rendering of a report
    pub fn render(&self, report: &AnalysisReport) -> String {
        Renderer::new(self.decimals).render(report)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }
}

impl Default for Shewhart {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shewhart_core::codes;

    fn engine() -> Shewhart {
        Shewhart::with_standard_library()
    }

    fn sample(values: &[f64]) -> Sample {
        Sample::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_analyze_direct_values() {
        let input = SampleInput::new().with_data("2, 4, 4, 4, 5, 5, 7, 9");
        let report = engine().analyze(&input).unwrap();
        assert_eq!(report.statistics.count, 8);
        assert_eq!(report.statistics.mean, 5.0);
        assert_eq!(report.statistics.median, 4.5);
        assert_eq!(report.statistics.mode, ModeReport::Values(vec![4.0]));
        assert!((report.statistics.stddev - 2.1381).abs() < 1e-4);
        assert_eq!(report.charts.len(), 4);
    }

    #[test]
    fn test_analyze_grouped_values() {
        let input = SampleInput::new().with_grouped("1-2:3;3-4:2");
        let report = engine().analyze(&input).unwrap();
        assert_eq!(report.sample.as_slice(), &[1.5, 1.5, 1.5, 3.5, 3.5]);
        assert_eq!(report.statistics.mode, ModeReport::Values(vec![1.5]));
    }

    #[test]
    fn test_analyze_parse_error_carries_entry() {
        let input = SampleInput::new().with_grouped("1-2:3;bad");
        let err = engine().analyze(&input).unwrap_err();
        assert_eq!(err.code, codes::PARSE_ERROR);
        assert_eq!(err.entry.as_deref(), Some("bad"));
    }

    #[test]
    fn test_analyze_single_value_is_insufficient() {
        let err = engine().analyze(&SampleInput::new().with_data("7")).unwrap_err();
        assert_eq!(err.code, codes::INSUFFICIENT_DATA);
    }

    #[test]
    fn test_chart_failures_are_per_chart() {
        let report = engine().analyze_sample(&sample(&[3.0, 5.0, 4.0])).unwrap();
        assert!(matches!(report.chart(ChartKind::X), Some(Ok(_))));
        assert!(matches!(report.chart(ChartKind::P), Some(Err(_))));
        assert!(matches!(report.chart(ChartKind::R), Some(Ok(_))));
        assert!(matches!(report.chart(ChartKind::C), Some(Ok(_))));
    }

    #[test]
    fn test_sigma_reaches_charts_and_plugins() {
        let data = [10.0, 10.0, 10.0, 10.0, 10.0, 1000.0];
        let narrow = engine().with_sigma(1.0);
        let report = narrow.analyze_sample(&sample(&data)).unwrap();
        assert_eq!(report.out_of_control(), vec![ChartKind::X, ChartKind::R, ChartKind::C]);

        let value = narrow.call("x_chart", &[Value::numbers(&data)]);
        assert_eq!(value.get("in_control").as_bool(), Some(false));

        let wide = engine().chart(&sample(&data), ChartKind::X).unwrap();
        assert_eq!(wide.result.status, ControlStatus::InControl);
    }

    #[test]
    fn test_call_unknown_function() {
        let result = engine().call("meen", &[Value::numbers(&[1.0, 2.0])]);
        let err = result.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_deref().unwrap_or("").contains("mean"));
    }

    #[test]
    fn test_render_contains_tables() {
        let shewhart = engine().with_decimals(2);
        let report = shewhart.analyze_sample(&sample(&[10.0, 10.0, 10.0, 10.0, 100.0])).unwrap();
        let markdown = shewhart.render(&report);
        assert!(markdown.contains("| mean | 28.00 |"));
        assert!(markdown.contains("| X-Chart | 28.00 | 136.00 | -80.00 | In Control |"));
        assert!(markdown.contains("| P-Chart | | | | #ERROR: DOMAIN_ERROR"));
    }

    #[test]
    fn test_report_json() {
        let report = engine().analyze_sample(&sample(&[1.0, 2.0, 3.0])).unwrap();
        let json = report.to_json();
        assert_eq!(json["statistics"]["mode"], "No unique mode");
        assert_eq!(json["charts"][0]["chart"], "x");
        assert_eq!(json["charts"][0]["evaluation"]["status"], "in_control");
        assert_eq!(json["charts"][1]["error"]["code"], "DOMAIN_ERROR");
    }

    #[test]
    fn test_help_and_listing() {
        let shewhart = engine();
        assert!(matches!(shewhart.help(None), Value::Object(_)));
        assert!(matches!(shewhart.help(Some("x_chart")), Value::Object(_)));
        assert!(matches!(shewhart.list_functions(Some("spc")), Value::List(_)));
    }
}
