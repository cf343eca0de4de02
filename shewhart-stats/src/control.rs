//! Shewhart control charts: individuals (X), proportion (P), range (R), count (C)
//!
//! All four charts follow the same recipe. A plotted series is derived from
//! the sample, a center line and a sigma estimate are computed from that
//! series, the limits are `center ± k·sigma`, and the process is out of
//! control iff some plotted point lies strictly outside the limits.
//! Only the series and the two estimators differ per chart, so the recipe
//! is written once in [`shewhart_limits`] and [`classify`].
//!
//! | Chart | Plotted series | Center | Sigma |
//! |-------|----------------|--------|-------|
//! | X | sample | mean | population stddev |
//! | P | sample | p̄ = mean | sqrt(p̄(1-p̄)/n) |
//! | R | ranges of consecutive pairs | mean range | population stddev of ranges |
//! | C | sample | c̄ = mean | sqrt(c̄) |
//!
//! Limits are never clamped: an LCL below zero is reported as computed.

use shewhart_plugin::prelude::*;
use crate::dispersion::stddev_p;
use crate::helpers::{extract_numbers, mean};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which control chart to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Individuals chart
    X,
    /// Proportion defective
    P,
    /// Range of consecutive pairs
    R,
    /// Count of defects
    C,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::X, ChartKind::P, ChartKind::R, ChartKind::C];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::X => "X-Chart",
            ChartKind::P => "P-Chart",
            ChartKind::R => "R-Chart",
            ChartKind::C => "C-Chart",
        }
    }

    /// Axis label for the plotted values
    pub fn value_label(&self) -> &'static str {
        match self {
            ChartKind::X => "Value",
            ChartKind::P => "Proportion Defective",
            ChartKind::R => "Range",
            ChartKind::C => "Count of Defects",
        }
    }

    /// Accepts `x`, `p`, `r`, `c`, the chart titles and the long names
    pub fn parse(s: &str) -> Option<ChartKind> {
        match s.trim().to_lowercase().as_str() {
            "x" | "x-chart" | "x_chart" | "individuals" => Some(ChartKind::X),
            "p" | "p-chart" | "p_chart" | "proportion" => Some(ChartKind::P),
            "r" | "r-chart" | "r_chart" | "range" => Some(ChartKind::R),
            "c" | "c-chart" | "c_chart" | "count" => Some(ChartKind::C),
            _ => None,
        }
    }

    /// The series this chart classifies and plots
    pub fn plotted_series(&self, sample: &[f64]) -> Vec<f64> {
        match self {
            ChartKind::R => ranges(sample),
            _ => sample.to_vec(),
        }
    }

    fn center(&self, series: &[f64]) -> Result<f64, StatsError> {
        mean(series)
    }

    fn sigma(&self, center: f64, series: &[f64]) -> Result<f64, StatsError> {
        match self {
            ChartKind::X | ChartKind::R => stddev_p(series),
            ChartKind::P => {
                if !(0.0..=1.0).contains(&center) {
                    return Err(StatsError::domain(format!(
                        "P-Chart needs proportions: p-bar {} is outside [0, 1]",
                        center
                    )));
                }
                Ok((center * (1.0 - center) / series.len() as f64).sqrt())
            }
            ChartKind::C => {
                if center < 0.0 {
                    return Err(StatsError::domain(format!(
                        "C-Chart needs non-negative counts: c-bar {} is negative",
                        center
                    )));
                }
                Ok(center.sqrt())
            }
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Center line and control limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    pub center: f64,
    pub ucl: f64,
    pub lcl: f64,
}

/// Process classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    InControl,
    OutOfControl,
}

impl ControlStatus {
    pub fn is_in_control(&self) -> bool {
        matches!(self, ControlStatus::InControl)
    }
}

impl std::fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlStatus::InControl => write!(f, "In Control"),
            ControlStatus::OutOfControl => write!(f, "Out of Control"),
        }
    }
}

/// Limits and classification for one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlResult {
    pub kind: ChartKind,
    pub center: f64,
    pub ucl: f64,
    pub lcl: f64,
    pub status: ControlStatus,
}

/// Everything a renderer needs to redraw a chart without recomputing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEvaluation {
    #[serde(flatten)]
    pub result: ControlResult,
    /// The exact values that were classified, in plot order
    pub plotted: Vec<f64>,
    /// Indices into `plotted` of points beyond the limits
    pub beyond_limits: Vec<usize>,
}

impl ChartEvaluation {
    pub fn to_value(&self) -> Value {
        let r = &self.result;
        let mut obj = HashMap::new();
        obj.insert("type".to_string(), Value::from("ControlChart"));
        obj.insert("chart".to_string(), Value::from(r.kind.title()));
        obj.insert("center".to_string(), Value::Number(r.center));
        obj.insert("ucl".to_string(), Value::Number(r.ucl));
        obj.insert("lcl".to_string(), Value::Number(r.lcl));
        obj.insert("status".to_string(), Value::Text(r.status.to_string()));
        obj.insert("in_control".to_string(), Value::Bool(r.status.is_in_control()));
        obj.insert("plotted".to_string(), Value::numbers(&self.plotted));
        obj.insert("beyond_limits".to_string(), Value::List(
            self.beyond_limits.iter().map(|&i| Value::Number(i as f64)).collect()
        ));
        Value::Object(obj)
    }
}

/// Ranges of non-overlapping consecutive pairs starting at index 0.
///
/// For odd lengths the last "pair" is a single value with range 0. A sample
/// with fewer than two values has no pair and yields an empty series.
pub fn ranges(sample: &[f64]) -> Vec<f64> {
    if sample.len() < 2 {
        return Vec::new();
    }
    sample
        .chunks(2)
        .map(|pair| {
            let hi = pair.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lo = pair.iter().copied().fold(f64::INFINITY, f64::min);
            hi - lo
        })
        .collect()
}

/// `center ± multiplier·sigma` for a series, with per-chart estimators
pub fn shewhart_limits<C, S>(
    series: &[f64],
    multiplier: f64,
    center_of: C,
    sigma_of: S,
) -> Result<ControlLimits, StatsError>
where
    C: Fn(&[f64]) -> Result<f64, StatsError>,
    S: Fn(f64, &[f64]) -> Result<f64, StatsError>,
{
    if series.is_empty() {
        return Err(StatsError::insufficient("control chart", 1, 0));
    }
    let center = center_of(series)?;
    let sigma = sigma_of(center, series)?;
    let limits = ControlLimits {
        center,
        ucl: center + multiplier * sigma,
        lcl: center - multiplier * sigma,
    };
    // classifying against an infinite or NaN limit would always say in control
    if ![center, sigma, limits.ucl, limits.lcl].iter().all(|v| v.is_finite()) {
        return Err(StatsError::domain(format!(
            "control limits overflow: center {}, sigma {}",
            center, sigma
        )));
    }
    Ok(limits)
}

/// Out of control iff a point is strictly above UCL or strictly below LCL.
/// Returns the status and the offending indices.
pub fn classify(series: &[f64], limits: &ControlLimits) -> (ControlStatus, Vec<usize>) {
    let beyond: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|&(_, &x)| x > limits.ucl || x < limits.lcl)
        .map(|(i, _)| i)
        .collect();
    let status = if beyond.is_empty() {
        ControlStatus::InControl
    } else {
        ControlStatus::OutOfControl
    };
    (status, beyond)
}

/// Evaluate a chart with the standard 3-sigma limits
pub fn evaluate(sample: &[f64], kind: ChartKind) -> Result<ChartEvaluation, StatsError> {
    evaluate_with_sigma(sample, kind, DEFAULT_SIGMA)
}

/// Evaluate a chart with a custom sigma multiplier (must be finite and positive)
pub fn evaluate_with_sigma(
    sample: &[f64],
    kind: ChartKind,
    multiplier: f64,
) -> Result<ChartEvaluation, StatsError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(StatsError::domain(format!(
            "sigma multiplier must be a positive number, got {}",
            multiplier
        )));
    }

    let plotted = kind.plotted_series(sample);
    if plotted.is_empty() {
        let needed = if kind == ChartKind::R { 2 } else { 1 };
        return Err(StatsError::insufficient(kind.title(), needed, sample.len()));
    }

    let limits = shewhart_limits(
        &plotted,
        multiplier,
        |s| kind.center(s),
        |c, s| kind.sigma(c, s),
    )?;
    let (status, beyond_limits) = classify(&plotted, &limits);

    Ok(ChartEvaluation {
        result: ControlResult {
            kind,
            center: limits.center,
            ucl: limits.ucl,
            lcl: limits.lcl,
            status,
        },
        plotted,
        beyond_limits,
    })
}

/// All four charts in X, P, R, C order. One chart failing does not stop the others.
pub fn evaluate_all(
    sample: &[f64],
    multiplier: f64,
) -> Vec<(ChartKind, Result<ChartEvaluation, StatsError>)> {
    ChartKind::ALL
        .iter()
        .map(|&kind| (kind, evaluate_with_sigma(sample, kind, multiplier)))
        .collect()
}

fn chart_call(kind: ChartKind, args: &[Value], ctx: &EvalContext) -> Value {
    let numbers = match extract_numbers(args) {
        Ok(n) => n,
        Err(e) => return Value::Error(e),
    };

    match evaluate_with_sigma(&numbers, kind, ctx.sigma) {
        Ok(eval) => eval.to_value(),
        Err(e) => Value::Error(e.into()),
    }
}

// ============ Ranges ============

pub struct Ranges;

static VALUES_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Observations in sequence order")];

static RANGES_EXAMPLES: [&str; 2] = [
    "ranges(1, 3, 2, 8, 5, 5) → [2, 6, 0]",
    "ranges(4, 1, 7) → [3, 0]",
];

static RANGES_RELATED: [&str; 1] = ["r_chart"];

impl FunctionPlugin for Ranges {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ranges",
            description: "Ranges of non-overlapping consecutive pairs (trailing single value gives 0)",
            usage: "ranges(values)",
            args: &VALUES_ARGS,
            returns: "List<Number>",
            examples: &RANGES_EXAMPLES,
            category: "spc",
            min_values: 0,
            related: &RANGES_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => Value::numbers(&ranges(&numbers)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ X Chart ============

pub struct XChart;

static X_EXAMPLES: [&str; 1] = ["x_chart(10, 10, 10, 10, 100) → {center: 28, ucl: 136, lcl: -80, status: In Control}"];

static CHART_RELATED: [&str; 4] = ["x_chart", "p_chart", "r_chart", "c_chart"];

impl FunctionPlugin for XChart {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "x_chart",
            description: "Individuals chart: mean ± k·population stddev",
            usage: "x_chart(values)",
            args: &VALUES_ARGS,
            returns: "Object",
            examples: &X_EXAMPLES,
            category: "spc",
            min_values: 1,
            related: &CHART_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        chart_call(ChartKind::X, args, ctx)
    }
}

// ============ P Chart ============

pub struct PChart;

static P_EXAMPLES: [&str; 1] = ["p_chart(0.1, 0.2, 0.15, 0.1) → {center: 0.1375, ...}"];

impl FunctionPlugin for PChart {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "p_chart",
            description: "Proportion chart: p̄ ± k·sqrt(p̄(1-p̄)/n). Values must average within [0, 1]",
            usage: "p_chart(proportions)",
            args: &VALUES_ARGS,
            returns: "Object",
            examples: &P_EXAMPLES,
            category: "spc",
            min_values: 1,
            related: &CHART_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        chart_call(ChartKind::P, args, ctx)
    }
}

// ============ R Chart ============

pub struct RChart;

static R_EXAMPLES: [&str; 1] = ["r_chart(1, 3, 2, 8, 5, 5) → {center: 2.667, plotted: [2, 6, 0], ...}"];

impl FunctionPlugin for RChart {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "r_chart",
            description: "Range chart over consecutive pairs: mean range ± k·population stddev of ranges",
            usage: "r_chart(values)",
            args: &VALUES_ARGS,
            returns: "Object",
            examples: &R_EXAMPLES,
            category: "spc",
            min_values: 2,
            related: &CHART_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        chart_call(ChartKind::R, args, ctx)
    }
}

// ============ C Chart ============

pub struct CChart;

static C_EXAMPLES: [&str; 1] = ["c_chart(4, 2, 3, 5, 1) → {center: 3, ucl: 8.196, lcl: -2.196, ...}"];

impl FunctionPlugin for CChart {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "c_chart",
            description: "Count chart: c̄ ± k·sqrt(c̄). Counts must average non-negative",
            usage: "c_chart(counts)",
            args: &VALUES_ARGS,
            returns: "Object",
            examples: &C_EXAMPLES,
            category: "spc",
            min_values: 1,
            related: &CHART_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        chart_call(ChartKind::C, args, ctx)
    }
}
