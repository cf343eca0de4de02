//! Central tendency functions: mean, median, mode

use shewhart_plugin::prelude::*;
use crate::helpers::{extract_numbers, median_of_sorted, number_value, require_min_count, sorted};
use serde::Serialize;
use std::collections::HashMap;

/// Text shown when every value is equally frequent
pub const NO_UNIQUE_MODE: &str = "No unique mode";

/// Arithmetic mean
pub fn mean(sample: &[f64]) -> Result<f64, StatsError> {
    crate::helpers::mean(sample)
}

/// Middle value of the sorted sample (average of the two middle values if even)
pub fn median(sample: &[f64]) -> Result<f64, StatsError> {
    require_min_count(sample, 1, "median")?;
    Ok(median_of_sorted(&sorted(sample)))
}

/// Outcome of the mode calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ModeReport {
    /// Values sharing the maximum frequency, in order of first occurrence
    Values(Vec<f64>),
    /// The multimodal set covers the whole sample
    NoUniqueMode,
}

impl ModeReport {
    pub fn values(&self) -> &[f64] {
        match self {
            ModeReport::Values(v) => v,
            ModeReport::NoUniqueMode => &[],
        }
    }
}

impl std::fmt::Display for ModeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeReport::Values(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            ModeReport::NoUniqueMode => write!(f, "{}", NO_UNIQUE_MODE),
        }
    }
}

/// Every value achieving the maximum frequency.
///
/// When the number of such values equals the sample size the result is
/// [`ModeReport::NoUniqueMode`]. Ties that do not cover the whole sample
/// (`[1, 1, 2, 2, 3]`) are listed.
pub fn mode(sample: &[f64]) -> Result<ModeReport, StatsError> {
    require_min_count(sample, 1, "mode")?;

    // -0.0 and 0.0 compare equal, so they share a key
    let key = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };

    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &v in sample {
        let slot = *slots.entry(key(v)).or_insert_with(|| {
            counts.push((v, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let modes: Vec<f64> = counts
        .into_iter()
        .filter(|(_, c)| *c == max_count)
        .map(|(v, _)| v)
        .collect();

    if modes.len() == sample.len() {
        Ok(ModeReport::NoUniqueMode)
    } else {
        Ok(ModeReport::Values(modes))
    }
}

// ============ Mean ============

pub struct Mean;

static MEAN_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Numbers to average")];

static MEAN_EXAMPLES: [&str; 2] = [
    "mean(1, 2, 3, 4, 5) → 3",
    "mean([10, 20, 30]) → 20",
];

static MEAN_RELATED: [&str; 2] = ["median", "mode"];

impl FunctionPlugin for Mean {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mean",
            description: "Arithmetic mean (average) of values",
            usage: "mean(values) or mean(a, b, c, ...)",
            args: &MEAN_ARGS,
            returns: "Number",
            examples: &MEAN_EXAMPLES,
            category: "stats/central",
            min_values: 1,
            related: &MEAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => number_value(mean(&numbers)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Median ============

pub struct Median;

static MEDIAN_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Numbers to find median of")];

static MEDIAN_EXAMPLES: [&str; 2] = [
    "median(1, 2, 3, 4, 5) → 3",
    "median(1, 2, 3, 4) → 2.5",
];

static MEDIAN_RELATED: [&str; 3] = ["mean", "mode", "quartile_dev"];

impl FunctionPlugin for Median {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "median",
            description: "Middle value (average of two middle if even count)",
            usage: "median(values)",
            args: &MEDIAN_ARGS,
            returns: "Number",
            examples: &MEDIAN_EXAMPLES,
            category: "stats/central",
            min_values: 1,
            related: &MEDIAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => number_value(median(&numbers)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Mode ============

pub struct Mode;

static MODE_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Numbers to find mode of")];

static MODE_EXAMPLES: [&str; 3] = [
    "mode(1, 1, 2, 3) → 1",
    "mode(1, 1, 2, 2, 3) → [1, 2]",
    "mode(1, 2, 3) → \"No unique mode\"",
];

static MODE_RELATED: [&str; 2] = ["mean", "median"];

impl FunctionPlugin for Mode {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mode",
            description: "Most frequent value. Returns List on ties, text when every value is equally frequent",
            usage: "mode(values)",
            args: &MODE_ARGS,
            returns: "Number | List<Number> | Text",
            examples: &MODE_EXAMPLES,
            category: "stats/central",
            min_values: 1,
            related: &MODE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let numbers = match extract_numbers(args) {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        match mode(&numbers) {
            Ok(ModeReport::Values(values)) if values.len() == 1 => Value::Number(values[0]),
            Ok(ModeReport::Values(values)) => Value::numbers(&values),
            Ok(ModeReport::NoUniqueMode) => Value::Text(NO_UNIQUE_MODE.to_string()),
            Err(e) => Value::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(std::sync::Arc::new(PluginRegistry::new()))
    }

    #[test]
    fn test_mean() {
        let result = Mean.call(&[Value::numbers(&[1.0, 2.0, 3.0])], &eval_ctx());
        assert_eq!(result.as_number(), Some(2.0));
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[1.0, 3.0, 2.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_median_even() {
        let result = Median.call(&[Value::numbers(&[1.0, 2.0, 3.0, 4.0])], &eval_ctx());
        assert_eq!(result.as_number(), Some(2.5));
    }

    #[test]
    fn test_mode_single() {
        let report = mode(&[1.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(report, ModeReport::Values(vec![1.0]));
        assert_eq!(report.to_string(), "1");
    }

    #[test]
    fn test_mode_all_unique_is_sentinel() {
        let report = mode(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(report, ModeReport::NoUniqueMode);
        assert_eq!(report.to_string(), NO_UNIQUE_MODE);
    }

    #[test]
    fn test_mode_ties_listed_in_first_occurrence_order() {
        let report = mode(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap();
        assert_eq!(report, ModeReport::Values(vec![3.0, 1.0]));
        assert_eq!(report.to_string(), "3, 1");
    }

    #[test]
    fn test_mode_even_ties_covering_sample_are_listed() {
        // two distinct values, each twice: 2 modes != 4 values
        let report = mode(&[1.0, 1.0, 2.0, 2.0]).unwrap();
        assert_eq!(report, ModeReport::Values(vec![1.0, 2.0]));
    }

    #[test]
    fn test_mode_plugin_sentinel() {
        let result = Mode.call(&[Value::numbers(&[1.0, 2.0, 3.0])], &eval_ctx());
        assert_eq!(result.as_text(), Some(NO_UNIQUE_MODE));
    }

    #[test]
    fn test_mode_fractional_display() {
        let report = mode(&[1.5, 1.5, 2.0]).unwrap();
        assert_eq!(report.to_string(), "1.5");
    }

    #[test]
    fn test_empty_input_is_error() {
        let result = Median.call(&[Value::List(vec![])], &eval_ctx());
        assert_eq!(result.as_error().unwrap().code, codes::INSUFFICIENT_DATA);
    }
}
