//! Descriptive summary of a sample

use shewhart_plugin::prelude::*;
use crate::central::{self, ModeReport};
use crate::dispersion;
use crate::helpers::{extract_numbers, require_min_count};
use serde::Serialize;
use std::collections::HashMap;

/// Summary values computed from one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsRecord {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: ModeReport,
    /// Sample standard deviation (n-1)
    pub stddev: f64,
    pub quartile_deviation: f64,
}

impl StatisticsRecord {
    pub fn to_value(&self) -> Value {
        let mut obj = HashMap::new();
        obj.insert("type".to_string(), Value::from("Statistics"));
        obj.insert("count".to_string(), Value::Number(self.count as f64));
        obj.insert("min".to_string(), Value::Number(self.min));
        obj.insert("max".to_string(), Value::Number(self.max));
        obj.insert("mean".to_string(), Value::Number(self.mean));
        obj.insert("median".to_string(), Value::Number(self.median));
        obj.insert("mode".to_string(), Value::Text(self.mode.to_string()));
        obj.insert("mode_values".to_string(), Value::numbers(self.mode.values()));
        obj.insert("stddev".to_string(), Value::Number(self.stddev));
        obj.insert("quartile_deviation".to_string(), Value::Number(self.quartile_deviation));
        Value::Object(obj)
    }
}

/// Compute the full summary. Needs at least two values.
pub fn describe(sample: &[f64]) -> Result<StatisticsRecord, StatsError> {
    require_min_count(sample, 2, "describe")?;

    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(StatisticsRecord {
        count: sample.len(),
        min,
        max,
        mean: central::mean(sample)?,
        median: central::median(sample)?,
        mode: central::mode(sample)?,
        stddev: dispersion::stddev(sample)?,
        quartile_deviation: dispersion::quartile_deviation(sample)?,
    })
}

// ============ Describe ============

pub struct Describe;

static DESCRIBE_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "At least two numbers")];

static DESCRIBE_EXAMPLES: [&str; 1] = [
    "describe(2, 4, 4, 4, 5, 5, 7, 9) → {mean: 5, median: 4.5, mode: 4, stddev: 2.138, quartile_deviation: 1}",
];

static DESCRIBE_RELATED: [&str; 4] = ["mean", "median", "mode", "stddev"];

impl FunctionPlugin for Describe {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "describe",
            description: "Mean, median, mode, standard deviation and quartile deviation in one record",
            usage: "describe(values)",
            args: &DESCRIBE_ARGS,
            returns: "Object",
            examples: &DESCRIBE_EXAMPLES,
            category: "stats/summary",
            min_values: 2,
            related: &DESCRIBE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let numbers = match extract_numbers(args) {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        match describe(&numbers) {
            Ok(record) => record.to_value(),
            Err(e) => Value::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_textbook_sample() {
        let record = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(record.count, 8);
        assert_eq!(record.min, 2.0);
        assert_eq!(record.max, 9.0);
        assert_eq!(record.mean, 5.0);
        assert_eq!(record.median, 4.5);
        assert_eq!(record.mode, ModeReport::Values(vec![4.0]));
        assert!((record.stddev - 2.1381).abs() < 1e-4);
        // lower [2, 4, 4, 4] -> 4, upper [5, 5, 7, 9] -> 6
        assert_eq!(record.quartile_deviation, 1.0);
    }

    #[test]
    fn test_describe_is_repeatable() {
        let data = [0.1, 0.7, 0.2, 0.9, 0.3, 0.3];
        let a = describe(&data).unwrap();
        let b = describe(&data).unwrap();
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.stddev.to_bits(), b.stddev.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_describe_huge_values_stay_finite() {
        let stats = describe(&[f64::MAX, f64::MAX]).unwrap();
        assert_eq!(stats.mean, f64::MAX);
        assert_eq!(stats.median, f64::MAX);
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.quartile_deviation, 0.0);

        let stats = describe(&[1e200, -1e200]).unwrap();
        assert_eq!(stats.mean, 0.0);
        assert!((stats.stddev / 1e200 - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_describe_single_value_fails() {
        assert_eq!(
            describe(&[42.0]),
            Err(StatsError::InsufficientData { what: "describe", needed: 2, got: 1 })
        );
    }

    #[test]
    fn test_describe_plugin_object() {
        let ctx = EvalContext::new(std::sync::Arc::new(PluginRegistry::new()));
        let result = Describe.call(&[Value::numbers(&[1.0, 2.0, 3.0])], &ctx);
        assert_eq!(result.get("mean").as_number(), Some(2.0));
        assert_eq!(result.get("mode").as_text(), Some(crate::central::NO_UNIQUE_MODE));
    }
}
