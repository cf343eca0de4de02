//! Dispersion functions: stddev, population stddev, quartile deviation

use shewhart_plugin::prelude::*;
use crate::helpers::{extract_numbers, median_of_sorted, number_value, require_min_count, sorted, std_dev_impl};

/// Sample standard deviation (divides by n-1)
pub fn stddev(sample: &[f64]) -> Result<f64, StatsError> {
    std_dev_impl(sample, true)
}

/// Population standard deviation (divides by n)
pub fn stddev_p(sample: &[f64]) -> Result<f64, StatsError> {
    std_dev_impl(sample, false)
}

/// First and third quartile by the exclusive halves method.
///
/// The sorted sample is split at `n / 2`: the lower half is
/// `sorted[..n/2]`, the upper half `sorted[n/2..]`. For odd `n` the middle
/// element therefore belongs to the upper half.
pub fn quartiles(sample: &[f64]) -> Result<(f64, f64), StatsError> {
    require_min_count(sample, 2, "quartiles")?;
    let s = sorted(sample);
    let (lower, upper) = s.split_at(s.len() / 2);
    Ok((median_of_sorted(lower), median_of_sorted(upper)))
}

/// Half the interquartile range: (Q3 - Q1) / 2
pub fn quartile_deviation(sample: &[f64]) -> Result<f64, StatsError> {
    let (q1, q3) = quartiles(sample)?;
    Ok(q3 / 2.0 - q1 / 2.0)
}

// ============ Stddev (Sample) ============

pub struct Stddev;

static STDDEV_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Sample data")];

static STDDEV_EXAMPLES: [&str; 1] = ["stddev(2, 4, 4, 4, 5, 5, 7, 9) → 2.138..."];

static STDDEV_RELATED: [&str; 2] = ["stddev_p", "quartile_dev"];

impl FunctionPlugin for Stddev {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "stddev",
            description: "Sample standard deviation (divides by n-1)",
            usage: "stddev(values)",
            args: &STDDEV_ARGS,
            returns: "Number",
            examples: &STDDEV_EXAMPLES,
            category: "stats/dispersion",
            min_values: 2,
            related: &STDDEV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => number_value(stddev(&numbers)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Stddev (Population) ============

pub struct StddevP;

static STDDEV_P_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "Population data")];

static STDDEV_P_EXAMPLES: [&str; 1] = ["stddev_p(2, 4, 4, 4, 5, 5, 7, 9) → 2"];

static STDDEV_P_RELATED: [&str; 2] = ["stddev", "x_chart"];

impl FunctionPlugin for StddevP {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "stddev_p",
            description: "Population standard deviation (divides by n)",
            usage: "stddev_p(values)",
            args: &STDDEV_P_ARGS,
            returns: "Number",
            examples: &STDDEV_P_EXAMPLES,
            category: "stats/dispersion",
            min_values: 1,
            related: &STDDEV_P_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => number_value(stddev_p(&numbers)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Quartile Deviation ============

pub struct QuartileDev;

static QDEV_ARGS: [ArgMeta; 1] = [ArgMeta::new("values", "List<Number> | Number...", "At least two numbers")];

static QDEV_EXAMPLES: [&str; 1] = ["quartile_dev(1, 2, 3, 4, 5, 6, 7, 8) → 2"];

static QDEV_RELATED: [&str; 2] = ["median", "stddev"];

impl FunctionPlugin for QuartileDev {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "quartile_dev",
            description: "Quartile deviation (Q3 - Q1) / 2, quartiles as medians of the lower and upper halves",
            usage: "quartile_dev(values)",
            args: &QDEV_ARGS,
            returns: "Number",
            examples: &QDEV_EXAMPLES,
            category: "stats/dispersion",
            min_values: 2,
            related: &QDEV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_numbers(args) {
            Ok(numbers) => number_value(quartile_deviation(&numbers)),
            Err(e) => Value::Error(e),
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
    fn test_stddev() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = stddev(&data).unwrap();
        assert!((sd - 2.1381).abs() < 1e-4, "got {}", sd);
        assert_eq!(stddev_p(&data).unwrap(), 2.0);
    }

    #[test]
    fn test_stddev_needs_two_values() {
        let result = Stddev.call(&[Value::numbers(&[5.0])], &eval_ctx());
        assert_eq!(result.as_error().unwrap().code, codes::INSUFFICIENT_DATA);
    }

    #[test]
    fn test_quartiles_even() {
        let data = [8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(quartiles(&data).unwrap(), (2.5, 6.5));
        assert_eq!(quartile_deviation(&data).unwrap(), 2.0);
    }

    #[test]
    fn test_quartiles_odd_middle_goes_upper() {
        // lower [1, 2], upper [3, 4, 5]
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quartiles(&data).unwrap(), (1.5, 4.0));
        assert_eq!(quartile_deviation(&data).unwrap(), 1.25);
    }

    #[test]
    fn test_quartiles_two_values() {
        assert_eq!(quartiles(&[10.0, 4.0]).unwrap(), (4.0, 10.0));
        assert!(quartiles(&[1.0]).is_err());
    }

    #[test]
    fn test_quartile_dev_plugin() {
        let result = QuartileDev.call(
            &[Value::numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])],
            &eval_ctx(),
        );
        assert_eq!(result.as_number(), Some(2.0));
    }
}
