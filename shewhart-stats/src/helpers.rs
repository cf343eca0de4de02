//! Helper functions for statistical operations
//!
//! Common utilities for extracting and validating inputs.

use shewhart_core::{ShewhartError, StatsError, Value};

/// Extract numbers from arguments, handling both varargs and List
pub fn extract_numbers(args: &[Value]) -> Result<Vec<f64>, ShewhartError> {
    let mut numbers = Vec::new();

    for arg in args {
        match arg {
            Value::Number(n) => numbers.push(*n),
            Value::List(list) => {
                for item in list {
                    match item {
                        Value::Number(n) => numbers.push(*n),
                        Value::Error(e) => return Err(e.clone()),
                        other => return Err(ShewhartError::type_error("Number", other.type_name())),
                    }
                }
            }
            Value::Error(e) => return Err(e.clone()),
            other => return Err(ShewhartError::type_error("Number or List", other.type_name())),
        }
    }

    if let Some(bad) = numbers.iter().find(|n| !n.is_finite()) {
        return Err(StatsError::domain(format!("values must be finite, got {}", bad)).into());
    }

    Ok(numbers)
}

/// Require minimum count
pub fn require_min_count(numbers: &[f64], min: usize, func: &'static str) -> Result<(), StatsError> {
    if numbers.len() < min {
        return Err(StatsError::insufficient(func, min, numbers.len()));
    }
    Ok(())
}

/// Sum of numbers
pub fn sum(numbers: &[f64]) -> f64 {
    numbers.iter().sum()
}

/// Largest magnitude in the slice
fn max_abs(numbers: &[f64]) -> f64 {
    numbers.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
}

/// Arithmetic mean.
///
/// When the plain sum overflows the values are divided by their largest
/// magnitude first, so the result stays within `[min, max]`.
pub fn mean(numbers: &[f64]) -> Result<f64, StatsError> {
    require_min_count(numbers, 1, "mean")?;
    let n = numbers.len() as f64;
    let plain = sum(numbers) / n;
    if plain.is_finite() {
        return Ok(plain);
    }

    let scale = max_abs(numbers);
    let scaled = numbers.iter().map(|x| x / scale).sum::<f64>() / n * scale;
    let lo = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(scaled.max(lo).min(hi))
}

/// Variance (sample divides by n-1, population by n)
pub fn variance_impl(numbers: &[f64], sample: bool) -> Result<f64, StatsError> {
    if sample {
        require_min_count(numbers, 2, "sample variance")?;
    } else {
        require_min_count(numbers, 1, "population variance")?;
    }

    let m = mean(numbers)?;
    let ss: f64 = numbers.iter().map(|x| (x - m) * (x - m)).sum();

    let n = numbers.len();
    let divisor = if sample { n - 1 } else { n };
    Ok(ss / divisor as f64)
}

/// Standard deviation (sample divides by n-1, population by n).
///
/// Squared deviations of large values overflow even when the deviation
/// itself is representable; in that case the values are rescaled to at most
/// 1 in magnitude and the result scaled back.
pub fn std_dev_impl(numbers: &[f64], sample: bool) -> Result<f64, StatsError> {
    let sd = variance_impl(numbers, sample)?.sqrt();
    if sd.is_finite() {
        return Ok(sd);
    }

    let scale = max_abs(numbers);
    if !scale.is_finite() || scale == 0.0 {
        return Ok(sd);
    }
    let scaled: Vec<f64> = numbers.iter().map(|x| x / scale).collect();
    Ok(variance_impl(&scaled, sample)?.sqrt() * scale)
}

/// Sort numbers (returns new sorted vector)
pub fn sorted(numbers: &[f64]) -> Vec<f64> {
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Median of an already sorted, non-empty slice
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        // halve first so two huge neighbours cannot overflow
        sorted[n / 2 - 1] / 2.0 + sorted[n / 2] / 2.0
    }
}

/// Turn a typed result into a plugin return value
pub fn number_value(result: Result<f64, StatsError>) -> Value {
    match result {
        Ok(n) => Value::Number(n),
        Err(e) => Value::Error(e.into()),
    }
}
