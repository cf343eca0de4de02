//! Samples and grouped frequency data
//!
//! A [`Sample`] is the ordered sequence every calculator works on. Position
//! matters for control charts (index = plot position) and is ignored by the
//! descriptive statistics.

use crate::StatsError;
use serde::{Deserialize, Serialize};

/// Largest sample [`Sample::from_parts`] will build. Grouped frequencies are
/// checked against it before any value is expanded.
pub const MAX_SAMPLE_LEN: usize = 1_000_000;

/// Ordered sequence of finite observations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Build a sample, rejecting NaN and infinities.
    pub fn new(values: Vec<f64>) -> Result<Self, StatsError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(StatsError::domain(format!(
                "sample values must be finite, got {}",
                bad
            )));
        }
        Ok(Self { values })
    }

    /// Directly entered values first, then each interval's midpoint
    /// repeated `frequency` times, in input order.
    pub fn from_parts(direct: Vec<f64>, grouped: &[GroupedInterval]) -> Result<Self, StatsError> {
        let expanded: u64 = grouped.iter().map(|g| u64::from(g.frequency)).sum();
        let total = direct.len() as u64 + expanded;
        if total > MAX_SAMPLE_LEN as u64 {
            return Err(StatsError::domain(format!(
                "sample would hold {} values, the limit is {}",
                total, MAX_SAMPLE_LEN
            )));
        }

        let mut values = direct;
        values.reserve(expanded as usize);
        for interval in grouped {
            interval.expand_into(&mut values);
        }
        Self::new(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// A class interval `[start, end]` observed `frequency` times
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupedInterval {
    pub start: f64,
    pub end: f64,
    pub frequency: u32,
}

impl GroupedInterval {
    /// Frequency must be at least 1.
    pub fn new(start: f64, end: f64, frequency: u32) -> Result<Self, StatsError> {
        if frequency == 0 {
            return Err(StatsError::domain("interval frequency must be at least 1"));
        }
        Ok(Self { start, end, frequency })
    }

    pub fn midpoint(&self) -> f64 {
        self.start / 2.0 + self.end / 2.0
    }

    /// Append the midpoint `frequency` times
    pub fn expand_into(&self, out: &mut Vec<f64>) {
        let mid = self.midpoint();
        out.extend(std::iter::repeat(mid).take(self.frequency as usize));
    }
}
