//! Sample input parsing
//!
//! Two textual forms feed a sample: a comma-separated list of numbers and
//! grouped frequency data, `start-end:frequency` entries joined by `;`.
//! Grouped entries expand to their interval midpoint repeated `frequency`
//! times and are appended after the directly entered values.

use shewhart_core::{GroupedInterval, Sample, StatsError};
use serde::{Deserialize, Serialize};

const GROUPED_FORMAT: &str = "expected interval:frequency (e.g., 1-2:3)";

/// Raw request fields before parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    /// Comma-separated values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Grouped frequency data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped_data: Option<String>,
}

impl SampleInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_grouped(mut self, grouped: impl Into<String>) -> Self {
        self.grouped_data = Some(grouped.into());
        self
    }

    /// Parse both fields and build the sample
    pub fn to_sample(&self) -> Result<Sample, StatsError> {
        let direct = match &self.data {
            Some(text) => parse_values(text)?,
            None => Vec::new(),
        };
        let grouped = match &self.grouped_data {
            Some(text) => parse_grouped(text)?,
            None => Vec::new(),
        };
        Sample::from_parts(direct, &grouped)
    }
}

/// Parse `"1, 2.5, -3"`. Blank items are skipped, so a trailing comma is fine.
pub fn parse_values(text: &str) -> Result<Vec<f64>, StatsError> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_number(item).ok_or_else(|| StatsError::parse(item, "not a finite number")))
        .collect()
}

/// Parse `"1-2:3;3-4:2"`. Stops at the first malformed entry and reports
/// its literal text.
pub fn parse_grouped(text: &str) -> Result<Vec<GroupedInterval>, StatsError> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_grouped_entry)
        .collect()
}

/// Parse one `start-end:frequency` entry
pub fn parse_grouped_entry(entry: &str) -> Result<GroupedInterval, StatsError> {
    let bad = || StatsError::parse(entry, GROUPED_FORMAT);

    let (interval, frequency) = entry.split_once(':').ok_or_else(bad)?;
    let (start, end) = split_interval(interval.trim()).ok_or_else(bad)?;
    let start = parse_number(start).ok_or_else(bad)?;
    let end = parse_number(end).ok_or_else(bad)?;

    let frequency: u32 = frequency.trim().parse().map_err(|_| bad())?;
    if frequency == 0 {
        return Err(StatsError::parse(entry, "frequency must be at least 1"));
    }

    GroupedInterval::new(start, end, frequency)
}

/// Split `start-end` at the separating dash.
///
/// The separator is the first `-` that follows a digit or a decimal point,
/// so signs and exponents stay with their number: `-2--1`, `1e-3-2`.
fn split_interval(interval: &str) -> Option<(&str, &str)> {
    let bytes = interval.as_bytes();
    let pos = (1..bytes.len())
        .find(|&i| bytes[i] == b'-' && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.'))?;
    let (start, end) = (interval[..pos].trim(), interval[pos + 1..].trim());
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some((start, end))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("1, 2.5,-3").unwrap(), vec![1.0, 2.5, -3.0]);
        assert_eq!(parse_values("4,5,").unwrap(), vec![4.0, 5.0]);
        assert!(parse_values("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_values_reports_item() {
        let err = parse_values("1, two, 3").unwrap_err();
        assert_eq!(err, StatsError::parse("two", "not a finite number"));
        assert!(parse_values("1, nan").is_err());
    }

    #[test]
    fn test_parse_grouped_midpoints() {
        let sample = SampleInput::new().with_grouped("1-2:3;3-4:2").to_sample().unwrap();
        assert_eq!(sample.as_slice(), &[1.5, 1.5, 1.5, 3.5, 3.5]);
    }

    #[test]
    fn test_parse_grouped_negative_bounds_and_exponents() {
        let grouped = parse_grouped("-2--1:1; 1e-3-2e0:2").unwrap();
        assert_eq!(grouped[0].start, -2.0);
        assert_eq!(grouped[0].end, -1.0);
        assert_eq!(grouped[1].start, 0.001);
        assert_eq!(grouped[1].end, 2.0);
        assert_eq!(grouped[1].frequency, 2);
    }

    #[test]
    fn test_parse_grouped_stops_at_first_bad_entry() {
        let err = parse_grouped("1-2:3;oops;5-x:1").unwrap_err();
        match err {
            StatsError::Parse { entry, .. } => assert_eq!(entry, "oops"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_grouped_rejects_malformed() {
        for entry in ["1-2", "1:3", "1-2:x", "1-2:1.5", "1-2:0", "1-2:-1", "-2:3", "1-:3", "1-2:3:4"] {
            let err = parse_grouped_entry(entry).unwrap_err();
            assert!(
                matches!(err, StatsError::Parse { entry: ref e, .. } if e == entry),
                "{} gave {:?}", entry, err
            );
        }
    }

    #[test]
    fn test_direct_then_grouped() {
        let input = SampleInput::new().with_data("9, 8").with_grouped("0-10:2");
        assert_eq!(input.to_sample().unwrap().as_slice(), &[9.0, 8.0, 5.0, 5.0]);
    }

    #[test]
    fn test_huge_frequency_is_domain_error() {
        let err = SampleInput::new().with_grouped("1-2:4000000000").to_sample().unwrap_err();
        assert!(matches!(err, StatsError::Domain(_)), "{:?}", err);

        let err = SampleInput::new()
            .with_grouped("1-2:600000;3-4:600000")
            .to_sample()
            .unwrap_err();
        assert!(matches!(err, StatsError::Domain(_)), "{:?}", err);
    }

    #[test]
    fn test_empty_input_gives_empty_sample() {
        assert!(SampleInput::new().to_sample().unwrap().is_empty());
    }
}
