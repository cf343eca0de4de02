//! Shewhart Statistics Plugin
//!
//! Descriptive statistics (mean, median, mode, standard deviation,
//! quartile deviation) and the individuals, proportion, range and count
//! control charts. Every operation has a typed function returning
//! `Result<_, StatsError>` and a registered plugin returning `Value`.

mod helpers;
pub mod central;
pub mod dispersion;
pub mod summary;
pub mod control;

pub use central::{mean, median, mode, ModeReport, NO_UNIQUE_MODE};
pub use dispersion::{quartile_deviation, quartiles, stddev, stddev_p};
pub use summary::{describe, StatisticsRecord};
pub use control::{
    classify, evaluate, evaluate_all, evaluate_with_sigma, ranges, shewhart_limits,
    ChartEvaluation, ChartKind, ControlLimits, ControlResult, ControlStatus,
};

use shewhart_plugin::PluginRegistry;

/// Load statistics functions into registry
pub fn load_stats_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Central tendency
        .with_function(central::Mean)
        .with_function(central::Median)
        .with_function(central::Mode)

        // Dispersion
        .with_function(dispersion::Stddev)
        .with_function(dispersion::StddevP)
        .with_function(dispersion::QuartileDev)

        // Summary
        .with_function(summary::Describe)

        // Control charts
        .with_function(control::Ranges)
        .with_function(control::XChart)
        .with_function(control::PChart)
        .with_function(control::RChart)
        .with_function(control::CChart)
}

/// Create registry with the statistics library
pub fn stats_registry() -> PluginRegistry {
    load_stats_library(PluginRegistry::new())
}
