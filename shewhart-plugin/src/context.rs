//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Shewhart multiplier applied to every control chart unless overridden
pub const DEFAULT_SIGMA: f64 = 3.0;

/// Evaluation context passed to plugins
pub struct EvalContext {
    /// Width of the control band in sigma units
    pub sigma: f64,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            registry,
        }
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }
}
