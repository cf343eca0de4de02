//! Server configuration from the environment

use shewhart::Shewhart;
use shewhart_plugin::DEFAULT_SIGMA;
use tracing::warn;

pub const SIGMA_VAR: &str = "SHEWHART_SIGMA";
pub const DECIMALS_VAR: &str = "SHEWHART_DECIMALS";

const DEFAULT_DECIMALS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sigma: f64,
    pub decimals: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(SIGMA_VAR).ok().as_deref(),
            std::env::var(DECIMALS_VAR).ok().as_deref(),
        )
    }

    /// Unparseable values fall back to the defaults with a warning
    pub fn from_vars(sigma: Option<&str>, decimals: Option<&str>) -> Self {
        let sigma = match sigma.map(|s| (s, s.trim().parse::<f64>())) {
            None => DEFAULT_SIGMA,
            Some((_, Ok(k))) if k.is_finite() && k > 0.0 => k,
            Some((raw, _)) => {
                warn!(var = SIGMA_VAR, value = raw, "ignoring invalid sigma multiplier");
                DEFAULT_SIGMA
            }
        };

        let decimals = match decimals.map(|s| (s, s.trim().parse::<usize>())) {
            None => DEFAULT_DECIMALS,
            Some((_, Ok(d))) if d <= 12 => d,
            Some((raw, _)) => {
                warn!(var = DECIMALS_VAR, value = raw, "ignoring invalid decimal places");
                DEFAULT_DECIMALS
            }
        };

        Self { sigma, decimals }
    }

    pub fn build_engine(&self) -> Shewhart {
        Shewhart::with_standard_library()
            .with_sigma(self.sigma)
            .with_decimals(self.decimals)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            decimals: DEFAULT_DECIMALS,
        }
    }
}
