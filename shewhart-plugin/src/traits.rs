//! Function plugin interface
//!
//! Every statistic and control chart is a stateless plugin. The metadata is
//! static so help and listings never have to call into the plugin.

use shewhart_core::Value;
use crate::EvalContext;
use serde::Serialize;

/// One documented argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
}

impl ArgMeta {
    pub const fn new(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description }
    }
}

/// Static description of a registered function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    /// `stats/...` for descriptive statistics, `spc` for control charts
    pub category: &'static str,
    /// Smallest sample the function computes on; shorter input yields
    /// an `INSUFFICIENT_DATA` error value
    pub min_values: usize,
    pub related: &'static [&'static str],
}

/// A pure function over sample values.
///
/// `call` never panics. Failures come back as `Value::Error`.
pub trait FunctionPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value;
}
