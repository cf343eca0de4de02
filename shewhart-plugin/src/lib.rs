//! Shewhart Plugin System
//!
//! Every statistic and chart is a pure [`FunctionPlugin`] registered by
//! name, so the engine, the server and tests all dispatch the same way.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_SIGMA};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext, DEFAULT_SIGMA,
    };
    pub use shewhart_core::prelude::*;
}
