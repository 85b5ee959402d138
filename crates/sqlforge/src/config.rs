//! Per-statement configuration.
//!
//! Everything that used to be process-wide state lives here instead: the
//! debug-logging switch and the default execution adapter. A [`Config`] is
//! handed to each statement explicitly, so independent call sites can run
//! with different settings without coordination.

use crate::adapter::Adapter;
use std::fmt;
use std::sync::Arc;

/// Recognized statement options.
#[derive(Clone, Default)]
pub struct Config {
    /// Emit `tracing` debug events carrying rendered SQL and bound values.
    pub(crate) debug: bool,
    /// Adapter used by execution conveniences when none is bound on the
    /// statement itself.
    pub(crate) adapter: Option<Arc<dyn Adapter>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle SQL debug logging.
    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// Set the default execution adapter.
    pub fn adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("debug", &self.debug)
            .field("adapter", &self.adapter.as_ref().map(|_| "<dyn Adapter>"))
            .finish()
    }
}
