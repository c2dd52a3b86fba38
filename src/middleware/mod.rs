//! Middleware layer.
//!
//! A middleware is a [`Dispatch`](crate::Dispatch) link that wraps the next
//! link of the chain. Hosts build middleware through one fixed factory shape,
//! captured by [`Plugin`]:
//!
//! ```text
//! new(ctx: &Context, next: HandlerRef, config: Config, name: &str) -> Result<HandlerRef, Error>
//! ```
//!
//! Built-in middleware:
//! - [`logger`]: one structured record per request, then pass-through.

pub mod logger;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::handler::HandlerRef;
use crate::sink::{LogSink, TracingSink};

// ── Context ───────────────────────────────────────────────────────────────────

/// Host-owned resources handed to every middleware at construction.
///
/// Middleware keep their own clone of what they need; the host keeps
/// ownership of the underlying sink.
#[derive(Clone)]
pub struct Context {
    sink: Arc<dyn LogSink>,
}

impl Context {
    /// Context whose records go to the current `tracing` subscriber.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }
}

impl Default for Context {
    fn default() -> Self { Self::new() }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// The factory contract a host uses to build a middleware.
///
/// `Config::default()` must equal [`create_config`](Plugin::create_config):
/// overrides are deserialized with serde defaults filling the gaps.
pub trait Plugin {
    type Config: Default + DeserializeOwned;

    /// Configuration before any user override.
    fn create_config() -> Self::Config {
        Self::Config::default()
    }

    /// Wraps `next`. The argument order is fixed.
    fn new(ctx: &Context, next: HandlerRef, config: Self::Config, name: &str) -> Result<HandlerRef, Error>;
}

/// Builds plugin `P` around `next`, with `overrides` laid over its defaults.
///
/// `None` and JSON `null` both mean "no overrides". How individual fields
/// are read is up to `P::Config`; the request logger keeps its defaults for
/// anything it cannot use. Overrides that are not a JSON object are an
/// [`Error::Config`].
pub fn mount<P: Plugin>(
    ctx: &Context,
    next: HandlerRef,
    overrides: Option<Value>,
    name: &str,
) -> Result<HandlerRef, Error> {
    let config = match overrides {
        None | Some(Value::Null) => P::create_config(),
        Some(overrides @ Value::Object(_)) => serde_json::from_value(overrides)?,
        Some(_) => {
            return Err(Error::Config(serde::de::Error::custom("overrides must be a JSON object")));
        }
    };
    debug!(plugin = name, "mounting middleware");
    P::new(ctx, next, config, name)
}
