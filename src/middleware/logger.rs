//! Request logging middleware.
//!
//! For every request: one record to the context's sink, then the request goes
//! to the next link exactly as it arrived. The record carries the configured
//! prefix as its message and three attributes, in this order:
//!
//! | key      | value                                   |
//! |----------|-----------------------------------------|
//! | `proto`  | `HTTP/1.1`, `HTTP/2.0`, …               |
//! | `method` | `GET`, `POST`, …                        |
//! | `url`    | request URI as received, unmodified     |
//!
//! Responses are not inspected.
//!
//! ```rust,no_run
//! use reqlog::{Config, Context, Method, Request, Router, Server};
//!
//! # async fn run() -> Result<(), reqlog::Error> {
//! let routes = Router::new().on(Method::GET, "/", hello).into_handler_ref();
//! let config = Config { prefix: "[api]".into(), ..reqlog::create_config() };
//! let app = reqlog::new(&Context::default(), routes, config, "access-log")?;
//!
//! Server::bind("0.0.0.0:3000".parse().unwrap()).serve(app).await
//! # }
//! # async fn hello(_: Request) -> &'static str { "hi" }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::{resolve_level, Config, Level};
use crate::error::Error;
use crate::handler::{BoxFuture, Dispatch, HandlerRef};
use crate::middleware::{Context, Plugin};
use crate::request::Request;
use crate::sink::LogSink;

/// Logs each request, then delegates to `next`.
///
/// Immutable after construction, so one instance serves any number of
/// concurrent requests without locking.
pub struct RequestLogger {
    next: HandlerRef,
    name: String,
    config: Config,
    level: Level,
    sink: Arc<dyn LogSink>,
}

impl RequestLogger {
    /// Builds the concrete middleware. Use [`new`] to get a chain link.
    pub fn build(ctx: &Context, next: HandlerRef, config: Config, name: &str) -> Self {
        Self {
            next,
            name: name.to_owned(),
            level: resolve_level(&config),
            config,
            sink: Arc::clone(ctx.sink()),
        }
    }

    /// Instance name given by the host. Never written into records.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Level every record is emitted at.
    pub fn level(&self) -> Level {
        self.level
    }
}

/// Wraps `next` in a [`RequestLogger`].
///
/// Always `Ok`; the `Result` keeps the host's factory shape.
pub fn new(ctx: &Context, next: HandlerRef, config: Config, name: &str) -> Result<HandlerRef, Error> {
    Ok(Arc::new(RequestLogger::build(ctx, next, config, name)))
}

impl Plugin for RequestLogger {
    type Config = Config;

    fn create_config() -> Config {
        crate::config::create_config()
    }

    fn new(ctx: &Context, next: HandlerRef, config: Config, name: &str) -> Result<HandlerRef, Error> {
        new(ctx, next, config, name)
    }
}

impl Dispatch for RequestLogger {
    fn call(&self, req: Request) -> BoxFuture {
        let proto = req.proto();
        let url = req.url();
        self.sink.log(
            req.extensions(),
            self.level,
            &self.config.prefix,
            &[("proto", proto.as_ref()), ("method", req.method().as_str()), ("url", url.as_str())],
        );
        self.next.call(req)
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
