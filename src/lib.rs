//! # reqlog
//!
//! Request-logging middleware: one structured record per request, then the
//! request passes through untouched.
//!
//! ## The contract
//!
//! The host (a server, a router, a gateway) owns the chain. reqlog only
//! supplies a link for it:
//!
//! - **Configuration**: a label prefix and a level name, with defaults from
//!   [`create_config`]. Unknown level names resolve to `Info`; nothing fails.
//! - **Construction**: [`new`]`(ctx, next, config, name)`, the fixed factory
//!   shape hosts expect (see [`Plugin`]).
//! - **Per request**: emit `prefix` with `proto`, `method` and `url` to the
//!   context's [`LogSink`], then call `next` with the same request.
//!
//! What reqlog does not do: look at bodies, measure latency, read response
//! status, rotate or ship logs.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reqlog::{Context, Method, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reqlog::Error> {
//!     let routes = Router::new()
//!         .on(Method::GET, "/users/{id}", get_user)
//!         .into_handler_ref();
//!
//!     // Records go to the current `tracing` subscriber by default.
//!     let app = reqlog::new(&Context::default(), routes, reqlog::create_config(), "access-log")?;
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap()).serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod sink;

pub mod middleware;

pub use config::{create_config, resolve_level, Config, Level, DEFAULT_LOG_LEVEL, DEFAULT_PREFIX};
pub use error::Error;
pub use handler::{BoxFuture, Dispatch, Handler, HandlerRef};
pub use middleware::logger::{new, RequestLogger};
pub use middleware::{mount, Context, Plugin};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use sink::{Attrs, LogSink, TracingSink, WriterSink};

pub use http::{Method, StatusCode};
