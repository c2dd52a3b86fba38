//! Minimal reqlog host: a router wrapped in the request logger.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Override the logger's config with JSON (missing fields keep defaults):
//!   REQLOG_CONFIG='{"prefix":"[demo]","logLevel":"error"}' cargo run --example basic
//!
//! Write records as text lines on stdout instead of through tracing:
//!   REQLOG_SINK=stdout cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42

use std::sync::Arc;

use reqlog::{Context, Method, Request, RequestLogger, Response, Router, Server, StatusCode, WriterSink};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ctx = match std::env::var("REQLOG_SINK").as_deref() {
        Ok("stdout") => Context::with_sink(Arc::new(WriterSink::stdout())),
        _ => Context::default(),
    };

    let overrides = match std::env::var("REQLOG_CONFIG") {
        Ok(raw) => Some(serde_json::from_str(&raw)?),
        Err(_) => None,
    };

    let routes = Router::new()
        .on(Method::GET, "/users/{id}", get_user)
        .on(Method::POST, "/users", create_user)
        .on(Method::DELETE, "/users/{id}", delete_user)
        .into_handler_ref();

    let app = reqlog::mount::<RequestLogger>(&ctx, routes, overrides, "access-log")?;

    Server::bind("0.0.0.0:3000".parse()?).serve(app).await?;
    Ok(())
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}

// DELETE /users/{id} → 204 No Content, with an audit trail header
async fn delete_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("x-deleted-id", id)
        .no_body()
}
