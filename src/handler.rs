//! Handlers, handler references, and type erasure.
//!
//! # What a middleware chain is made of
//!
//! Every link in a chain (the router, a middleware, a plain `async fn`) is
//! reached through the same shared reference, a [`HandlerRef`]:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ hello.into_handler_ref()
//! Arc::new(FnHandler(hello))                       ← Handler blanket impl
//!        ↓ stored as HandlerRef = Arc<dyn Dispatch>
//! reqlog::new(&ctx, next, config, "logger")        ← wraps it in another link
//!        ↓
//! handler.call(req)  at request time               ← one vtable dispatch per link
//! ```
//!
//! The only runtime cost per link is **one virtual call**.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` lets tokio move the future across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// One link of a handler chain.
///
/// Implement this directly when a link needs state of its own (a middleware,
/// a router). Plain functions get it through [`Handler`].
pub trait Dispatch {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A shared, type-erased handler. Cheap to clone; safe to call concurrently.
pub type HandlerRef = Arc<dyn Dispatch + Send + Sync + 'static>;

// ── Handler ───────────────────────────────────────────────────────────────────

/// Implemented for every `async fn(Request) -> impl IntoResponse`.
///
/// The trait is **sealed**: only the blanket impl below satisfies it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_handler_ref(self) -> HandlerRef;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_handler_ref(self) -> HandlerRef {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete function to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> Dispatch for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // The function runs now; only its future is deferred.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
