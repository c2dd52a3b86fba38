//! Log sinks: where records end up.
//!
//! A sink takes the request's context, a [`Level`], a message and an ordered
//! list of `key=value` attributes. It returns nothing. Sinks are shared across
//! every in-flight request, so they must be `Send + Sync` and do their own
//! synchronization.
//!
//! The context is the request's [`Extensions`]: whatever the host or earlier
//! links stored there (request ids, peer addresses). Sinks may read it; the
//! built-in ones do not.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use http::Extensions;

use crate::config::Level;

/// Destination of emitted records.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, ctx: &Extensions, level: Level, message: &str, attrs: &[(&str, &str)]);
}

/// Renders attributes as `key=value` pairs separated by single spaces.
///
/// Values are written verbatim, with no quoting or escaping.
pub struct Attrs<'a>(pub &'a [(&'a str, &'a str)]);

impl fmt::Display for Attrs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// Forwards records to the current `tracing` subscriber.
///
/// The prefix becomes the event message; the attributes travel as one `attrs`
/// field. Request context reaches subscribers through the current span.
/// `tracing` needs the level at the callsite, hence one arm per level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, _ctx: &Extensions, level: Level, message: &str, attrs: &[(&str, &str)]) {
        let attrs = Attrs(attrs);
        match level {
            Level::Debug => tracing::debug!(attrs = %attrs, "{message}"),
            Level::Info  => tracing::info!(attrs = %attrs, "{message}"),
            Level::Warn  => tracing::warn!(attrs = %attrs, "{message}"),
            Level::Error => tracing::error!(attrs = %attrs, "{message}"),
        }
    }
}

// ── WriterSink ────────────────────────────────────────────────────────────────

/// Writes one text line per record to any [`Write`] target.
///
/// ```text
/// level=DEBUG msg=[TEST] proto=HTTP/1.1 method=GET url=http://localhost/
/// ```
///
/// An arbitrary writer is not safe to share, so every line is written under a
/// mutex. Write failures are dropped: the sink is a best-effort side channel.
pub struct WriterSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterSink<io::Stdout> {
    /// Sink on process stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> LogSink for WriterSink<W> {
    fn log(&self, _ctx: &Extensions, level: Level, message: &str, attrs: &[(&str, &str)]) {
        let line = if attrs.is_empty() {
            format!("level={level} msg={message}\n")
        } else {
            format!("level={level} msg={message} {}\n", Attrs(attrs))
        };
        // A panic in another writer leaves the stream usable; keep logging.
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = out.write_all(line.as_bytes());
    }
}
