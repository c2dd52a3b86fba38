//! Incoming HTTP request type.

use std::borrow::Cow;
use std::collections::HashMap;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri, Version};
use http_body_util::BodyExt;
use hyper::body::Incoming;

/// An incoming HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Reads the whole body off the connection.
    pub(crate) async fn from_incoming(req: hyper::Request<Incoming>) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(http::Request::from_parts(parts, body).into())
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn version(&self) -> Version { self.version }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Per-request values set by the host or earlier links (request ids,
    /// peer info). Log sinks receive them with every record.
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Protocol version as written on the wire, e.g. `"HTTP/1.1"`.
    pub fn proto(&self) -> Cow<'static, str> {
        match self.version {
            Version::HTTP_09 => Cow::Borrowed("HTTP/0.9"),
            Version::HTTP_10 => Cow::Borrowed("HTTP/1.0"),
            Version::HTTP_11 => Cow::Borrowed("HTTP/1.1"),
            Version::HTTP_2  => Cow::Borrowed("HTTP/2.0"),
            Version::HTTP_3  => Cow::Borrowed("HTTP/3.0"),
            // Versions added to `http` later report themselves.
            other            => Cow::Owned(format!("{other:?}")),
        }
    }

    /// The request URI exactly as received.
    ///
    /// Absolute-form requests (`http://host/path?q`) keep scheme and host;
    /// origin-form requests (`/path?q`) do not.
    pub fn url(&self) -> String {
        self.uri.to_string()
    }

    /// Case-insensitive header lookup. Non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            extensions: parts.extensions,
            params: HashMap::new(),
        }
    }
}
