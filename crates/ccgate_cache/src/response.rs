//! The response handed back to the embedding server.

/// Content type of every response body.
pub const CONTENT_TYPE: &str = "text/javascript";

/// How a response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Caching is disabled; the compiler ran.
    Uncached,
    /// The entry was missing or stale; the compiler ran and the entry was written.
    Compiled,
    /// A fresh entry was served from disk.
    Cached,
    /// A fresh entry matched the client's validators; no body is sent.
    NotModified,
}

/// A rendered response: status, validators and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    /// How the response was produced.
    pub outcome: CacheOutcome,
    /// The response text. Empty for [`CacheOutcome::NotModified`].
    pub body: String,
    /// `Last-Modified` value, present whenever a cache entry backs the response.
    pub last_modified: Option<String>,
    /// Quoted `ETag` value, present whenever a cache entry backs the response.
    pub etag: Option<String>,
}

impl RenderedResponse {
    pub(crate) fn uncached(body: String) -> Self {
        Self {
            outcome: CacheOutcome::Uncached,
            body,
            last_modified: None,
            etag: None,
        }
    }

    /// HTTP status code: 304 for not-modified, 200 otherwise.
    pub fn status_code(&self) -> u16 {
        match self.outcome {
            CacheOutcome::NotModified => 304,
            _ => 200,
        }
    }

    /// Always [`CONTENT_TYPE`].
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Returns `true` if the client's copy is current.
    pub fn is_not_modified(&self) -> bool {
        self.outcome == CacheOutcome::NotModified
    }

    /// Response headers in emission order.
    ///
    /// `Content-Type` is always present; the validators only when a cache
    /// entry backs the response.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", self.content_type().to_string())];
        if let Some(date) = &self.last_modified {
            headers.push(("Last-Modified", date.clone()));
        }
        if let Some(tag) = &self.etag {
            headers.push(("ETag", tag.clone()));
        }
        headers
    }
}
