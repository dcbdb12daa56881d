//! Minimal HTTP transport to the remote compiler.
//!
//! This crate encodes a [`CompileRequestConfig`](ccgate_config::CompileRequestConfig)
//! as a url-encoded form, POSTs it over a raw TCP connection, and returns the
//! response body, reassembling it first if the server used chunked
//! transfer-encoding. It is deliberately not a general-purpose HTTP client.

#![warn(missing_docs)]

pub mod chunked;
pub mod error;
pub mod form;
pub mod http;

pub use chunked::unchunk;
pub use error::TransportError;
pub use form::{build_form, FormBody};
pub use http::{send, split_response, HttpResponse};
