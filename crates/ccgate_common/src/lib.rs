//! Shared foundational types for the ccgate compiler gateway.
//!
//! Currently this is the 128-bit [`Digest`] used both as the cache
//! fingerprint of a compile request and as the entity tag of a cached
//! artifact.

#![warn(missing_docs)]

pub mod digest;

pub use digest::{Digest, DigestBuilder};
