//! 128-bit digests for cache fingerprints and entity tags.

use std::fmt;

use xxhash_rust::xxh3::Xxh3;

/// A 128-bit digest computed with XXH3.
///
/// Displays as exactly 32 lowercase hex characters, which is the form used
/// for cache file names (`<digest>.js`) and for `ETag` values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 16]);

impl Digest {
    /// Computes the digest of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_be_bytes())
    }
}

/// Incrementally digests a sequence of fields.
///
/// Each field is length-prefixed before it is fed to the hasher, so
/// `["ab", "c"]` and `["a", "bc"]` never collide by concatenation.
pub struct DigestBuilder {
    hasher: Xxh3,
}

impl DigestBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            hasher: Xxh3::new(),
        }
    }

    /// Feeds one field into the digest.
    pub fn field(mut self, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        self.hasher.update(&(data.len() as u64).to_le_bytes());
        self.hasher.update(data);
        self
    }

    /// Feeds a boolean flag into the digest.
    pub fn flag(self, value: bool) -> Self {
        self.field([u8::from(value)])
    }

    /// Finishes the digest.
    pub fn finish(self) -> Digest {
        Digest(self.hasher.digest128().to_be_bytes())
    }
}

impl Default for DigestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
