//! Error types for reply parsing.

/// Errors raised while parsing a compiler reply.
///
/// Only the XML path produces these; the JSON path degrades silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The XML document is not well formed.
    #[error("malformed XML at byte {position}: {reason}")]
    Xml {
        /// Byte offset where the reader stopped.
        position: u64,
        /// Description of the problem.
        reason: String,
    },

    /// The reply is not valid UTF-8.
    #[error("reply is not valid UTF-8: {reason}")]
    Encoding {
        /// Description of the decoding failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_display() {
        let err = ParseError::Xml {
            position: 42,
            reason: "unexpected end of input".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed XML at byte 42"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn encoding_display() {
        let err = ParseError::Encoding {
            reason: "invalid utf-8 sequence".to_string(),
        };
        assert!(err.to_string().contains("invalid utf-8 sequence"));
    }
}
