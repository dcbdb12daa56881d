//! Decoding of HTTP chunked transfer-encoding.
//!
//! The decoder is lenient: it never fails. A size line that is not valid hex
//! reads as zero and ends decoding, and a chunk that claims more bytes than
//! remain is truncated to what is there. Trailer headers after the last chunk
//! are ignored.

const CRLF: &[u8] = b"\r\n";

/// Reassembles a chunked body into its payload.
///
/// Reads a hexadecimal size line, then exactly that many payload bytes, and
/// repeats until a zero size is declared or the input runs out.
pub fn unchunk(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];
        let (line, consumed) = match find(rest, CRLF) {
            Some(end) => (&rest[..end], end + CRLF.len()),
            None => (rest, rest.len()),
        };
        pos += consumed;

        let size = parse_chunk_size(line);
        if size == 0 {
            break;
        }

        let take = size.min(body.len() - pos);
        out.extend_from_slice(&body[pos..pos + take]);
        pos += take;

        if body[pos..].starts_with(CRLF) {
            pos += CRLF.len();
        }
    }

    out
}

/// Parses the leading hex digits of a size line, ignoring chunk extensions
/// and surrounding whitespace. Returns 0 when there are no digits.
fn parse_chunk_size(line: &[u8]) -> usize {
    line.iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .map_while(|b| (*b as char).to_digit(16))
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(16).saturating_add(digit as usize)
        })
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
