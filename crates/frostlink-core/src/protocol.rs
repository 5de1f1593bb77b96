//! Endpoint construction and API-key masking.
//!
//! Both functions are pure; request dispatch itself lives on
//! [`crate::Client`], which calls through the [`crate::transport`]
//! boundary.

/// Mask character used in place of API-key bytes.
const MASK: char = '*';

/// Build an appliance endpoint from path segments.
///
/// Joins `https://{host}:{port}/` with the segments separated by `/`.
/// Deterministic; performs no escaping — appliance paths are plain
/// identifiers.
pub fn endpoint(host: &str, port: u16, segments: &[&str]) -> String {
    format!("https://{host}:{port}/{}", segments.join("/"))
}

/// Replace the API key in a URL or message with `*` for safe logging.
///
/// The key is expected as `?key=<secret>`, with the secret running up to
/// the first space if one follows, otherwise up to the first `?`. The
/// secret is replaced by an equal-length run of `*`; everything else,
/// including the delimiter and any trailing parameters, is preserved
/// byte-for-byte. Inputs without `?key=` are returned unchanged.
pub fn mask_key(input: &str) -> String {
    let Some(at) = input.find("?key=") else {
        return input.to_string();
    };
    let prefix = &input[..at];
    let rest = &input[at + "?key=".len()..];

    let sep = if rest.contains(' ') { ' ' } else { '?' };
    let (secret, tail) = match rest.find(sep) {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    let mut masked = String::with_capacity(input.len());
    masked.push_str(prefix);
    masked.push_str("?key=");
    masked.extend(std::iter::repeat_n(MASK, secret.chars().count()));
    masked.push_str(tail);
    masked
}
