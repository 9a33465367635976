//! Wire codec for the PostgreSQL hstore textual representation.
//!
//! The wire form is a comma-space-joined sequence of double-quoted pairs:
//!
//! ```text
//! "a"=>"1", "b"=>"2"
//! ```
//!
//! Decoding is best-effort: pairs missing the `=>` arrow are skipped (logged
//! at debug level, never raised), and surrounding quotes are trimmed from both
//! key and value. Keys and values containing `"`, `=>`, or the `", "` pair
//! boundary are outside the decodable set; the column stores loosely-typed
//! scalar data, not nested structure.

use std::collections::HashMap;

/// Pair separator on the wire.
const PAIR_SEP: &str = ", ";

/// Key/value arrow on the wire.
const ARROW: &str = "=>";

/// Decode a wire string into a key→value map.
///
/// Malformed pairs are dropped; an empty or unparsable input yields an empty
/// map. Decoding never fails.
///
/// # Example
///
/// ```
/// let m = hstore::codec::decode(r#""a"=>"1", "b"=>"2""#);
/// assert_eq!(m.get("a").map(String::as_str), Some("1"));
/// assert_eq!(m.len(), 2);
/// ```
pub fn decode(wire: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for pair in wire.split(PAIR_SEP) {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once(ARROW) {
            Some((key, value)) => {
                let key = trim_quotes(key);
                let value = trim_quotes(value);
                entries.insert(key.to_string(), value.to_string());
            }
            None => {
                tracing::debug!(pair, "skipping malformed hstore pair");
            }
        }
    }

    entries
}

/// Encode a key→value map into the wire string.
///
/// Pairs are emitted in map iteration order; hstore order is not meaningful
/// and the database does not preserve it.
pub fn encode(entries: &HashMap<String, String>) -> String {
    let pairs: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("\"{}\"{}\"{}\"", key, ARROW, value))
        .collect();
    pairs.join(PAIR_SEP)
}

/// Strip surrounding double quotes and whitespace from a wire token.
fn trim_quotes(token: &str) -> &str {
    token.trim().trim_matches('"')
}
