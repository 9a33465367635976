//! The `Hstore` column type: entry map, typed accessors, memo cache, and the
//! SQL integration hooks a driver calls when reading or persisting the cell.
//!
//! # Design
//!
//! Every value is stored as a `String`; the typed accessors (`get_int`,
//! `get_float`, `get_time`, ...) are pure format/parse adapters over that
//! string and never change the stored representation. Accessors are
//! infallible: a missing key or unparsable value degrades to the documented
//! zero value instead of raising.
//!
//! An uninitialized column (`entries` absent) is distinct from an initialized
//! column with zero entries: the former persists as SQL NULL, the latter as
//! the empty wire string.
//!
//! # Thread Safety
//!
//! `Hstore` is not safe for concurrent mutation. Callers sharing a column
//! across threads must impose external mutual exclusion.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use colored::Colorize;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::dateparse;
use crate::error::{HstoreError, Result};

/// A raw database cell representation handed to the scan hook.
///
/// Drivers surface hstore cells as text or as a byte sequence depending on
/// the wire protocol in use; `Null` models a SQL NULL cell.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    /// A textual cell value.
    Text(&'a str),
    /// A byte-sequence cell value; must be valid UTF-8.
    Bytes(&'a [u8]),
    /// A SQL NULL cell.
    Null,
}

/// A typed wrapper over a PostgreSQL hstore column.
///
/// Wraps a string→string mapping with convenience accessors for scalars
/// (ints, floats, timestamps), delimited lists, and nested key/value maps,
/// plus a lazily-created memo cache for derived computations.
///
/// # Examples
///
/// ```
/// use hstore::Hstore;
///
/// let mut hs = Hstore::new();
/// hs.set("name", "orion");
/// hs.set_float("speed", 12.50, 4);
///
/// assert_eq!(hs.get("speed"), "12.5");
/// assert_eq!(hs.get_int("speed"), 12);
/// assert!(hs.have("name"));
/// ```
#[derive(Default, Serialize, Deserialize)]
pub struct Hstore {
    /// The stored entries. `None` models the uninitialized column.
    entries: Option<HashMap<String, String>>,

    /// Memo cache for expensive derived computations (e.g. aggregates over
    /// the entries). Created lazily; cleared whenever the entry map
    /// transitions to empty. Never persisted.
    #[serde(skip)]
    cache: Option<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl Hstore {
    /// The sentinel returned by [`get_time`](Self::get_time) for absent or
    /// unparsable values. Compare against it to detect "no time".
    pub const ZERO_TIME: DateTime<Utc> = DateTime::UNIX_EPOCH;

    /// Create a column with an initialized, empty entry map.
    ///
    /// Unlike [`Hstore::default`], the result persists as an empty wire
    /// string rather than SQL NULL.
    pub fn new() -> Self {
        Hstore {
            entries: Some(HashMap::new()),
            cache: None,
        }
    }

    /// Decode a column from its wire string.
    pub fn decode(wire: &str) -> Self {
        Hstore {
            entries: Some(codec::decode(wire)),
            cache: None,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    /// True when the column is uninitialized or has zero entries.
    pub fn is_empty(&self) -> bool {
        self.entries.as_ref().map_or(true, HashMap::is_empty)
    }

    /// Materialize an empty entry map if the column is empty; returns `self`
    /// for chaining.
    pub fn init_if_empty(&mut self) -> &mut Self {
        if self.is_empty() {
            self.entries = Some(HashMap::new());
        }
        self
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Get the stored string, or `""` when the key is absent.
    ///
    /// A key stored with an empty-string value is indistinguishable from an
    /// absent key here; [`have`](Self::have) makes the same conflation.
    pub fn get(&self, key: &str) -> &str {
        self.entries
            .as_ref()
            .and_then(|m| m.get(key))
            .map_or("", String::as_str)
    }

    /// Parse the stored value as an integer, truncating toward zero.
    /// Absent or non-numeric values yield `0`.
    pub fn get_int(&self, key: &str) -> i64 {
        self.get_float(key).trunc() as i64
    }

    /// Parse the stored value as a float. Absent or non-numeric values yield
    /// `0.0`.
    pub fn get_float(&self, key: &str) -> f64 {
        self.get(key).trim().parse().unwrap_or(0.0)
    }

    /// Parse the stored value as a timestamp, accepting the common textual
    /// date formats (see [`dateparse`]). Absent or unparsable values yield
    /// [`Hstore::ZERO_TIME`].
    pub fn get_time(&self, key: &str) -> DateTime<Utc> {
        dateparse::parse_any(self.get(key)).unwrap_or(Self::ZERO_TIME)
    }

    /// Split the stored value by `sep`. An absent key (or empty stored
    /// value) yields an empty vec, never `vec![""]`.
    pub fn get_as_slice(&self, key: &str, sep: &str) -> Vec<String> {
        let s = self.get(key);
        if s.is_empty() {
            return Vec::new();
        }
        s.split(sep).map(str::to_string).collect()
    }

    /// Decode the stored value as a nested key/value map: items separated by
    /// `item_sep`, each split at the first `pair_sep`. Items without the
    /// pair separator are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use hstore::Hstore;
    ///
    /// let mut hs = Hstore::new();
    /// hs.set("attrs", "a=>1,b=>2");
    ///
    /// let m = hs.get_as_map("attrs", ",", "=>");
    /// assert_eq!(m["a"], "1");
    /// assert_eq!(m["b"], "2");
    /// ```
    pub fn get_as_map(
        &self,
        key: &str,
        item_sep: &str,
        pair_sep: &str,
    ) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for item in self.get_as_slice(key, item_sep) {
            if let Some((k, v)) = item.split_once(pair_sep) {
                map.insert(k.to_string(), v.to_string());
            }
        }
        map
    }

    /// True iff the stored value is a non-empty string.
    ///
    /// An absent key and a key stored with `""` both return `false`; calling
    /// code relies on this conflation, so it is part of the contract.
    pub fn have(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Stringify `value` via its `Display` form and store it. Initializes
    /// the entry map on first write.
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.entries_mut().insert(key.into(), value.to_string());
    }

    /// Store an integer in decimal form.
    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.entries_mut().insert(key.into(), value.to_string());
    }

    /// Store a float formatted to `decimals` fractional digits, with
    /// trailing zero digits and a trailing decimal point stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use hstore::Hstore;
    ///
    /// let mut hs = Hstore::new();
    /// hs.set_float("a", 0.345, 1);
    /// hs.set_float("b", 100.00, 7);
    ///
    /// assert_eq!(hs.get("a"), "0.3");
    /// assert_eq!(hs.get("b"), "100");
    /// ```
    pub fn set_float(&mut self, key: impl Into<String>, value: f64, decimals: usize) {
        self.entries_mut()
            .insert(key.into(), format_float(value, decimals));
    }

    /// Append `value` to the stored string, inserting `sep` before it when
    /// the current value is non-empty. Builds delimited lists incrementally:
    ///
    /// ```
    /// use hstore::Hstore;
    ///
    /// let mut hs = Hstore::new();
    /// hs.append("words", "apple", ",");
    /// hs.append("words", "banana", ",");
    /// assert_eq!(hs.get("words"), "apple,banana");
    /// ```
    pub fn append(&mut self, key: &str, value: &str, sep: &str) {
        let current = self.get(key);
        let next = if current.is_empty() {
            value.to_string()
        } else {
            format!("{current}{sep}{value}")
        };
        self.entries_mut().insert(key.to_string(), next);
    }

    /// Remove a key. Clears the memo cache when the map transitions to
    /// empty.
    pub fn delete(&mut self, key: &str) {
        if let Some(m) = self.entries.as_mut() {
            m.remove(key);
        }
        self.drop_cache_if_empty();
    }

    /// Remove every key whose name matches `pattern` (values are not
    /// examined). An invalid pattern deletes nothing.
    pub fn delete_by_regex(&mut self, pattern: &str) {
        let Ok(re) = Regex::new(pattern) else {
            tracing::debug!(pattern, "invalid key pattern, nothing deleted");
            return;
        };
        if let Some(m) = self.entries.as_mut() {
            m.retain(|key, _| !re.is_match(key));
        }
        self.drop_cache_if_empty();
    }

    /// Insert every entry of `other`, overwriting on conflict (`other`
    /// wins). Returns `self` for chaining.
    pub fn merge(&mut self, other: &Hstore) -> &mut Self {
        if let Some(theirs) = other.entries.as_ref() {
            let entries = self.entries_mut();
            for (key, value) in theirs {
                entries.insert(key.clone(), value.clone());
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Memo cache
    // ------------------------------------------------------------------

    /// Cache a derived value under `key`. The cache is independent of the
    /// entry map and is dropped when the map transitions to empty.
    pub fn save_to_cache(&mut self, key: impl Into<String>, value: impl Any + Send + Sync) {
        self.cache
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), Box::new(value));
    }

    /// Read a cached value back, typed. Returns `None` when the key is
    /// absent or was cached under a different type.
    pub fn load_from_cache<T: Any>(&self, key: &str) -> Option<&T> {
        self.cache.as_ref()?.get(key)?.downcast_ref::<T>()
    }

    // ------------------------------------------------------------------
    // SQL integration hooks
    // ------------------------------------------------------------------

    /// Scan hook: populate the column from a raw database cell.
    ///
    /// `Null` leaves the column untouched. A byte cell that is not valid
    /// UTF-8 is the one hard error in the crate; it indicates an integration
    /// bug, not bad domain data.
    pub fn scan(&mut self, raw: RawValue<'_>) -> Result<()> {
        let wire = match raw {
            RawValue::Null => return Ok(()),
            RawValue::Text(s) => s,
            RawValue::Bytes(b) => std::str::from_utf8(b).map_err(|e| {
                HstoreError::unsupported_source(format!("byte cell is not valid utf-8: {e}"))
            })?,
        };
        self.entries = Some(codec::decode(wire));
        self.drop_cache_if_empty();
        Ok(())
    }

    /// Value hook: the wire string to persist, or `None` for an
    /// uninitialized column (persisted as SQL NULL).
    pub fn value(&self) -> Option<String> {
        self.entries.as_ref().map(codec::encode)
    }

    /// Type-name hook for the ORM's schema/migration logic.
    pub fn sql_type() -> &'static str {
        "hstore"
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Dump the entries to stdout for debugging. Not part of the core
    /// contract.
    pub fn print(&self) {
        println!("{}", ".".repeat(80));
        if let Some(m) = self.entries.as_ref() {
            for (key, value) in m {
                println!("{}", format!("{key:>25} ==> {value}").magenta());
            }
        }
        println!("{}", ".".repeat(80));
    }

    /// The entry map, created on first mutation.
    fn entries_mut(&mut self) -> &mut HashMap<String, String> {
        self.entries.get_or_insert_with(HashMap::new)
    }

    /// Invariant: the memo cache never outlives a structurally-empty column.
    fn drop_cache_if_empty(&mut self) {
        if self.is_empty() {
            self.cache = None;
        }
    }
}

/// Clones the entries only. Cached memo values are derived data and are not
/// carried across clones.
impl Clone for Hstore {
    fn clone(&self) -> Self {
        Hstore {
            entries: self.entries.clone(),
            cache: None,
        }
    }
}

impl fmt::Debug for Hstore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hstore")
            .field("entries", &self.entries)
            .field("cached", &self.cache.as_ref().map_or(0, HashMap::len))
            .finish()
    }
}

/// Equality over the stored entries; the memo cache does not participate.
impl PartialEq for Hstore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Renders the wire form (empty for an uninitialized column).
impl fmt::Display for Hstore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value().unwrap_or_default())
    }
}

impl From<&str> for Hstore {
    fn from(wire: &str) -> Self {
        Hstore::decode(wire)
    }
}

impl FromStr for Hstore {
    type Err = std::convert::Infallible;

    fn from_str(wire: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Hstore::decode(wire))
    }
}

/// Format a float to `decimals` fractional digits, strip trailing zero
/// digits, then a trailing decimal point; an empty result becomes `"0"`.
fn format_float(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}
