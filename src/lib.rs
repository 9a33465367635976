//! Typed accessor layer over a PostgreSQL hstore column.
//!
//! An hstore cell stores an arbitrary set of text key/value pairs. This
//! crate wraps that mapping with:
//!
//! - typed reads and writes (strings, ints, floats, timestamps, delimited
//!   lists, nested key/value maps) over the string-typed entries,
//! - mutation and query operations (set/append/delete/merge, regex-based
//!   bulk deletion, emptiness/initialization),
//! - a lazy memo cache for derived computations, cleared whenever the
//!   mapping becomes empty,
//! - the wire codec and the scan/value/type hooks a database driver or ORM
//!   calls when reading and persisting the cell.
//!
//! The wrapper is deliberately loose: it enforces no schema, and malformed
//! values degrade to zero values rather than raising (see [`error`]).
//!
//! # Example
//!
//! ```
//! use hstore::{Hstore, RawValue};
//!
//! let mut hs = Hstore::default();
//! hs.scan(RawValue::Text(r#""visits"=>"3", "tags"=>"a,b""#)).unwrap();
//!
//! assert_eq!(hs.get_int("visits"), 3);
//! assert_eq!(hs.get_as_slice("tags", ","), ["a", "b"]);
//!
//! hs.set_float("score", 12.50, 4);
//! assert_eq!(hs.get("score"), "12.5");
//!
//! let wire = hs.value().unwrap();
//! assert_eq!(Hstore::decode(&wire), hs);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod dateparse;
pub mod error;
pub mod store;

pub use error::{HstoreError, Result};
pub use store::{Hstore, RawValue};
