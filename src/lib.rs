//! # pigsty — signature file parser
//!
//! Parses pigsty files: named collections of protocol-field overrides consumed by a
//! packet-construction tool. A file holds zero or more bracketed entries; each entry
//! carries a signature name and an ordered set of `field = value` assignments.
//!
//! ## Format
//!
//! ```text
//! < signature = "valid signature", ip.version = 4, ip.tos = 0x10, ip.src = 127.0.0.1 >
//! < signature = "second", ip.ttl = 64, ip.payload = "GET /\r\n" >
//! ```
//!
//! - Values are decimal or `0x` hexadecimal integers, `"quoted"` strings
//!   (`\n \r \t \\ \" \xHH` escapes) or dotted-quad IPv4 addresses.
//! - Keys come from a fixed table (see [`fields`]); unknown keys are rejected.
//! - Loading is all-or-nothing: any error anywhere rejects the whole file.
//!
//! ## Usage
//!
//! ```
//! let p = pigsty::load(b"< signature = \"oink\", ip.ttl = 64 >").unwrap();
//! let e = p.find_by_signature("oink").unwrap();
//! assert_eq!(e.field(pigsty::FieldIndex::IpTtl).and_then(|f| f.as_u32()), Some(64));
//! ```

pub mod decode;
pub mod dump;
pub mod entry;
pub mod error;
pub mod fields;
pub mod loader;
pub mod parser;

pub use decode::{to_int, to_int_or_zero, to_ipv4, to_str};
pub use entry::{Entry, Field, Pigsty};
pub use error::{DecodeError, DumpError, ErrorKind, LoadError, Location};
pub use fields::{FieldIndex, ValueKind};
pub use loader::{load, load_from_file, load_from_reader, load_with, LoadOptions};
