#![no_std]

//! A streaming decoder for OrientDB's binary record serialization format.
//!
//! Records are decoded without building an intermediate tree: the decoder
//! walks the field directory of each document, follows each entry's offset to
//! its value, and reports what it finds as a nested stream of events. Embedded
//! documents, collections, maps and links are all supported, and every read
//! is bounds-checked against the record, so malformed or hostile input fails
//! with an error rather than a panic.
//!
//! Most users should begin with the functions and derive macro in the
//! [`avec`] module. If these prove insufficient, the byte-level readers in the
//! [`sans`] module can be used directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `alloc`: enable the in-memory document builder.
//! - `std`: enable `alloc` and standard library support for logging (default).

pub mod avec;
pub mod sans;
