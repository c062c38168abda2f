//! Byte-level primitives for reading binary records.
//!
//! This module is intended for applications that need to read pieces of a
//! record themselves. See [`crate::avec`] for the listener-driven decoder
//! covering whole documents.
//!
//! # Architecture
//!
//! A record is read through a [`ContentBuffer`], which owns a cursor over an
//! immutable byte slice. Every read first validates ("prepares") the bytes it
//! needs, so no primitive ever reads past the end of the slice. Directory
//! entries in a record point at values stored elsewhere; following one is a
//! matter of saving [`ContentBuffer::position`], calling
//! [`ContentBuffer::force_cursor`], reading, and forcing the cursor back.
//!
//! The codecs built on the buffer are:
//!
//! - [`varint`]: base-128 variable-length integers, used for sizes, counts
//! and most integer scalars.
//!
//! - [`scalar`]: fixed-width fields, namely big-endian offsets, little-endian
//! IEEE-754 floats, and single tag bytes.
//!
//! Type tags and record links are modelled in [`types`].

use thiserror::Error;

pub mod buffer;
pub mod scalar;
pub mod types;
pub mod varint;

pub use buffer::ContentBuffer;
pub use types::{Link, OType};

/// An error reading primitives from a [`ContentBuffer`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// Fewer bytes remain than a read requires.
    #[error("Needed {needed} bytes, but only {remaining} remain.")]
    Truncated { needed: usize, remaining: usize },
    /// A cursor jump targets a position outside the buffer.
    #[error("Offset {0} is outside the buffer.")]
    InvalidOffset(i64),
    /// A variable-length integer overflows 64 bits or is cut short.
    #[error("Malformed variable-length integer at offset {offset}.")]
    MalformedVarint { offset: usize },
}
