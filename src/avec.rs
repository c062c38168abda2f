//! Listener-driven decoding of whole records.
//!
//! The functions in this module walk a record and report its structure as a
//! stream of events to a [`Listener`]. Most applications will want one of
//! the consumers built on top of it instead:
//!
//! - [`decode`] publishes top-level fields to a [`FromDocument`] receiver,
//! which can be derived for structs of a known shape.
//!
//! - [`decode_document`] builds an in-memory [`Document`]
//! (_requires Cargo feature `alloc`_).

#[cfg(feature = "alloc")]
pub mod document;
pub mod parser;
pub mod publish;

#[cfg(feature = "alloc")]
pub use document::{Document, DocumentBuilder, Value, decode as decode_document};
pub use parser::{DEFAULT_MAX_DEPTH, Error, FORMAT, RecordParser, parse};
pub use publish::decode;

use crate::sans::{Link, OType};

/// Receive the events describing a record.
///
/// Calls are balanced and properly nested: every `start_*` call is matched
/// by its `end_*` call before a sibling begins, and every
/// [`map_key`](Self::map_key) is followed by exactly one value (scalar or
/// composite) before the next key or [`end_map`](Self::end_map).
///
/// Text and binary values borrow from the record being decoded.
///
/// The default implementation of each method ignores the event.
#[allow(unused_variables)]
pub trait Listener<'a> {
    /// Begin a document, top-level or embedded. Unnamed classes are empty.
    fn start_document(&mut self, class: &'a str) {}
    /// End the current document.
    fn end_document(&mut self) {}
    /// Begin a field of the current document.
    fn start_field(&mut self, name: &'a str, ty: OType) {}
    /// End the current field.
    fn end_field(&mut self, name: &'a str) {}

    fn string_value(&mut self, value: &'a str) {}
    fn int_value(&mut self, value: i32) {}
    fn long_value(&mut self, value: i64) {}
    fn short_value(&mut self, value: i16) {}
    fn byte_value(&mut self, value: i8) {}
    fn boolean_value(&mut self, value: bool) {}
    fn float_value(&mut self, value: f32) {}
    fn double_value(&mut self, value: f64) {}
    fn binary_value(&mut self, value: &'a [u8]) {}
    /// A date, in milliseconds since the epoch.
    fn date_value(&mut self, value: i64) {}
    /// A date and time, in milliseconds since the epoch.
    fn date_time_value(&mut self, value: i64) {}
    fn link_value(&mut self, value: Link) {}

    /// Begin a list or set of `size` entries.
    fn start_collection(&mut self, size: usize) {}
    /// End the current list or set.
    fn end_collection(&mut self) {}
    /// Begin a map of `size` entries.
    fn start_map(&mut self, size: usize) {}
    /// Name the value that follows.
    fn map_key(&mut self, key: &'a str) {}
    /// End the current map.
    fn end_map(&mut self) {}
}

/// Derive [`FromDocument`] for a struct representing a document.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a single value for a top-level field, add the `field("name")`
/// attribute to an `Option<T>` struct field, where `T` is the Rust type
/// corresponding to the stored value. Additional values received for the
/// same field will replace earlier ones. `String` receives text and
/// `Vec<u8>` receives binary values.
///
/// To receive the class name, supply `class` in place of a field name.
///
/// ```
/// #[derive(Debug, Default, FromDocument)]
/// struct Person {
///     #[field(class)]
///     class: Option<String>,
///     #[field("name")]
///     name: Option<String>,
///     #[field("age")]
///     age: Option<i32>,
///     #[field("friend")]
///     friend: Option<Link>,
/// }
/// ```
///
/// Collection entries are published one at a time. To receive them, or to
/// convert values on arrival, supply an accumulator closure. Since the value
/// type cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromDocument)]
/// struct Player {
///     #[field("scores", |v, s: i32| v.push(s))]
///     scores: Vec<i32>,
///     #[field("nick", |v, s: &str| *v = s.len())]
///     nick_len: usize,
/// }
/// ```
#[cfg(feature = "derive")]
pub use orecord_derive::FromDocument;

/// Receive top-level field values for a document.
///
/// Values are keyed by the name of the top-level field holding them. Entries
/// of a collection field are published one at a time; values inside
/// embedded documents and maps are not published. Dates and date-times are
/// published as milliseconds since the epoch.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromDocument`](macro@FromDocument) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromDocument {
    /// Add the class name to the document.
    fn add_class(&mut self, class: &str) {}
    /// Add a `bool` for a field to the document.
    fn add_bool(&mut self, field: &str, _: bool) {}

    /// Add a `i8` for a field to the document.
    fn add_i8(&mut self, field: &str, _: i8) {}
    /// Add a `i16` for a field to the document.
    fn add_i16(&mut self, field: &str, _: i16) {}
    /// Add a `i32` for a field to the document.
    fn add_i32(&mut self, field: &str, _: i32) {}
    /// Add a `i64` for a field to the document.
    ///
    /// This method receives longs, dates and date-times.
    fn add_i64(&mut self, field: &str, _: i64) {}

    /// Add a `f32` for a field to the document.
    fn add_f32(&mut self, field: &str, _: f32) {}
    /// Add a `f64` for a field to the document.
    fn add_f64(&mut self, field: &str, _: f64) {}

    /// Add text for a field to the document.
    fn add_str(&mut self, field: &str, _: &str) {}
    /// Add binary data for a field to the document.
    fn add_bytes(&mut self, field: &str, _: &[u8]) {}
    /// Add a link for a field to the document.
    fn add_link(&mut self, field: &str, _: Link) {}
}
