//! In-memory document builder.
//!
//! _Requires Cargo feature `alloc`._

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::sans::{Link, OType};

use super::{Listener, parser::Error, parse};

extern crate alloc;

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Short(i16),
    Long(i64),
    Byte(i8),
    Float(f32),
    Double(f64),
    /// Milliseconds since the epoch.
    Date(i64),
    /// Milliseconds since the epoch.
    DateTime(i64),
    String(String),
    Binary(Vec<u8>),
    Link(Link),
    Embedded(Document),
    /// Entries of a list or set, in stored order.
    Collection(Vec<Value>),
    /// Entries of a map, in stored order.
    Map(Vec<(String, Value)>),
}

/// A decoded document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// The class name, empty if unnamed.
    pub class: String,
    /// Fields in directory order, with their declared types.
    pub fields: Vec<(String, OType, Value)>,
}

impl Document {
    /// Look up the first field with a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, ..)| n == name)
            .map(|(.., value)| value)
    }
}

/// Decode a record into an in-memory document.
///
/// This method is also re-exported as `orecord::avec::decode_document`.
pub fn decode(content: &[u8]) -> Result<Document, Error> {
    let mut builder = DocumentBuilder::default();
    parse(super::FORMAT, content, &mut builder)?;
    Ok(builder.finish())
}

/// A listener assembling events into a [`Document`].
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    stack: Vec<Frame>,
    root: Option<Document>,
}

#[derive(Debug)]
enum Frame {
    Document {
        document: Document,
        field: Option<(String, OType)>,
    },
    Collection(Vec<Value>),
    Map {
        entries: Vec<(String, Value)>,
        key: Option<String>,
    },
}

impl DocumentBuilder {
    /// Take the completed top-level document.
    ///
    /// Returns an empty document if none was completed.
    pub fn finish(self) -> Document {
        self.root.unwrap_or_default()
    }

    fn push(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Document { document, field }) => {
                if let Some((name, ty)) = field.take() {
                    document.fields.push((name, ty, value));
                }
            }
            Some(Frame::Collection(values)) => values.push(value),
            Some(Frame::Map { entries, key }) => {
                if let Some(key) = key.take() {
                    entries.push((key, value));
                }
            }
            None => {
                if let Value::Embedded(document) = value {
                    self.root = Some(document);
                }
            }
        }
    }
}

impl<'a> Listener<'a> for DocumentBuilder {
    fn start_document(&mut self, class: &'a str) {
        self.stack.push(Frame::Document {
            document: Document {
                class: class.to_string(),
                fields: Vec::new(),
            },
            field: None,
        });
    }

    fn end_document(&mut self) {
        if let Some(Frame::Document { document, .. }) = self.stack.pop() {
            self.push(Value::Embedded(document));
        }
    }

    fn start_field(&mut self, name: &'a str, ty: OType) {
        if let Some(Frame::Document { field, .. }) = self.stack.last_mut() {
            *field = Some((name.to_string(), ty));
        }
    }

    fn string_value(&mut self, value: &'a str) {
        self.push(Value::String(value.to_string()));
    }

    fn int_value(&mut self, value: i32) {
        self.push(Value::Integer(value));
    }

    fn long_value(&mut self, value: i64) {
        self.push(Value::Long(value));
    }

    fn short_value(&mut self, value: i16) {
        self.push(Value::Short(value));
    }

    fn byte_value(&mut self, value: i8) {
        self.push(Value::Byte(value));
    }

    fn boolean_value(&mut self, value: bool) {
        self.push(Value::Boolean(value));
    }

    fn float_value(&mut self, value: f32) {
        self.push(Value::Float(value));
    }

    fn double_value(&mut self, value: f64) {
        self.push(Value::Double(value));
    }

    fn binary_value(&mut self, value: &'a [u8]) {
        self.push(Value::Binary(value.to_vec()));
    }

    fn date_value(&mut self, value: i64) {
        self.push(Value::Date(value));
    }

    fn date_time_value(&mut self, value: i64) {
        self.push(Value::DateTime(value));
    }

    fn link_value(&mut self, value: Link) {
        self.push(Value::Link(value));
    }

    fn start_collection(&mut self, size: usize) {
        // Sizes come from the record, so they only hint at capacity.
        self.stack
            .push(Frame::Collection(Vec::with_capacity(size.min(64))));
    }

    fn end_collection(&mut self) {
        if let Some(Frame::Collection(values)) = self.stack.pop() {
            self.push(Value::Collection(values));
        }
    }

    fn start_map(&mut self, size: usize) {
        self.stack.push(Frame::Map {
            entries: Vec::with_capacity(size.min(64)),
            key: None,
        });
    }

    fn map_key(&mut self, key: &'a str) {
        if let Some(Frame::Map { key: pending, .. }) = self.stack.last_mut() {
            *pending = Some(key.to_string());
        }
    }

    fn end_map(&mut self) {
        if let Some(Frame::Map { entries, .. }) = self.stack.pop() {
            self.push(Value::Map(entries));
        }
    }
}
