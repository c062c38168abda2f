#![allow(dead_code)]

//! Builders for test records, and a listener recording every event.

use orecord::{
    avec::Listener,
    sans::{Link, OType},
};

/// Bytes of a value, given the absolute offset they will be stored at.
pub type Body = Box<dyn Fn(usize) -> Vec<u8>>;

pub struct Field {
    name: &'static str,
    tag: u8,
    body: Body,
}

pub fn field(name: &'static str, ty: OType, body: Body) -> Field {
    tagged_field(name, ty.tag(), body)
}

pub fn tagged_field(name: &'static str, tag: u8, body: Body) -> Field {
    Field { name, tag, body }
}

pub fn varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

pub fn raw(bytes: impl Into<Vec<u8>>) -> Body {
    let bytes = bytes.into();
    Box::new(move |_| bytes.clone())
}

pub fn int(value: u64) -> Body {
    raw(varint(value))
}

pub fn string(value: &'static str) -> Body {
    let mut bytes = varint(value.len() as u64);
    bytes.extend_from_slice(value.as_bytes());
    raw(bytes)
}

pub fn link_list(links: &[(u64, u64)]) -> Body {
    let mut bytes = varint(links.len() as u64);
    for (cluster, position) in links {
        bytes.extend(varint(*cluster));
        bytes.extend(varint(*position));
    }
    raw(bytes)
}

/// A document with its values stored in directory order.
pub fn document(class: &'static str, fields: Vec<Field>) -> Body {
    let order = (0..fields.len()).collect();
    document_ordered(class, fields, order)
}

/// A document with its values stored in the order given by field indices.
pub fn document_ordered(class: &'static str, fields: Vec<Field>, order: Vec<usize>) -> Body {
    Box::new(move |base| {
        let mut head = varint(class.len() as u64);
        head.extend_from_slice(class.as_bytes());

        let directory_len = fields
            .iter()
            .map(|f| varint(f.name.len() as u64).len() + f.name.len() + 5)
            .sum::<usize>()
            + 1;

        let body_start = base + head.len() + directory_len;
        let mut offsets = vec![0; fields.len()];
        let mut body = Vec::new();

        for &i in &order {
            offsets[i] = body_start + body.len();
            body.extend((fields[i].body)(offsets[i]));
        }

        for (f, offset) in fields.iter().zip(&offsets) {
            head.extend(varint(f.name.len() as u64));
            head.extend_from_slice(f.name.as_bytes());
            head.extend_from_slice(&(*offset as i32).to_be_bytes());
            head.push(f.tag);
        }

        head.push(0);
        head.extend(body);
        head
    })
}

/// An untyped embedded list, each entry carrying its own tag.
pub fn embedded_list(entries: Vec<(u8, Body)>) -> Body {
    Box::new(move |base| {
        let mut out = varint(entries.len() as u64);
        out.push(OType::Any.tag());

        for (tag, body) in &entries {
            out.push(*tag);
            let at = base + out.len();
            out.extend(body(at));
        }

        out
    })
}

/// An embedded map with its values stored in entry order.
pub fn map(entries: Vec<Field>) -> Body {
    Box::new(move |base| {
        let mut head = varint(entries.len() as u64);

        let directory_len = entries
            .iter()
            .map(|e| 1 + varint(e.name.len() as u64).len() + e.name.len() + 5)
            .sum::<usize>();

        let mut at = base + head.len() + directory_len;
        let mut body = Vec::new();

        for e in &entries {
            head.push(OType::String.tag());
            head.extend(varint(e.name.len() as u64));
            head.extend_from_slice(e.name.as_bytes());
            head.extend_from_slice(&(at as i32).to_be_bytes());
            head.push(e.tag);

            let bytes = (e.body)(at);
            at += bytes.len();
            body.extend(bytes);
        }

        head.extend(body);
        head
    })
}

/// A complete record: the version byte followed by a top-level document.
pub fn record(document: Body) -> Vec<u8> {
    let mut out = vec![0];
    out.extend(document(1));
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartDocument(String),
    EndDocument,
    StartField(String, OType),
    EndField(String),
    String(String),
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Boolean(bool),
    Float(f32),
    Double(f64),
    Binary(Vec<u8>),
    Date(i64),
    DateTime(i64),
    Link(Link),
    StartCollection(usize),
    EndCollection,
    StartMap(usize),
    MapKey(String),
    EndMap,
}

#[derive(Debug, Default)]
pub struct Recorder(pub Vec<Event>);

impl<'a> Listener<'a> for Recorder {
    fn start_document(&mut self, class: &'a str) {
        self.0.push(Event::StartDocument(class.into()));
    }
    fn end_document(&mut self) {
        self.0.push(Event::EndDocument);
    }
    fn start_field(&mut self, name: &'a str, ty: OType) {
        self.0.push(Event::StartField(name.into(), ty));
    }
    fn end_field(&mut self, name: &'a str) {
        self.0.push(Event::EndField(name.into()));
    }
    fn string_value(&mut self, value: &'a str) {
        self.0.push(Event::String(value.into()));
    }
    fn int_value(&mut self, value: i32) {
        self.0.push(Event::Int(value));
    }
    fn long_value(&mut self, value: i64) {
        self.0.push(Event::Long(value));
    }
    fn short_value(&mut self, value: i16) {
        self.0.push(Event::Short(value));
    }
    fn byte_value(&mut self, value: i8) {
        self.0.push(Event::Byte(value));
    }
    fn boolean_value(&mut self, value: bool) {
        self.0.push(Event::Boolean(value));
    }
    fn float_value(&mut self, value: f32) {
        self.0.push(Event::Float(value));
    }
    fn double_value(&mut self, value: f64) {
        self.0.push(Event::Double(value));
    }
    fn binary_value(&mut self, value: &'a [u8]) {
        self.0.push(Event::Binary(value.to_vec()));
    }
    fn date_value(&mut self, value: i64) {
        self.0.push(Event::Date(value));
    }
    fn date_time_value(&mut self, value: i64) {
        self.0.push(Event::DateTime(value));
    }
    fn link_value(&mut self, value: Link) {
        self.0.push(Event::Link(value));
    }
    fn start_collection(&mut self, size: usize) {
        self.0.push(Event::StartCollection(size));
    }
    fn end_collection(&mut self) {
        self.0.push(Event::EndCollection);
    }
    fn start_map(&mut self, size: usize) {
        self.0.push(Event::StartMap(size));
    }
    fn map_key(&mut self, key: &'a str) {
        self.0.push(Event::MapKey(key.into()));
    }
    fn end_map(&mut self) {
        self.0.push(Event::EndMap);
    }
}
