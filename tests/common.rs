#![cfg(feature = "std")]

use std::path::Path;

use csv::ReaderBuilder;
use orecord::{
    avec::{FORMAT, Listener},
    sans::{Link, OType},
};

#[test]
fn parse_person() {
    const PATH: &str = "fixtures/person.hex";
    let data = read_hex(PATH);
    let mut validator = Validator::new(PATH);
    orecord::avec::parse(FORMAT, &data, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn parse_nested() {
    const PATH: &str = "fixtures/nested.hex";
    let data = read_hex(PATH);
    let mut validator = Validator::new(PATH);
    orecord::avec::parse(FORMAT, &data, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn parse_truncated_fixture() {
    const PATH: &str = "fixtures/nested.hex";
    let data = read_hex(PATH);

    // Every proper prefix is missing at least the final map value.
    for end in 0..data.len() {
        let result = orecord::avec::parse(FORMAT, &data[..end], &mut NoOp);
        assert!(result.is_err(), "prefix of {end} bytes decoded");
    }
}

fn read_hex(path: impl AsRef<Path>) -> Vec<u8> {
    let text = std::fs::read_to_string(path).unwrap();
    text.split_whitespace()
        .map(|b| u8::from_str_radix(b, 16).unwrap())
        .collect()
}

struct NoOp;

impl Listener<'_> for NoOp {}

/// Checks each event against a row of the fixture's expectations.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn validate(&mut self, event: &[&str]) {
        assert!(!self.0.is_empty(), "unexpected event {event:?}");
        assert_eq!(self.0.remove(0), event);
    }

    fn finish(self) {
        assert!(self.0.is_empty(), "missing events {:?}", self.0);
    }
}

impl<'a> Listener<'a> for Validator {
    fn start_document(&mut self, class: &'a str) {
        self.validate(&["start_document", class]);
    }
    fn end_document(&mut self) {
        self.validate(&["end_document"]);
    }
    fn start_field(&mut self, name: &'a str, ty: OType) {
        self.validate(&["start_field", name, &format!("{ty:?}")]);
    }
    fn end_field(&mut self, name: &'a str) {
        self.validate(&["end_field", name]);
    }
    fn string_value(&mut self, value: &'a str) {
        self.validate(&["string", value]);
    }
    fn int_value(&mut self, value: i32) {
        self.validate(&["int", &value.to_string()]);
    }
    fn long_value(&mut self, value: i64) {
        self.validate(&["long", &value.to_string()]);
    }
    fn short_value(&mut self, value: i16) {
        self.validate(&["short", &value.to_string()]);
    }
    fn byte_value(&mut self, value: i8) {
        self.validate(&["byte", &value.to_string()]);
    }
    fn boolean_value(&mut self, value: bool) {
        self.validate(&["boolean", &value.to_string()]);
    }
    fn float_value(&mut self, value: f32) {
        self.validate(&["float", &value.to_string()]);
    }
    fn double_value(&mut self, value: f64) {
        self.validate(&["double", &value.to_string()]);
    }
    fn binary_value(&mut self, value: &'a [u8]) {
        self.validate(&["binary", &format!("{value:02x?}")]);
    }
    fn date_value(&mut self, value: i64) {
        self.validate(&["date", &value.to_string()]);
    }
    fn date_time_value(&mut self, value: i64) {
        self.validate(&["date_time", &value.to_string()]);
    }
    fn link_value(&mut self, value: Link) {
        let Link { cluster, position } = value;
        self.validate(&["link", &cluster.to_string(), &position.to_string()]);
    }
    fn start_collection(&mut self, size: usize) {
        self.validate(&["start_collection", &size.to_string()]);
    }
    fn end_collection(&mut self) {
        self.validate(&["end_collection"]);
    }
    fn start_map(&mut self, size: usize) {
        self.validate(&["start_map", &size.to_string()]);
    }
    fn map_key(&mut self, key: &'a str) {
        self.validate(&["map_key", key]);
    }
    fn end_map(&mut self) {
        self.validate(&["end_map"]);
    }
}
