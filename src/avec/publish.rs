//! Publishing top-level fields to a [`FromDocument`] receiver.

use crate::sans::{Link, OType};

use super::{FromDocument, Listener, parser::Error, parse};

/// Decode a record, publishing its top-level fields to a receiver.
///
/// This method is also re-exported as `orecord::avec::decode`.
pub fn decode(content: &[u8], o: &mut (impl FromDocument + ?Sized)) -> Result<(), Error> {
    let mut publisher = Publisher {
        o,
        documents: 0,
        maps: 0,
        field: None,
    };

    parse(super::FORMAT, content, &mut publisher)
}

/// Adapts listener events to a field receiver.
struct Publisher<'a, 'o, O: ?Sized> {
    o: &'o mut O,
    /// Count of open documents, including the top-level one.
    documents: usize,
    /// Count of open maps.
    maps: usize,
    /// The open top-level field.
    field: Option<&'a str>,
}

impl<'a, O: FromDocument + ?Sized> Publisher<'a, '_, O> {
    /// Publish a value, if it belongs directly to a top-level field.
    fn publish(&mut self, add: impl FnOnce(&mut O, &str)) {
        if self.documents != 1 || self.maps != 0 {
            return;
        }

        if let Some(field) = self.field {
            add(&mut *self.o, field);
        }
    }
}

impl<'a, O: FromDocument + ?Sized> Listener<'a> for Publisher<'a, '_, O> {
    fn start_document(&mut self, class: &'a str) {
        if self.documents == 0 {
            self.o.add_class(class);
        }

        self.documents += 1;
    }

    fn end_document(&mut self) {
        self.documents -= 1;
    }

    fn start_field(&mut self, name: &'a str, _: OType) {
        if self.documents == 1 {
            self.field = Some(name);
        }
    }

    fn end_field(&mut self, _: &'a str) {
        if self.documents == 1 {
            self.field = None;
        }
    }

    fn string_value(&mut self, value: &'a str) {
        self.publish(|o, f| o.add_str(f, value));
    }

    fn int_value(&mut self, value: i32) {
        self.publish(|o, f| o.add_i32(f, value));
    }

    fn long_value(&mut self, value: i64) {
        self.publish(|o, f| o.add_i64(f, value));
    }

    fn short_value(&mut self, value: i16) {
        self.publish(|o, f| o.add_i16(f, value));
    }

    fn byte_value(&mut self, value: i8) {
        self.publish(|o, f| o.add_i8(f, value));
    }

    fn boolean_value(&mut self, value: bool) {
        self.publish(|o, f| o.add_bool(f, value));
    }

    fn float_value(&mut self, value: f32) {
        self.publish(|o, f| o.add_f32(f, value));
    }

    fn double_value(&mut self, value: f64) {
        self.publish(|o, f| o.add_f64(f, value));
    }

    fn binary_value(&mut self, value: &'a [u8]) {
        self.publish(|o, f| o.add_bytes(f, value));
    }

    fn date_value(&mut self, value: i64) {
        self.publish(|o, f| o.add_i64(f, value));
    }

    fn date_time_value(&mut self, value: i64) {
        self.publish(|o, f| o.add_i64(f, value));
    }

    fn link_value(&mut self, value: Link) {
        self.publish(|o, f| o.add_link(f, value));
    }

    fn start_map(&mut self, _: usize) {
        self.maps += 1;
    }

    fn end_map(&mut self) {
        self.maps -= 1;
    }
}
