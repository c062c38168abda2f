//! Record parser.

use core::str;

use either::Either::{self, Left, Right};
use thiserror::Error;

use crate::sans::{
    ContentBuffer, Link, OType, ReadError,
    scalar::{read_f32, read_f64, read_flat32, read_u8},
    varint::read_varint,
};

use super::Listener;

/// The only supported serialization format.
pub const FORMAT: &str = "ORecordSerializerBinary";

/// The nesting limit used unless [`RecordParser::max_depth`] is set.
pub const DEFAULT_MAX_DEPTH: usize = 64;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Errors occurring while parsing a record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serialization format is not supported.
    #[error("Unsupported serialization format.")]
    UnsupportedFormat,
    /// The record version is not supported.
    #[error("Unsupported record version ({0}).")]
    UnsupportedVersion(u8),
    /// The record ended before a required read.
    #[error("Record truncated: needed {needed} bytes, but only {remaining} remain.")]
    TruncatedInput { needed: usize, remaining: usize },
    /// A value offset points outside the record.
    #[error("Offset {0} is outside the record.")]
    InvalidOffset(i64),
    /// A variable-length integer overflows or is cut short.
    #[error("Malformed variable-length integer at offset {offset}.")]
    MalformedVarint { offset: usize },
    /// A field directory entry has a negative name length.
    #[error("Malformed field directory entry (name length {0}).")]
    MalformedField(i64),
    /// A size or count is negative.
    #[error("Invalid length ({0}).")]
    InvalidLength(i64),
    /// Text is not valid UTF-8.
    #[error("Invalid UTF-8 text: {0}.")]
    InvalidUtf8(#[from] str::Utf8Error),
    /// A type tag is unknown or cannot be decoded here.
    #[error("Unsupported type tag ({0}).")]
    UnsupportedType(u8),
    /// Found a null collection entry (not yet supported).
    #[error("Found a null collection entry.")]
    UnsupportedNull,
    /// Documents, collections and maps are nested too deeply.
    #[error("Nesting exceeds the limit of {0}.")]
    DepthExceeded(usize),
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Truncated { needed, remaining } => Self::TruncatedInput { needed, remaining },
            ReadError::InvalidOffset(offset) => Self::InvalidOffset(offset),
            ReadError::MalformedVarint { offset } => Self::MalformedVarint { offset },
        }
    }
}

/// Parse a record with default settings, publishing events to a listener.
///
/// This method is also re-exported as `orecord::avec::parse`.
pub fn parse<'a>(
    format: &str,
    content: &'a [u8],
    listener: &mut (impl Listener<'a> + ?Sized),
) -> Result<(), Error> {
    RecordParser::new(format)?.parse(content, listener)
}

/// A configured record parser.
///
/// Parsing holds no state between calls; one parser may be shared freely,
/// provided each call is given its own listener.
#[derive(Debug, Clone)]
pub struct RecordParser {
    max_depth: usize,
}

impl RecordParser {
    /// Create a parser for a serialization format.
    ///
    /// Only [`FORMAT`] is supported.
    pub fn new(format: &str) -> Result<Self, Error> {
        if format != FORMAT {
            Err(Error::UnsupportedFormat)?;
        }

        Ok(Self {
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Limit how deeply documents, collections and maps may nest. The
    /// top-level document counts as one level.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a record, publishing events to a listener.
    pub fn parse<'a>(
        &self,
        content: &'a [u8],
        listener: &mut (impl Listener<'a> + ?Sized),
    ) -> Result<(), Error> {
        let _span = tracing::debug_span!("parse_record", len = content.len()).entered();

        let result = self.parse_inner(content, listener);

        if let Err(err) = &result {
            tracing::debug!(%err, "record parse failed");
        }

        result
    }

    fn parse_inner<'a>(
        &self,
        content: &'a [u8],
        listener: &mut (impl Listener<'a> + ?Sized),
    ) -> Result<(), Error> {
        let mut r = ContentBuffer::new(content);

        let version = read_u8(&mut r)?;
        if version != 0 {
            Err(Error::UnsupportedVersion(version))?;
        }

        let mut reader = Reader {
            r,
            listener,
            depth: 0,
            max_depth: self.max_depth,
        };

        reader.read_document()
    }
}

/// A field directory or map entry, pointing at a value elsewhere.
struct Entry<'a> {
    name: &'a str,
    offset: i32,
    ty: OType,
}

/// Reading state for a single parse.
struct Reader<'a, 'l, L: ?Sized> {
    r: ContentBuffer<'a>,
    listener: &'l mut L,
    depth: usize,
    max_depth: usize,
}

impl<'a, L: Listener<'a> + ?Sized> Reader<'a, '_, L> {
    fn read_document(&mut self) -> Result<(), Error> {
        self.nested(|s| {
            let class = s.read_str()?;
            s.listener.start_document(class);

            while let Left(Entry { name, offset, ty }) = s.read_directory_entry()? {
                tracing::trace!(field = name, ?ty, offset, "directory entry");

                s.listener.start_field(name, ty);
                s.read_indirect(offset, ty)?;
                s.listener.end_field(name);
            }

            s.listener.end_document();
            Ok(())
        })
    }

    /// Read the next directory entry, or the terminator ending the directory.
    fn read_directory_entry(&mut self) -> Result<Either<Entry<'a>, ()>, Error> {
        let size = read_varint(&mut self.r)?;

        if size == 0 {
            return Ok(Right(()));
        }

        let size = usize::try_from(size).map_err(|_| Error::MalformedField(size))?;
        let name = self.read_str_of(size)?;

        let offset = read_flat32(&mut self.r)?;
        let ty = self.read_type()?;

        Ok(Left(Entry { name, offset, ty }))
    }

    /// Read a value stored at an offset, then return to the current position.
    fn read_indirect(&mut self, offset: i32, ty: OType) -> Result<(), Error> {
        let saved = self.r.position();

        self.r.force_cursor(offset.into())?;
        self.read_value(ty)?;
        self.r.force_cursor(saved as i64)?;

        Ok(())
    }

    fn read_value(&mut self, ty: OType) -> Result<(), Error> {
        match ty {
            OType::String => {
                let value = self.read_str()?;
                self.listener.string_value(value);
            }
            OType::Integer => {
                let value = read_varint(&mut self.r)?;
                self.listener.int_value(value as i32);
            }
            OType::Long => {
                let value = read_varint(&mut self.r)?;
                self.listener.long_value(value);
            }
            OType::Short => {
                let value = read_varint(&mut self.r)?;
                self.listener.short_value(value as i16);
            }
            OType::Byte => {
                let value = read_u8(&mut self.r)?;
                self.listener.byte_value(value as i8);
            }
            OType::Boolean => {
                let value = read_u8(&mut self.r)?;
                self.listener.boolean_value(value != 0);
            }
            OType::Date => {
                let days = read_varint(&mut self.r)?;
                self.listener.date_value(days.wrapping_mul(MILLIS_PER_DAY));
            }
            OType::DateTime => {
                let value = read_varint(&mut self.r)?;
                self.listener.date_time_value(value);
            }
            OType::Float => {
                let value = read_f32(&mut self.r)?;
                self.listener.float_value(value);
            }
            OType::Double => {
                let value = read_f64(&mut self.r)?;
                self.listener.double_value(value);
            }
            OType::Binary => {
                let size = self.read_len()?;
                let value = self.r.prepare(size)?;
                self.listener.binary_value(value);
            }
            OType::Link => {
                let value = self.read_link()?;
                self.listener.link_value(value);
            }
            OType::LinkList | OType::LinkSet => self.read_link_collection()?,
            OType::EmbeddedList | OType::EmbeddedSet => self.read_embedded_collection()?,
            OType::EmbeddedMap => self.read_embedded_map()?,
            OType::Embedded => self.read_document()?,
            OType::LinkMap
            | OType::Transient
            | OType::Custom
            | OType::Decimal
            | OType::LinkBag
            | OType::Any => Err(Error::UnsupportedType(ty.tag()))?,
        }

        Ok(())
    }

    fn read_link(&mut self) -> Result<Link, Error> {
        let cluster = read_varint(&mut self.r)?;
        let position = read_varint(&mut self.r)?;
        Ok(Link { cluster, position })
    }

    fn read_link_collection(&mut self) -> Result<(), Error> {
        self.nested(|s| {
            let size = s.read_len()?;
            s.listener.start_collection(size);

            for _ in 0..size {
                let value = s.read_link()?;
                s.listener.link_value(value);
            }

            s.listener.end_collection();
            Ok(())
        })
    }

    fn read_embedded_collection(&mut self) -> Result<(), Error> {
        self.nested(|s| {
            let size = s.read_len()?;
            s.listener.start_collection(size);

            // Only untyped collections, whose entries carry their own tags,
            // are written by this format revision.
            let tag = read_u8(&mut s.r)?;
            if tag != OType::Any.tag() {
                Err(Error::UnsupportedType(tag))?;
            }

            for _ in 0..size {
                match s.read_type()? {
                    OType::Any => Err(Error::UnsupportedNull)?,
                    ty => s.read_value(ty)?,
                }
            }

            s.listener.end_collection();
            Ok(())
        })
    }

    fn read_embedded_map(&mut self) -> Result<(), Error> {
        self.nested(|s| {
            let size = s.read_len()?;
            s.listener.start_map(size);

            for _ in 0..size {
                let Entry { name, offset, ty } = s.read_map_entry()?;

                s.listener.map_key(name);
                s.read_indirect(offset, ty)?;
            }

            s.listener.end_map();
            Ok(())
        })
    }

    fn read_map_entry(&mut self) -> Result<Entry<'a>, Error> {
        let key_type = read_u8(&mut self.r)?;
        if key_type != OType::String.tag() {
            Err(Error::UnsupportedType(key_type))?;
        }

        let name = self.read_str()?;
        let offset = read_flat32(&mut self.r)?;
        let ty = self.read_type()?;

        Ok(Entry { name, offset, ty })
    }

    fn read_type(&mut self) -> Result<OType, Error> {
        let tag = read_u8(&mut self.r)?;
        OType::from_tag(tag).ok_or(Error::UnsupportedType(tag))
    }

    /// Read a non-negative size or count.
    fn read_len(&mut self) -> Result<usize, Error> {
        let len = read_varint(&mut self.r)?;
        usize::try_from(len).map_err(|_| Error::InvalidLength(len))
    }

    /// Read length-prefixed text.
    fn read_str(&mut self) -> Result<&'a str, Error> {
        let size = self.read_len()?;
        self.read_str_of(size)
    }

    fn read_str_of(&mut self, size: usize) -> Result<&'a str, Error> {
        Ok(str::from_utf8(self.r.prepare(size)?)?)
    }

    /// Run a reader one nesting level deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Result<(), Error>) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            Err(Error::DepthExceeded(self.max_depth))?;
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        result
    }
}
