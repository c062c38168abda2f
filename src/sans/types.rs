//! Type tags and record links.

use zerocopy::{Immutable, KnownLayout, TryFromBytes};

/// The type of a stored value, as tagged by a single byte on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes, KnownLayout, Immutable)]
pub enum OType {
    Boolean = 0,
    Integer = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    /// Milliseconds since the epoch.
    DateTime = 6,
    String = 7,
    Binary = 8,
    Embedded = 9,
    EmbeddedList = 10,
    EmbeddedSet = 11,
    EmbeddedMap = 12,
    Link = 13,
    LinkList = 14,
    LinkSet = 15,
    LinkMap = 16,
    Byte = 17,
    Transient = 18,
    /// Days since the epoch.
    Date = 19,
    Custom = 20,
    Decimal = 21,
    LinkBag = 22,
    /// Marks a collection whose entries carry their own type tags.
    Any = 23,
}

impl OType {
    /// Interpret a tag byte, if it names a known type.
    pub fn from_tag(tag: u8) -> Option<Self> {
        zerocopy::try_transmute!(tag).ok()
    }

    /// The tag byte for this type.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A reference to another record.
///
/// Links are surfaced as data; they are never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Link {
    pub cluster: i64,
    pub position: i64,
}
