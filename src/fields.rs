//! Field table: maps dotted pigsty keys to field identifiers and the decoder for their value.

use std::fmt;

/// Protocol-header field an entry can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldIndex {
    IpVersion,
    IpIhl,
    IpTos,
    IpTlen,
    IpId,
    IpFlags,
    IpOffset,
    IpTtl,
    IpProtocol,
    IpChecksum,
    IpSrc,
    IpDst,
    IpPayload,
}

/// Which decoder a value goes through, and how it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Unsigned integer of `bits` width, stored big-endian in [`ValueKind::byte_width`] bytes.
    Integer { bits: u8 },
    /// Quoted string, stored as its decoded bytes.
    String,
    /// Dotted-quad address, stored as 4 big-endian bytes.
    Ipv4,
}

impl ValueKind {
    /// Stored size in bytes; `None` for variable-length strings.
    pub fn byte_width(self) -> Option<usize> {
        match self {
            ValueKind::Integer { bits } if bits <= 8 => Some(1),
            ValueKind::Integer { bits } if bits <= 16 => Some(2),
            ValueKind::Integer { .. } | ValueKind::Ipv4 => Some(4),
            ValueKind::String => None,
        }
    }
}

/// What a key does when it appears in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// The reserved `signature` key: names the entry.
    Signature,
    Field { index: FieldIndex, kind: ValueKind },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub target: FieldTarget,
}

const fn field(index: FieldIndex) -> FieldDef {
    FieldDef {
        key: index.key(),
        target: FieldTarget::Field {
            index,
            kind: index.kind(),
        },
    }
}

const fn int(bits: u8) -> ValueKind {
    ValueKind::Integer { bits }
}

pub const SIGNATURE_KEY: &str = "signature";

static FIELD_TABLE: &[FieldDef] = &[
    FieldDef {
        key: SIGNATURE_KEY,
        target: FieldTarget::Signature,
    },
    field(FieldIndex::IpVersion),
    field(FieldIndex::IpIhl),
    field(FieldIndex::IpTos),
    field(FieldIndex::IpTlen),
    field(FieldIndex::IpId),
    field(FieldIndex::IpFlags),
    field(FieldIndex::IpOffset),
    field(FieldIndex::IpTtl),
    field(FieldIndex::IpProtocol),
    field(FieldIndex::IpChecksum),
    field(FieldIndex::IpSrc),
    field(FieldIndex::IpDst),
    field(FieldIndex::IpPayload),
];

/// Look up a key (case-sensitive).
pub fn lookup(key: &str) -> Option<&'static FieldDef> {
    FIELD_TABLE.iter().find(|d| d.key == key)
}

/// All known keys, `signature` first.
pub fn table() -> &'static [FieldDef] {
    FIELD_TABLE
}

impl FieldIndex {
    pub const ALL: [FieldIndex; 13] = [
        FieldIndex::IpVersion,
        FieldIndex::IpIhl,
        FieldIndex::IpTos,
        FieldIndex::IpTlen,
        FieldIndex::IpId,
        FieldIndex::IpFlags,
        FieldIndex::IpOffset,
        FieldIndex::IpTtl,
        FieldIndex::IpProtocol,
        FieldIndex::IpChecksum,
        FieldIndex::IpSrc,
        FieldIndex::IpDst,
        FieldIndex::IpPayload,
    ];

    /// The dotted key this field is written as.
    pub const fn key(self) -> &'static str {
        match self {
            FieldIndex::IpVersion => "ip.version",
            FieldIndex::IpIhl => "ip.ihl",
            FieldIndex::IpTos => "ip.tos",
            FieldIndex::IpTlen => "ip.tlen",
            FieldIndex::IpId => "ip.id",
            FieldIndex::IpFlags => "ip.flags",
            FieldIndex::IpOffset => "ip.offset",
            FieldIndex::IpTtl => "ip.ttl",
            FieldIndex::IpProtocol => "ip.protocol",
            FieldIndex::IpChecksum => "ip.checksum",
            FieldIndex::IpSrc => "ip.src",
            FieldIndex::IpDst => "ip.dst",
            FieldIndex::IpPayload => "ip.payload",
        }
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            FieldIndex::IpVersion | FieldIndex::IpIhl => int(4),
            FieldIndex::IpFlags => int(3),
            FieldIndex::IpOffset => int(13),
            FieldIndex::IpTos | FieldIndex::IpTtl | FieldIndex::IpProtocol => int(8),
            FieldIndex::IpTlen | FieldIndex::IpId | FieldIndex::IpChecksum => int(16),
            FieldIndex::IpSrc | FieldIndex::IpDst => ValueKind::Ipv4,
            FieldIndex::IpPayload => ValueKind::String,
        }
    }
}

impl fmt::Display for FieldIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
