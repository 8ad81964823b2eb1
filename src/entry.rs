//! In-memory model of a pigsty file: an ordered list of entries, each holding
//! an optional signature name and an ordered list of decoded fields.
//!
//! The whole tree has a single owner. Dropping a [`Pigsty`] (or calling
//! [`Pigsty::clear`]) releases every entry, field and buffer in it.

use crate::fields::{FieldIndex, ValueKind};
use byteorder::{BigEndian, ByteOrder};
use std::net::Ipv4Addr;

/// One decoded `key = value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub index: FieldIndex,
    pub data: Vec<u8>,
}

impl Field {
    pub fn new(index: FieldIndex, data: &[u8]) -> Self {
        Field {
            index,
            data: data.to_vec(),
        }
    }

    /// Byte length of `data`.
    pub fn dsize(&self) -> usize {
        self.data.len()
    }

    /// Read `data` as a big-endian unsigned integer of 1, 2 or 4 bytes.
    pub fn as_u32(&self) -> Option<u32> {
        match self.data.len() {
            1 => Some(u32::from(self.data[0])),
            2 => Some(u32::from(BigEndian::read_u16(&self.data))),
            4 => Some(BigEndian::read_u32(&self.data)),
            _ => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        if self.data.len() != 4 {
            return None;
        }
        Some(Ipv4Addr::from(BigEndian::read_u32(&self.data)))
    }

    /// Build an integer field stored in the width declared for `index`.
    /// Bits above that width are dropped. Returns `None` for string fields.
    pub fn from_u32(index: FieldIndex, value: u32) -> Option<Self> {
        let data = match index.kind() {
            ValueKind::Integer { .. } => encode_u32(value, index.kind().byte_width()?),
            ValueKind::Ipv4 => encode_u32(value, 4),
            ValueKind::String => return None,
        };
        Some(Field { index, data })
    }
}

/// Big-endian encoding of `value` in `width` bytes (1, 2 or 4).
pub(crate) fn encode_u32(value: u32, width: usize) -> Vec<u8> {
    let mut buf = vec![0u8; width];
    match width {
        1 => buf[0] = value as u8,
        2 => BigEndian::write_u16(&mut buf, value as u16),
        _ => BigEndian::write_u32(&mut buf, value),
    }
    buf
}

/// One bracketed block of a pigsty file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub signature_name: Option<String>,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(signature_name: Option<&str>) -> Self {
        Entry {
            signature_name: signature_name.map(str::to_string),
            fields: Vec::new(),
        }
    }

    /// Append a field holding a copy of `data`. No validation is done against the field table.
    pub fn append_field(&mut self, index: FieldIndex, data: &[u8]) -> &mut Field {
        self.fields.push(Field::new(index, data));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// First field with the given identifier.
    pub fn field(&self, index: FieldIndex) -> Option<&Field> {
        self.fields.iter().find(|f| f.index == index)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Entries of one pigsty file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pigsty {
    entries: Vec<Entry>,
}

impl Pigsty {
    pub fn new() -> Self {
        Pigsty::default()
    }

    /// Append a new, field-less entry named `name` at the tail.
    pub fn append_entry(&mut self, name: &str) -> &mut Entry {
        self.push(Entry::new(Some(name)))
    }

    pub(crate) fn push(&mut self, entry: Entry) -> &mut Entry {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// First entry whose signature name equals `name`.
    pub fn find_by_signature(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.signature_name.as_deref() == Some(name))
    }

    pub fn find_by_signature_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.signature_name.as_deref() == Some(name))
    }

    /// Release every entry in place.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl IntoIterator for Pigsty {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pigsty {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
