//! Load a pigsty file into a [`Pigsty`].
//!
//! Loading is all-or-nothing. Entries are accumulated into a local [`Pigsty`] that is
//! only returned once the whole source has been scanned and every value decoded; on
//! the first error the partial result is dropped and the error is returned.

use crate::decode::{decode_integer_field, to_ipv4, to_str};
use crate::entry::{encode_u32, Entry, Field, Pigsty};
use crate::error::{DecodeError, LoadError};
use crate::fields::{lookup, FieldIndex, FieldTarget, ValueKind};
use crate::parser::{scan, Item, RawBlock, RawPair};
use log::{debug, trace};
use std::io::Read;
use std::path::Path;

/// Knobs for [`load_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip non-whitespace text between blocks. When `false` such text is a malformed block.
    pub allow_stray_text: bool,
    /// Reject sources longer than this many bytes before scanning.
    pub max_source_len: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            allow_stray_text: true,
            max_source_len: None,
        }
    }
}

/// Load pigsty source with default options.
pub fn load(source: &[u8]) -> Result<Pigsty, LoadError> {
    load_with(source, &LoadOptions::default())
}

pub fn load_with(source: &[u8], options: &LoadOptions) -> Result<Pigsty, LoadError> {
    let result = load_inner(source, options);
    match &result {
        Ok(pigsty) => debug!("pigsty: loaded {} entries", pigsty.len()),
        Err(e) => debug!("pigsty: load failed: {}", e),
    }
    result
}

pub fn load_from_reader<R: Read>(mut reader: R) -> Result<Pigsty, LoadError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    load(&buf)
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Pigsty, LoadError> {
    let path = path.as_ref();
    debug!("pigsty: reading {}", path.display());
    let buf = std::fs::read(path)?;
    load(&buf)
}

fn load_inner(source: &[u8], options: &LoadOptions) -> Result<Pigsty, LoadError> {
    if let Some(max) = options.max_source_len {
        if source.len() > max {
            return Err(LoadError::TooLarge {
                len: source.len(),
                max,
            });
        }
    }
    let text = std::str::from_utf8(source).map_err(|e| LoadError::Encoding {
        offset: e.valid_up_to(),
    })?;

    let mut pigsty = Pigsty::new();
    for item in scan(text)? {
        match item {
            Item::Block(block) => {
                pigsty.push(build_entry(&block)?);
            }
            Item::Stray(location) if !options.allow_stray_text => {
                return Err(LoadError::MalformedBlock {
                    location,
                    message: "text outside of a block".to_string(),
                });
            }
            Item::Stray(_) => {}
        }
    }
    Ok(pigsty)
}

fn build_entry(block: &RawBlock<'_>) -> Result<Entry, LoadError> {
    trace!("pigsty: block at {} with {} pairs", block.location, block.pairs.len());
    let mut entry = Entry::default();
    for pair in &block.pairs {
        let def = lookup(pair.key).ok_or_else(|| LoadError::UnknownField {
            location: pair.key_location,
            key: pair.key.to_string(),
        })?;
        match def.target {
            FieldTarget::Signature => {
                if entry.signature_name.is_some() {
                    return Err(LoadError::DuplicateSignature {
                        location: pair.key_location,
                    });
                }
                entry.signature_name = Some(decode_signature(pair)?);
            }
            FieldTarget::Field { index, kind } => {
                let field = decode_field(pair, index, kind)?;
                trace!("pigsty:   {} = {:?}", index, field.data);
                entry.fields.push(field);
            }
        }
    }
    Ok(entry)
}

fn decode_signature(pair: &RawPair<'_>) -> Result<String, LoadError> {
    let bytes = to_str(pair.value).map_err(|e| invalid(pair, e))?;
    String::from_utf8(bytes).map_err(|_| invalid(pair, DecodeError::InvalidString(pair.value.to_string())))
}

fn decode_field(pair: &RawPair<'_>, index: FieldIndex, kind: ValueKind) -> Result<Field, LoadError> {
    let data = match kind {
        ValueKind::Integer { bits } => {
            let v = decode_integer_field(pair.value, bits).map_err(|e| invalid(pair, e))?;
            encode_u32(v, kind.byte_width().unwrap_or(4))
        }
        ValueKind::Ipv4 => encode_u32(to_ipv4(pair.value).map_err(|e| invalid(pair, e))?, 4),
        ValueKind::String => to_str(pair.value).map_err(|e| invalid(pair, e))?,
    };
    Ok(Field { index, data })
}

fn invalid(pair: &RawPair<'_>, source: DecodeError) -> LoadError {
    LoadError::InvalidValue {
        location: pair.value_location,
        key: pair.key.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn load_valid_entry() {
        let p = load(br#"< signature = "valid signature", ip.version = 4, ip.tos = 5, ip.src = 127.0.0.1 >"#)
            .expect("load");
        assert_eq!(p.len(), 1);
        let e = &p.entries()[0];
        assert_eq!(e.signature_name.as_deref(), Some("valid signature"));
        let idx: Vec<_> = e.fields.iter().map(|f| f.index).collect();
        assert_eq!(idx, [FieldIndex::IpVersion, FieldIndex::IpTos, FieldIndex::IpSrc]);
        assert_eq!(e.fields[0].data, vec![4]);
        assert_eq!(e.fields[1].data, vec![5]);
        assert_eq!(e.fields[2].data, vec![127, 0, 0, 1]);
    }

    #[test]
    fn field_sizes_follow_table() {
        let p = load(b"<ip.tlen = 0x0014, ip.offset = 8191, ip.payload = \"ab\\x00\">").expect("load");
        let f = p.entries()[0].fields();
        assert_eq!(f[0].dsize(), 2);
        assert_eq!(f[0].as_u32(), Some(20));
        assert_eq!(f[1].dsize(), 2);
        assert_eq!(f[2].data, b"ab\0");
    }

    #[test]
    fn rejects_out_of_range_integer() {
        let e = load(b"<ip.version = 16>").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidInteger);
        assert!(matches!(
            e,
            LoadError::InvalidValue { source: DecodeError::OutOfRange { bits: 4, .. }, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_signature() {
        let e = load(br#"<signature = "a", signature = "b">"#).unwrap_err();
        assert!(matches!(e, LoadError::DuplicateSignature { .. }));
    }

    #[test]
    fn rejects_non_utf8_signature() {
        let e = load(br#"<signature = "\xff">"#).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidString);
    }

    #[test]
    fn strict_mode_rejects_stray_text() {
        let src = b"junk <ip.tos = 1>";
        assert_eq!(load(src).expect("lenient").len(), 1);
        let strict = LoadOptions {
            allow_stray_text: false,
            ..LoadOptions::default()
        };
        let e = load_with(src, &strict).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MalformedBlock);
        assert_eq!(e.location().map(|l| (l.line, l.column)), Some((1, 1)));
        assert_eq!(load_with(b" <ip.tos = 1>\n", &strict).expect("strict").len(), 1);
    }

    #[test]
    fn size_limit() {
        let opts = LoadOptions {
            max_source_len: Some(4),
            ..LoadOptions::default()
        };
        assert!(matches!(
            load_with(b"<ip.tos = 1>", &opts),
            Err(LoadError::TooLarge { len: 12, max: 4 })
        ));
    }

    #[test]
    fn rejects_invalid_utf8_source() {
        assert!(matches!(
            load(b"<ip.tos = 1>\xff"),
            Err(LoadError::Encoding { offset: 12 })
        ));
    }
}
