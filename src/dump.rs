//! Format entries back into pigsty text.
//!
//! Anything [`load`](crate::load) produces dumps, and loading the dump yields an equal
//! [`Pigsty`]. Entries built through the mutation API are not validated when built, so
//! dumping checks them: a field the loader could never have produced is a [`DumpError`]
//! rather than text that fails to reload.

use crate::entry::{Entry, Field, Pigsty};
use crate::error::DumpError;
use crate::fields::{ValueKind, SIGNATURE_KEY};
use std::fmt::Write;

/// Render every entry as one `< ... >` block per line.
pub fn to_pigsty_text(pigsty: &Pigsty) -> Result<String, DumpError> {
    let mut out = String::new();
    for (n, entry) in pigsty.iter().enumerate() {
        out.push_str(&format_entry(n, entry)?);
        out.push('\n');
    }
    Ok(out)
}

/// Render entry number `n`. An entry with neither name nor fields has no block form.
fn format_entry(n: usize, entry: &Entry) -> Result<String, DumpError> {
    let mut parts = Vec::with_capacity(entry.fields.len() + 1);
    if let Some(name) = &entry.signature_name {
        parts.push(format!("{} = {}", SIGNATURE_KEY, quote(name.as_bytes())));
    }
    for field in &entry.fields {
        parts.push(format!("{} = {}", field.index, format_value(n, field)?));
    }
    if parts.is_empty() {
        return Err(DumpError::EmptyEntry { entry: n });
    }
    Ok(format!("< {} >", parts.join(", ")))
}

/// Value in the syntax its field kind is parsed with.
fn format_value(n: usize, field: &Field) -> Result<String, DumpError> {
    let kind = field.index.kind();
    if let Some(expected) = kind.byte_width() {
        if field.dsize() != expected {
            return Err(DumpError::BadSize {
                entry: n,
                field: field.index,
                dsize: field.dsize(),
                expected,
            });
        }
    }
    match kind {
        ValueKind::Integer { bits } => {
            let value = field.as_u32().unwrap_or_default();
            if bits < 32 && value >> bits != 0 {
                return Err(DumpError::TooWide {
                    entry: n,
                    field: field.index,
                    value,
                    bits,
                });
            }
            Ok(value.to_string())
        }
        ValueKind::Ipv4 => Ok(field.as_ipv4().map(|a| a.to_string()).unwrap_or_default()),
        ValueKind::String => Ok(quote(&field.data)),
    }
}

/// Quote bytes using the escapes the string decoder understands.
pub fn quote(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() + 2);
    s.push('"');
    for &b in bytes {
        match b {
            b'\n' => s.push_str("\\n"),
            b'\r' => s.push_str("\\r"),
            b'\t' => s.push_str("\\t"),
            b'\\' => s.push_str("\\\\"),
            b'"' => s.push_str("\\\""),
            0x20..=0x7e => s.push(b as char),
            _ => {
                let _ = write!(s, "\\x{:02x}", b);
            }
        }
    }
    s.push('"');
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::to_str;
    use crate::fields::FieldIndex;
    use crate::loader::load;

    #[test]
    fn quote_escapes() {
        assert_eq!(quote(b"abc"), "\"abc\"");
        assert_eq!(quote(b"a\n\r\t\\\"b"), r#""a\n\r\t\\\"b""#);
        assert_eq!(quote(&[0, 0xff]), r#""\x00\xff""#);
    }

    #[test]
    fn quote_decodes_back() {
        let raw: Vec<u8> = (0u8..=255).collect();
        assert_eq!(to_str(&quote(&raw)).expect("decode"), raw);
    }

    #[test]
    fn format_loaded_entry() {
        let p = load(br#"<signature="x", ip.version=0x4, ip.src=10.0.0.1, ip.payload="hi\x01">"#).expect("load");
        assert_eq!(
            to_pigsty_text(&p).expect("dump"),
            "< signature = \"x\", ip.version = 4, ip.src = 10.0.0.1, ip.payload = \"hi\\x01\" >\n"
        );
    }

    #[test]
    fn programmatic_entries_dump_and_reload() {
        let mut p = Pigsty::new();
        let e = p.append_entry("oink");
        e.append_field(FieldIndex::IpVersion, &[4]);
        e.append_field(FieldIndex::IpTlen, &[0x05, 0xdc]);
        e.append_field(FieldIndex::IpDst, &[10, 0, 0, 1]);
        e.append_field(FieldIndex::IpPayload, b"\x00oink\n");
        p.append_entry("roc!").append_field(FieldIndex::IpFlags, &[7]);
        let text = to_pigsty_text(&p).expect("dump");
        assert_eq!(load(text.as_bytes()).expect("reload"), p);
    }

    #[test]
    fn rejects_value_wider_than_field() {
        let mut p = Pigsty::new();
        p.append_entry("oink").append_field(FieldIndex::IpVersion, &[0x20]);
        assert_eq!(
            to_pigsty_text(&p),
            Err(DumpError::TooWide { entry: 0, field: FieldIndex::IpVersion, value: 0x20, bits: 4 })
        );
    }

    #[test]
    fn rejects_buffer_of_wrong_size() {
        let mut p = Pigsty::new();
        p.append_entry("ok").append_field(FieldIndex::IpTtl, &[64]);
        p.append_entry("oink").append_field(FieldIndex::IpVersion, b"abc");
        assert_eq!(
            to_pigsty_text(&p),
            Err(DumpError::BadSize { entry: 1, field: FieldIndex::IpVersion, dsize: 3, expected: 1 })
        );
        let mut q = Pigsty::new();
        q.append_entry("a").append_field(FieldIndex::IpSrc, &[127, 0, 1]);
        assert!(matches!(to_pigsty_text(&q), Err(DumpError::BadSize { expected: 4, .. })));
    }

    #[test]
    fn rejects_empty_entry() {
        let mut p = Pigsty::new();
        p.append_entry("a");
        p.push(Entry::default());
        assert_eq!(to_pigsty_text(&p), Err(DumpError::EmptyEntry { entry: 1 }));
    }
}
