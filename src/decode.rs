//! Scalar decoders for pigsty values: integers, quoted strings and dotted-quad addresses.
//!
//! Each decoder is strict: any byte it does not understand rejects the whole token.
//! They are pure and have no knowledge of which field the value belongs to; range
//! checks against a field's bit width happen in [`decode_integer_field`].

use crate::error::DecodeError;

/// Decode a decimal or `0x`-prefixed hexadecimal integer.
///
/// ```
/// assert_eq!(pigsty::decode::to_int("0xe0"), Ok(224));
/// assert!(pigsty::decode::to_int("4x0").is_err());
/// ```
pub fn to_int(token: &str) -> Result<u32, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }
    let invalid = || DecodeError::InvalidInteger(token.to_string());
    let (digits, radix) = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (token, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    u32::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Like [`to_int`], but an absent or empty token decodes to zero.
pub fn to_int_or_zero(token: Option<&str>) -> Result<u32, DecodeError> {
    match token {
        None | Some("") => Ok(0),
        Some(t) => to_int(t),
    }
}

/// Decode a `"`-delimited literal into its raw bytes, resolving
/// `\n`, `\r`, `\t`, `\\`, `\"` and `\xHH`. Anything else is copied verbatim.
pub fn to_str(token: &str) -> Result<Vec<u8>, DecodeError> {
    let raw = token.as_bytes();
    if raw.len() < 2 || raw[0] != b'"' || raw[raw.len() - 1] != b'"' {
        return Err(DecodeError::InvalidString(token.to_string()));
    }
    let body = &raw[1..raw.len() - 1];
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        if b != b'\\' || i + 1 >= body.len() {
            out.push(b);
            i += 1;
            continue;
        }
        match body[i + 1] {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'\\' => out.push(b'\\'),
            b'"' => out.push(b'"'),
            b'x' => match hex_byte(&body[i + 2..]) {
                Some(v) => {
                    out.push(v);
                    i += 4;
                    continue;
                }
                None => {
                    out.push(b'\\');
                    i += 1;
                    continue;
                }
            },
            _ => {
                out.push(b'\\');
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    Ok(out)
}

fn hex_byte(s: &[u8]) -> Option<u8> {
    if s.len() < 2 {
        return None;
    }
    let hi = (s[0] as char).to_digit(16)?;
    let lo = (s[1] as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Decode `A.B.C.D` into a 32-bit address, `A` in the most significant byte.
pub fn to_ipv4(token: &str) -> Result<u32, DecodeError> {
    let invalid = || DecodeError::InvalidAddress(token.to_string());
    let mut addr = 0u32;
    let mut count = 0;
    for octet in token.split('.') {
        count += 1;
        if count > 4 || octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let v: u8 = octet.parse().map_err(|_| invalid())?;
        addr = (addr << 8) | u32::from(v);
    }
    if count != 4 {
        return Err(invalid());
    }
    Ok(addr)
}

/// Decode an integer and check it fits in `bits` bits.
pub fn decode_integer_field(token: &str, bits: u8) -> Result<u32, DecodeError> {
    let v = to_int(token)?;
    if bits < 32 && v >> bits != 0 {
        return Err(DecodeError::OutOfRange {
            token: token.to_string(),
            bits,
        });
    }
    Ok(v)
}
