//! Literals written by the text based pickle protocols 0 and 1

// standard library
use std::num::IntErrorKind;

/// Why a literal could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralError {
    /// Malformed text
    Invalid,
    /// Integer outside of the 64 bit range
    TooLarge,
}

type LiteralResult<T> = Result<T, LiteralError>;

/// Decimal integer of `INT`, `PUT` and `GET`
pub(crate) fn decimal(text: &str) -> LiteralResult<i64> {
    text.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => LiteralError::TooLarge,
        _ => LiteralError::Invalid,
    })
}

/// Decimal integer of `LONG`, with its `L` suffix
pub(crate) fn long(text: &str) -> LiteralResult<i64> {
    let text = text.trim();
    decimal(text.strip_suffix('L').unwrap_or(text))
}

/// `repr()` of a float, including `inf` and `nan`
pub(crate) fn float(text: &str) -> LiteralResult<f64> {
    text.trim().parse().map_err(|_| LiteralError::Invalid)
}

/// Quoted and escaped python 2 string of `STRING`
pub(crate) fn quoted_string(line: &[u8]) -> LiteralResult<Vec<u8>> {
    match line {
        [open, body @ .., close] if open == close && matches!(open, b'\'' | b'"') => {
            escape_decode(body)
        }
        _ => Err(LiteralError::Invalid),
    }
}

/// Text of `UNICODE`, latin-1 bytes plus `\uXXXX` and `\UXXXXXXXX` escapes
pub(crate) fn raw_unicode_escape(line: &[u8]) -> LiteralResult<String> {
    let mut text = String::with_capacity(line.len());
    let mut i = 0;

    while i < line.len() {
        let width = match (line[i], line.get(i + 1)) {
            (b'\\', Some(b'u')) => 4,
            (b'\\', Some(b'U')) => 8,
            _ => 0,
        };

        if width == 0 {
            text.push(line[i] as char);
            i += 1;
            continue;
        }

        let digits = line.get(i + 2..i + 2 + width).ok_or(LiteralError::Invalid)?;
        let c = char::from_u32(hex(digits)?).ok_or(LiteralError::Invalid)?;
        text.push(c);
        i += 2 + width;
    }

    Ok(text)
}

/// Backslash escapes of a python 2 string body
fn escape_decode(body: &[u8]) -> LiteralResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut i = 0;

    while i < body.len() {
        let b = body[i];
        i += 1;
        if b != b'\\' {
            bytes.push(b);
            continue;
        }

        let escape = *body.get(i).ok_or(LiteralError::Invalid)?;
        i += 1;
        match escape {
            b'\n' => (),
            b'\\' | b'\'' | b'"' => bytes.push(escape),
            b'a' => bytes.push(0x07),
            b'b' => bytes.push(0x08),
            b'f' => bytes.push(0x0c),
            b'n' => bytes.push(b'\n'),
            b'r' => bytes.push(b'\r'),
            b't' => bytes.push(b'\t'),
            b'v' => bytes.push(0x0b),
            b'x' => {
                let digits = body.get(i..i + 2).ok_or(LiteralError::Invalid)?;
                bytes.push(hex(digits)? as u8);
                i += 2;
            }
            b'0'..=b'7' => {
                // up to three octal digits, wrapping above \377
                let mut value = u32::from(escape - b'0');
                for _ in 0..2 {
                    match body.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            other => bytes.extend([b'\\', other]),
        }
    }

    Ok(bytes)
}

fn hex(digits: &[u8]) -> LiteralResult<u32> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(LiteralError::Invalid);
    }
    let text = std::str::from_utf8(digits).map_err(|_| LiteralError::Invalid)?;
    u32::from_str_radix(text, 16).map_err(|_| LiteralError::Invalid)
}
