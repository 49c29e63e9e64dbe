//! Record parsing: one line in, a `(key, value)` pair or a [`ParseError`] out.

use memchr::{memchr, memchr_iter};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: f64,
}

/// Split a line into key and value. The line may still carry its `\n` (or `\r\n`).
pub fn parse_record(line: &[u8], delimiter: u8) -> Result<Record<'_>, ParseError> {
    let line = strip_line_ending(line);
    let split_pos = memchr(delimiter, line).ok_or(ParseError::MissingDelimiter {
        delimiter: delimiter as char,
    })?;
    let (key, measurement_slice) = line.split_at(split_pos);
    let measurement_slice = &measurement_slice[1..]; //skip delimiter
    if memchr(delimiter, measurement_slice).is_some() {
        return Err(ParseError::FieldCount {
            found: memchr_iter(delimiter, line).count() + 1,
        });
    }
    Ok(Record {
        key,
        value: parse_measurement(measurement_slice)?,
    })
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parse a measurement field. Values in the usual `-?d?d.d` shape take the
/// fixed-point path; everything else goes through the general float parser.
pub fn parse_measurement(text: &[u8]) -> Result<f64, ParseError> {
    let text = text.trim_ascii();
    if let Some(value) = parse_fixed_point(text) {
        return Ok(value);
    }
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            text: String::from_utf8_lossy(text).into_owned(),
        })
}

fn parse_fixed_point(text: &[u8]) -> Option<f64> {
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let tenths = match *digits {
        // 1 digit number
        [d0, b'.', d1] if d0.is_ascii_digit() && d1.is_ascii_digit() => {
            (d0 - b'0') as i32 * 10 + (d1 - b'0') as i32
        }
        // 2 digit number
        [d0, d1, b'.', d2]
            if d0.is_ascii_digit() && d1.is_ascii_digit() && d2.is_ascii_digit() =>
        {
            (d0 - b'0') as i32 * 100 + (d1 - b'0') as i32 * 10 + (d2 - b'0') as i32
        }
        _ => return None,
    };
    // divide before negating so "-0.0" keeps its sign, same as str::parse
    let value = tenths as f64 / 10.0;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_value() {
        let record = parse_record(b"Hamburg;12.0\n", b';').unwrap();
        assert_eq!(record.key, b"Hamburg");
        assert_eq!(record.value, 12.0);
    }

    #[test]
    fn tolerates_crlf_and_missing_newline() {
        assert_eq!(parse_record(b"A;-3.5\r\n", b';').unwrap().value, -3.5);
        assert_eq!(parse_record(b"A;7", b';').unwrap().value, 7.0);
    }

    #[test]
    fn fixed_point_agrees_with_float_parse() {
        for text in ["0.0", "-0.0", "9.9", "-9.9", "12.3", "-99.9", "45.6", "-10.0"] {
            let fast = parse_measurement(text.as_bytes()).unwrap();
            let slow: f64 = text.parse().unwrap();
            assert_eq!(fast.to_bits(), slow.to_bits(), "{text}");
        }
    }

    #[test]
    fn general_values_fall_back() {
        assert_eq!(parse_measurement(b"123.456").unwrap(), 123.456);
        assert_eq!(parse_measurement(b"1e3").unwrap(), 1000.0);
        assert_eq!(parse_measurement(b" 4.25 ").unwrap(), 4.25);
    }

    #[test]
    fn missing_delimiter_is_an_error() {
        assert_eq!(
            parse_record(b"Hamburg 12.0\n", b';'),
            Err(ParseError::MissingDelimiter { delimiter: ';' })
        );
        assert!(parse_record(b"\n", b';').is_err());
    }

    #[test]
    fn extra_fields_are_an_error() {
        assert_eq!(
            parse_record(b"A;1.0;2.0\n", b';'),
            Err(ParseError::FieldCount { found: 3 })
        );
    }

    #[test]
    fn non_numeric_values_are_errors() {
        for text in ["abc", "", "nan", "inf", "1.2.3", "--1.0"] {
            assert!(
                matches!(
                    parse_measurement(text.as_bytes()),
                    Err(ParseError::InvalidValue { .. })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn honours_custom_delimiter() {
        let record = parse_record(b"a;b,1.5\n", b',').unwrap();
        assert_eq!(record.key, b"a;b");
        assert_eq!(record.value, 1.5);
    }
}
