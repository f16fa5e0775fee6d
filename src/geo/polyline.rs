//! # Polyline Codec
//!
//! Encoded polylines pack a coordinate sequence into printable ASCII.
//! Each coordinate is scaled to an integer (`10^precision`), stored as the
//! delta from the previous one, zig-zag signed (low bit = sign), and split
//! into 5-bit chunks little end first. Every chunk except the last carries the
//! `0x20` continuation bit, and `63` is added so the output lands in `'?'..='~'`.
//!
//! ```text
//! "_p~iF~ps|U"  →  [3850000, -12020000]  →  (38.5, -120.2)
//! ```
//!
//! Decoding is a pure function; a truncated or out-of-alphabet input is a
//! typed [`DecodeError`], never a panic.

use std::fmt;

/// Precision used by the directions provider's `overview_polyline`.
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;
const MAX_CHAR: u8 = b'~';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The character stream is not a valid encoding. `offset` is the byte
    /// index where decoding stopped.
    MalformedEncoding { offset: usize, reason: &'static str },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedEncoding { offset, reason } => {
                write!(f, "malformed polyline at byte {offset}: {reason}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decodes a precision-5 polyline into `(latitude, longitude)` pairs.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, DecodeError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decodes a polyline whose coordinates were scaled by `10^precision`.
pub fn decode_with_precision(
    encoded: &str,
    precision: u32,
) -> Result<Vec<(f64, f64)>, DecodeError> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        latitude = accumulate(latitude, next_value(bytes, &mut index)?, index)?;
        if index >= bytes.len() {
            return Err(DecodeError::MalformedEncoding {
                offset: index,
                reason: "latitude without longitude",
            });
        }
        longitude = accumulate(longitude, next_value(bytes, &mut index)?, index)?;
        points.push((latitude as f64 / factor, longitude as f64 / factor));
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64, offset: usize) -> Result<i64, DecodeError> {
    total
        .checked_add(delta)
        .ok_or(DecodeError::MalformedEncoding {
            offset,
            reason: "coordinate overflow",
        })
}

/// Reads one zig-zag encoded integer starting at `*index`, advancing it.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::MalformedEncoding {
                offset: *index,
                reason: "input ends inside a value",
            });
        };
        if !(ASCII_OFFSET..=MAX_CHAR).contains(&byte) {
            return Err(DecodeError::MalformedEncoding {
                offset: *index,
                reason: "character outside the polyline alphabet",
            });
        }
        // Twelve chunks fill 60 bits; anything longer is not a coordinate.
        if shift >= 60 {
            return Err(DecodeError::MalformedEncoding {
                offset: *index,
                reason: "value too long",
            });
        }

        let chunk = i64::from(byte - ASCII_OFFSET);
        *index += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;

        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encodes `(latitude, longitude)` pairs at the given precision.
///
/// Non-finite inputs do not panic but produce meaningless output; pass
/// coordinates that came through `Position`.
pub fn encode(points: &[(f64, f64)], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut out = String::new();
    let mut previous = (0i64, 0i64);

    for &(latitude, longitude) in points {
        let current = (
            (latitude * factor).round() as i64,
            (longitude * factor).round() as i64,
        );
        push_value(current.0.wrapping_sub(previous.0), &mut out);
        push_value(current.1.wrapping_sub(previous.1), &mut out);
        previous = current;
    }

    out
}

fn push_value(value: i64, out: &mut String) {
    // Zig-zag into an unsigned value so the chunk loop never sees a sign bit.
    let mut remaining = ((value << 1) ^ (value >> 63)) as u64;
    while remaining >= CONTINUATION as u64 {
        let chunk = (CONTINUATION as u64 | (remaining & CHUNK_MASK as u64)) as u8;
        out.push(char::from(chunk + ASCII_OFFSET));
        remaining >>= CHUNK_BITS;
    }
    out.push(char::from(remaining as u8 + ASCII_OFFSET));
}
