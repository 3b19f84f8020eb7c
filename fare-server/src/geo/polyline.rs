//! Encoded polyline format (5-decimal precision).
//!
//! Each point is stored as a pair of signed deltas from the previous point,
//! scaled by 1e5. Every delta is zig-zag encoded and split into 5-bit
//! chunks, least significant first; each chunk is offset by 63 and carries
//! a 0x20 continuation bit on all but the last chunk.

use crate::domain::Coordinate;

const PRECISION: f64 = 1e5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const PAYLOAD_MASK: u64 = 0x1f;

/// Largest shift accepted while reading one value. Real coordinate deltas
/// fit in well under 32 bits.
const MAX_SHIFT: u32 = 32;

/// Errors from decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended inside a value or between a latitude and its longitude.
    #[error("polyline ended unexpectedly at byte {position}")]
    UnexpectedEnd { position: usize },

    /// Byte outside the encoding alphabet ('?'..='~').
    #[error("invalid polyline character {byte:#04x} at byte {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    /// A single value used more chunks than any coordinate could need.
    #[error("polyline value too long at byte {position}")]
    Overflow { position: usize },

    /// Accumulated deltas produced an out-of-range coordinate.
    #[error("polyline point {index} is out of range")]
    InvalidPoint { index: usize },
}

/// Decode an encoded polyline into an ordered list of coordinates.
///
/// An empty string decodes to an empty list.
///
/// # Examples
///
/// ```
/// use fare_server::geo::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[0].lat(), 38.5);
/// assert_eq!(points[0].lng(), -120.2);
///
/// assert!(decode_polyline("_p~iF~ps|").is_err());
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while pos < bytes.len() {
        lat += read_value(bytes, &mut pos)?;
        if pos >= bytes.len() {
            return Err(DecodeError::UnexpectedEnd { position: pos });
        }
        lng += read_value(bytes, &mut pos)?;

        let point = Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION)
            .map_err(|_| DecodeError::InvalidPoint {
                index: points.len(),
            })?;
        points.push(point);
    }

    Ok(points)
}

/// Read one zig-zag encoded signed value starting at `pos`.
fn read_value(bytes: &[u8], pos: &mut usize) -> Result<i64, DecodeError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(DecodeError::UnexpectedEnd { position: *pos });
        };
        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(DecodeError::InvalidCharacter {
                position: *pos,
                byte,
            });
        }
        if shift >= MAX_SHIFT {
            return Err(DecodeError::Overflow { position: *pos });
        }

        let chunk = u64::from(byte - CHAR_OFFSET);
        result |= (chunk & PAYLOAD_MASK) << shift;
        shift += 5;
        *pos += 1;

        if chunk < CONTINUATION {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}

/// Encode coordinates as a polyline string.
///
/// Coordinates are rounded to 5 decimal places, so decoding the result
/// reproduces the input within 1e-5.
pub fn encode_polyline(points: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat() * PRECISION).round() as i64;
        let lng = (point.lng() * PRECISION).round() as i64;
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn write_value(out: &mut String, value: i64) {
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    while v >= CONTINUATION {
        out.push(char::from(((CONTINUATION | (v & PAYLOAD_MASK)) as u8) + CHAR_OFFSET));
        v >>= 5;
    }
    out.push(char::from(v as u8 + CHAR_OFFSET));
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
    }

    proptest! {
        /// Encoding then decoding reproduces the input within 1e-5.
        #[test]
        fn roundtrip_within_precision(points in prop::collection::vec(any_coordinate(), 0..20)) {
            let decoded = decode_polyline(&encode_polyline(&points)).unwrap();
            prop_assert_eq!(decoded.len(), points.len());
            for (a, b) in points.iter().zip(&decoded) {
                prop_assert!((a.lat() - b.lat()).abs() <= 1e-5);
                prop_assert!((a.lng() - b.lng()).abs() <= 1e-5);
            }
        }

        /// Any truncation of a valid polyline that cuts a point short fails.
        #[test]
        fn truncation_never_panics(points in prop::collection::vec(any_coordinate(), 1..5), cut in 0usize..64) {
            let encoded = encode_polyline(&points);
            let cut = cut.min(encoded.len());
            let _ = decode_polyline(&encoded[..cut]);
        }
    }
}
