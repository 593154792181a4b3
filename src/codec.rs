//! ASCII-hex encoding and checksums for computer-link frames.
//!
//! Every field of a frame between the STX and ETX markers travels as
//! uppercase hexadecimal ASCII: one data byte becomes two characters.
//! Frames end with a two-character checksum, the 8-bit wrapping sum of the
//! bytes it covers.
//!
//! # Example
//!
//! ```
//! use fx_link::{checksum, decode_hex, encode_hex};
//!
//! let mut text = Vec::new();
//! encode_hex(&[0x12, 0xAB], &mut text);
//! assert_eq!(text, b"12AB");
//! assert_eq!(decode_hex(&text).unwrap(), vec![0x12, 0xAB]);
//!
//! // '0' + '1' + '2' + ETX = 0x30 + 0x31 + 0x32 + 0x03 = 0x96
//! assert_eq!(&checksum(b"012\x03"), b"96");
//! ```

use crate::error::{FxError, Result};

/// Start of text, first byte of every request and read response.
pub const STX: u8 = 0x02;
/// End of text, precedes the checksum.
pub const ETX: u8 = 0x03;
/// Positive acknowledgement of a write or force command.
pub const ACK: u8 = 0x06;
/// Negative acknowledgement of a write or force command.
pub const NAK: u8 = 0x15;

/// Appends the uppercase ASCII-hex form of `bytes` to `out`.
pub fn encode_hex(bytes: &[u8], out: &mut Vec<u8>) {
    let start = out.len();
    out.resize(start + 2 * bytes.len(), 0);
    upper_hex_into(bytes, &mut out[start..]);
}

/// Writes `bytes` as uppercase hex into `text`, which must be twice as long.
fn upper_hex_into(bytes: &[u8], text: &mut [u8]) {
    // Only a length mismatch makes encode_to_slice fail.
    if hex::encode_to_slice(bytes, &mut *text).is_ok() {
        text.make_ascii_uppercase();
    }
}

/// Parses ASCII-hex text back into bytes.
///
/// # Errors
///
/// Returns [`FxError::MalformedResponse`] if the text has an odd length or
/// contains a character that is not a hex digit.
pub fn decode_hex(text: &[u8]) -> Result<Vec<u8>> {
    hex::decode(text)
        .map_err(|e| FxError::malformed_response(format!("invalid hex payload: {}", e)))
}

/// Returns the 8-bit wrapping sum of `span`.
#[inline]
pub fn sum(span: &[u8]) -> u8 {
    span.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Returns the two ASCII-hex checksum digits of `span`.
///
/// Outbound frames checksum everything after STX up to and including ETX.
/// Read responses are checked over the same span: after STX up to, but not
/// including, the checksum digits.
pub fn checksum(span: &[u8]) -> [u8; 2] {
    let mut digits = [0u8; 2];
    upper_hex_into(&[sum(span)], &mut digits);
    digits
}

/// Appends one byte as two hex digits.
pub(crate) fn push_hex_u8(out: &mut Vec<u8>, value: u8) {
    encode_hex(&[value], out);
}

/// Appends a 16-bit value as four hex digits, most significant first.
pub(crate) fn push_hex_u16(out: &mut Vec<u8>, value: u16) {
    encode_hex(&value.to_be_bytes(), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uppercase() {
        let mut out = Vec::new();
        encode_hex(&[0x00, 0x0F, 0xA5, 0xFF], &mut out);
        assert_eq!(out, b"000FA5FF");
    }

    #[test]
    fn test_encode_appends() {
        let mut out = vec![STX, b'0'];
        push_hex_u16(&mut out, 0x1028);
        push_hex_u8(&mut out, 0x04);
        assert_eq!(out[0], STX);
        assert_eq!(&out[1..], b"0102804");
    }

    #[test]
    fn test_encode_leaves_prefix_untouched() {
        let mut out = b"x".to_vec();
        push_hex_u16(&mut out, 0xF409);
        push_hex_u8(&mut out, 0xab);
        encode_hex(&[], &mut out);
        assert_eq!(out, b"xF409AB");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_hex(b"E803D007").unwrap(), vec![0xE8, 0x03, 0xD0, 0x07]);
        assert_eq!(decode_hex(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_hex(b"0G").unwrap_err(),
            FxError::MalformedResponse { .. }
        ));
        assert!(decode_hex(b"123").is_err());
        assert!(decode_hex(&[STX, ETX]).is_err());
    }

    #[test]
    fn test_sum_wraps() {
        assert_eq!(sum(&[]), 0);
        assert_eq!(sum(&[0xFF, 0x02]), 0x01);
        assert_eq!(sum(&[0x80; 4]), 0x00);
    }

    #[test]
    fn test_checksum_read_request() {
        // STX '0' "1028" "04" ETX -> checksum over "0102804" + ETX
        let body = b"0102804\x03";
        let expected = body.iter().map(|&b| b as u32).sum::<u32>() % 256;
        assert_eq!(checksum(body), format!("{:02X}", expected).as_bytes());
        assert_eq!(&checksum(body), b"62");
    }

    #[test]
    fn test_checksum_letter_digits() {
        assert_eq!(&checksum(b"E803D007\x03"), b"BE");
        assert_eq!(&checksum(b"1102804E803D007\x03"), b"1E");
        assert_eq!(&checksum(b"7F409\x03"), b"1D");
    }

    #[test]
    fn test_checksum_is_stable() {
        let body = b"10100044E803D007\x03";
        assert_eq!(checksum(body), checksum(body));
    }

    #[test]
    fn test_checksum_detects_single_byte_change() {
        let body = b"E803D007\x03".to_vec();
        let original = checksum(&body);
        for i in 0..body.len() {
            let mut corrupted = body.clone();
            corrupted[i] = corrupted[i].wrapping_add(1);
            assert_ne!(checksum(&corrupted), original);
        }
    }

    #[test]
    fn test_checksum_additive_collision() {
        // Opposite changes of two bytes cancel out in an additive checksum
        let a = checksum(b"12\x03");
        let b = checksum(b"21\x03");
        assert_eq!(a, b);
    }
}
