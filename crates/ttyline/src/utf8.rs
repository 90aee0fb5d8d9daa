//! Helper module with the UTF-8 codec underlying [`Token`](crate::Token).
//!
//! Terminals deliver keys as byte streams, and this module recognizes the
//! original, pre-RFC 3629 UTF-8 encoding with up to six bytes per codepoint.
//! That is more permissive than Rust's `str`, which tops out at four bytes and
//! `U+10FFFF`, but it guarantees that every byte sequence a terminal may
//! produce has a well-defined length.
//!
//! The decoder does not reject overlong encodings or surrogates. Callers that
//! need stricter validation should compare the decoded length with the input
//! length and inspect the codepoint.

/// Determine the encoded length from a leading byte.
///
/// This function returns 1 for ASCII, 2–6 for leading bytes of multi-byte
/// encodings, and 0 for continuation bytes as well as `0xfe` and `0xff`.
#[inline]
pub const fn length_from_leading_byte(byte: u8) -> usize {
    if byte < 0x80 {
        1
    } else {
        UTF8_LEADING_LENGTH[(byte - 0x80) as usize] as usize
    }
}

/// Determine the encoded length of the character starting the buffer.
///
/// This function returns 0 if the buffer is empty, starts with an invalid
/// leading byte, or is shorter than the encoded length.
pub const fn length_from_buffer(buffer: &[u8]) -> usize {
    if buffer.is_empty() {
        return 0;
    }

    let length = length_from_leading_byte(buffer[0]);
    if buffer.len() < length {
        0
    } else {
        length
    }
}

/// Determine the number of bytes needed for encoding the codepoint.
pub const fn length_for_codepoint(codepoint: u32) -> usize {
    match codepoint {
        0..0x80 => 1,
        0x80..0x800 => 2,
        0x800..0x1_0000 => 3,
        0x1_0000..0x20_0000 => 4,
        0x20_0000..0x400_0000 => 5,
        _ => 6,
    }
}

/// The mask for extracting payload bits from a leading byte.
const fn leading_mask(length: usize) -> u8 {
    match length {
        1 => 0xff,
        2 => 0x1f,
        3 => 0x0f,
        4 => 0x07,
        5 => 0x03,
        _ => 0x01,
    }
}

/// The length marker bits of a leading byte.
const fn leading_bits(length: usize) -> u8 {
    match length {
        2 => 0xc0,
        3 => 0xe0,
        4 => 0xf0,
        5 => 0xf8,
        6 => 0xfc,
        _ => 0x00,
    }
}

/// Decode the character starting the buffer.
///
/// This function returns `None` if the buffer does not start with a complete
/// encoding or if a continuation byte is malformed. Bytes after the first
/// character are ignored.
pub fn decode(buffer: &[u8]) -> Option<u32> {
    let length = length_from_buffer(buffer);
    if length == 0 {
        return None;
    }

    let mut codepoint = (buffer[0] & leading_mask(length)) as u32;
    for byte in buffer[1..length].iter() {
        if byte & 0xc0 != 0x80 {
            return None;
        }
        codepoint = (codepoint << 6) | (byte & 0x3f) as u32;
    }

    Some(codepoint)
}

/// Encode the codepoint into the buffer.
///
/// This function returns the number of bytes written. If the buffer is too
/// small for the encoding, it writes nothing and returns 0.
pub fn encode(codepoint: u32, buffer: &mut [u8]) -> usize {
    let length = length_for_codepoint(codepoint);
    if buffer.len() < length {
        return 0;
    }

    let mut rest = codepoint;
    for index in (1..length).rev() {
        buffer[index] = 0x80 | (rest & 0x3f) as u8;
        rest >>= 6;
    }
    buffer[0] = leading_bits(length) | rest as u8;
    length
}

#[rustfmt::skip]
const UTF8_LEADING_LENGTH: &[u8; 128] = &[
    // 1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 8
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 9
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // A
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // B
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // C
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // D
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, // E
    4, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 0, 0, // F
];

#[cfg(test)]
mod test {
    use super::{decode, encode, length_for_codepoint, length_from_buffer, length_from_leading_byte};

    #[test]
    fn test_lengths() {
        assert_eq!(length_from_leading_byte(b'a'), 1);
        assert_eq!(length_from_leading_byte(0x80), 0);
        assert_eq!(length_from_leading_byte(0xbf), 0);
        assert_eq!(length_from_leading_byte(0xc3), 2);
        assert_eq!(length_from_leading_byte(0xe4), 3);
        assert_eq!(length_from_leading_byte(0xf0), 4);
        assert_eq!(length_from_leading_byte(0xf8), 5);
        assert_eq!(length_from_leading_byte(0xfc), 6);
        assert_eq!(length_from_leading_byte(0xfe), 0);

        assert_eq!(length_from_buffer(b""), 0);
        assert_eq!(length_from_buffer(b"\xe4\xb8"), 0);
        assert_eq!(length_from_buffer(b"\xe4\xb8\xad"), 3);
        assert_eq!(length_from_buffer(b"\xe4\xb8\xadx"), 3);

        assert_eq!(length_for_codepoint(0x41), 1);
        assert_eq!(length_for_codepoint(0xa2), 2);
        assert_eq!(length_for_codepoint(0x4e2d), 3);
        assert_eq!(length_for_codepoint(0x1f600), 4);
        assert_eq!(length_for_codepoint(0x20_0000), 5);
        assert_eq!(length_for_codepoint(0x400_0000), 6);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("中".as_bytes()), Some(0x4e2d));
        assert_eq!(decode("€uro".as_bytes()), Some(0x20ac));
        assert_eq!(decode(b"\xe2\x82"), None);
        assert_eq!(decode(b"\xe2\x28\xac"), None);
        assert_eq!(decode(b"\x9b"), None);
    }

    #[test]
    fn test_round_trip() {
        let mut buffer = [0_u8; 6];
        for codepoint in 1..=0x1f_ffff_u32 {
            if (0xd800..0xe000).contains(&codepoint) {
                continue;
            }

            let length = encode(codepoint, &mut buffer);
            assert_eq!(length, length_for_codepoint(codepoint));
            assert_eq!(
                decode(&buffer[..length]),
                Some(codepoint),
                "round trip of U+{:04X}",
                codepoint
            );

            if let Some(c) = char::from_u32(codepoint) {
                assert_eq!(&buffer[..length], c.to_string().as_bytes());
            }
        }
    }

    #[test]
    fn test_encode_too_small() {
        let mut buffer = [0_u8; 2];
        assert_eq!(encode(0x4e2d, &mut buffer), 0);
        assert_eq!(encode(0xa2, &mut buffer), 2);
        assert_eq!(&buffer, "¢".as_bytes());
    }
}
