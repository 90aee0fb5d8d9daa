//! Helper module with utilities for byte strings.
//!
//! [`c_escape`] renders arbitrary terminal input as a printable C string
//! literal body, which is how invalid keys show up in prompts. [`nicely_str`]
//! produces a more compact, mnemonic rendering for debugging output, which is
//! how tokens show up in logs.

use std::fmt::{self, Write};

use crate::utf8;

/// Nicely format a byte.
///
/// Printable ASCII characters appear as themselves, common C0 controls as
/// mnemonics, e.g., `‹𝖻𝖾𝗅›`, and all other bytes as two-digit hexadecimal
/// numbers, e.g., `‹9b›`.
fn format_nicely(byte: u8, output: &mut fmt::Formatter<'_>) -> fmt::Result {
    if (0x20..=0x7e).contains(&byte) {
        return output.write_char(byte as char);
    }

    let replacement = match byte {
        // Math sans-serif letters, at least one of which is not a hex digit
        0x00 => "‹𝗇𝗎𝗅›",
        0x03 => "‹𝖾𝗍𝗑›",
        0x04 => "‹𝖾𝗈𝗍›",
        0x07 => "‹𝖻𝖾𝗅›",
        0x08 => "‹𝖻𝗌›",
        0x09 => "‹𝗁𝗍›",
        0x0a => "‹𝗅𝖿›",
        0x0b => "‹𝗏𝗍›",
        0x0d => "‹𝖼𝗋›",

        0x18 => "‹𝖼𝖺𝗇›",
        0x1a => "‹𝗌𝗎𝖻›",
        0x1b => "‹𝖾𝗌𝖼›",

        0x7f => "‹𝖽𝖾𝗅›",

        _ => "",
    };
    if replacement.is_empty() {
        write!(output, "‹{:02x}›", byte)
    } else {
        output.write_str(replacement)
    }
}

// -----------------------------------------------------------------------------------------------

/// A newtype for nicely formatting a byte slice.
struct ByteStringNicely<'a>(&'a [u8]);

impl std::fmt::Display for ByteStringNicely<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\"")?;
        for byte in self.0.iter() {
            if *byte == b'"' {
                f.write_str("\\\"")?;
            } else {
                format_nicely(*byte, f)?;
            }
        }
        f.write_str("\"")
    }
}

impl std::fmt::Debug for ByteStringNicely<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Turn the slice into a value that displays nicely.
pub fn nicely_str(bytes: &[u8]) -> impl std::fmt::Debug + std::fmt::Display + use<'_> {
    ByteStringNicely(bytes)
}

// ------------------------------------------------------------------------------------------------

/// Escape the bytes as the body of a C string literal.
///
/// Escape characters, the usual C escapes, and quotes use backslash
/// mnemonics, e.g., `\e` for ESC. Multi-byte UTF-8 characters in the basic
/// multilingual plane become `\uXXXX` with lowercase hexadecimal digits.
/// Printable ASCII characters are copied. All other bytes become three-digit
/// octal escapes.
///
/// # Example
///
/// ```
/// # use ttyline::util::c_escape;
/// assert_eq!(c_escape(b"\x1b[A"), "\\e[A");
/// assert_eq!(c_escape("\u{2018}q".as_bytes()), "\\u2018q");
/// assert_eq!(c_escape(b"\x7f"), "\\177");
/// ```
pub fn c_escape(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        index += 1;

        let mnemonic = match byte {
            0x00 => "\\000",
            0x1b => "\\e",
            0x07 => "\\a",
            0x08 => "\\b",
            0x09 => "\\t",
            0x0a => "\\n",
            0x0b => "\\v",
            0x0c => "\\f",
            0x0d => "\\r",
            b'\'' => "\\'",
            b'"' => "\\\"",
            b'?' => "\\?",
            b'\\' => "\\\\",
            _ => "",
        };
        if !mnemonic.is_empty() {
            output.push_str(mnemonic);
            continue;
        }

        if 0x80 <= byte {
            let rest = &bytes[index - 1..];
            let length = utf8::length_from_buffer(rest);
            if 0 < length {
                if let Some(codepoint @ 1..=0xffff) = utf8::decode(rest) {
                    output.push_str(&format!("\\u{:04x}", codepoint));
                    index += length - 1;
                    continue;
                }
            }
        }

        if (0x20..0x7f).contains(&byte) {
            output.push(byte as char);
        } else {
            output.push_str(&format!("\\{:03o}", byte));
        }
    }

    output
}

#[cfg(test)]
mod test {
    use super::{c_escape, nicely_str};

    #[test]
    fn test_nicely() {
        assert_eq!(format!("{}", nicely_str(b"R\x1b[\xaf")), "\"R‹𝖾𝗌𝖼›[‹af›\"");
        assert_eq!(format!("{}", nicely_str(b"\x03")), "\"‹𝖾𝗍𝗑›\"");
        assert_eq!(format!("{:?}", nicely_str(b"say \"hi\"\x07")), "\"say \\\"hi\\\"‹𝖻𝖾𝗅›\"");
        assert_eq!(format!("{}", nicely_str(b"")), "\"\"");
    }

    #[test]
    fn test_c_escape() {
        assert_eq!(c_escape(b"plain"), "plain");
        assert_eq!(c_escape(b"\x1bOP"), "\\eOP");
        assert_eq!(c_escape(b"\x00\x01\t\r\n"), "\\000\\001\\t\\r\\n");
        assert_eq!(c_escape(b"'\"?\\"), "\\'\\\"\\?\\\\");
        assert_eq!(c_escape("中".as_bytes()), "\\u4e2d");
        assert_eq!(c_escape("😀".as_bytes()), "\\360\\237\\230\\200");
        assert_eq!(c_escape(b"\xe4\xb8"), "\\344\\270");
        assert_eq!(c_escape(b"\xc2\x9b"), "\\u009b");
    }
}
