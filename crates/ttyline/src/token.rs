mod grammar;
mod named;

pub use self::named::sgr;

use std::cmp::{min, Ordering};
use std::fmt::Write;

use crate::util::nicely_str;
use crate::utf8;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;
const CAPACITY: usize = 31;

/// A key, character, or control sequence.
///
/// A token is one terminal "character" in the widest sense: a plain ASCII
/// byte, a UTF-8 encoded Unicode scalar, a C0 control, or a complete ANSI
/// escape sequence. It stores up to [`Token::CAPACITY`] bytes inline, so that
/// reading a key never allocates, and it is [`Copy`].
///
/// A token does not remember what kind of token it is. All classification
/// methods recompute the answer from the bytes, hence two tokens with the same
/// bytes always classify the same. Most classification methods take a `strict`
/// argument. Without it, they only check the cheap prefix that distinguishes
/// one kind from another. With it, they validate the entire token.
///
/// Equality and hashing are based on the bytes. Ordering is not lexical:
/// Escape sequences sort before all other tokens and, if one escape sequence
/// is a prefix of another, the longer one sorts first. All other tokens sort in
/// *descending* order of their [`ordinal`](Token::ordinal). Ordered
/// collections keyed by tokens depend on this order, so it should not change.
///
/// # Example
///
/// ```
/// # use ttyline::Token;
/// let token = Token::from_bytes(b"\x1b[1;5Arest").unwrap();
/// assert_eq!(token, Token::CTRL_UP);
/// assert!(token.is_escape(true));
/// assert_eq!(token.display_width(), 0);
///
/// let token = Token::from('中');
/// assert_eq!(token.len(), 3);
/// assert_eq!(token.display_width(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct Token {
    data: [u8; CAPACITY],
    len: u8,
}

impl Token {
    /// The maximum number of bytes in a token.
    pub const CAPACITY: usize = CAPACITY;

    /// Create a new token from the bytes.
    ///
    /// Bytes beyond [`Token::CAPACITY`] are silently dropped.
    pub const fn new(bytes: &[u8]) -> Self {
        let len = if bytes.len() < Self::CAPACITY {
            bytes.len()
        } else {
            Self::CAPACITY
        };

        let mut data = [0; Self::CAPACITY];
        let mut index = 0;
        while index < len {
            data[index] = bytes[index];
            index += 1;
        }

        Self {
            data,
            len: len as u8,
        }
    }

    /// Create a new empty token.
    pub const fn empty() -> Self {
        Self {
            data: [0; Self::CAPACITY],
            len: 0,
        }
    }

    /// Create a new token with the UTF-8 encoding of the codepoint.
    pub fn from_codepoint(codepoint: u32) -> Self {
        let mut data = [0; Self::CAPACITY];
        let len = utf8::encode(codepoint, &mut data);
        Self {
            data,
            len: len as u8,
        }
    }

    /// Get this token's bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Get this token's bytes as a string slice, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Get the number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Determine whether this token is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn first(&self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            Some(self.data[0])
        }
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Classification

    /// Determine whether this token is a printable ASCII character.
    pub fn is_ascii(&self) -> bool {
        self.len == 1 && (0x20..DEL).contains(&self.data[0])
    }

    /// Determine whether this token is a control character.
    ///
    /// A control character is a single byte below 0x20 or DEL. If `strict`,
    /// the UTF-8 encoding of a C1 control between U+0081 and U+009F also is a
    /// control character.
    pub fn is_control(&self, strict: bool) -> bool {
        match self.first() {
            None => false,
            Some(byte) if self.len == 1 => byte < 0x20 || byte == DEL,
            Some(_) if strict && self.len == 2 => {
                matches!(utf8::decode(self.as_bytes()), Some(0x81..0xa0))
            }
            _ => false,
        }
    }

    /// Determine whether this token is an escape sequence.
    ///
    /// Without `strict`, any token with two or more bytes starting with ESC
    /// is an escape sequence. With `strict`, the token must match the escape
    /// sequence grammar exactly. Notably, a lone ESC is *not* an escape
    /// sequence but a control character.
    pub fn is_escape(&self, strict: bool) -> bool {
        if self.len < 2 || self.data[0] != ESC {
            false
        } else if strict {
            grammar::is_escape(self.as_bytes())
        } else {
            true
        }
    }

    /// Determine whether this token is a color sequence, i.e., a select
    /// graphic rendition (SGR) escape sequence.
    pub fn is_color(&self, strict: bool) -> bool {
        grammar::is_color(self.as_bytes(), strict)
    }

    /// Determine whether this token is a Unicode character.
    ///
    /// Printable ASCII characters are Unicode characters. For longer tokens,
    /// `strict` requires that the token is exactly one UTF-8 encoded codepoint
    /// other than U+0000. Without `strict`, any multi-byte token not starting
    /// with a control is accepted.
    pub fn is_unicode(&self, strict: bool) -> bool {
        let Some(byte) = self.first() else {
            return false;
        };

        if byte < 0x20 || byte == DEL {
            false
        } else if self.len == 1 {
            byte < DEL
        } else if strict {
            utf8::length_from_buffer(self.as_bytes()) == self.len()
                && matches!(utf8::decode(self.as_bytes()), Some(1..))
        } else {
            true
        }
    }

    /// Determine whether this token is a valid character, control, or
    /// sequence.
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
            && (self.is_unicode(true)
                || self.is_control(true)
                || self.is_escape(true)
                || self.is_color(true))
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Metrics

    /// Determine the number of terminal columns for displaying this token.
    ///
    /// Escape sequences and controls take no space, even if they move the
    /// cursor. CJK unified ideographs take two columns. Everything else takes
    /// one column.
    pub fn display_width(&self) -> usize {
        if self.is_escape(false) || self.is_control(true) {
            0
        } else if self.len > 1 && (0x4e00..0xa000).contains(&self.codepoint()) {
            2
        } else {
            1
        }
    }

    /// Get this token's Unicode codepoint.
    ///
    /// This method returns 0 if the token is not a Unicode character or if its
    /// continuation bytes are malformed.
    pub fn codepoint(&self) -> u32 {
        if !self.is_unicode(false) {
            0
        } else if self.len == 1 {
            self.data[0] as u32
        } else {
            utf8::decode(self.as_bytes()).unwrap_or(0)
        }
    }

    /// Compute this token's hash code.
    ///
    /// This is a simple polynomial hash suitable for lookup tables only.
    pub fn hash_code(&self) -> i64 {
        let mut value: i64 = 479_001_599;
        for byte in self.as_bytes() {
            value = value.wrapping_add(*byte as i64).wrapping_mul(719);
        }
        value.rem_euclid(87_178_291_199)
    }

    /// Get this token's ordinal.
    ///
    /// The ordinal of a single byte is its value, and the ordinal of a Unicode
    /// character is its codepoint. All other tokens have a negative ordinal
    /// derived from their hash code, which is deterministic but arbitrary.
    pub fn ordinal(&self) -> i64 {
        if self.len == 1 {
            self.data[0] as i64
        } else if self.is_unicode(false) {
            self.codepoint() as i64
        } else {
            -(self.hash_code() % 0x8000_0000)
        }
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Decoding strings

    /// Decode the first token from the buffer.
    ///
    /// If the buffer starts with ESC, this method returns the shortest prefix
    /// that is a valid escape sequence. If it starts with a byte with the high
    /// bit set, this method returns the valid UTF-8 character or C1 control
    /// starting the buffer. Otherwise, it returns the first byte. In all other
    /// cases, including an empty buffer, it returns `None`.
    pub fn from_bytes(buffer: &[u8]) -> Option<Self> {
        let byte = *buffer.first()?;

        if byte == ESC {
            let limit = min(buffer.len(), Self::CAPACITY);
            (2..=limit)
                .map(|length| Self::new(&buffer[..length]))
                .find(|token| token.is_escape(true))
        } else if 0x80 <= byte {
            let length = utf8::length_from_buffer(buffer);
            if length == 0 {
                return None;
            }

            let token = Self::new(&buffer[..length]);
            if token.is_unicode(true) || token.is_control(true) {
                Some(token)
            } else {
                None
            }
        } else {
            Some(Self::from(byte))
        }
    }

    /// Decode the last token from the buffer.
    ///
    /// This method scans the entire buffer from the front, since escape
    /// sequences cannot be recognized backwards. It returns `None` if any
    /// token in the buffer cannot be decoded.
    pub fn last_from_bytes(buffer: &[u8]) -> Option<Self> {
        let mut last = None;
        let mut index = 0;

        while index < buffer.len() {
            let token = Self::from_bytes(&buffer[index..])?;
            index += token.len();
            last = Some(token);
        }

        last
    }

    /// Determine the display width of the text.
    ///
    /// If the text contains bytes that cannot be decoded, this function
    /// returns the width of the text before those bytes.
    pub fn display_width_of(text: &[u8]) -> usize {
        let mut width = 0;
        let mut index = 0;

        while index < text.len() {
            let Some(token) = Self::from_bytes(&text[index..]) else {
                break;
            };
            width += token.display_width();
            index += token.len();
        }

        width
    }

    /// Strip all escape sequences, controls, and undecodable bytes from the
    /// text.
    pub fn display_string_of(text: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(text.len());
        let mut index = 0;

        while index < text.len() {
            match Self::from_bytes(&text[index..]) {
                Some(token) => {
                    if 0 < token.display_width() {
                        output.extend_from_slice(token.as_bytes());
                    }
                    index += token.len().max(1);
                }
                None => index += 1,
            }
        }

        output
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Building sequences

    /// Create a color sequence from SGR codes.
    ///
    /// The first code is always included. Later codes are included up to the
    /// first zero code and as long as there is space. Without codes, this
    /// method returns the sequence resetting all attributes.
    ///
    /// ```
    /// # use ttyline::{sgr, Token};
    /// let token = Token::color(&[sgr::BOLD, sgr::RED]);
    /// assert_eq!(token.as_bytes(), b"\x1b[1;31m");
    /// assert!(token.is_color(true));
    /// ```
    pub fn color(codes: &[u8]) -> Self {
        let mut builder = Builder::new();
        builder.push_str("\x1b[");

        let first = codes.first().copied().unwrap_or(sgr::CLEAR);
        let _ = write!(builder, "{}", first);
        if first != 0 {
            for code in codes.iter().skip(1).take_while(|code| **code != 0) {
                // Leave room for a three-digit parameter and the final byte.
                if Self::CAPACITY - 5 < builder.len {
                    break;
                }
                let _ = write!(builder, ";{}", code);
            }
        }

        builder.push_str("m");
        builder.build()
    }

    /// Create a sequence moving the cursor to the 1-based line and column.
    pub fn cursor_to(line: u16, column: u16) -> Self {
        Self::sequence(line, Some(column), 'H')
    }

    /// Create a sequence moving the cursor up.
    pub fn cursor_up(count: u16) -> Self {
        if count == 1 {
            Self::UP
        } else {
            Self::sequence(count, None, 'A')
        }
    }

    /// Create a sequence moving the cursor down.
    pub fn cursor_down(count: u16) -> Self {
        if count == 1 {
            Self::DOWN
        } else {
            Self::sequence(count, None, 'B')
        }
    }

    /// Create a sequence moving the cursor right.
    pub fn cursor_right(count: u16) -> Self {
        if count == 1 {
            Self::RIGHT
        } else {
            Self::sequence(count, None, 'C')
        }
    }

    /// Create a sequence moving the cursor left.
    pub fn cursor_left(count: u16) -> Self {
        if count == 1 {
            Self::LEFT
        } else {
            Self::sequence(count, None, 'D')
        }
    }

    fn sequence(first: u16, second: Option<u16>, suffix: char) -> Self {
        let mut builder = Builder::new();
        let _ = match second {
            Some(second) => write!(builder, "\x1b[{};{}{}", first, second, suffix),
            None => write!(builder, "\x1b[{}{}", first, suffix),
        };
        builder.build()
    }

    /// Create a circled number from 1 through 50.
    ///
    /// This method returns an empty token for all other numbers.
    pub fn numeric(number: u32) -> Self {
        match number {
            1..=20 => Self::from_codepoint(0x2460 - 1 + number),
            21..=35 => Self::from_codepoint(0x3251 - 21 + number),
            36..=50 => Self::from_codepoint(0x32b1 - 36 + number),
            _ => Self::empty(),
        }
    }
}

// ------------------------------------------------------------------------------------------------

/// A truncating writer for building tokens.
struct Builder {
    data: [u8; CAPACITY],
    len: usize,
}

impl Builder {
    fn new() -> Self {
        Self {
            data: [0; Token::CAPACITY],
            len: 0,
        }
    }

    fn build(&self) -> Token {
        Token::new(&self.data[..self.len])
    }
}

impl std::fmt::Write for Builder {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let count = min(s.len(), Token::CAPACITY - self.len);
        self.data[self.len..self.len + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += count;
        Ok(())
    }
}

impl Builder {
    fn push_str(&mut self, s: &str) {
        let _ = self.write_str(s);
    }
}

// ------------------------------------------------------------------------------------------------

impl Default for Token {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<u8> for Token {
    fn from(byte: u8) -> Self {
        Self::new(&[byte])
    }
}

impl From<char> for Token {
    fn from(c: char) -> Self {
        Self::from_codepoint(c as u32)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Token {}

impl PartialEq<u8> for Token {
    fn eq(&self, other: &u8) -> bool {
        self.len == 1 && self.data[0] == *other
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_escape(false), other.is_escape(false)) {
            (true, true) => {
                let length = min(self.len(), other.len());
                match self.data[..length].cmp(&other.data[..length]) {
                    // The longer sequence comes first.
                    Ordering::Equal => other.len.cmp(&self.len),
                    ordering => ordering,
                }
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => other
                .ordinal()
                .cmp(&self.ordinal())
                .then_with(|| self.as_bytes().cmp(other.as_bytes())),
        }
    }
}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i64(self.hash_code());
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token")
            .field(&nicely_str(self.as_bytes()))
            .finish()
    }
}

// ================================================================================================
