// The byte-exact grammar for escape and color sequences.
//
// Both recognizers run the same small state machine over the body of a control
// sequence, i.e., the bytes between `ESC [` and the final byte. The body must
// consist of decimal numbers separated by single semicolons.

const ESC: u8 = 0x1b;

/// The state after scanning part of a control sequence body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Body {
    /// No bytes yet.
    Empty,
    /// The last byte was a digit.
    Digit,
    /// The last byte was a semicolon following a digit.
    Separator,
}

/// The result of scanning a control sequence body.
#[derive(Clone, Copy, Debug)]
struct Parameters {
    state: Body,
    has_separator: bool,
}

/// Scan the body of a control sequence.
///
/// This function returns `None` if the body contains anything but digits and
/// semicolons, starts with a semicolon, or contains two consecutive
/// semicolons.
const fn scan_parameters(body: &[u8]) -> Option<Parameters> {
    let mut state = Body::Empty;
    let mut has_separator = false;
    let mut index = 0;

    while index < body.len() {
        state = match (state, body[index]) {
            (_, b'0'..=b'9') => Body::Digit,
            (Body::Digit, b';') => {
                has_separator = true;
                Body::Separator
            }
            _ => return None,
        };
        index += 1;
    }

    Some(Parameters {
        state,
        has_separator,
    })
}

/// Determine whether the bytes are a complete escape sequence.
///
/// Valid sequences are:
///
///   * `ESC [ A-Z`
///   * `ESC [ P (; P)* F` with decimal numbers `P` and final byte `F` being
///     `m` or `A-D`, or `~` if there is only one number
///   * `ESC O A-Z`
///   * `ESC` followed by any other ASCII letter
pub(super) const fn is_escape(bytes: &[u8]) -> bool {
    let length = bytes.len();
    if length < 2 || bytes[0] != ESC {
        return false;
    }

    match bytes[1] {
        b'[' => {
            if length == 3 {
                return bytes[2].is_ascii_uppercase();
            } else if length < 3 {
                return false;
            }

            let Some(Parameters {
                state,
                has_separator,
            }) = scan_parameters(bytes.split_at(length - 1).0.split_at(2).1)
            else {
                return false;
            };

            if !matches!(state, Body::Digit) {
                return false;
            }

            match bytes[length - 1] {
                b'~' => !has_separator,
                b'm' | b'A'..=b'D' => true,
                _ => false,
            }
        }
        b'O' => length == 3 && bytes[2].is_ascii_uppercase(),
        letter => length == 2 && letter.is_ascii_alphabetic(),
    }
}

/// Determine whether the bytes are a color sequence, i.e., `ESC [ P (; P)* m`
/// with an optionally empty parameter list.
///
/// Without validation, this function only checks for the `ESC [` prefix and
/// `m` suffix.
pub(super) const fn is_color(bytes: &[u8], strict: bool) -> bool {
    let length = bytes.len();
    if length < 3 || bytes[0] != ESC || bytes[1] != b'[' || bytes[length - 1] != b'm' {
        return false;
    } else if !strict {
        return true;
    }

    match scan_parameters(bytes.split_at(length - 1).0.split_at(2).1) {
        Some(Parameters {
            state: Body::Empty | Body::Digit,
            ..
        }) => true,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::{is_color, is_escape};

    #[test]
    fn test_escape() {
        let valid: &[&[u8]] = &[
            b"\x1b[A",
            b"\x1b[Z",
            b"\x1b[1;5A",
            b"\x1b[12D",
            b"\x1b[15~",
            b"\x1b[0m",
            b"\x1b[1;31;42m",
            b"\x1bOP",
            b"\x1bOH",
            b"\x1ba",
            b"\x1bZ",
        ];
        for bytes in valid.iter() {
            assert!(is_escape(bytes), "{:?} should be valid", bytes);
        }

        let invalid: &[&[u8]] = &[
            b"\x1b",
            b"\x1b[",
            b"\x1b[a",
            b"\x1b[m",
            b"\x1b[;A",
            b"\x1b[1;;5A",
            b"\x1b[1;A",
            b"\x1b[1;5~",
            b"\x1b[1;5E",
            b"\x1b[1",
            b"\x1bO",
            b"\x1bOa",
            b"\x1bOPQ",
            b"\x1b1",
            b"\x1bab",
            b"[A",
        ];
        for bytes in invalid.iter() {
            assert!(!is_escape(bytes), "{:?} should be invalid", bytes);
        }
    }

    #[test]
    fn test_color() {
        assert!(is_color(b"\x1b[m", true));
        assert!(is_color(b"\x1b[0m", true));
        assert!(is_color(b"\x1b[1;31m", true));
        assert!(!is_color(b"\x1b[1;m", true));
        assert!(is_color(b"\x1b[1;m", false));
        assert!(!is_color(b"\x1b[;1m", true));
        assert!(!is_color(b"\x1b[1;31A", true));
        assert!(!is_color(b"\x1bm", false));
    }
}
