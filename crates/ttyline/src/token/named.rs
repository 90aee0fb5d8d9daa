use super::Token;

macro_rules! named {
    ($( $(#[$attr:meta])* $name:ident = $bytes:expr ;)*) => {
        impl Token {
            $(
                $(#[$attr])*
                pub const $name: Token = Token::new($bytes);
            )*
        }
    };
}

named! {
    // C0 controls
    /// The escape key.
    ESC = b"\x1b";
    /// The delete character, which many terminals send for backspace.
    DEL = b"\x7f";
    /// The backspace key, after normalization.
    BACKSPACE = b"\x08";
    /// Control-C.
    ABORT = b"\x03";
    /// Control-D, which also stands in for end of input.
    EOT = b"\x04";
    /// Control-X.
    CANCEL = b"\x18";
    BELL = b"\x07";
    NEWLINE = b"\n";
    /// The enter key.
    RETURN = b"\r";
    TAB = b"\t";

    // Cursor keys and control sequences
    UP = b"\x1b[A";
    DOWN = b"\x1b[B";
    RIGHT = b"\x1b[C";
    LEFT = b"\x1b[D";
    /// The sequence erasing the rest of the line.
    CURSOR_ERASE = b"\x1b[K";
    /// The sequence saving the cursor position.
    CURSOR_SAVE = b"\x1b[s";
    /// The sequence restoring the cursor position.
    CURSOR_RESTORE = b"\x1b[u";
    CTRL_UP = b"\x1b[1;5A";
    CTRL_DOWN = b"\x1b[1;5B";
    CTRL_RIGHT = b"\x1b[1;5C";
    CTRL_LEFT = b"\x1b[1;5D";
    /// The center key of the numeric keypad.
    DPAD_MID = b"\x1b[E";

    // Editing keys
    INSERT = b"\x1b[2~";
    DELETE = b"\x1b[3~";
    HOME = b"\x1b[1~";
    END = b"\x1b[4~";
    PAGE_UP = b"\x1b[5~";
    PAGE_DOWN = b"\x1b[6~";

    // Function keys
    F1 = b"\x1bOP";
    F2 = b"\x1bOQ";
    F3 = b"\x1bOR";
    F4 = b"\x1bOS";
    F5 = b"\x1b[15~";
    F6 = b"\x1b[17~";
    F7 = b"\x1b[18~";
    F8 = b"\x1b[19~";
    F9 = b"\x1b[20~";

    // Quotes
    APOS = b"'";
    QUOTE = b"\"";
    /// ‘
    LSQUO = "\u{2018}".as_bytes();
    /// ’
    RSQUO = "\u{2019}".as_bytes();
    /// ‚
    BSQUO = "\u{201a}".as_bytes();
    /// “
    LDQUO = "\u{201c}".as_bytes();
    /// ”
    RDQUO = "\u{201d}".as_bytes();
    /// „
    BDQUO = "\u{201e}".as_bytes();
    /// ‹
    LSAQUO = "\u{2039}".as_bytes();
    /// ›
    RSAQUO = "\u{203a}".as_bytes();
    /// «
    LAQUO = "\u{00ab}".as_bytes();
    /// »
    RAQUO = "\u{00bb}".as_bytes();

    // Currencies
    DOLLAR = b"$";
    CENT = "\u{00a2}".as_bytes();
    POUND = "\u{00a3}".as_bytes();
    YEN = "\u{00a5}".as_bytes();
    EURO = "\u{20ac}".as_bytes();

    // Other symbols
    SECTION = "\u{00a7}".as_bytes();
    COPYRIGHT = "\u{00a9}".as_bytes();
    REGISTERED = "\u{00ae}".as_bytes();
    TRADEMARK = "\u{2122}".as_bytes();
    DEGREES = "\u{00b0}".as_bytes();
    /// ·
    MDOT = "\u{00b7}".as_bytes();
    /// ¼
    FRACT_1Q = "\u{00bc}".as_bytes();
    /// ½
    FRACT_1H = "\u{00bd}".as_bytes();
    /// ¾
    FRACT_3Q = "\u{00be}".as_bytes();
    INFINITE = "\u{221e}".as_bytes();
}

/// Select graphic rendition (SGR) codes for [`Token::color`].
pub mod sgr {
    pub const CLEAR: u8 = 0;

    // Foreground
    pub const DEFAULT: u8 = 39;
    pub const BLACK: u8 = 30;
    pub const RED: u8 = 31;
    pub const GREEN: u8 = 32;
    pub const YELLOW: u8 = 33;
    pub const BLUE: u8 = 34;
    pub const MAGENTA: u8 = 35;
    pub const CYAN: u8 = 36;
    pub const WHITE: u8 = 37;

    // Background
    pub const BG_DEFAULT: u8 = 49;
    pub const BG_BLACK: u8 = 40;
    pub const BG_RED: u8 = 41;
    pub const BG_GREEN: u8 = 42;
    pub const BG_YELLOW: u8 = 43;
    pub const BG_BLUE: u8 = 44;
    pub const BG_MAGENTA: u8 = 45;
    pub const BG_CYAN: u8 = 46;
    pub const BG_WHITE: u8 = 47;

    // Attributes
    pub const BOLD: u8 = 1;
    pub const DIM: u8 = 2;
    pub const UNDERLINE: u8 = 4;
    pub const STROKE: u8 = 9;
    pub const INVERT: u8 = 7;
    pub const HIDDEN: u8 = 8;

    pub const NOT_BOLD: u8 = 21;
    pub const NOT_DIM: u8 = 22;
    pub const NOT_UNDERLINE: u8 = 24;
    pub const NOT_STROKE: u8 = 29;
    pub const NOT_INVERT: u8 = 27;
    pub const NOT_HIDDEN: u8 = 28;
}
