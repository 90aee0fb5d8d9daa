//! The terminal commands for redrawing a line.
//!
//! The line editor and confirmation prompt redraw the current line after
//! every key. They need only a handful of commands:
//!
//!   * [`CarriageReturn`] and [`NewLine`] for moving between lines,
//!   * [`EraseRestOfLine`] for clearing the previous rendering,
//!   * [`DynMoveLeft`] for positioning the cursor inside the line,
//!   * [`MoveUp`] for overwriting the previous warning.
//!
//! Commands are values whose display writes the corresponding ANSI escape
//! sequence. Unit commands are zero-sized. A command with a fixed argument
//! takes it as a const generic, whereas a command with a computed argument
//! stores it and has a name starting with `Dyn`.
//!
//!
//! # Example
//!
//! ```
//! # use ttyline::cmd::{CarriageReturn, DynMoveLeft, EraseRestOfLine};
//! let line = format!("{}{}> text{}", CarriageReturn, EraseRestOfLine, DynMoveLeft(2));
//! assert_eq!(line, "\r\x1b[K> text\x1b[2D");
//! ```

/// A command for the terminal.
///
/// The [`std::fmt::Display`] implementation writes the command's ANSI escape
/// sequence, whereas the [`std::fmt::Debug`] implementation identifies the
/// command.
///
/// This trait is object-safe.
pub trait Command: std::fmt::Debug + std::fmt::Display {}

/// A borrowed command is a command.
impl<C: Command + ?Sized> Command for &C {}

macro_rules! define_unit_command {
    ($name:ident, $ansi:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name;

        impl Command for $name {}

        impl std::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($ansi)
            }
        }
    };
}

define_unit_command!(CarriageReturn, "\r", "Move the cursor to the start of the line.");
define_unit_command!(NewLine, "\r\n", "Move the cursor to the start of the next line.");
define_unit_command!(
    EraseRestOfLine,
    "\x1b[K",
    "Erase the line from the cursor to its end."
);

/// Move the cursor up by a fixed number of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveUp<const ROWS: u16>;

impl<const ROWS: u16> Command for MoveUp<ROWS> {}

impl<const ROWS: u16> std::fmt::Display for MoveUp<ROWS> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[{}A", ROWS)
    }
}

/// Move the cursor left by a computed number of columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynMoveLeft(pub u16);

impl Command for DynMoveLeft {}

impl std::fmt::Display for DynMoveLeft {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[{}D", self.0)
    }
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::Token;

    #[test]
    fn test_size_and_display() {
        assert_eq!(std::mem::size_of::<EraseRestOfLine>(), 0);
        assert_eq!(std::mem::size_of::<MoveUp<1>>(), 0);
        assert_eq!(std::mem::size_of::<DynMoveLeft>(), 2);

        let commands: [(&dyn Command, &str); 5] = [
            (&CarriageReturn, "\r"),
            (&NewLine, "\r\n"),
            (&EraseRestOfLine, "\x1b[K"),
            (&MoveUp::<1>, "\x1b[1A"),
            (&DynMoveLeft(12), "\x1b[12D"),
        ];
        for (command, ansi) in commands {
            assert_eq!(format!("{}", command), ansi, "{:?}", command);
        }
    }

    #[test]
    fn test_matches_tokens() {
        assert_eq!(format!("{}", EraseRestOfLine).as_bytes(), Token::CURSOR_ERASE.as_bytes());
        assert_eq!(format!("{}", DynMoveLeft(7)).as_bytes(), Token::cursor_left(7).as_bytes());
        assert_eq!(format!("{:?}", DynMoveLeft(7)), "DynMoveLeft(7)");
    }
}
