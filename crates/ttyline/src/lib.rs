//! # ttyline
//!
//! This crate provides **terminal key tokens and a single-line editor** for
//! Unix terminals. Its only runtime dependencies are
//! [`libc`](https://crates.io/crates/libc) for configuring the terminal and
//! [`tracing`](https://crates.io/crates/tracing) for diagnostic logging.
//!
//! The building blocks are:
//!
//!   * A [`Token`] is one terminal "character," i.e., an ASCII byte, a UTF-8
//!     encoded Unicode character, a control, or a complete ANSI escape
//!     sequence. Tokens are small `Copy` values that never allocate.
//!   * A [`RawMode`] session puts the terminal into raw mode and restores the
//!     original configuration when it is dropped, no matter how the scope
//!     is exited.
//!   * A [`KeyReader`] turns a blocking byte stream into tokens, one key per
//!     call to [`ReadKey::read_key`]. The [`Normalizer`] maps alternative key
//!     encodings onto canonical tokens.
//!   * A [`LineEditor`] reads a line with cursor movement, deletion, and
//!     validation through [`CharVerifier`]s and [`ResultVerifier`]s. The
//!     editing logic lives in [`EditBuffer`], which is independent of the
//!     terminal.
//!   * [`confirm`] asks a yes/no question.
//!
//! The [`cmd`] module provides the **commands for redrawing a line**, the
//! [`opt`] module the **options**, and the [`err`] module the **error type**.
//! The public API reports failures as [`std::io::Error`]s only.
//!
//! Reads do **not** time out. An incomplete escape sequence blocks until more
//! input arrives.
//!
//!
//! # Example
//!
//! The editor works just as well with scripted keys and an in-memory output
//! as with the terminal:
//!
//! ```
//! # use ttyline::{KeyReader, LineEditor};
//! let keys = KeyReader::new(&b"abc\x1b[D\x1b[DX\r"[..]);
//! let mut output = Vec::new();
//!
//! let mut editor = LineEditor::new("O'really?");
//! let line = editor.read_with(keys, &mut output, "")?;
//! assert_eq!(line.as_deref(), Some("aXbc"));
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! To read from the terminal instead, call [`LineEditor::read`], which
//! acquires a [`RawMode`] session for the duration of the read.

#[cfg(not(target_family = "unix"))]
compile_error!("ttyline supports Unix terminals only");

pub mod cmd;
mod confirm;
mod editor;
pub mod err;
mod normalize;
pub mod opt;
mod read;
mod session;
mod sys;
mod token;
pub mod utf8;
pub mod util;

pub use cmd::Command;
pub use confirm::{confirm, confirm_with};
pub use editor::{
    accept_any, accept_printable, CharVerifier, DefaultCharVerifier, DefaultResultVerifier,
    EditBuffer, LineEditor, ResultVerifier, Step,
};
pub use normalize::Normalizer;
pub use read::{getchar, KeyReader, ReadKey};
pub use session::{terminal_size, RawMode};
pub use sys::RawInput;
pub use token::{sgr, Token};
