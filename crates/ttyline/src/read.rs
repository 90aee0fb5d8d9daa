use std::io::{ErrorKind, Read, Result};

use tracing::trace;

use crate::err::Error;
use crate::normalize::Normalizer;
use crate::opt::Options;
use crate::session::RawMode;
use crate::sys::RawInput;
use crate::token::Token;
use crate::utf8;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// A reader that tolerates interruptions.
#[derive(Debug)]
pub(crate) struct DoggedReader<R> {
    inner: R,
}

impl<R> DoggedReader<R> {
    /// Create a new dogged reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for DoggedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------

/// A source of key tokens.
///
/// The line editor and confirmation prompt consume tokens through this trait,
/// which makes them testable with scripted input.
pub trait ReadKey {
    /// Read the next key, blocking until it is complete.
    fn read_key(&mut self) -> Result<Token>;
}

impl<S: ReadKey + ?Sized> ReadKey for &mut S {
    fn read_key(&mut self) -> Result<Token> {
        (**self).read_key()
    }
}

impl<S: ReadKey + ?Sized> ReadKey for Box<S> {
    fn read_key(&mut self) -> Result<Token> {
        (**self).read_key()
    }
}

/// A reader of key tokens from a byte stream.
///
/// Each call to [`ReadKey::read_key`] returns exactly one token:
///
///   * If the first byte is ESC, the reader consumes one byte at a time until
///     the bytes form a valid escape sequence, which it returns after
///     normalization. If another ESC arrives first, the reader returns a lone
///     ESC, discarding the partial sequence.
///   * If the first byte has the high bit set, the reader consumes the rest of
///     the UTF-8 character as indicated by that byte, without validating it.
///   * DEL becomes [`Token::BACKSPACE`]. All other bytes are returned as is.
///
/// The end of input and errors before the first byte both result in
/// [`Token::EOT`]. So do the end of input in the middle of a token and an
/// escape sequence that exceeds [`Token::CAPACITY`]. Errors in the middle of a
/// token are returned as errors of kind
/// [`ErrorKind::Unreadable`](crate::err::ErrorKind::Unreadable), which keep
/// the I/O error kind of their source.
///
/// There is no timeout. An incomplete escape sequence blocks until more input
/// arrives.
///
/// # Example
///
/// ```
/// # use ttyline::{KeyReader, ReadKey, Token};
/// let mut reader = KeyReader::new(&b"\x1b[1;5A\x7fq"[..]);
/// assert_eq!(reader.read_key()?, Token::CTRL_UP);
/// assert_eq!(reader.read_key()?, Token::BACKSPACE);
/// assert_eq!(reader.read_key()?, Token::from(b'q'));
/// assert_eq!(reader.read_key()?, Token::EOT);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct KeyReader<R> {
    reader: DoggedReader<R>,
    normalize: bool,
}

impl<R: Read> KeyReader<R> {
    /// Create a new key reader with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, &Options::default())
    }

    /// Create a new key reader with the given options.
    pub fn with_options(reader: R, options: &Options) -> Self {
        Self {
            reader: DoggedReader::new(reader),
            normalize: options.normalize(),
        }
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buffer = [0; 1];
        match self.reader.read(&mut buffer)? {
            0 => Ok(None),
            _ => Ok(Some(buffer[0])),
        }
    }

    fn read_escape(&mut self) -> Result<Token> {
        let mut buffer = [0; Token::CAPACITY];
        buffer[0] = ESC;

        for length in 2..=Token::CAPACITY {
            let Some(byte) = self.read_byte()? else {
                trace!("end of input inside escape sequence");
                return Ok(Token::EOT);
            };
            if byte == ESC {
                return Ok(Token::ESC);
            }

            buffer[length - 1] = byte;
            let token = Token::new(&buffer[..length]);
            if token.is_escape(true) {
                return Ok(if self.normalize {
                    Normalizer::global().normalize(token)
                } else {
                    token
                });
            }
        }

        trace!("escape sequence exceeds token capacity");
        Ok(Token::EOT)
    }

    fn read_utf8(&mut self, byte: u8) -> Result<Token> {
        let length = utf8::length_from_leading_byte(byte);
        if length == 0 {
            return Ok(Token::from(byte));
        }

        let mut buffer = [byte, 0, 0, 0, 0, 0];
        for index in 1..length {
            let Some(byte) = self.read_byte()? else {
                trace!("end of input inside UTF-8 character");
                return Ok(Token::EOT);
            };
            buffer[index] = byte;
        }

        Ok(Token::new(&buffer[..length]))
    }
}

impl KeyReader<RawInput> {
    /// Create a new key reader for standard input.
    ///
    /// The reader bypasses the standard library's buffering of standard
    /// input.
    ///
    /// ```no_run
    /// # use ttyline::{KeyReader, RawInput, RawMode, ReadKey, Token};
    /// struct Keyboard {
    ///     keys: KeyReader<RawInput>,
    ///     count: usize,
    /// }
    ///
    /// let _session = RawMode::acquire()?;
    /// let mut keyboard = Keyboard { keys: KeyReader::stdin(), count: 0 };
    /// while keyboard.keys.read_key()? != Token::EOT {
    ///     keyboard.count += 1;
    /// }
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn stdin() -> Self {
        Self::new(RawInput::stdin())
    }

    /// Create a new key reader for standard input with the given options.
    pub fn stdin_with_options(options: &Options) -> Self {
        Self::with_options(RawInput::stdin(), options)
    }
}

impl<R: Read> ReadKey for KeyReader<R> {
    fn read_key(&mut self) -> Result<Token> {
        let byte = match self.read_byte() {
            Ok(Some(byte)) => byte,
            Ok(None) => {
                trace!("end of input");
                return Ok(Token::EOT);
            }
            Err(error) => {
                trace!(%error, "error reading first byte");
                return Ok(Token::EOT);
            }
        };

        let token = match byte {
            ESC => self.read_escape().map_err(Error::unreadable)?,
            DEL => Token::BACKSPACE,
            0x80.. => self.read_utf8(byte).map_err(Error::unreadable)?,
            _ => Token::from(byte),
        };

        trace!(?token, "read key");
        Ok(token)
    }
}

/// Read a single key from standard input in raw mode.
///
/// This function acquires a raw mode session for the duration of the read and
/// restores the terminal afterwards.
pub fn getchar() -> Result<Token> {
    let mut session = RawMode::acquire()?;
    let token = KeyReader::stdin().read_key()?;
    session.release()?;
    Ok(token)
}

// ================================================================================================
