use std::io::{BufWriter, Result, Write};

use tracing::debug;

use crate::cmd::{CarriageReturn, DynMoveLeft, EraseRestOfLine, MoveUp, NewLine};
use crate::opt::Options;
use crate::read::{KeyReader, ReadKey};
use crate::session::RawMode;
use crate::sys::RawOutput;
use crate::token::Token;

/// A verifier of individual characters entered into a line editor.
///
/// A verifier accepts a character with `Ok(())` and rejects it with an error
/// message. The line editor displays non-empty messages as warnings and
/// silently drops characters rejected with an empty message.
pub trait CharVerifier {
    /// Verify the character.
    fn verify_char(&mut self, token: &Token) -> std::result::Result<(), String>;
}

impl<F> CharVerifier for F
where
    F: FnMut(&Token) -> std::result::Result<(), String>,
{
    fn verify_char(&mut self, token: &Token) -> std::result::Result<(), String> {
        self(token)
    }
}

/// A verifier of the complete line entered into a line editor.
pub trait ResultVerifier {
    /// Verify the line.
    fn verify_result(&mut self, text: &str) -> std::result::Result<(), String>;
}

impl<F> ResultVerifier for F
where
    F: FnMut(&str) -> std::result::Result<(), String>,
{
    fn verify_result(&mut self, text: &str) -> std::result::Result<(), String> {
        self(text)
    }
}

/// Accept printable characters only.
///
/// This is the default character verifier. It accepts printable ASCII and
/// well-formed UTF-8 characters other than C1 controls. Overlong encodings,
/// surrogates, and the legacy five and six byte forms are not well-formed.
pub fn accept_printable(token: &Token) -> std::result::Result<(), String> {
    if token.is_ascii()
        || (token.is_unicode(true) && token.as_str().is_some() && !token.is_control(true))
    {
        Ok(())
    } else {
        Err("Non printable character.".to_owned())
    }
}

/// Accept any line. This is the default result verifier.
pub fn accept_any(_: &str) -> std::result::Result<(), String> {
    Ok(())
}

// ------------------------------------------------------------------------------------------------

/// The outcome of applying a token to an edit buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The line was accepted with the given text.
    Accept(String),
    /// Editing was cancelled.
    Cancel,
    /// The token was handled, possibly changing the buffer.
    Edit,
    /// The token or line was rejected with the given warning.
    Warn(String),
    /// The token was rejected without a warning.
    Ignore,
}

/// The state of a single-line editor.
///
/// An edit buffer holds the text before and after the cursor. It processes
/// one token at a time with [`EditBuffer::apply`], which makes the editing
/// logic independent of any terminal. Tokens are handled in this order, with
/// the first match winning:
///
///  1. [`Token::RETURN`] verifies and accepts the line. [`Token::ESC`],
///     [`Token::ABORT`], [`Token::EOT`], and [`Token::CANCEL`] cancel.
///  2. [`Token::DELETE`] removes the token after the cursor and
///     [`Token::BACKSPACE`] the token before the cursor.
///  3. [`Token::HOME`], [`Token::END`], [`Token::LEFT`], and [`Token::RIGHT`]
///     move the cursor. The up, down, and control-modified arrow keys are
///     consumed without effect.
///  4. Everything else, including [`Token::TAB`], is verified and, if
///     accepted, inserted before the cursor.
///
/// # Example
///
/// ```
/// # use ttyline::{accept_any, accept_printable, EditBuffer, Step, Token};
/// let mut buffer = EditBuffer::new();
/// for token in [Token::from('a'), Token::from('b'), Token::LEFT, Token::from('X')] {
///     buffer.apply(token, &mut accept_printable, &mut accept_any);
/// }
/// assert_eq!(buffer.before(), b"aX");
/// assert_eq!(buffer.after(), b"b");
///
/// let step = buffer.apply(Token::RETURN, &mut accept_printable, &mut accept_any);
/// assert_eq!(step, Step::Accept("aXb".to_owned()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    before: Vec<u8>,
    after: Vec<u8>,
    after_width: usize,
    warned: bool,
}

impl EditBuffer {
    /// Create a new empty edit buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new edit buffer with the cursor after the text.
    ///
    /// This method strips escape sequences, controls, and malformed UTF-8 from
    /// the text.
    pub fn with_text(text: &str) -> Self {
        Self {
            before: Token::display_string_of(text.as_bytes()),
            ..Self::default()
        }
    }

    /// Get the text before the cursor.
    pub fn before(&self) -> &[u8] {
        &self.before
    }

    /// Get the text after the cursor.
    pub fn after(&self) -> &[u8] {
        &self.after
    }

    /// Get the display width of the text after the cursor.
    pub fn after_width(&self) -> usize {
        self.after_width
    }

    /// Get the entire text.
    ///
    /// Text entered through [`accept_printable`] always is valid UTF-8. Other
    /// character verifiers may admit malformed characters, which this method
    /// replaces with U+FFFD.
    pub fn text(&self) -> String {
        let mut bytes = Vec::with_capacity(self.before.len() + self.after.len());
        bytes.extend_from_slice(&self.before);
        bytes.extend_from_slice(&self.after);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Record that a warning is displayed, returning whether one was displayed
    /// before.
    pub fn note_warning(&mut self) -> bool {
        std::mem::replace(&mut self.warned, true)
    }

    /// Apply the token to this buffer.
    pub fn apply<C, V>(&mut self, token: Token, chars: &mut C, results: &mut V) -> Step
    where
        C: CharVerifier + ?Sized,
        V: ResultVerifier + ?Sized,
    {
        if token == Token::RETURN {
            let text = self.text();
            return match results.verify_result(&text) {
                Ok(()) => Step::Accept(text),
                Err(message) => Self::rejected(message),
            };
        } else if token == Token::ESC
            || token == Token::ABORT
            || token == Token::EOT
            || token == Token::CANCEL
        {
            return Step::Cancel;
        }

        if self.delete(token) || self.move_cursor(token) {
            return Step::Edit;
        }

        match chars.verify_char(&token) {
            Ok(()) => {
                self.before.extend_from_slice(token.as_bytes());
                Step::Edit
            }
            Err(message) => Self::rejected(message),
        }
    }

    fn rejected(message: String) -> Step {
        if message.is_empty() {
            Step::Ignore
        } else {
            debug!(%message, "rejected input");
            Step::Warn(message)
        }
    }

    fn delete(&mut self, token: Token) -> bool {
        if token == Token::DELETE {
            if let Some(first) = Token::from_bytes(&self.after) {
                self.after.drain(..first.len());
                self.after_width = Token::display_width_of(&self.after);
            }
            true
        } else if token == Token::BACKSPACE {
            if let Some(last) = Token::last_from_bytes(&self.before) {
                self.before.truncate(self.before.len() - last.len());
            }
            true
        } else {
            false
        }
    }

    fn move_cursor(&mut self, token: Token) -> bool {
        if token == Token::HOME {
            self.before.append(&mut self.after);
            std::mem::swap(&mut self.before, &mut self.after);
            self.after_width = Token::display_width_of(&self.after);
        } else if token == Token::END {
            self.before.append(&mut self.after);
            self.after_width = 0;
        } else if token == Token::LEFT {
            if let Some(last) = Token::last_from_bytes(&self.before) {
                self.before.truncate(self.before.len() - last.len());
                let mut after = Vec::with_capacity(last.len() + self.after.len());
                after.extend_from_slice(last.as_bytes());
                after.append(&mut self.after);
                self.after = after;
                self.after_width = Token::display_width_of(&self.after);
            }
        } else if token == Token::RIGHT {
            if let Some(first) = Token::from_bytes(&self.after) {
                self.after.drain(..first.len());
                self.before.extend_from_slice(first.as_bytes());
                self.after_width = Token::display_width_of(&self.after);
            }
        } else if token == Token::CTRL_LEFT || token == Token::CTRL_RIGHT {
            // Word jumps are not supported.
        } else if token == Token::UP
            || token == Token::DOWN
            || token == Token::CTRL_UP
            || token == Token::CTRL_DOWN
        {
            // History is not supported.
        } else {
            return false;
        }

        true
    }
}

// ------------------------------------------------------------------------------------------------

/// The type of default character verifiers.
pub type DefaultCharVerifier = fn(&Token) -> std::result::Result<(), String>;

/// The type of default result verifiers.
pub type DefaultResultVerifier = fn(&str) -> std::result::Result<(), String>;

/// An interactive single-line editor.
///
/// The editor displays a prompt followed by the text being edited on the
/// current terminal line and redraws the line after every key. Warnings from
/// verifiers appear on the line above; consecutive warnings overwrite each
/// other.
///
/// # Example
///
/// ```no_run
/// # use ttyline::LineEditor;
/// let mut editor = LineEditor::new("Name?");
/// match editor.read("")? {
///     Some(name) => println!("Hello, {}!", name),
///     None => println!("Never mind."),
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct LineEditor<C = DefaultCharVerifier, V = DefaultResultVerifier> {
    prompt: String,
    chars: C,
    results: V,
    options: Options,
}

impl LineEditor {
    /// Create a new line editor with the default verifiers.
    pub fn new(prompt: &str) -> Self {
        Self::with_verifiers(prompt, accept_printable, accept_any)
    }
}

impl<C: CharVerifier, V: ResultVerifier> LineEditor<C, V> {
    /// Create a new line editor with the given verifiers.
    pub fn with_verifiers(prompt: &str, chars: C, results: V) -> Self {
        Self {
            prompt: prompt.to_owned(),
            chars,
            results,
            options: Options::default(),
        }
    }

    /// Update the options for terminal access.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Get the prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Read a line from the terminal.
    ///
    /// This method puts standard input into raw mode for the duration of the
    /// read and writes to standard output. It starts out with the printable
    /// part of the initial text before the cursor. It returns the accepted
    /// line or `None` if the user cancelled.
    pub fn read(&mut self, initial: &str) -> Result<Option<String>> {
        let _session = RawMode::with_options(&self.options)?;
        let keys = KeyReader::stdin_with_options(&self.options);
        let output =
            BufWriter::with_capacity(self.options.write_buffer_size(), RawOutput::stdout());
        self.read_with(keys, output, initial)
    }

    /// Read a line with the given key source and output.
    pub fn read_with<K, W>(&mut self, mut keys: K, mut output: W, initial: &str) -> Result<Option<String>>
    where
        K: ReadKey,
        W: Write,
    {
        let mut buffer = EditBuffer::with_text(initial);

        loop {
            self.redraw(&buffer, &mut output)?;

            let token = keys.read_key()?;
            match buffer.apply(token, &mut self.chars, &mut self.results) {
                Step::Accept(text) => {
                    write!(output, "{}", NewLine)?;
                    output.flush()?;
                    debug!(%text, "accepted line");
                    return Ok(Some(text));
                }
                Step::Cancel => {
                    write!(output, "{}", NewLine)?;
                    output.flush()?;
                    debug!(?token, "cancelled line");
                    return Ok(None);
                }
                Step::Warn(message) => Self::warn(&mut buffer, &mut output, &message)?,
                Step::Edit | Step::Ignore => (),
            }
        }
    }

    fn redraw<W: Write>(&self, buffer: &EditBuffer, output: &mut W) -> Result<()> {
        write!(output, "{}{}{} ", CarriageReturn, EraseRestOfLine, self.prompt)?;
        output.write_all(buffer.before())?;
        if 0 < buffer.after_width() {
            output.write_all(buffer.after())?;
            let width = u16::try_from(buffer.after_width()).unwrap_or(u16::MAX);
            write!(output, "{}", DynMoveLeft(width))?;
        }
        output.flush()
    }

    fn warn<W: Write>(buffer: &mut EditBuffer, output: &mut W, message: &str) -> Result<()> {
        if buffer.note_warning() {
            write!(output, "{}", MoveUp::<1>)?;
        }
        write!(output, "{}{}{}{}", CarriageReturn, EraseRestOfLine, message, NewLine)?;
        output.flush()
    }
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::{accept_any, accept_printable, EditBuffer, LineEditor, Step};
    use crate::read::test::Script;
    use crate::read::KeyReader;
    use crate::token::Token;

    fn apply_all(buffer: &mut EditBuffer, tokens: &[Token]) -> Vec<Step> {
        tokens
            .iter()
            .map(|token| buffer.apply(*token, &mut accept_printable, &mut accept_any))
            .collect()
    }

    fn chars(s: &str) -> Vec<Token> {
        s.chars().map(Token::from).collect()
    }

    #[test]
    fn test_insert_and_move() {
        let mut buffer = EditBuffer::new();
        let steps = apply_all(
            &mut buffer,
            &[
                Token::from('a'),
                Token::from('b'),
                Token::from('c'),
                Token::LEFT,
                Token::LEFT,
                Token::from('X'),
            ],
        );
        assert!(steps.iter().all(|step| *step == Step::Edit));
        assert_eq!(buffer.before(), b"aX");
        assert_eq!(buffer.after(), b"bc");
        assert_eq!(buffer.after_width(), 2);
        assert_eq!(buffer.text(), "aXbc");

        apply_all(&mut buffer, &[Token::HOME]);
        assert_eq!(buffer.before(), b"");
        assert_eq!(buffer.after(), b"aXbc");
        assert_eq!(buffer.after_width(), 4);

        apply_all(&mut buffer, &[Token::RIGHT, Token::END]);
        assert_eq!(buffer.before(), b"aXbc");
        assert_eq!(buffer.after(), b"");
        assert_eq!(buffer.after_width(), 0);

        // Moving beyond either end does nothing.
        apply_all(&mut buffer, &[Token::RIGHT]);
        assert_eq!(buffer.before(), b"aXbc");
        apply_all(&mut buffer, &[Token::HOME, Token::LEFT]);
        assert_eq!(buffer.after(), b"aXbc");

        // Reserved keys are consumed.
        let steps = apply_all(&mut buffer, &[Token::UP, Token::CTRL_DOWN, Token::CTRL_LEFT]);
        assert!(steps.iter().all(|step| *step == Step::Edit));
        assert_eq!(buffer.text(), "aXbc");
    }

    #[test]
    fn test_delete() {
        let mut buffer = EditBuffer::with_text("中文ab");
        apply_all(&mut buffer, &[Token::LEFT, Token::LEFT, Token::LEFT]);
        assert_eq!(buffer.before(), "中".as_bytes());
        assert_eq!(buffer.after_width(), 4);

        apply_all(&mut buffer, &[Token::DELETE]);
        assert_eq!(buffer.after(), b"ab");
        assert_eq!(buffer.after_width(), 2);

        apply_all(&mut buffer, &[Token::BACKSPACE, Token::BACKSPACE]);
        assert_eq!(buffer.before(), b"");
        assert_eq!(buffer.text(), "ab");

        apply_all(&mut buffer, &[Token::END, Token::DELETE]);
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_with_text() {
        let buffer = EditBuffer::with_text("a\x1b[1mb\x07c");
        assert_eq!(buffer.before(), b"abc");
        assert_eq!(buffer.after(), b"");
    }

    #[test]
    fn test_terminators() {
        for cancel in [Token::ESC, Token::ABORT, Token::EOT, Token::CANCEL] {
            let mut buffer = EditBuffer::with_text("abc");
            assert_eq!(apply_all(&mut buffer, &[cancel]), vec![Step::Cancel]);
        }

        let mut buffer = EditBuffer::with_text("abc");
        let mut reject_short = |text: &str| {
            if text.len() < 5 {
                Err(format!("'{}' is too short.", text))
            } else {
                Ok(())
            }
        };

        let step = buffer.apply(Token::RETURN, &mut accept_printable, &mut reject_short);
        assert_eq!(step, Step::Warn("'abc' is too short.".to_owned()));

        for token in chars("de") {
            buffer.apply(token, &mut accept_printable, &mut reject_short);
        }
        let step = buffer.apply(Token::RETURN, &mut accept_printable, &mut reject_short);
        assert_eq!(step, Step::Accept("abcde".to_owned()));
    }

    #[test]
    fn test_char_verifier() {
        let mut buffer = EditBuffer::new();
        let steps = apply_all(&mut buffer, &[Token::TAB, Token::F1, Token::from('\u{85}')]);
        for step in steps {
            assert_eq!(step, Step::Warn("Non printable character.".to_owned()));
        }
        assert!(buffer.text().is_empty());

        let mut digits_only = |token: &Token| {
            if token.as_bytes().iter().all(u8::is_ascii_digit) {
                Ok(())
            } else {
                Err(String::new())
            }
        };
        for token in chars("1a2") {
            buffer.apply(token, &mut digits_only, &mut accept_any);
        }
        assert_eq!(buffer.text(), "12");
        assert_eq!(
            buffer.apply(Token::from('x'), &mut digits_only, &mut accept_any),
            Step::Ignore
        );
    }

    #[test]
    fn test_read_with() -> std::io::Result<()> {
        let mut editor = LineEditor::new(">");
        let mut keys = chars("abc");
        keys.extend([Token::LEFT, Token::LEFT, Token::from('X'), Token::RETURN]);

        let mut output = Vec::new();
        let line = editor.read_with(Script::new(&keys), &mut output, "")?;
        assert_eq!(line.as_deref(), Some("aXbc"));

        let output = String::from_utf8(output).expect("valid UTF-8");
        assert!(output.starts_with("\r\x1b[K> "));
        assert!(output.contains("\r\x1b[K> aXbc\x1b[2D"));
        assert!(output.ends_with("\r\n"));
        Ok(())
    }

    #[test]
    fn test_read_warnings() -> std::io::Result<()> {
        let mut editor = LineEditor::new("?");
        let keys = [Token::TAB, Token::TAB, Token::from('q'), Token::ESC];

        let mut output = Vec::new();
        let line = editor.read_with(Script::new(&keys), &mut output, "in\x07it")?;
        assert_eq!(line, None);

        let output = String::from_utf8(output).expect("valid UTF-8");
        let warning = "\r\x1b[KNon printable character.\r\n";
        let first = output.find(warning).expect("first warning");
        let second = output.rfind(warning).expect("second warning");
        assert!(first < second);
        assert!(output[..second].ends_with("\x1b[1A"));
        assert!(!output[..first].contains("\x1b[1A"));
        assert!(output.contains("\r\x1b[K? initq"));
        Ok(())
    }

    #[test]
    fn test_read_malformed_utf8() -> std::io::Result<()> {
        // Overlong, legacy five byte, surrogate, and well-formed characters
        let inputs: [(&[u8], &str, bool); 4] = [
            (b"\xc1\x81\r", "", true),
            (b"x\xf8\x88\x80\x80\x80y\r", "xy", true),
            (b"\xed\xa0\x80\r", "", true),
            ("\u{2018}ok\u{2019}\r".as_bytes(), "\u{2018}ok\u{2019}", false),
        ];

        for (input, expected, warned) in inputs {
            let mut editor = LineEditor::new(">");
            let mut output = Vec::new();
            let line = editor.read_with(KeyReader::new(input), &mut output, "")?;
            assert_eq!(line.as_deref(), Some(expected), "{:?}", input);

            let output = String::from_utf8_lossy(&output);
            assert_eq!(output.contains("Non printable character."), warned, "{:?}", input);
        }

        Ok(())
    }

    #[test]
    fn test_read_end_of_input() -> std::io::Result<()> {
        let mut editor = LineEditor::new(">");
        let line = editor.read_with(Script::new(&chars("abc")), Vec::new(), "")?;
        assert_eq!(line, None);
        Ok(())
    }
}
