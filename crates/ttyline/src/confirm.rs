use std::io::{BufWriter, Result, Write};

use tracing::debug;

use crate::cmd::{CarriageReturn, EraseRestOfLine, NewLine};
use crate::opt::Options;
use crate::read::{KeyReader, ReadKey};
use crate::session::RawMode;
use crate::sys::RawOutput;
use crate::token::Token;
use crate::util::c_escape;

/// Ask the user a yes/no question on the terminal.
///
/// This function puts standard input into raw mode for the duration of the
/// question and writes to standard output. It returns `Some(true)` for `y`,
/// `Y`, or return, `Some(false)` for `n`, `N`, or backspace, and `None` if the
/// user cancels with escape, control-c, control-d, or control-x.
///
/// # Example
///
/// ```no_run
/// # use ttyline::confirm;
/// if confirm("Delete all files?")? == Some(true) {
///     println!("Deleting...");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn confirm(message: &str) -> Result<Option<bool>> {
    let options = Options::default();
    let _session = RawMode::with_options(&options)?;
    let keys = KeyReader::stdin_with_options(&options);
    let output = BufWriter::with_capacity(options.write_buffer_size(), RawOutput::stdout());
    confirm_with(keys, output, message)
}

/// Ask the user a yes/no question with the given key source and output.
///
/// Spaces and tabs are ignored. Any other key redraws the question together
/// with a note that the key is not a valid answer.
pub fn confirm_with<K, W>(mut keys: K, mut output: W, message: &str) -> Result<Option<bool>>
where
    K: ReadKey,
    W: Write,
{
    write!(output, "{}{}{} [Y/n]: ", CarriageReturn, EraseRestOfLine, message)?;
    output.flush()?;

    loop {
        let token = keys.read_key()?;

        let answer = if token == b'y' || token == b'Y' || token == Token::RETURN {
            Some(true)
        } else if token == b'n' || token == b'N' || token == Token::BACKSPACE {
            Some(false)
        } else if token == Token::ESC
            || token == Token::ABORT
            || token == Token::EOT
            || token == Token::CANCEL
        {
            None
        } else if token == b' ' || token == Token::TAB {
            continue;
        } else {
            debug!(?token, "invalid answer");
            write!(
                output,
                "{}{}{} [Y/n]: '{}' is not valid input, select 'y' or 'n'.",
                CarriageReturn,
                EraseRestOfLine,
                message,
                c_escape(token.as_bytes())
            )?;
            output.flush()?;
            continue;
        };

        write!(output, "{}", NewLine)?;
        output.flush()?;
        return Ok(answer);
    }
}

#[cfg(test)]
mod test {
    use super::confirm_with;
    use crate::read::test::Script;
    use crate::token::Token;

    fn ask(tokens: &[Token]) -> (Option<bool>, String) {
        let mut output = Vec::new();
        let answer = confirm_with(Script::new(tokens), &mut output, "Sure?").expect("no I/O errors");
        (answer, String::from_utf8(output).expect("valid UTF-8"))
    }

    #[test]
    fn test_answers() {
        assert_eq!(ask(&[Token::from(b' '), Token::from(b'N')]).0, Some(false));
        assert_eq!(ask(&[Token::from(b'Y')]).0, Some(true));
        assert_eq!(ask(&[Token::ESC]).0, None);

        assert_eq!(ask(&[Token::RETURN]).0, Some(true));
        assert_eq!(ask(&[Token::TAB, Token::from(b'y')]).0, Some(true));
        assert_eq!(ask(&[Token::BACKSPACE]).0, Some(false));
        assert_eq!(ask(&[Token::ABORT]).0, None);
        assert_eq!(ask(&[Token::CANCEL]).0, None);
        assert_eq!(ask(&[]).0, None);
    }

    #[test]
    fn test_output() {
        let (answer, output) = ask(&[Token::from(b'n')]);
        assert_eq!(answer, Some(false));
        assert_eq!(output, "\r\x1b[KSure? [Y/n]: \r\n");

        let (answer, output) = ask(&[Token::UP, Token::from(b'y')]);
        assert_eq!(answer, Some(true));
        assert_eq!(
            output,
            "\r\x1b[KSure? [Y/n]: \
             \r\x1b[KSure? [Y/n]: '\\e[A' is not valid input, select 'y' or 'n'.\
             \r\n"
        );
    }
}
