//! Helper module with this crate's error type.
//!
//! Terminal errors complement I/O errors by naming the terminal-specific
//! condition behind a failure. They seamlessly convert to and from I/O errors,
//! and the public API only ever returns [`std::io::Result`].

use crate::token::{sgr, Token};

/// The enumeration of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The standard input is not a terminal or its attributes are not
    /// accessible.
    TerminalUnavailable,
    /// An error reading from the reader providing data.
    Unreadable,
}

impl ErrorKind {
    /// Turn the error kind to an error message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TerminalUnavailable => "terminal unavailable",
            Self::Unreadable => "error reading terminal",
        }
    }
}

impl From<ErrorKind> for std::io::Error {
    fn from(value: ErrorKind) -> Self {
        Error::from(value).into()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind, source: None }
    }
}

/// A terminal error.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<std::io::Error>,
}

impl Error {
    /// Create a new unreadable error.
    pub fn unreadable(source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Unreadable,
            source: Some(source),
        }
    }

    /// Create a new terminal unavailable error.
    pub fn terminal_unavailable(source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::TerminalUnavailable,
            source: Some(source),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.source {
            Some(ref error) => Some(error),
            None => None,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        use self::ErrorKind::*;

        match value.kind {
            TerminalUnavailable => Self::new(std::io::ErrorKind::Unsupported, value),
            Unreadable => {
                let kind = value
                    .source
                    .as_ref()
                    .map_or(std::io::ErrorKind::Other, std::io::Error::kind);
                Self::new(kind, value)
            }
        }
    }
}

/// Determine whether the I/O error wraps a terminal error of the given kind.
pub fn is_kind(error: &std::io::Error, kind: ErrorKind) -> bool {
    error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<Error>())
        .is_some_and(|inner| inner.kind() == kind)
}

/// Report the error, including any sources.
#[allow(clippy::print_stdout)]
pub fn report<E: std::error::Error>(error: &E) {
    println!(
        "{}ERROR: {}{}",
        Token::color(&[sgr::BOLD, sgr::RED]),
        error,
        Token::color(&[sgr::CLEAR])
    );

    let mut error: &dyn std::error::Error = error;
    while let Some(inner) = error.source() {
        println!("    {}", inner);
        error = inner;
    }
}

#[cfg(test)]
mod test {
    use super::{is_kind, Error, ErrorKind};
    use std::error::Error as _;

    #[test]
    fn test_conversion() {
        let error: std::io::Error = ErrorKind::TerminalUnavailable.into();
        assert_eq!(error.kind(), std::io::ErrorKind::Unsupported);
        assert!(is_kind(&error, ErrorKind::TerminalUnavailable));
        assert!(!is_kind(&error, ErrorKind::Unreadable));

        let source = std::io::Error::from_raw_os_error(25);
        let error: std::io::Error = Error::terminal_unavailable(source).into();
        assert_eq!(error.kind(), std::io::ErrorKind::Unsupported);
        assert!(is_kind(&error, ErrorKind::TerminalUnavailable));
        assert_eq!(error.to_string(), "terminal unavailable");

        let inner = error
            .get_ref()
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("terminal error");
        assert!(inner.source().is_some());

        let error: std::io::Error =
            Error::unreadable(std::io::ErrorKind::BrokenPipe.into()).into();
        assert_eq!(error.kind(), std::io::ErrorKind::BrokenPipe);
        assert!(is_kind(&error, ErrorKind::Unreadable));
        assert_eq!(error.to_string(), "error reading terminal");
        assert!(error.source().is_some());

        let error: std::io::Error = ErrorKind::Unreadable.into();
        assert_eq!(error.kind(), std::io::ErrorKind::Other);
    }
}
