use std::ffi::c_void;
use std::io::{stdin, stdout, Read, Result, Write};
use std::os::fd::AsRawFd;
use std::ptr::{from_mut, from_ref};

use super::{into_result::IntoResult, RawHandle};

// ----------------------------------------------------------------------------------------------------------

/// A terminal configuration.
#[derive(Clone, Copy)]
pub(crate) struct Config {
    state: libc::termios,
}

impl Config {
    /// Read the configuration of the terminal with the given handle.
    pub fn read(handle: RawHandle) -> Result<Self> {
        let mut state = std::mem::MaybeUninit::uninit();
        // SAFETY: tcgetattr fully initializes the termios structure on success.
        unsafe { libc::tcgetattr(handle, state.as_mut_ptr()) }.into_result()?;
        Ok(Self {
            // SAFETY: The call above succeeded.
            state: unsafe { state.assume_init() },
        })
    }

    /// Derive the raw mode configuration from this configuration.
    ///
    /// Raw mode disables input processing, output processing, echo, canonical
    /// line editing, and signal generation, uses 8-bit characters, and blocks
    /// reads until at least one byte is available.
    pub fn raw(&self) -> Self {
        let mut state = self.state;
        // SAFETY: cfmakeraw only updates the flags of a valid termios structure.
        unsafe { libc::cfmakeraw(from_mut(&mut state)) };
        state.c_cc[libc::VMIN] = 1;
        state.c_cc[libc::VTIME] = 0;
        Self { state }
    }

    /// Write the configuration to the terminal with the given handle.
    ///
    /// The change takes effect immediately.
    pub fn write(&self, handle: RawHandle) -> Result<()> {
        // SAFETY: The termios structure is valid and outlives the call.
        unsafe { libc::tcsetattr(handle, libc::TCSANOW, from_ref(&self.state)) }.into_result()?;
        Ok(())
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.state.c_iflag == other.state.c_iflag
            && self.state.c_oflag == other.state.c_oflag
            && self.state.c_cflag == other.state.c_cflag
            && self.state.c_lflag == other.state.c_lflag
            && self.state.c_cc == other.state.c_cc
    }
}

impl Eq for Config {}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Determine enabled flags
        let mut flags = Vec::new();

        for (name, value) in [
            ("BRKINT", libc::BRKINT),
            ("ICRNL", libc::ICRNL),
            ("IGNBRK", libc::IGNBRK),
            ("IGNCR", libc::IGNCR),
            ("INLCR", libc::INLCR),
            ("ISTRIP", libc::ISTRIP),
            ("IXON", libc::IXON),
        ] {
            if self.state.c_iflag & value != 0 {
                flags.push(name);
            }
        }

        for (name, value) in [("OPOST", libc::OPOST)] {
            if self.state.c_oflag & value != 0 {
                flags.push(name);
            }
        }

        for (name, value) in [("CS8", libc::CS8), ("PARENB", libc::PARENB)] {
            if self.state.c_cflag & value == value {
                flags.push(name);
            }
        }

        for (name, value) in [
            ("ECHO", libc::ECHO),
            ("ECHONL", libc::ECHONL),
            ("ICANON", libc::ICANON),
            ("IEXTEN", libc::IEXTEN),
            ("ISIG", libc::ISIG),
        ] {
            if self.state.c_lflag & value != 0 {
                flags.push(name);
            }
        }

        struct Flags<'a>(Vec<&'a str>);

        impl std::fmt::Debug for Flags<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_list().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("Termios")
            .field("flags", &Flags(flags))
            .field("vmin", &self.state.c_cc[libc::VMIN])
            .field("vtime", &self.state.c_cc[libc::VTIME])
            .finish()
    }
}

/// Determine the window size of the terminal with the given handle as rows and
/// columns.
pub(crate) fn window_size(handle: RawHandle) -> Result<(u16, u16)> {
    let mut size = std::mem::MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ fills in the winsize structure on success.
    unsafe { libc::ioctl(handle, libc::TIOCGWINSZ, size.as_mut_ptr()) }.into_result()?;
    // SAFETY: The call above succeeded.
    let size = unsafe { size.assume_init() };
    Ok((size.ws_row, size.ws_col))
}

// ----------------------------------------------------------------------------------------------------------

/// Raw unbuffered terminal input.
///
/// Unlike [`std::io::Stdin`], raw input reads directly from the file
/// descriptor without buffering, so that no bytes linger in a buffer after a
/// key has been read.
#[derive(Debug)]
pub struct RawInput {
    handle: RawHandle,
}

impl RawInput {
    pub(crate) fn new(handle: RawHandle) -> Self {
        Self { handle }
    }

    /// Create raw input for the process' standard input.
    pub fn stdin() -> Self {
        Self::new(stdin().as_raw_fd())
    }
}

impl Read for RawInput {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // SAFETY: The buffer is valid for writes of its length.
        unsafe {
            libc::read(
                self.handle,
                buf.as_mut_ptr().cast::<c_void>(),
                buf.len() as libc::size_t,
            )
        }
        .into_result()
    }
}

// ----------------------------------------------------------------------------------------------------------

/// A terminal's output.
#[derive(Debug)]
pub(crate) struct RawOutput {
    handle: RawHandle,
}

impl RawOutput {
    pub fn new(handle: RawHandle) -> Self {
        Self { handle }
    }

    /// Create raw output for the process' standard output.
    pub fn stdout() -> Self {
        Self::new(stdout().as_raw_fd())
    }
}

impl Write for RawOutput {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        // SAFETY: The buffer is valid for reads of its length.
        unsafe {
            libc::write(
                self.handle,
                buf.as_ptr().cast::<c_void>(),
                buf.len() as libc::size_t,
            )
        }
        .into_result()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
