use std::io::{stdin, Result};
use std::os::fd::AsRawFd;

use tracing::debug;

use crate::err::Error;
use crate::opt::{Mode, Options};
use crate::sys::{window_size, Config, RawHandle};

/// A scoped raw mode session.
///
/// Acquiring a session reads the terminal's current ("cooked") attributes,
/// derives the raw attributes from them, and installs the latter. Releasing
/// the session, whether explicitly with [`RawMode::release`] or implicitly
/// when the session is dropped, reinstalls the cooked attributes. That holds
/// for all exits from the scope owning the session, including early returns,
/// `?`, and panics that unwind.
///
/// Sessions are not reentrant. Only one session should be active per
/// terminal. To hand the terminal back to cooked mode temporarily, e.g., for
/// running a child process, use [`RawMode::suspend`].
///
/// In [`Mode::Charred`], a session leaves the terminal configuration alone.
///
/// # Example
///
/// ```no_run
/// # use ttyline::{KeyReader, RawMode, ReadKey};
/// let mut session = RawMode::acquire()?;
/// let key = KeyReader::stdin().read_key()?;
/// session.release()?;
/// println!("{:?}", key);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct RawMode {
    handle: RawHandle,
    configs: Option<(Config, Config)>,
    active: bool,
}

impl RawMode {
    /// Put standard input into raw mode with the default options.
    pub fn acquire() -> Result<Self> {
        Self::with_options(&Options::default())
    }

    /// Put standard input into raw mode with the given options.
    pub fn with_options(options: &Options) -> Result<Self> {
        Self::with_handle(stdin().as_raw_fd(), options)
    }

    /// Put the terminal with the given handle into raw mode.
    pub(crate) fn with_handle(handle: RawHandle, options: &Options) -> Result<Self> {
        if options.mode() == Mode::Charred {
            debug!(handle, "leaving terminal configuration untouched");
            return Ok(Self {
                handle,
                configs: None,
                active: true,
            });
        }

        let cooked = Config::read(handle).map_err(Error::terminal_unavailable)?;
        let raw = cooked.raw();
        raw.write(handle).map_err(Error::terminal_unavailable)?;
        debug!(handle, ?cooked, ?raw, "entered raw mode");

        Ok(Self {
            handle,
            configs: Some((cooked, raw)),
            active: true,
        })
    }

    /// Determine whether raw mode is currently installed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the original terminal attributes.
    ///
    /// This method is idempotent. Once it succeeds, later calls do nothing.
    pub fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        if let Some((ref cooked, _)) = self.configs {
            cooked
                .write(self.handle)
                .map_err(Error::terminal_unavailable)?;
            debug!(handle = self.handle, "restored cooked mode");
        }

        self.active = false;
        Ok(())
    }

    /// Temporarily restore cooked mode while running the operation.
    ///
    /// This method reinstalls the raw attributes computed when this session
    /// was acquired and returns the operation's result. A session that has
    /// been released stays released.
    pub fn suspend<T, F>(&mut self, operation: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        let Some((cooked, raw)) = self.configs else {
            return Ok(operation());
        };
        if !self.active {
            return Ok(operation());
        }

        cooked
            .write(self.handle)
            .map_err(Error::terminal_unavailable)?;
        debug!(handle = self.handle, "suspended raw mode");

        let result = operation();

        raw.write(self.handle).map_err(Error::terminal_unavailable)?;
        debug!(handle = self.handle, "resumed raw mode");
        Ok(result)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            debug!(%error, "could not restore terminal attributes");
        }
    }
}

/// Determine the size of the terminal connected to standard output as rows and
/// columns.
pub fn terminal_size() -> Result<(u16, u16)> {
    window_size(std::io::stdout().as_raw_fd()).map_err(|e| Error::terminal_unavailable(e).into())
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::RawMode;
    use crate::opt::Options;
    use crate::sys::{window_size, Config};
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

    /// Open a pseudo terminal, returning the controller and the terminal.
    fn open_pty() -> Option<(OwnedFd, OwnedFd)> {
        let mut controller = -1;
        let mut terminal = -1;
        // SAFETY: All pointers are either valid or null, which openpty permits.
        let status = unsafe {
            libc::openpty(
                &mut controller,
                &mut terminal,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        if status != 0 {
            return None;
        }

        // SAFETY: openpty succeeded and returned two fresh descriptors.
        unsafe { Some((OwnedFd::from_raw_fd(controller), OwnedFd::from_raw_fd(terminal))) }
    }

    fn acquire(terminal: &OwnedFd) -> std::io::Result<RawMode> {
        RawMode::with_handle(terminal.as_raw_fd(), &Options::default())
    }

    fn early_return(terminal: &OwnedFd, bail: bool) -> std::io::Result<u8> {
        let _session = acquire(terminal)?;
        if bail {
            return Ok(1);
        }
        Ok(2)
    }

    #[test]
    fn test_scoped_restore() -> std::io::Result<()> {
        let Some((_controller, terminal)) = open_pty() else {
            return Ok(());
        };
        let fd = terminal.as_raw_fd();
        let original = Config::read(fd)?;

        // Normal exit
        {
            let session = acquire(&terminal)?;
            assert!(session.is_active());
            assert_ne!(Config::read(fd)?, original);
        }
        assert_eq!(Config::read(fd)?, original);

        // Early return
        assert_eq!(early_return(&terminal, true)?, 1);
        assert_eq!(Config::read(fd)?, original);
        assert_eq!(early_return(&terminal, false)?, 2);
        assert_eq!(Config::read(fd)?, original);

        // Panic
        let result = std::panic::catch_unwind(|| {
            let _session = acquire(&terminal).expect("raw mode");
            panic!("unwinding out of raw mode");
        });
        assert!(result.is_err());
        assert_eq!(Config::read(fd)?, original);

        Ok(())
    }

    #[test]
    fn test_release_and_suspend() -> std::io::Result<()> {
        let Some((_controller, terminal)) = open_pty() else {
            return Ok(());
        };
        let fd = terminal.as_raw_fd();
        let original = Config::read(fd)?;

        let mut session = acquire(&terminal)?;
        let raw = Config::read(fd)?;

        let observed = session.suspend(|| Config::read(fd))??;
        assert_eq!(observed, original);
        assert_eq!(Config::read(fd)?, raw);

        session.release()?;
        assert!(!session.is_active());
        assert_eq!(Config::read(fd)?, original);
        session.release()?;
        assert_eq!(Config::read(fd)?, original);

        // Suspending a released session does not resurrect raw mode.
        assert_eq!(session.suspend(|| 42)?, 42);
        assert_eq!(Config::read(fd)?, original);
        drop(session);
        assert_eq!(Config::read(fd)?, original);

        Ok(())
    }

    #[test]
    fn test_charred_and_unavailable() -> std::io::Result<()> {
        let Some((_controller, terminal)) = open_pty() else {
            return Ok(());
        };
        let fd = terminal.as_raw_fd();
        let original = Config::read(fd)?;

        let session = RawMode::with_handle(fd, &Options::charred())?;
        assert_eq!(Config::read(fd)?, original);
        drop(session);
        assert_eq!(Config::read(fd)?, original);

        assert!(window_size(fd).is_ok());

        // A pipe is not a terminal.
        let mut fds = [-1; 2];
        // SAFETY: The array has room for both descriptors.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } == 0 {
            // SAFETY: pipe succeeded and returned two fresh descriptors.
            let (reader, _writer) =
                unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
            let error = RawMode::with_handle(reader.as_raw_fd(), &Options::default())
                .expect_err("pipe is no terminal");
            assert_eq!(error.kind(), std::io::ErrorKind::Unsupported);
            assert!(crate::err::is_kind(
                &error,
                crate::err::ErrorKind::TerminalUnavailable
            ));
        }

        Ok(())
    }
}
