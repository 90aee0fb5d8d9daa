//! Helper module with the options for raw mode sessions and key readers.
//!
//! This module provides the options and the corresponding builder.
//!
//!
//! # Example
//!
//! ```
//! # use ttyline::opt::{Mode, Options};
//! let options = Options::builder()
//!     .mode(Mode::Charred)
//!     .normalize(false)
//!     .build();
//!
//! assert_eq!(options.mode(), Mode::Charred);
//! assert!(!options.normalize());
//! ```

/// A terminal mode.
///
/// Currently two terminal modes are supported:
///
///   * __Charred mode__ considers the terminal configuration as too hot to
///     touch and makes no changes. It is useful when input comes from a pipe
///     or the terminal has already been configured elsewhere.
///
///   * __Raw mode__ disables all features beyond byte-based I/O: no echo, no
///     line buffering, no signal keys, no output post-processing. Reads block
///     until at least one byte is available. This is the default.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Charred mode doesn't dare to touch the terminal configuration; it's too
    /// hot.
    Charred,
    /// Raw mode.
    #[default]
    Raw,
}

#[derive(Clone, Debug)]
struct OptionData {
    mode: Mode,
    normalize: bool,
    write_buffer_size: usize,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Raw,
            normalize: true,
            write_buffer_size: 1_024,
        }
    }
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set charred or raw mode.
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.0.mode = mode;
        self
    }

    /// Set whether key readers normalize alternative key encodings.
    pub fn normalize(&mut self, normalize: bool) -> &mut Self {
        self.0.normalize = normalize;
        self
    }

    /// Set the write buffer size.
    pub fn write_buffer_size(&mut self, size: usize) -> &mut Self {
        self.0.write_buffer_size = size;
        self
    }

    /// Instantiate the options.
    pub fn build(&self) -> Options {
        Options(self.0.clone())
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Instantiate the default options but in charred mode.
    pub fn charred() -> Options {
        Self::builder().mode(Mode::Charred).build()
    }

    /// Get the terminal mode.
    pub fn mode(&self) -> Mode {
        self.0.mode
    }

    /// Determine whether key readers normalize keys.
    pub fn normalize(&self) -> bool {
        self.0.normalize
    }

    /// Get the size of the write buffer.
    pub fn write_buffer_size(&self) -> usize {
        self.0.write_buffer_size
    }
}

#[cfg(test)]
mod test {
    use super::{Mode, Options};

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.mode(), Mode::Raw);
        assert!(options.normalize());
        assert_eq!(options.write_buffer_size(), 1_024);
        assert_eq!(Options::charred().mode(), Mode::Charred);
    }
}
