pub(crate) type RawHandle = std::os::fd::RawFd;

mod into_result;
mod unix;

pub use self::unix::RawInput;
pub(crate) use self::unix::{window_size, Config, RawOutput};
