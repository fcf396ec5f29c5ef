//! Common error types for usb-serial.
//!
//! This module provides a centralized Error enum using thiserror. Failures
//! specific to finding and driving a USB serial device get their own
//! variants so callers can branch on cause; everything else is the
//! underlying OS error, passed through unmodified as `Error::Io`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for usb-serial operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No device in the USB topology carries the requested vendor/product ID.
    #[error("USB device {vendor:04x}:{product:04x} not found")]
    DeviceNotFound { vendor: u16, product: u16 },

    /// The device was found, but no tty is bound beneath it.
    #[error("no tty in {}: is the cdc-acm kernel module loaded?", device_path.display())]
    TtyNotFound { device_path: PathBuf },

    /// The resolved device file exists but is not a character device.
    #[error("{} is not a character device", path.display())]
    NotCharDevice { path: PathBuf },

    /// A single write transferred fewer bytes than requested.
    #[error("wrote {written} bytes instead of {requested}")]
    ShortWrite { written: usize, requested: usize },

    /// The requested line speed has no termios encoding.
    #[error("unsupported baud rate: {requested}")]
    UnsupportedBaudRate { requested: u32 },

    /// A vendor:product string could not be parsed.
    #[error("invalid hardware identity: {0:?}")]
    InvalidIdentity(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from std or the OS
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<nix::Error> for Error {
    fn from(errno: nix::Error) -> Self {
        Error::Io(errno.into())
    }
}

impl From<rustix::io::Errno> for Error {
    fn from(errno: rustix::io::Errno) -> Self {
        Error::Io(errno.into())
    }
}

/// Convenience type alias for Results using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
