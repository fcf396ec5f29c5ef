//! Blocking byte I/O over a serial device.
//!
//! A [`Port`] owns one open device. The line is configured once, at open,
//! for raw 8-bit data with parity errors ignored and modem control lines
//! ignored, and is never reconfigured afterward.
//!
//! Reads and writes block the calling thread; there is no timeout and no
//! way to cancel. A caller that needs one runs the blocking call on its own
//! thread. I/O takes `&self`, so one thread can sit in a blocking read
//! while another writes to the same port (share it with `Arc` or a scoped
//! thread). Two reads, or two writes, running at once are not serialized
//! here and interleave at the byte level.

pub mod baud;

use nix::sys::termios::{
    self, BaudRate, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg,
    SpecialCharacterIndices,
};
use rustix::fs::{Mode, OFlags};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, IntoRawFd};
use std::path::Path;

use crate::{
    error::{Error, Result},
    tracing::prelude::*,
};

pub use baud::{baud_rate, DEFAULT_BAUD};

/// An open, configured serial device.
///
/// `D` is the underlying device, normally the [`File`] returned by
/// [`Port::open`]. A `Port` is not `Clone`: exactly one value owns the
/// descriptor, and [`Port::close`] consumes it.
#[derive(Debug)]
pub struct Port<D = File> {
    device: D,
}

impl Port<File> {
    /// Open and configure the serial device at `path` for `speed` baud.
    ///
    /// Fails with [`Error::UnsupportedBaudRate`] before touching the device
    /// if `speed` has no termios constant. If any step after the open fails,
    /// the descriptor is closed before returning.
    pub fn open(path: impl AsRef<Path>, speed: u32) -> Result<Self> {
        let path = path.as_ref();
        let baud = baud_rate(speed)?;

        // Non-blocking so the open itself doesn't wait for carrier detect,
        // and no controlling tty so the device can't signal us.
        let fd = rustix::fs::open(
            path,
            OFlags::RDWR | OFlags::NOCTTY | OFlags::NONBLOCK | OFlags::CLOEXEC,
            Mode::empty(),
        )?;
        let file = File::from(fd);

        configure(&file, baud)?;
        set_blocking(&file)?;

        debug!(path = %path.display(), speed, "Opened serial port");
        Ok(Self { device: file })
    }

    /// Open `path` at [`DEFAULT_BAUD`].
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, DEFAULT_BAUD)
    }

    /// Close the port, reporting any error from the OS.
    ///
    /// Dropping a `Port` also closes it, but silently.
    pub fn close(self) -> Result<()> {
        let fd = self.device.into_raw_fd();
        nix::unistd::close(fd)?;
        trace!(fd, "Closed serial port");
        Ok(())
    }
}

// Raw mode: no input or output processing, no echo, no canonical line
// editing, no signals. A blocking read returns once at least one byte is in.
fn configure(fd: impl AsFd, baud: BaudRate) -> Result<()> {
    let mut tio = termios::tcgetattr(fd.as_fd())?;
    tio.input_flags = InputFlags::IGNPAR;
    tio.output_flags = OutputFlags::empty();
    tio.control_flags = ControlFlags::CLOCAL | ControlFlags::CREAD | ControlFlags::CS8;
    tio.local_flags = LocalFlags::empty();
    tio.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    tio.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
    termios::cfsetspeed(&mut tio, baud)?;
    termios::tcsetattr(fd.as_fd(), SetArg::TCSANOW, &tio)?;
    Ok(())
}

fn set_blocking(fd: impl AsFd) -> Result<()> {
    let flags = rustix::fs::fcntl_getfl(fd.as_fd())?;
    rustix::fs::fcntl_setfl(fd.as_fd(), flags.difference(OFlags::NONBLOCK))?;
    Ok(())
}

impl<D> Port<D> {
    /// Wrap a device that is already open and configured.
    pub fn from_device(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }
}

impl<D> Port<D>
where
    for<'a> &'a D: Read + Write,
{
    /// Write all of `buf` in a single call.
    ///
    /// A short write is not retried: it fails with [`Error::ShortWrite`] so
    /// the caller sees the back-pressure. Use [`Port::write_all`] to retry
    /// the remainder instead.
    pub fn write(&self, buf: &[u8]) -> Result<()> {
        let written = (&self.device).write(buf)?;
        if written != buf.len() {
            return Err(Error::ShortWrite {
                written,
                requested: buf.len(),
            });
        }
        Ok(())
    }

    /// Write all of `buf`, issuing further writes after short ones.
    ///
    /// Errors are not retried.
    pub fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut off = 0;
        while off < buf.len() {
            let n = (&self.device).write(&buf[off..])?;
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero).into());
            }
            if off + n < buf.len() {
                trace!(written = off + n, requested = buf.len(), "Short write, retrying");
            }
            off += n;
        }
        Ok(())
    }

    /// Read whatever is available into `buf`, with a single read, and return
    /// the number of bytes read.
    pub fn read_available(&self, buf: &mut [u8]) -> Result<usize> {
        Ok((&self.device).read(buf)?)
    }

    /// Read exactly `buf.len()` bytes, blocking as long as it takes.
    ///
    /// On error, whatever was already read into `buf` is lost to the caller.
    /// A read returning no data means the device hung up and is reported as
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_exact(&self, buf: &mut [u8]) -> Result<()> {
        let mut off = 0;
        while off < buf.len() {
            let n = self.read_available(&mut buf[off..])?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("device closed after {} of {} bytes", off, buf.len()),
                )
                .into());
            }
            off += n;
        }
        Ok(())
    }
}

// The std traits keep std semantics: a short write is a count, not an error.
// That makes a port usable with BufReader, io::copy and friends.

impl<D> Read for Port<D>
where
    for<'a> &'a D: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.device).read(buf)
    }
}

impl<D> Read for &Port<D>
where
    for<'a> &'a D: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.device).read(buf)
    }
}

impl<D> Write for Port<D>
where
    for<'a> &'a D: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.device).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&self.device).flush()
    }
}

impl<D> Write for &Port<D>
where
    for<'a> &'a D: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.device).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&self.device).flush()
    }
}
