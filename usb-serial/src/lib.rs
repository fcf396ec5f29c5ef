//! Find a USB serial device by vendor and product ID, then do blocking byte
//! I/O with it.
//!
//! ```no_run
//! use usb_serial::{HardwareIdentity, Port};
//!
//! # fn main() -> usb_serial::Result<()> {
//! let path = usb_serial::find_device(HardwareIdentity::new(0x0403, 0x6015))?;
//! let port = Port::open(&path, 115_200)?;
//! port.write(b"ping")?;
//! let mut reply = [0u8; 4];
//! port.read_exact(&mut reply)?;
//! port.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod locator;
pub mod port;
pub mod tracing;

use std::fs::File;

pub use config::Config;
pub use error::{Error, Result};
pub use identity::HardwareIdentity;
pub use locator::{find_device, Locator};
pub use port::Port;

/// Find the device with the given identity and open it at `speed` baud.
pub fn open_usb(identity: HardwareIdentity, speed: u32) -> Result<Port<File>> {
    let path = find_device(identity)?;
    Port::open(path, speed)
}
