//! Bring-up tool: find a USB serial device, open it, and dump what it sends.
//!
//! Usage: `usb-serial-probe [CONFIG.json] [COUNT]`
//!
//! Without a config file, the device is taken from the `USB_SERIAL_*`
//! environment variables. Reads COUNT bytes (default 16) and prints them in
//! hex on stdout.

use anyhow::{Context, Result};
use std::env;
use std::path::Path;

use usb_serial::tracing::{self, prelude::*};
use usb_serial::{Config, Error, Port};

const DEFAULT_COUNT: usize = 16;

fn main() -> Result<()> {
    tracing::init_journald_or_stderr();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::load_from(Path::new(&path))
            .with_context(|| format!("failed to load {}", path))?,
        None => Config::from_env().context("no config file given")?,
    };
    let count = match args.next() {
        Some(n) => n
            .parse()
            .with_context(|| format!("invalid byte count {:?}", n))?,
        None => DEFAULT_COUNT,
    };

    let path = match config.locator().find_device(config.device) {
        Ok(path) => path,
        Err(e @ Error::TtyNotFound { .. }) => {
            warn!("Device is present but has no serial driver bound.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!(device = %config.device, path = %path.display(), baud = config.baud, "Opening.");

    let port = Port::open(&path, config.baud)?;
    let mut buf = vec![0u8; count];
    port.read_exact(&mut buf)?;
    println!("{}", hex::encode(&buf));
    port.close()?;

    trace!("Done.");
    Ok(())
}
