//! Find the character device of a USB serial adapter by vendor/product ID.
//!
//! Device file names like `/dev/ttyACM0` depend on plug order, so callers
//! name the hardware instead and we look it up in sysfs:
//!
//! 1. Walk `/sys/bus/usb/devices` for the first node whose `idVendor` and
//!    `idProduct` files match.
//! 2. Canonicalize that node. Entries under `/sys/bus/usb/devices` are
//!    symlinks into `/sys/devices`, and the tree walk does not follow links.
//! 3. Walk the canonical node for a `tty/tty*` entry, which appears once a
//!    driver such as cdc-acm has bound to the device.
//! 4. Check that `/dev/<tty>` is a character device.
//!
//! Lookups hold no state between calls and only read the filesystem, so
//! they can run concurrently. With more than one matching device attached,
//! which one is returned is unspecified.

pub mod walk;

use rustix::fs::FileType;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::DirEntry;

use crate::{
    error::{Error, Result},
    identity::HardwareIdentity,
    tracing::prelude::*,
};

/// Where the kernel exposes USB devices.
pub const TOPOLOGY_ROOT: &str = "/sys/bus/usb/devices";

/// Where device files live.
pub const DEV_ROOT: &str = "/dev";

/// Device lookup against a particular sysfs and /dev.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    topology_root: PathBuf,
    dev_root: PathBuf,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(TOPOLOGY_ROOT, DEV_ROOT)
    }
}

impl Locator {
    pub fn new(topology_root: impl Into<PathBuf>, dev_root: impl Into<PathBuf>) -> Self {
        Self {
            topology_root: topology_root.into(),
            dev_root: dev_root.into(),
        }
    }

    pub fn topology_root(&self) -> &Path {
        &self.topology_root
    }

    pub fn dev_root(&self) -> &Path {
        &self.dev_root
    }

    /// Return the `/dev/tty*` path of the USB serial device with the given
    /// identity.
    ///
    /// Fails with [`Error::DeviceNotFound`] if nothing matches the identity,
    /// [`Error::TtyNotFound`] if the device has no tty bound, and
    /// [`Error::NotCharDevice`] if the device file has the wrong type. A
    /// missing device file is reported as [`Error::Io`].
    pub fn find_device(&self, identity: HardwareIdentity) -> Result<PathBuf> {
        let device = self.find_usb_device(identity)?;
        let tty = find_tty(&device)?;
        let path = self.char_device(&tty)?;
        debug!(%identity, path = %path.display(), "Found USB serial device");
        Ok(path)
    }

    /// Return the canonical sysfs path of the device with the given identity.
    pub fn find_usb_device(&self, identity: HardwareIdentity) -> Result<PathBuf> {
        let vendor = identity.vendor_hex();
        let product = identity.product_hex();

        let found = walk::find_first(
            &self.topology_root,
            |entry| {
                let path = entry.path();
                has_id(path, "idVendor", &vendor) && has_id(path, "idProduct", &product)
            },
            |_| true,
        )?;

        let Some(device) = found else {
            return Err(Error::DeviceNotFound {
                vendor: identity.vendor,
                product: identity.product,
            });
        };

        let canonical = fs::canonicalize(&device)?;
        trace!(
            node = %device.display(),
            canonical = %canonical.display(),
            "Matched USB device"
        );
        Ok(canonical)
    }

    // Pathname for the given tty, after verifying it is a character device.
    fn char_device(&self, tty: &OsStr) -> Result<PathBuf> {
        let path = self.dev_root.join(tty);
        let stat = rustix::fs::stat(&path)?;
        if FileType::from_raw_mode(stat.st_mode as _) != FileType::CharacterDevice {
            return Err(Error::NotCharDevice { path });
        }
        Ok(path)
    }
}

/// Find the device with the given identity using the system's sysfs and /dev.
pub fn find_device(identity: HardwareIdentity) -> Result<PathBuf> {
    Locator::default().find_device(identity)
}

/// Name of the first tty bound beneath a canonical sysfs device node.
fn find_tty(device: &Path) -> Result<OsString> {
    walk::find_first(device, is_tty, |_| true)?
        .and_then(|path| path.file_name().map(OsStr::to_os_string))
        .ok_or_else(|| Error::TtyNotFound {
            device_path: device.to_path_buf(),
        })
}

fn is_tty(entry: &DirEntry) -> bool {
    let in_tty_dir = entry
        .path()
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "tty");

    in_tty_dir
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with("tty"))
}

// Missing or unreadable property files just mean "not this node": interfaces
// and hubs in the same tree don't carry them.
fn has_id(node: &Path, property: &str, expected: &str) -> bool {
    match fs::read_to_string(node.join(property)) {
        Ok(value) => {
            let value = value.trim();
            trace!(node = %node.display(), property, value, "Checking ID");
            value.eq_ignore_ascii_case(expected)
        }
        Err(_) => false,
    }
}
