//! Configuration for finding and opening a USB serial device.
//!
//! Configuration comes from a JSON file or from environment variables.
//! Only the device identity is required:
//!
//! ```json
//! { "device": "0403:6015", "baud": 115200 }
//! ```
//!
//! The sysfs and /dev roots can be overridden too, which is mostly useful
//! for testing against a fake tree.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    identity::HardwareIdentity,
    locator::{Locator, DEV_ROOT, TOPOLOGY_ROOT},
    port::{baud_rate, Port, DEFAULT_BAUD},
    tracing::prelude::*,
};

/// Environment variable naming the device as `vvvv:pppp`.
pub const ENV_DEVICE: &str = "USB_SERIAL_DEVICE";
/// Environment variable overriding the line speed.
pub const ENV_BAUD: &str = "USB_SERIAL_BAUD";
/// Environment variable overriding the sysfs USB device directory.
pub const ENV_TOPOLOGY_ROOT: &str = "USB_SERIAL_TOPOLOGY_ROOT";
/// Environment variable overriding the device file directory.
pub const ENV_DEV_ROOT: &str = "USB_SERIAL_DEV_ROOT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Which device to open
    pub device: HardwareIdentity,

    /// Line speed in bits per second
    #[serde(default = "default_baud")]
    pub baud: u32,

    #[serde(default = "default_topology_root")]
    pub topology_root: PathBuf,

    #[serde(default = "default_dev_root")]
    pub dev_root: PathBuf,
}

fn default_baud() -> u32 {
    DEFAULT_BAUD
}

fn default_topology_root() -> PathBuf {
    PathBuf::from(TOPOLOGY_ROOT)
}

fn default_dev_root() -> PathBuf {
    PathBuf::from(DEV_ROOT)
}

impl Config {
    /// Configuration for `device` with every other setting at its default.
    pub fn new(device: HardwareIdentity) -> Self {
        Self {
            device,
            baud: DEFAULT_BAUD,
            topology_root: default_topology_root(),
            dev_root: default_dev_root(),
        }
    }

    /// Load configuration from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!(path = %path.display(), device = %config.device, "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `USB_SERIAL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device = var(ENV_DEVICE)
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_DEVICE)))?
            .parse()?;

        let mut config = Self::new(device);
        if let Some(baud) = var(ENV_BAUD) {
            config.baud = baud
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{}={:?} is not a number", ENV_BAUD, baud)))?;
        }
        if let Some(root) = var(ENV_TOPOLOGY_ROOT) {
            config.topology_root = root.into();
        }
        if let Some(root) = var(ENV_DEV_ROOT) {
            config.dev_root = root.into();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        baud_rate(self.baud)?;
        Ok(())
    }

    pub fn locator(&self) -> Locator {
        Locator::new(&self.topology_root, &self.dev_root)
    }

    /// Find the configured device and open it.
    pub fn open(&self) -> Result<Port<File>> {
        let path = self.locator().find_device(self.device)?;
        Port::open(path, self.baud)
    }
}
