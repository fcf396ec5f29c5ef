//! USB hardware identity (vendor and product ID).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A USB device model, identified by its vendor and product IDs.
///
/// Displays and parses as `vvvv:pppp` in hex, the same form `lsusb` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareIdentity {
    pub vendor: u16,
    pub product: u16,
}

impl HardwareIdentity {
    pub const fn new(vendor: u16, product: u16) -> Self {
        Self { vendor, product }
    }

    /// Vendor ID as sysfs renders it in `idVendor`.
    pub fn vendor_hex(&self) -> String {
        format!("{:04x}", self.vendor)
    }

    /// Product ID as sysfs renders it in `idProduct`.
    pub fn product_hex(&self) -> String {
        format!("{:04x}", self.product)
    }
}

impl fmt::Display for HardwareIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor, self.product)
    }
}

impl FromStr for HardwareIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidIdentity(s.to_string());
        let (vendor, product) = s.trim().split_once(':').ok_or_else(invalid)?;
        let parse = |half: &str| {
            if half.is_empty() || half.len() > 4 {
                return Err(invalid());
            }
            u16::from_str_radix(half, 16).map_err(|_| invalid())
        };
        Ok(Self::new(parse(vendor)?, parse(product)?))
    }
}

impl<'de> Deserialize<'de> for HardwareIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for HardwareIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
