//! Translation from numeric line speeds to termios speed constants.

use nix::sys::termios::BaudRate;

use crate::error::{Error, Result};

/// Speed used when the caller doesn't pick one.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Map a speed in bits per second to its termios constant.
///
/// Only the standard rates are accepted; there is no rounding to the
/// nearest supported speed. Zero (hang up) is rejected too.
pub fn baud_rate(speed: u32) -> Result<BaudRate> {
    let rate = match speed {
        50 => BaudRate::B50,
        75 => BaudRate::B75,
        110 => BaudRate::B110,
        134 => BaudRate::B134,
        150 => BaudRate::B150,
        200 => BaudRate::B200,
        300 => BaudRate::B300,
        600 => BaudRate::B600,
        1200 => BaudRate::B1200,
        1800 => BaudRate::B1800,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115_200 => BaudRate::B115200,
        230_400 => BaudRate::B230400,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        460_800 => BaudRate::B460800,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        500_000 => BaudRate::B500000,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        576_000 => BaudRate::B576000,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        921_600 => BaudRate::B921600,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        1_000_000 => BaudRate::B1000000,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        1_152_000 => BaudRate::B1152000,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        1_500_000 => BaudRate::B1500000,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        2_000_000 => BaudRate::B2000000,
        #[cfg(all(
            any(target_os = "linux", target_os = "android"),
            not(target_arch = "sparc64")
        ))]
        2_500_000 => BaudRate::B2500000,
        #[cfg(all(
            any(target_os = "linux", target_os = "android"),
            not(target_arch = "sparc64")
        ))]
        3_000_000 => BaudRate::B3000000,
        #[cfg(all(
            any(target_os = "linux", target_os = "android"),
            not(target_arch = "sparc64")
        ))]
        3_500_000 => BaudRate::B3500000,
        #[cfg(all(
            any(target_os = "linux", target_os = "android"),
            not(target_arch = "sparc64")
        ))]
        4_000_000 => BaudRate::B4000000,
        _ => return Err(Error::UnsupportedBaudRate { requested: speed }),
    };
    Ok(rate)
}
