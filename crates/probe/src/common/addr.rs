//! Instruction address type.
//!
//! Strong type for instruction addresses so that counter keys and redirect
//! targets cannot be confused with cycle counts or sequence numbers.

use std::fmt;

/// An instruction address in the simulated program.
///
/// Formats as lowercase hexadecimal with a `0x` prefix, which is the form the
/// record analyzer expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InstAddr(pub u64);

impl InstAddr {
    /// Creates a new instruction address from a raw 64-bit value.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for InstAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for InstAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for InstAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
