//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};

/// Strongly typed address in the inspected process
///
/// Addresses are plain coordinates: holding one never implies that the memory
/// behind it is readable. Use the [`PointerResolver`](crate::pointer::PointerResolver)
/// to classify an address before formatting what it points at.
///
/// ## Example
///
/// ```rust
/// use lumen_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// let field = addr + 0x18;
/// assert_eq!(field.value(), 0x1018);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this is the null sentinel
    pub const fn is_null(self) -> bool
    {
        self.0 == 0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use lumen_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None);
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Address of element `index` in an array of `stride`-byte elements
    ///
    /// Returns `None` when the computation overflows, which happens with
    /// garbage sizes read from corrupted containers.
    pub fn checked_index(self, index: usize, stride: usize) -> Option<Self>
    {
        let offset = (index as u64).checked_mul(stride as u64)?;
        self.checked_add(offset)
    }

    /// Distance in bytes from `base` to `self`, if `self` is not below `base`
    pub fn checked_offset_from(self, base: Address) -> Option<u64>
    {
        self.0.checked_sub(base.0)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<u64> for Address
{
    type Output = Address;

    fn sub(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}
