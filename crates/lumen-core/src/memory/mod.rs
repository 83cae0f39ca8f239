//! # Memory Access
//!
//! Everything the engine knows about the inspected process comes through the
//! [`MemoryReader`] capability supplied by the host debugger. The engine never
//! dereferences a target address itself.
//!
//! - [`MemoryReader`]: the host-provided capability (`read(address, size)`)
//! - [`MemoryReaderExt`]: typed little-endian helpers layered on top
//! - [`SnapshotMemory`]: an in-memory reader over captured regions
//! - [`PageCache`]: a read-through page cache that lives for one request
//!
//! ## Target ABI
//!
//! Values are decoded as 64-bit little-endian: pointers are 8 bytes wide.

pub mod cache;
pub mod snapshot;

use std::sync::Arc;

pub use cache::PageCache;
pub use snapshot::SnapshotMemory;

use crate::error::{InspectError, Result};
use crate::types::Address;

/// Width of a pointer in the inspected process
pub const POINTER_SIZE: usize = 8;

/// Read access to the inspected process
///
/// ## Contract
///
/// - `read` returns exactly `size` bytes or fails with
///   [`InspectError::Unreadable`]; partial reads are failures
/// - reading must not change the inspected process
/// - unreadable memory is an expected outcome, not a fatal error
///
/// Implementations used from several threads at once (multiple variables
/// panels) must also be `Sync`.
pub trait MemoryReader
{
    /// Read `size` bytes starting at `address`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if any byte of the range is not mapped.
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>;

    /// Whether `size` bytes at `address` could be read right now
    fn is_readable(&self, address: Address, size: usize) -> bool
    {
        self.read(address, size.max(1)).is_ok()
    }
}

impl<R: MemoryReader + ?Sized> MemoryReader for &R
{
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>
    {
        (**self).read(address, size)
    }

    fn is_readable(&self, address: Address, size: usize) -> bool
    {
        (**self).is_readable(address, size)
    }
}

impl<R: MemoryReader + ?Sized> MemoryReader for Box<R>
{
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>
    {
        (**self).read(address, size)
    }

    fn is_readable(&self, address: Address, size: usize) -> bool
    {
        (**self).is_readable(address, size)
    }
}

impl<R: MemoryReader + ?Sized> MemoryReader for Arc<R>
{
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>
    {
        (**self).read(address, size)
    }

    fn is_readable(&self, address: Address, size: usize) -> bool
    {
        (**self).is_readable(address, size)
    }
}

/// Typed little-endian reads on top of any [`MemoryReader`]
pub trait MemoryReaderExt: MemoryReader
{
    /// Read exactly `N` bytes
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_array<const N: usize>(&self, address: Address) -> Result<[u8; N]>
    {
        let bytes = self.read(address, N)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| InspectError::Unreadable { address, size: N })
    }

    /// Read a `u8`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the byte cannot be read.
    fn read_u8(&self, address: Address) -> Result<u8>
    {
        Ok(self.read_array::<1>(address)?[0])
    }

    /// Read a little-endian `u16`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_u16(&self, address: Address) -> Result<u16>
    {
        self.read_array(address).map(u16::from_le_bytes)
    }

    /// Read a little-endian `i16`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_i16(&self, address: Address) -> Result<i16>
    {
        self.read_array(address).map(i16::from_le_bytes)
    }

    /// Read a little-endian `u32`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_u32(&self, address: Address) -> Result<u32>
    {
        self.read_array(address).map(u32::from_le_bytes)
    }

    /// Read a little-endian `i32`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_i32(&self, address: Address) -> Result<i32>
    {
        self.read_array(address).map(i32::from_le_bytes)
    }

    /// Read a little-endian `u64`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_u64(&self, address: Address) -> Result<u64>
    {
        self.read_array(address).map(u64::from_le_bytes)
    }

    /// Read a little-endian `i64`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_i64(&self, address: Address) -> Result<i64>
    {
        self.read_array(address).map(i64::from_le_bytes)
    }

    /// Read a little-endian IEEE-754 `f32`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_f32(&self, address: Address) -> Result<f32>
    {
        self.read_array(address).map(f32::from_le_bytes)
    }

    /// Read a little-endian IEEE-754 `f64`
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the range cannot be read.
    fn read_f64(&self, address: Address) -> Result<f64>
    {
        self.read_array(address).map(f64::from_le_bytes)
    }

    /// Read a raw pointer value (not classified)
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if the pointer field itself cannot be read.
    fn read_ptr(&self, address: Address) -> Result<Address>
    {
        self.read_u64(address).map(Address::from)
    }

    /// Read a NUL-terminated byte string of at most `max_len` bytes
    ///
    /// Returns the bytes (without the terminator) and whether the string was
    /// cut at `max_len`. Reading stops early at the first unreadable byte once
    /// at least one byte was read.
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::Unreadable`] if not even the first byte is readable.
    fn read_c_string(&self, address: Address, max_len: usize) -> Result<(Vec<u8>, bool)>
    {
        const CHUNK: usize = 64;

        let mut out = Vec::new();
        while out.len() < max_len {
            let cursor = address + out.len() as u64;
            let want = CHUNK.min(max_len - out.len());
            let chunk = match self.read(cursor, want) {
                Ok(chunk) => chunk,
                // Region edge inside the chunk: fall back to a single byte
                Err(_) => match self.read(cursor, 1) {
                    Ok(byte) => byte,
                    Err(err) if out.is_empty() => return Err(err),
                    Err(_) => return Ok((out, false)),
                },
            };
            if let Some(end) = chunk.iter().position(|&b| b == 0) {
                out.extend_from_slice(&chunk[..end]);
                return Ok((out, false));
            }
            out.extend_from_slice(&chunk);
        }

        let truncated = self.read_u8(address + out.len() as u64).map_or(false, |b| b != 0);
        Ok((out, truncated))
    }
}

impl<R: MemoryReader + ?Sized> MemoryReaderExt for R {}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_typed_reads_are_little_endian()
    {
        let mut mem = SnapshotMemory::new();
        mem.add_region(Address::new(0x1000), vec![0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff]);

        assert_eq!(mem.read_u32(Address::new(0x1000)).unwrap(), 0x1234_5678);
        assert_eq!(mem.read_i32(Address::new(0x1004)).unwrap(), -1);
        assert!(mem.read_u64(Address::new(0x1004)).is_err());
    }

    #[test]
    fn test_c_string_stops_at_nul_and_region_end()
    {
        let mut mem = SnapshotMemory::new();
        mem.add_region(Address::new(0x2000), b"hello\0world".to_vec());
        mem.add_region(Address::new(0x3000), b"edge".to_vec());

        assert_eq!(mem.read_c_string(Address::new(0x2000), 64).unwrap(), (b"hello".to_vec(), false));
        assert_eq!(mem.read_c_string(Address::new(0x3000), 64).unwrap(), (b"edge".to_vec(), false));
        assert_eq!(mem.read_c_string(Address::new(0x2000), 3).unwrap(), (b"hel".to_vec(), true));
        assert!(mem.read_c_string(Address::new(0x9000), 8).is_err());
    }
}
