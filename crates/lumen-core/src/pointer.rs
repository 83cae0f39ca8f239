//! # Pointer Resolution
//!
//! Every pointer-like field is classified before anything follows it. Garbage
//! pointers (uninitialized locals, freed blocks) are the common case in a
//! debugger, so the classification is three-valued rather than a bare
//! "dereference and hope".

use tracing::trace;

use crate::error::{InspectError, Result};
use crate::memory::{MemoryReader, MemoryReaderExt};
use crate::types::Address;

/// Outcome of classifying a pointer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerClass
{
    /// The null sentinel
    Null,
    /// Non-null, but the probe failed (unreadable or misaligned)
    Invalid(Address),
    /// Non-null and the probe succeeded
    Valid(Address),
}

impl PointerClass
{
    /// Whether the pointer may be followed
    pub fn is_valid(self) -> bool
    {
        matches!(self, PointerClass::Valid(_))
    }

    /// The target address, if valid
    pub fn valid(self) -> Option<Address>
    {
        match self {
            PointerClass::Valid(address) => Some(address),
            PointerClass::Null | PointerClass::Invalid(_) => None,
        }
    }

    /// Turn anything but `Valid` into the matching error
    ///
    /// ## Errors
    ///
    /// `NullReference` for null, `InvalidReference` for invalid pointers.
    pub fn require(self) -> Result<Address>
    {
        match self {
            PointerClass::Valid(address) => Ok(address),
            PointerClass::Null => Err(InspectError::NullReference),
            PointerClass::Invalid(address) => Err(InspectError::InvalidReference(address)),
        }
    }
}

/// Classifies pointer values by probing the memory reader
///
/// ## Example
///
/// ```rust
/// use lumen_core::memory::SnapshotMemory;
/// use lumen_core::pointer::{PointerClass, PointerResolver};
/// use lumen_core::types::Address;
///
/// let mut mem = SnapshotMemory::new();
/// mem.add_region(Address::new(0x1000), vec![0; 16]);
/// let resolver = PointerResolver::new(&mem);
///
/// assert_eq!(resolver.classify(Address::ZERO), PointerClass::Null);
/// assert_eq!(resolver.classify(Address::new(0x1234)), PointerClass::Invalid(Address::new(0x1234)));
/// assert!(resolver.classify(Address::new(0x1008)).is_valid());
/// ```
pub struct PointerResolver<'r, R: ?Sized>
{
    reader: &'r R,
}

impl<'r, R: MemoryReader + ?Sized> PointerResolver<'r, R>
{
    /// Resolver probing through `reader`
    pub fn new(reader: &'r R) -> Self
    {
        Self { reader }
    }

    /// Classify by probing a single byte at the target
    pub fn classify(&self, target: Address) -> PointerClass
    {
        self.classify_sized(target, 1, 1)
    }

    /// Classify by probing `size` bytes and checking `align`
    ///
    /// A misaligned target cannot hold a live object of the type, so it is
    /// `Invalid` even when readable.
    pub fn classify_sized(&self, target: Address, size: usize, align: usize) -> PointerClass
    {
        if target.is_null() {
            return PointerClass::Null;
        }
        if align > 1 && target.value() % align as u64 != 0 {
            trace!(%target, align, "misaligned pointer");
            return PointerClass::Invalid(target);
        }
        if self.reader.is_readable(target, size.max(1)) {
            PointerClass::Valid(target)
        } else {
            trace!(%target, size, "unreadable pointer target");
            PointerClass::Invalid(target)
        }
    }

    /// Read the pointer stored at `field` and classify it
    ///
    /// ## Errors
    ///
    /// Returns `Unreadable` if the field itself cannot be read.
    pub fn load(&self, field: Address) -> Result<PointerClass>
    {
        let target = self.reader.read_ptr(field)?;
        Ok(self.classify(target))
    }

    /// Read the pointer stored at `field` and require it to be valid
    ///
    /// ## Errors
    ///
    /// `Unreadable`, `NullReference`, or `InvalidReference`.
    pub fn follow(&self, field: Address) -> Result<Address>
    {
        self.load(field)?.require()
    }
}
