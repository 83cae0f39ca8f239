//! # Error Types
//!
//! Error handling for the formatting engine.
//!
//! Formatters use these errors internally with `?`, but no formatting fault
//! ever reaches the host debugger: the [`Inspector`](crate::Inspector) is the
//! single containment boundary that turns an `InspectError` into a `None`
//! summary or an empty children list. Only malformed *requests* (a type name
//! that cannot be parsed, a snapshot file with bad syntax) surface as errors.

use thiserror::Error;

use crate::types::Address;

/// Main error type for inspection operations
///
/// ## Error Categories
///
/// 1. **Memory errors**: Unreadable, NullReference, InvalidReference
/// 2. **Dispatch errors**: UnsupportedType, InvalidDescriptor
/// 3. **Limit errors**: TruncatedOutput
/// 4. **Layout errors**: Layout (field values that cannot describe a live object)
/// 5. **Input errors**: Snapshot, Io
#[derive(Error, Debug)]
pub enum InspectError
{
    /// The memory reader could not provide the requested bytes
    ///
    /// This is an expected outcome when inspecting uninitialized locals,
    /// freed heap blocks or garbage pointers.
    #[error("Unreadable memory: {size} bytes at {address}")]
    Unreadable
    {
        /// First byte that was requested
        address: Address,
        /// Number of bytes requested
        size: usize,
    },

    /// A pointer-like field holds the null sentinel
    #[error("Null reference")]
    NullReference,

    /// A pointer-like field is non-null but points at unreadable memory
    #[error("Invalid reference to {0}")]
    InvalidReference(Address),

    /// No formatter is registered for the descriptor (or for its version)
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A depth or count ceiling was reached
    #[error("Output truncated at limit {limit}")]
    TruncatedOutput
    {
        /// The ceiling that was hit
        limit: usize,
    },

    /// A type name could not be parsed into a descriptor
    #[error("Invalid type descriptor: {0}")]
    InvalidDescriptor(String),

    /// Fields were readable but describe an impossible object
    ///
    /// Examples: a negative string length, an `end` pointer before `begin`.
    #[error("Inconsistent layout: {0}")]
    Layout(String),

    /// A memory snapshot could not be parsed
    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    /// I/O error while loading a snapshot
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError
{
    /// Whether the error means "this value is not there" rather than
    /// "this value is there but looks wrong".
    #[must_use]
    pub fn is_reference_fault(&self) -> bool
    {
        matches!(
            self,
            InspectError::Unreadable { .. } | InspectError::NullReference | InspectError::InvalidReference(_)
        )
    }
}

/// Convenience type alias for `Result<T, InspectError>`
pub type Result<T> = std::result::Result<T, InspectError>;
