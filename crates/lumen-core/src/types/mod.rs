//! # Types
//!
//! Data model shared by every component of the engine.
//!
//! None of these types own process memory. They are coordinates and rendered
//! output, cheap to clone and safe to send across threads.

pub mod address;
pub mod descriptor;
pub mod value;

// Re-export all public types
pub use address::Address;
pub use descriptor::{TypeDescriptor, VersionTag};
pub use value::{ChildEntry, ChildKey, ChildValue, FormatResult, Summary, SyntheticOwner, ValueHandle};
