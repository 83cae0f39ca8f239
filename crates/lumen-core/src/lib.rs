//! # lumen-core
//!
//! Value introspection and formatting engine for debugger integrations.
//!
//! Given an address in a suspended process and the type the debugger believes
//! lives there, the engine produces:
//! - a one-line **summary** (`size=4`, `"Just a float?"`, or none at all), and
//! - an ordered list of **children**, each either a handle that can be
//!   formatted in turn or an already rendered leaf.
//!
//! It understands the memory layouts of common Qt 5, Qt 6 and libstdc++ types
//! (strings, lists, maps, hashes, URLs, variants, JSON documents, files, text
//! cursors, `QObject`s, smart pointers) and falls back to a raw byte preview
//! for everything else.
//!
//! ## Fault containment
//!
//! The inspected memory is untrusted: a variable may be uninitialised, freed,
//! or half constructed. No request can fail or panic because of what memory
//! contains. Unreadable ranges and garbage pointers turn into a `None`
//! summary, an empty child list, or an `<invalid>` leaf, and the siblings of
//! a broken value are still formatted.
//!
//! ## Layers
//!
//! - [`memory`]: the [`MemoryReader`] seam, snapshots, per-request page cache
//! - [`pointer`]: null/invalid/valid classification
//! - [`layout`]: per-revision layout tables and the version adapter
//! - [`formatters`] and [`registry`]: one formatter per type family
//! - [`context`]: dispatch, limits, containment
//! - [`inspector`]: the request surface

pub mod config;
pub mod context;
pub mod error;
pub mod formatters;
pub mod inspector;
pub mod layout;
pub mod memory;
pub mod pointer;
pub mod registry;
pub mod render;
pub mod types;

pub use config::FormatOptions;
pub use context::FormatContext;
pub use error::{InspectError, Result};
pub use formatters::{Category, Formatter};
pub use inspector::{InspectRequest, Inspection, Inspector};
pub use memory::{MemoryReader, MemoryReaderExt, PageCache, SnapshotMemory};
pub use pointer::{PointerClass, PointerResolver};
pub use registry::Registry;
// Re-export the data model
pub use types::{Address, ChildEntry, ChildKey, ChildValue, FormatResult, Summary, TypeDescriptor, ValueHandle, VersionTag};
