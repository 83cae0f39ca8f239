//! Value handles, summaries, and child entries.

use std::fmt;

use super::{Address, TypeDescriptor};

/// Annotation carried by a handle reached through an ownership wrapper
///
/// The pointee of a `std::unique_ptr<QUrl>` is a `QUrl` like any other, but
/// a host may want to show that it is not a first-class variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntheticOwner
{
    /// Qualified name of the wrapper, e.g. `std::unique_ptr<QUrl>`
    pub wrapper: String,
}

/// Coordinate of a value in the inspected process
///
/// A handle never owns process memory. Every summary or children request
/// re-reads memory through the reader, so a handle stays valid across debugger
/// stops even though what it points at may change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueHandle
{
    address: Address,
    descriptor: TypeDescriptor,
    owner: Option<SyntheticOwner>,
    depth: usize,
}

impl ValueHandle
{
    /// Top-level handle (depth 0)
    pub fn new(address: Address, descriptor: TypeDescriptor) -> Self
    {
        Self {
            address,
            descriptor,
            owner: None,
            depth: 0,
        }
    }

    /// Handle for a value nested one level below `self`
    #[must_use]
    pub fn child(&self, address: Address, descriptor: TypeDescriptor) -> Self
    {
        Self {
            address,
            descriptor,
            owner: None,
            depth: self.depth.saturating_add(1),
        }
    }

    /// Same handle with a synthetic-owner annotation
    #[must_use]
    pub fn owned_by(mut self, wrapper: &TypeDescriptor) -> Self
    {
        self.owner = Some(SyntheticOwner {
            wrapper: wrapper.to_string(),
        });
        self
    }

    /// Address of the first byte of the value
    pub fn address(&self) -> Address
    {
        self.address
    }

    /// Type of the value
    pub fn descriptor(&self) -> &TypeDescriptor
    {
        &self.descriptor
    }

    /// Wrapper annotation, when reached through an ownership wrapper
    pub fn owner(&self) -> Option<&SyntheticOwner>
    {
        self.owner.as_ref()
    }

    /// Nesting depth below the request's root handle
    pub fn depth(&self) -> usize
    {
        self.depth
    }
}

/// One-line rendering of a value
///
/// `None` is a meaningful answer ("nothing to show", e.g. a default-constructed
/// URL) and is distinct from `Some("")`. It displays as the literal `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Summary(Option<String>);

impl Summary
{
    /// The absent summary
    pub const fn none() -> Self
    {
        Summary(None)
    }

    /// A present summary
    pub fn text(text: impl Into<String>) -> Self
    {
        Summary(Some(text.into()))
    }

    /// Whether no summary is present
    pub fn is_none(&self) -> bool
    {
        self.0.is_none()
    }

    /// Borrow the rendered text, if present
    pub fn as_deref(&self) -> Option<&str>
    {
        self.0.as_deref()
    }

    /// Take the rendered text, if present
    pub fn into_inner(self) -> Option<String>
    {
        self.0
    }
}

impl From<Option<String>> for Summary
{
    fn from(value: Option<String>) -> Self
    {
        Summary(value)
    }
}

impl fmt::Display for Summary
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match &self.0 {
            Some(text) => f.write_str(text),
            None => f.write_str("None"),
        }
    }
}

/// Key of one child within its parent node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildKey
{
    /// Zero-based position, displayed as `[i]`
    Index(usize),
    /// Declared field name, displayed verbatim
    Field(String),
    /// Association key's rendered form, displayed as `[key]`
    Key(String),
    /// The single pointee of an ownership wrapper, displayed as `*`
    Pointee,
    /// Marker for children cut off by a limit, displayed as `...`
    Truncated,
}

impl ChildKey
{
    /// Field key from a static schema name
    pub fn field(name: &str) -> Self
    {
        ChildKey::Field(name.to_string())
    }
}

impl fmt::Display for ChildKey
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            ChildKey::Index(i) => write!(f, "[{i}]"),
            ChildKey::Field(name) => f.write_str(name),
            ChildKey::Key(key) => write!(f, "[{key}]"),
            ChildKey::Pointee => f.write_str("*"),
            ChildKey::Truncated => f.write_str("..."),
        }
    }
}

/// What a child entry refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildValue
{
    /// A value that can be formatted (and expanded) on demand
    Handle(ValueHandle),
    /// A value rendered while enumerating the parent (defaults, markers, decoded JSON scalars)
    Leaf(String),
}

/// One named or indexed sub-value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildEntry
{
    /// Key, unique within the parent
    pub key: ChildKey,
    /// Handle or pre-rendered leaf
    pub value: ChildValue,
}

impl ChildEntry
{
    /// Child that re-enters the pipeline
    pub fn handle(key: ChildKey, handle: ValueHandle) -> Self
    {
        Self {
            key,
            value: ChildValue::Handle(handle),
        }
    }

    /// Child whose value is already rendered
    pub fn leaf(key: ChildKey, rendered: impl Into<String>) -> Self
    {
        Self {
            key,
            value: ChildValue::Leaf(rendered.into()),
        }
    }

    /// The nested handle, if this child is not a leaf
    pub fn as_handle(&self) -> Option<&ValueHandle>
    {
        match &self.value {
            ChildValue::Handle(handle) => Some(handle),
            ChildValue::Leaf(_) => None,
        }
    }
}

/// Fully materialized result for one node (one level deep)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FormatResult
{
    /// Rendered one-line summary
    pub summary: Summary,
    /// Children in enumeration order
    pub children: Vec<ChildEntry>,
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::types::VersionTag;

    #[test]
    fn test_summary_none_is_distinct_from_empty()
    {
        assert_ne!(Summary::none(), Summary::text(""));
        assert_eq!(Summary::none().to_string(), "None");
        assert_eq!(Summary::text("\"\"").to_string(), "\"\"");
    }

    #[test]
    fn test_child_key_display()
    {
        assert_eq!(ChildKey::Index(3).to_string(), "[3]");
        assert_eq!(ChildKey::field("userName").to_string(), "userName");
        assert_eq!(ChildKey::Key("\"key1\"".into()).to_string(), "[\"key1\"]");
        assert_eq!(ChildKey::Pointee.to_string(), "*");
    }

    #[test]
    fn test_child_handles_track_depth()
    {
        let root = ValueHandle::new(Address::new(0x1000), TypeDescriptor::new("QUrl", VersionTag::QT6));
        let child = root.child(Address::new(0x2000), TypeDescriptor::new("QString", VersionTag::QT6));
        assert_eq!(root.depth(), 0);
        assert_eq!(child.depth(), 1);
        assert!(child.owner().is_none());
    }
}
