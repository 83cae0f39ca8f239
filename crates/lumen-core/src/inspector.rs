//! # Inspector
//!
//! The request surface. An [`Inspector`] owns a memory reader and the default
//! [`FormatOptions`]; each request gets a fresh [`PageCache`] over that reader
//! so repeated reads inside one request are cheap and nothing is cached across
//! requests (the inspected process may have run in between).
//!
//! ## Laziness
//!
//! [`Inspector::inspect`] returns an [`Inspection`] that computes the summary
//! and the children independently, each on first access. A client that only
//! displays the summary line never enumerates children.
//!
//! ## Example
//!
//! ```
//! use lumen_core::{FormatOptions, InspectRequest, Inspector, SnapshotMemory};
//!
//! let memory: SnapshotMemory = "0x1000: 2a 00 00 00".parse().unwrap();
//! let inspector = Inspector::new(memory, FormatOptions::default());
//!
//! let request = InspectRequest::new(0x1000u64, "int");
//! let result = inspector.respond(&request).unwrap();
//! assert_eq!(result.summary.as_deref(), Some("42"));
//! assert!(result.children.is_empty());
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::config::FormatOptions;
use crate::context::FormatContext;
use crate::error::Result;
use crate::memory::{MemoryReader, PageCache};
use crate::registry::Registry;
use crate::types::{Address, ChildEntry, ChildValue, FormatResult, Summary, TypeDescriptor, ValueHandle, VersionTag};

/// One inspection request as received from the debugger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectRequest
{
    /// Address of the value in the inspected process
    pub address: Address,
    /// Type as the debugger spells it, e.g. `QList<int>`
    pub type_name: String,
    /// Library revision; the options' default when absent
    pub version: Option<VersionTag>,
    /// Per-request limits; the inspector's defaults when absent
    pub options: Option<FormatOptions>,
}

impl InspectRequest
{
    pub fn new(address: impl Into<Address>, type_name: impl Into<String>) -> Self
    {
        Self {
            address: address.into(),
            type_name: type_name.into(),
            version: None,
            options: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: VersionTag) -> Self
    {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: FormatOptions) -> Self
    {
        self.options = Some(options);
        self
    }
}

/// Formats values read through `R`
pub struct Inspector<R>
{
    reader: R,
    registry: &'static Registry,
    options: FormatOptions,
}

impl<R: MemoryReader> Inspector<R>
{
    /// Inspector over `reader` using the builtin registry
    pub fn new(reader: R, options: FormatOptions) -> Self
    {
        Self {
            reader,
            registry: Registry::builtin(),
            options,
        }
    }

    pub fn reader(&self) -> &R
    {
        &self.reader
    }

    pub fn options(&self) -> &FormatOptions
    {
        &self.options
    }

    pub fn registry(&self) -> &'static Registry
    {
        self.registry
    }

    /// Resolve a request into a top-level handle
    ///
    /// ## Errors
    ///
    /// `InvalidDescriptor` when the type name does not parse. This is the only
    /// failure a well-formed debugger can see; everything after this point is
    /// contained.
    pub fn handle(&self, request: &InspectRequest) -> Result<ValueHandle>
    {
        let options = request.options.as_ref().unwrap_or(&self.options);
        let version = request.version.unwrap_or(options.default_version);
        let descriptor = TypeDescriptor::parse(&request.type_name, version)?;
        debug!(address = %request.address, ty = %descriptor, "inspect request");
        Ok(ValueHandle::new(request.address, descriptor))
    }

    /// Lazy inspection of `handle` with the inspector's options
    pub fn inspect(&self, handle: &ValueHandle) -> Inspection<'_, R>
    {
        Inspection::new(self, handle.clone(), Cow::Borrowed(&self.options))
    }

    /// Lazy inspection of `handle` with request-specific options
    pub fn inspect_with(&self, handle: &ValueHandle, options: FormatOptions) -> Inspection<'_, R>
    {
        Inspection::new(self, handle.clone(), Cow::Owned(options))
    }

    /// Answer a request eagerly (summary plus first-level children)
    ///
    /// ## Errors
    ///
    /// Only when the type name does not parse.
    pub fn respond(&self, request: &InspectRequest) -> Result<FormatResult>
    {
        let handle = self.handle(request)?;
        let inspection = match &request.options {
            Some(options) => self.inspect_with(&handle, options.clone()),
            None => self.inspect(&handle),
        };
        Ok(inspection.into_result())
    }

    /// Summary and first-level children of `handle`
    pub fn format(&self, handle: &ValueHandle) -> FormatResult
    {
        self.inspect(handle).into_result()
    }

    /// Indented dump of `handle` expanded `depth` levels deep
    ///
    /// Each line is `key = summary` (or the leaf text); the root line names
    /// the type instead of a key.
    pub fn render_tree(&self, handle: &ValueHandle, depth: usize) -> String
    {
        let cache = PageCache::new(&self.reader);
        let cx = FormatContext::new(&cache, self.registry, &self.options);

        let mut out = String::new();
        let _ = writeln!(out, "{} = {}", handle.descriptor(), cx.summary_of(handle));
        render_children(&cx, handle, depth, 1, &mut out);
        out
    }
}

fn render_children(cx: &FormatContext<'_>, handle: &ValueHandle, remaining: usize, indent: usize, out: &mut String)
{
    if remaining == 0 {
        return;
    }
    for child in cx.children_of(handle) {
        let pad = indent * 2;
        match &child.value {
            ChildValue::Leaf(text) => {
                let _ = writeln!(out, "{:pad$}{} = {}", "", child.key, text);
            }
            ChildValue::Handle(nested) => {
                let _ = writeln!(out, "{:pad$}{} = {}", "", child.key, cx.summary_of(nested));
                render_children(cx, nested, remaining - 1, indent + 1, out);
            }
        }
    }
}

/// Lazily computed result for one handle
///
/// Summary and children are each computed on first access and then kept for
/// the lifetime of this object only. Both share one page cache.
pub struct Inspection<'i, R>
{
    cache: PageCache<&'i R>,
    registry: &'static Registry,
    options: Cow<'i, FormatOptions>,
    handle: ValueHandle,
    summary: OnceCell<Summary>,
    children: OnceCell<Vec<ChildEntry>>,
}

impl<'i, R: MemoryReader> Inspection<'i, R>
{
    fn new(inspector: &'i Inspector<R>, handle: ValueHandle, options: Cow<'i, FormatOptions>) -> Self
    {
        Self {
            cache: PageCache::new(&inspector.reader),
            registry: inspector.registry,
            options,
            handle,
            summary: OnceCell::new(),
            children: OnceCell::new(),
        }
    }

    fn context(&self) -> FormatContext<'_>
    {
        FormatContext::new(&self.cache, self.registry, &self.options)
    }

    pub fn handle(&self) -> &ValueHandle
    {
        &self.handle
    }

    /// The one-line summary; `None` for default/empty values and on any fault
    pub fn summary(&self) -> &Summary
    {
        self.summary.get_or_init(|| self.context().summary_of(&self.handle))
    }

    /// First-level children; empty on any fault
    pub fn children(&self) -> &[ChildEntry]
    {
        self.children.get_or_init(|| self.context().children_of(&self.handle))
    }

    /// Force both parts and return them
    pub fn into_result(self) -> FormatResult
    {
        self.summary();
        self.children();
        FormatResult {
            summary: self.summary.into_inner().unwrap_or_default(),
            children: self.children.into_inner().unwrap_or_default(),
        }
    }
}
