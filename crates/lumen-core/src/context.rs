//! # Dispatch Context
//!
//! [`FormatContext`] is what a formatter sees: the request's reader (already
//! wrapped in a page cache), the registry, and the limits. It is also the
//! containment boundary. [`FormatContext::summary_of`] and
//! [`FormatContext::children_of`] classify the handle, dispatch to the
//! registered formatter, enforce the depth and child ceilings, and swallow
//! every [`InspectError`](crate::InspectError) into a well-defined result.
//!
//! Formatters call back into `summary_of`/`children_of` for nested values
//! (a pair's members, a map's keys, a variant's payload), so nested values get
//! the same protection as top-level ones.

use tracing::{debug, trace};

use crate::config::FormatOptions;
use crate::error::{InspectError, Result};
use crate::layout::{Adapter, TypeLayout};
use crate::memory::MemoryReader;
use crate::pointer::PointerResolver;
use crate::registry::Registry;
use crate::render;
use crate::types::{ChildEntry, FormatResult, Summary, TypeDescriptor, ValueHandle};

/// Everything a formatter may use while serving one request
#[derive(Clone, Copy)]
pub struct FormatContext<'a>
{
    reader: &'a dyn MemoryReader,
    registry: &'a Registry,
    options: &'a FormatOptions,
}

impl<'a> FormatContext<'a>
{
    pub fn new(reader: &'a dyn MemoryReader, registry: &'a Registry, options: &'a FormatOptions) -> Self
    {
        Self {
            reader,
            registry,
            options,
        }
    }

    pub fn reader(&self) -> &'a dyn MemoryReader
    {
        self.reader
    }

    pub fn registry(&self) -> &'a Registry
    {
        self.registry
    }

    pub fn options(&self) -> &'a FormatOptions
    {
        self.options
    }

    /// Version adapter for the revision that produced `value`
    pub fn adapter(&self, value: &ValueHandle) -> Adapter<'a>
    {
        Adapter::new(self.reader, value.descriptor().version())
    }

    pub fn pointers(&self) -> PointerResolver<'a, dyn MemoryReader + 'a>
    {
        PointerResolver::new(self.reader)
    }

    /// Size and alignment of `descriptor`
    ///
    /// ## Errors
    ///
    /// `UnsupportedType` when no registered formatter knows the layout.
    pub fn layout_of(&self, descriptor: &TypeDescriptor) -> Result<TypeLayout>
    {
        self.registry
            .layout_of(descriptor, self)
            .ok_or_else(|| InspectError::UnsupportedType(descriptor.to_string()))
    }

    /// Summary of `value`; never fails
    pub fn summary_of(&self, value: &ValueHandle) -> Summary
    {
        if value.depth() > self.options.max_depth {
            contained::<()>(
                Err(InspectError::TruncatedOutput {
                    limit: self.options.max_depth,
                }),
                value,
                "summary",
            );
            return Summary::none();
        }

        let formatter = self.registry.resolve(value.descriptor());
        trace!(formatter = formatter.name(), address = %value.address(), "summary");
        let result = self.admit(value).and_then(|()| formatter.summary(value, self));
        contained(result, value, "summary").unwrap_or_default()
    }

    /// Children of `value`; never fails
    ///
    /// At the depth ceiling the only child is a marker entry. Lists longer
    /// than `max_children` end with a truncation marker.
    pub fn children_of(&self, value: &ValueHandle) -> Vec<ChildEntry>
    {
        let formatter = self.registry.resolve(value.descriptor());
        if !formatter.has_children() {
            return Vec::new();
        }
        if contained(self.admit(value), value, "children").is_none() {
            return Vec::new();
        }
        if value.depth() >= self.options.max_depth {
            debug!(
                address = %value.address(),
                ty = %value.descriptor(),
                limit = self.options.max_depth,
                "depth limit reached"
            );
            return vec![render::depth_marker(self.options.max_depth)];
        }

        trace!(formatter = formatter.name(), address = %value.address(), "children");
        let mut children = contained(formatter.children(value, self), value, "children").unwrap_or_default();

        let limit = self.options.max_children;
        if children.len() > limit + 1 {
            let hidden = children.len() - limit;
            children.truncate(limit);
            children.push(render::truncation_marker(hidden));
        }
        children
    }

    /// Summary and first-level children of `value`
    pub fn format(&self, value: &ValueHandle) -> FormatResult
    {
        FormatResult {
            summary: self.summary_of(value),
            children: self.children_of(value),
        }
    }

    /// Classify the handle itself before any formatter looks at it
    fn admit(&self, value: &ValueHandle) -> Result<()>
    {
        let layout = self
            .registry
            .layout_of(value.descriptor(), self)
            .unwrap_or(TypeLayout::new(1, 1));
        self.pointers()
            .classify_sized(value.address(), layout.size, layout.align)
            .require()
            .map(|_| ())
    }
}

fn contained<T>(result: Result<T>, value: &ValueHandle, stage: &'static str) -> Option<T>
{
    match result {
        Ok(output) => Some(output),
        Err(err) => {
            debug!(
                address = %value.address(),
                ty = %value.descriptor(),
                stage,
                error = %err,
                "contained formatting fault"
            );
            None
        }
    }
}
