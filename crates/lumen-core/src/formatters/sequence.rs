//! Sequential containers: `size=N` and `[0]..[N-1]` in insertion order.
//!
//! Children are derived from the container's current state on every call, so
//! after an element is erased the remaining elements are numbered from zero
//! again.

use super::{capped_children, type_arg, Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{ArraySpan, ElementStorage, TypeLayout};
use crate::memory::POINTER_SIZE;
use crate::pointer::PointerClass;
use crate::render;
use crate::types::{ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

/// Element handles of `span`, honouring the child limit
pub(crate) fn element_children(
    cx: &FormatContext<'_>,
    value: &ValueHandle,
    span: &ArraySpan,
    element: &TypeDescriptor,
) -> Result<Vec<ChildEntry>>
{
    capped_children(cx, span.len, |index| {
        let key = ChildKey::Index(index);
        let Some(slot) = span.slot(index) else {
            return Ok(ChildEntry::leaf(key, render::INVALID_LEAF));
        };
        Ok(match span.storage {
            ElementStorage::Inline => ChildEntry::handle(key, value.child(slot, element.clone())),
            ElementStorage::Indirect => match cx.pointers().load(slot) {
                Ok(PointerClass::Valid(target)) => ChildEntry::handle(key, value.child(target, element.clone())),
                Ok(PointerClass::Null) => ChildEntry::leaf(key, render::NULL_LEAF),
                Ok(PointerClass::Invalid(_)) | Err(_) => ChildEntry::leaf(key, render::INVALID_LEAF),
            },
        })
    })
}

/// `QList<T>` and `QVector<T>`
pub struct QListFormatter;

impl QListFormatter
{
    fn span(value: &ValueHandle, cx: &FormatContext<'_>, element: TypeLayout) -> Result<ArraySpan>
    {
        let adapter = cx.adapter(value);
        match value.descriptor().name() {
            "QVector" => adapter.vector(value.address(), element),
            _ => adapter.list(value.address(), element),
        }
    }
}

impl Formatter for QListFormatter
{
    fn name(&self) -> &'static str
    {
        "qlist"
    }

    fn category(&self) -> Category
    {
        Category::Sequence
    }

    fn layout(&self, descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        let size = crate::layout::tables::for_major(descriptor.version().major())?
            .array
            .object_size();
        Some(TypeLayout::new(size, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let element = type_arg(value.descriptor(), 0)?;
        // The length does not depend on the element layout; only the probe stride does
        let layout = cx.layout_of(element).unwrap_or(TypeLayout::POINTER);
        let span = Self::span(value, cx, layout)?;
        Ok(render::size_summary(span.len))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let element = type_arg(value.descriptor(), 0)?;
        let span = Self::span(value, cx, cx.layout_of(element)?)?;
        element_children(cx, value, &span, element)
    }
}

/// `std::vector<T>`
pub struct StdVectorFormatter;

impl Formatter for StdVectorFormatter
{
    fn name(&self) -> &'static str
    {
        "std-vector"
    }

    fn category(&self) -> Category
    {
        Category::Sequence
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(3 * POINTER_SIZE, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let element = cx.layout_of(type_arg(value.descriptor(), 0)?)?;
        let span = cx.adapter(value).std_vector(value.address(), element)?;
        Ok(render::size_summary(span.len))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let element = type_arg(value.descriptor(), 0)?;
        let span = cx.adapter(value).std_vector(value.address(), cx.layout_of(element)?)?;
        element_children(cx, value, &span, element)
    }
}
