//! Ownership wrappers and raw pointers.
//!
//! Both classify the stored pointer first. A null or garbage pointer means no
//! summary and no children. `std::unique_ptr<T>` exposes its pointee as a
//! single `*` child annotated with the wrapper; a raw `T*` flattens, showing
//! the pointee's own summary and children in place.

use super::{type_arg, Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::TypeLayout;
use crate::types::{ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

/// `std::unique_ptr<T>`
pub struct UniquePtrFormatter;

impl UniquePtrFormatter
{
    fn pointee(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Option<ValueHandle>>
    {
        let target = type_arg(value.descriptor(), 0)?;
        Ok(cx
            .pointers()
            .load(value.address())?
            .valid()
            .map(|address| value.child(address, target.clone()).owned_by(value.descriptor())))
    }
}

impl Formatter for UniquePtrFormatter
{
    fn name(&self) -> &'static str
    {
        "unique-ptr"
    }

    fn category(&self) -> Category
    {
        Category::Ownership
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        Ok(Self::pointee(value, cx)?.map_or_else(Summary::none, |pointee| cx.summary_of(&pointee)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(Self::pointee(value, cx)?
            .map(|pointee| ChildEntry::handle(ChildKey::Pointee, pointee))
            .into_iter()
            .collect())
    }
}

/// Raw `T*` (any pointer depth)
pub struct PointerFormatter;

impl PointerFormatter
{
    fn pointee(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Option<ValueHandle>>
    {
        let Some(target) = value.descriptor().pointee() else {
            return Ok(None);
        };
        Ok(cx
            .pointers()
            .load(value.address())?
            .valid()
            .map(|address| value.child(address, target)))
    }
}

impl Formatter for PointerFormatter
{
    fn name(&self) -> &'static str
    {
        "pointer"
    }

    fn category(&self) -> Category
    {
        Category::Ownership
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let Some(pointee) = Self::pointee(value, cx)? else {
            return Ok(Summary::none());
        };
        // Nothing is known about an unregistered pointee; its address is the useful part
        if cx.registry().lookup(pointee.descriptor()).is_none() {
            return Ok(Summary::text(pointee.address().to_string()));
        }
        Ok(cx.summary_of(&pointee))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(Self::pointee(value, cx)?
            .map(|pointee| cx.children_of(&pointee))
            .unwrap_or_default())
    }
}
