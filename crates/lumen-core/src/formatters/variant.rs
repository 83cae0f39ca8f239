//! `QVariant`: flattened delegation to whatever the variant holds.
//!
//! Qt 6 names the contained type through its `QMetaTypeInterface`; Qt 5
//! stores a builtin type id. Either way the name is parsed into a descriptor
//! and the payload is formatted as if it were a variable of that type.

use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{tables, TypeLayout, VariantPayload};
use crate::memory::POINTER_SIZE;
use crate::types::{ChildEntry, Summary, TypeDescriptor, ValueHandle};

/// `QVariant`
pub struct VariantFormatter;

impl VariantFormatter
{
    fn payload(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Option<ValueHandle>>
    {
        match cx.adapter(value).variant(value.address())? {
            VariantPayload::Empty => Ok(None),
            VariantPayload::Value { data, type_name } => {
                let descriptor = TypeDescriptor::parse(&type_name, value.descriptor().version())?;
                Ok(Some(value.child(data, descriptor)))
            }
        }
    }
}

impl Formatter for VariantFormatter
{
    fn name(&self) -> &'static str
    {
        "qvariant"
    }

    fn category(&self) -> Category
    {
        Category::Variant
    }

    fn layout(&self, descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        let size = tables::for_major(descriptor.version().major())?.variant.object_size();
        Some(TypeLayout::new(size, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        Ok(Self::payload(value, cx)?.map_or_else(Summary::none, |payload| cx.summary_of(&payload)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(Self::payload(value, cx)?
            .map(|payload| cx.children_of(&payload))
            .unwrap_or_default())
    }
}
