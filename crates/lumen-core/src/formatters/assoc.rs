//! Associative containers.
//!
//! One child per association, keyed by the key's own summary (`["key1"]`,
//! `[10]`). Ordered maps enumerate in key order by walking the red-black tree
//! in order. `QHash` enumerates in bucket order, which depends on the hash
//! seed and is not portable between runs.

use tracing::debug;

use super::{key_text, type_arg, Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{tables, Adapter, HashShape, TreeShape, TypeLayout};
use crate::memory::POINTER_SIZE;
use crate::render;
use crate::types::{Address, ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

/// Key and mapped-value descriptors, plus the offset of the mapped value in a node
fn entry_types<'d>(cx: &FormatContext<'_>, map: &'d TypeDescriptor) -> Result<(&'d TypeDescriptor, &'d TypeDescriptor, TypeLayout, u64)>
{
    let key = type_arg(map, 0)?;
    let mapped = type_arg(map, 1)?;
    let (node, mapped_offset) = TypeLayout::pair(cx.layout_of(key)?, cx.layout_of(mapped)?);
    Ok((key, mapped, node, mapped_offset))
}

fn association(
    cx: &FormatContext<'_>,
    value: &ValueHandle,
    entry: Address,
    index: usize,
    (key, mapped, mapped_offset): (&TypeDescriptor, &TypeDescriptor, u64),
) -> ChildEntry
{
    let key_handle = value.child(entry, key.clone());
    let mapped_handle = value.child(entry + mapped_offset, mapped.clone());
    ChildEntry::handle(ChildKey::Key(key_text(cx, &key_handle, index)), mapped_handle)
}

/// In-order walk of `shape`, at most `max_children` associations
fn tree_children(
    cx: &FormatContext<'_>,
    value: &ValueHandle,
    adapter: &Adapter<'_>,
    shape: &TreeShape,
) -> Result<Vec<ChildEntry>>
{
    let (key, mapped, _, mapped_offset) = entry_types(cx, value.descriptor())?;
    let visible = render::visible_children(shape.len, cx.options().max_children);

    let mut children = Vec::with_capacity(visible + 1);
    let mut node = shape.first;
    for index in 0..visible {
        if node.is_null() || node == shape.header || !cx.pointers().classify(node).is_valid() {
            children.push(ChildEntry::leaf(ChildKey::Truncated, render::INVALID_LEAF));
            return Ok(children);
        }
        children.push(association(cx, value, node + shape.links.value, index, (key, mapped, mapped_offset)));

        if index + 1 < visible {
            match adapter.tree_successor(shape, node) {
                Ok(next) => node = next,
                Err(err) => {
                    debug!(node = %node, error = %err, "tree walk stopped");
                    children.push(ChildEntry::leaf(ChildKey::Truncated, render::INVALID_LEAF));
                    return Ok(children);
                }
            }
        }
    }
    if visible < shape.len {
        children.push(render::truncation_marker(shape.len - visible));
    }
    Ok(children)
}

/// `QMap<K, V>`
pub struct QMapFormatter;

impl Formatter for QMapFormatter
{
    fn name(&self) -> &'static str
    {
        "qmap"
    }

    fn category(&self) -> Category
    {
        Category::Associative
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let shape = cx.adapter(value).qt_map(value.address())?;
        Ok(render::size_summary(shape.map_or(0, |shape| shape.len)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let adapter = cx.adapter(value);
        match adapter.qt_map(value.address())? {
            Some(shape) => tree_children(cx, value, &adapter, &shape),
            None => Ok(Vec::new()),
        }
    }
}

/// `std::map<K, V>` (libstdc++)
pub struct StdMapFormatter;

impl Formatter for StdMapFormatter
{
    fn name(&self) -> &'static str
    {
        "std-map"
    }

    fn category(&self) -> Category
    {
        Category::Associative
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(tables::STD_MAP.object_size, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let shape = cx.adapter(value).std_map(value.address())?;
        Ok(render::size_summary(shape.len))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let adapter = cx.adapter(value);
        let shape = adapter.std_map(value.address())?;
        tree_children(cx, value, &adapter, &shape)
    }
}

/// Qt 6 `QHash<K, V>`
pub struct QHashFormatter;

impl QHashFormatter
{
    fn bucket_children(cx: &FormatContext<'_>, value: &ValueHandle, shape: &HashShape) -> Result<Vec<ChildEntry>>
    {
        let (key, mapped, node, mapped_offset) = entry_types(cx, value.descriptor())?;
        let layout = shape.layout;
        let visible = render::visible_children(shape.len, cx.options().max_children);

        let mut children = Vec::with_capacity(visible + 1);
        'spans: for span_index in 0..shape.span_count {
            if children.len() == visible {
                break;
            }
            let span = shape.spans + (span_index * layout.span_size) as u64;
            let offsets = cx.reader().read(span, layout.span_entries)?;
            if offsets.iter().all(|&offset| offset == layout.unused) {
                continue;
            }
            let entries = cx.pointers().follow(span + layout.span_storage)?;
            for &offset in &offsets {
                if offset == layout.unused {
                    continue;
                }
                if children.len() == visible {
                    break 'spans;
                }
                let entry = entries + (usize::from(offset) * node.size) as u64;
                let index = children.len();
                children.push(association(cx, value, entry, index, (key, mapped, mapped_offset)));
            }
        }
        if visible < shape.len {
            children.push(render::truncation_marker(shape.len - visible));
        }
        Ok(children)
    }
}

impl Formatter for QHashFormatter
{
    fn name(&self) -> &'static str
    {
        "qhash"
    }

    fn category(&self) -> Category
    {
        Category::Associative
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let shape = cx.adapter(value).hash(value.address())?;
        Ok(render::size_summary(shape.map_or(0, |shape| shape.len)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        match cx.adapter(value).hash(value.address())? {
            Some(shape) => Self::bucket_children(cx, value, &shape),
            None => Ok(Vec::new()),
        }
    }
}
