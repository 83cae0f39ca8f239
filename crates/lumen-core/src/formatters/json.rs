//! Qt 6 JSON documents (`QJsonArray`, `QJsonObject`, `QJsonValue`).
//!
//! All three sit on the CBOR container that backs `QCborValue`: a list of
//! 16-byte elements plus a byte buffer for string payloads. Nested arrays and
//! objects are elements whose value slot holds another container pointer,
//! which is exactly the layout of a `QJsonArray`/`QJsonObject` object, so
//! they are exposed as handles of that type.

use super::text::render_span;
use super::{capped_children, Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{cbor_types, Adapter, CborContainer, CborElement, TypeLayout};
use crate::memory::POINTER_SIZE;
use crate::render;
use crate::types::{ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

/// Literal rendering of a non-container, non-string node
fn scalar_text(kind: i32, value: i64) -> Option<String>
{
    match kind {
        cbor_types::INTEGER => Some(value.to_string()),
        cbor_types::DOUBLE => Some(render::format_f64(f64::from_bits(u64::from_ne_bytes(value.to_ne_bytes())))),
        cbor_types::TRUE => Some("true".to_string()),
        cbor_types::FALSE => Some("false".to_string()),
        cbor_types::NULL => Some("null".to_string()),
        cbor_types::UNDEFINED => Some("undefined".to_string()),
        _ => None,
    }
}

/// Descriptor of the JSON container type for a CBOR node kind
fn container_type(kind: i32, value: &ValueHandle) -> Option<TypeDescriptor>
{
    let name = match kind {
        cbor_types::ARRAY => "QJsonArray",
        cbor_types::MAP => "QJsonObject",
        _ => return None,
    };
    Some(TypeDescriptor::new(name, value.descriptor().version()))
}

/// Quoted text of a string element, `""` when it has no payload
fn element_text(
    cx: &FormatContext<'_>,
    adapter: &Adapter<'_>,
    container: &CborContainer,
    element: &CborElement,
) -> Result<String>
{
    match adapter.cbor_bytes(container, element)? {
        Some(span) => render_span(adapter, &span, cx.options().max_string_len),
        None => Ok("\"\"".to_string()),
    }
}

fn element_entry(
    cx: &FormatContext<'_>,
    value: &ValueHandle,
    adapter: &Adapter<'_>,
    container: &CborContainer,
    key: ChildKey,
    element: &CborElement,
) -> Result<ChildEntry>
{
    if let Some(descriptor) = container_type(element.kind, value) {
        return Ok(ChildEntry::handle(key, value.child(element.address, descriptor)));
    }
    if matches!(element.kind, cbor_types::STRING | cbor_types::BYTE_ARRAY) {
        return Ok(ChildEntry::leaf(key, element_text(cx, adapter, container, element)?));
    }
    let text = scalar_text(element.kind, element.value).unwrap_or_else(|| format!("<cbor type {:#x}>", element.kind));
    Ok(ChildEntry::leaf(key, text))
}

fn json_layout() -> TypeLayout
{
    TypeLayout::POINTER
}

/// `QJsonArray`
pub struct JsonArrayFormatter;

impl Formatter for JsonArrayFormatter
{
    fn name(&self) -> &'static str
    {
        "qjsonarray"
    }

    fn category(&self) -> Category
    {
        Category::Structured
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(json_layout())
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let container = cx.adapter(value).cbor(value.address())?;
        Ok(render::size_summary(container.map_or(0, |c| c.elements.len)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let adapter = cx.adapter(value);
        let Some(container) = adapter.cbor(value.address())? else {
            return Ok(Vec::new());
        };
        capped_children(cx, container.elements.len, |index| {
            let element = adapter.cbor_element(&container, index)?;
            element_entry(cx, value, &adapter, &container, ChildKey::Index(index), &element)
        })
    }
}

/// `QJsonObject`: keys and values alternate in the element list
pub struct JsonObjectFormatter;

impl Formatter for JsonObjectFormatter
{
    fn name(&self) -> &'static str
    {
        "qjsonobject"
    }

    fn category(&self) -> Category
    {
        Category::Structured
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(json_layout())
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let container = cx.adapter(value).cbor(value.address())?;
        Ok(render::size_summary(container.map_or(0, |c| c.elements.len / 2)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let adapter = cx.adapter(value);
        let Some(container) = adapter.cbor(value.address())? else {
            return Ok(Vec::new());
        };
        capped_children(cx, container.elements.len / 2, |index| {
            let key_element = adapter.cbor_element(&container, 2 * index)?;
            let key = match key_element.kind {
                cbor_types::STRING => element_text(cx, &adapter, &container, &key_element)?,
                _ => format!("#{index}"),
            };
            let element = adapter.cbor_element(&container, 2 * index + 1)?;
            element_entry(cx, value, &adapter, &container, ChildKey::Key(key), &element)
        })
    }
}

/// `QJsonValue`
pub struct JsonValueFormatter;

impl JsonValueFormatter
{
    /// The nested array or object, when the value holds one
    fn nested(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Option<ValueHandle>>
    {
        let shape = cx.adapter(value).json_value(value.address())?;
        Ok(container_type(shape.kind, value).map(|descriptor| value.child(shape.container_field, descriptor)))
    }
}

impl Formatter for JsonValueFormatter
{
    fn name(&self) -> &'static str
    {
        "qjsonvalue"
    }

    fn category(&self) -> Category
    {
        Category::Structured
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(3 * POINTER_SIZE, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let shape = adapter.json_value(value.address())?;
        if let Some(descriptor) = container_type(shape.kind, value) {
            return Ok(cx.summary_of(&value.child(shape.container_field, descriptor)));
        }
        if matches!(shape.kind, cbor_types::STRING | cbor_types::BYTE_ARRAY) {
            let Some(container) = adapter.cbor(shape.container_field)? else {
                return Ok(Summary::text("\"\""));
            };
            let index = usize::try_from(shape.n).unwrap_or(usize::MAX);
            let element = adapter.cbor_element(&container, index)?;
            return Ok(Summary::text(element_text(cx, &adapter, &container, &element)?));
        }
        Ok(scalar_text(shape.kind, shape.n).map_or_else(Summary::none, Summary::text))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(Self::nested(value, cx)?
            .map(|nested| cx.children_of(&nested))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_scalar_text()
    {
        assert_eq!(scalar_text(cbor_types::INTEGER, -7).as_deref(), Some("-7"));
        assert_eq!(scalar_text(cbor_types::TRUE, 0).as_deref(), Some("true"));
        assert_eq!(scalar_text(cbor_types::NULL, 0).as_deref(), Some("null"));
        let bits = i64::from_ne_bytes(1.5f64.to_bits().to_ne_bytes());
        assert_eq!(scalar_text(cbor_types::DOUBLE, bits).as_deref(), Some("1.5"));
        assert_eq!(scalar_text(cbor_types::STRING, 0), None);
    }
}
