//! `QObject` and the application singletons.
//!
//! Children are the `parent` pointer, the `children` list and one entry per
//! dynamic property (`setProperty` with a name that is not a declared
//! property). Dynamic properties live in the lazily allocated extra data, so
//! an object that never had a name or property shows just the first two.

use tracing::debug;

use super::sequence::element_children;
use super::text::{plain_span, qstring_is_empty, render_span};
use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{ObjectExtra, TypeLayout};
use crate::memory::{MemoryReaderExt, POINTER_SIZE};
use crate::render;
use crate::types::{ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

fn object_layout() -> TypeLayout
{
    // vtable + d_ptr
    TypeLayout::new(2 * POINTER_SIZE, POINTER_SIZE)
}

fn object_children(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
{
    let version = value.descriptor().version();
    let object_ptr = TypeDescriptor::new("QObject", version).pointer_to();
    let child_list = TypeDescriptor::new("QList", version).with_args([object_ptr.clone()]);

    let shape = cx.adapter(value).object(value.address())?;
    let mut children = vec![
        ChildEntry::handle(ChildKey::field("parent"), value.child(shape.parent, object_ptr)),
        ChildEntry::handle(ChildKey::field("children"), value.child(shape.children, child_list)),
    ];
    if let Some(extra) = shape.extra {
        children.extend(dynamic_properties(value, cx, &extra)?);
    }
    Ok(children)
}

/// `[name]` entries pairing the property name list with the value list
fn dynamic_properties(value: &ValueHandle, cx: &FormatContext<'_>, extra: &ObjectExtra) -> Result<Vec<ChildEntry>>
{
    let version = value.descriptor().version();
    let name_type = TypeDescriptor::new("QByteArray", version);
    let value_type = TypeDescriptor::new("QVariant", version);

    let adapter = cx.adapter(value);
    let names = adapter.list(extra.property_names, cx.layout_of(&name_type)?)?;
    let values = adapter.list(extra.property_values, cx.layout_of(&value_type)?)?;
    if names.len != values.len {
        debug!(address = %value.address(), names = names.len, values = values.len, "dynamic property lists differ");
    }

    let names = element_children(cx, value, &names, &name_type)?;
    let values = element_children(cx, value, &values, &value_type)?;
    let max = cx.options().max_string_len;

    let mut properties = Vec::with_capacity(names.len());
    for (index, (name, mut property)) in names.into_iter().zip(values).enumerate() {
        if property.key != ChildKey::Truncated {
            let label = match name.as_handle() {
                Some(handle) => plain_span(&adapter, &adapter.byte_array(handle.address())?, max)?,
                None => format!("#{index}"),
            };
            property.key = ChildKey::Key(label);
        }
        properties.push(property);
    }
    Ok(properties)
}

/// `QObject`: `{"objectName"}`
pub struct ObjectFormatter;

impl Formatter for ObjectFormatter
{
    fn name(&self) -> &'static str
    {
        "qobject"
    }

    fn category(&self) -> Category
    {
        Category::Object
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(object_layout())
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let shape = adapter.object(value.address())?;
        let Some(extra) = shape.extra else {
            return Ok(Summary::none());
        };
        if qstring_is_empty(&adapter, extra.object_name)? {
            return Ok(Summary::none());
        }
        let name = render_span(&adapter, &adapter.string(extra.object_name)?, cx.options().max_string_len)?;
        Ok(Summary::text(format!("{{{name}}}")))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        object_children(value, cx)
    }
}

/// `QCoreApplication` and subclasses: the quoted command line
pub struct ApplicationFormatter;

impl Formatter for ApplicationFormatter
{
    fn name(&self) -> &'static str
    {
        "qapplication"
    }

    fn category(&self) -> Category
    {
        Category::Object
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(object_layout())
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let options = cx.options();
        let (args, argc) = cx
            .adapter(value)
            .application_args(value.address(), options.max_children)?;

        let mut rendered = Vec::with_capacity(args.len() + 1);
        for arg in &args {
            let arg = cx.pointers().classify(*arg).require()?;
            let (bytes, more) = cx.reader().read_c_string(arg, options.max_string_len)?;
            rendered.push(render::quote_text(&String::from_utf8_lossy(&bytes), options.max_string_len, more));
        }
        if argc > args.len() {
            rendered.push("...".to_string());
        }
        Ok(Summary::text(format!("{{{}}}", rendered.join(" "))))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        object_children(value, cx)
    }
}
