//! Strings, string views, and byte buffers.
//!
//! A view over part of a string (`QStringView` from `mid()`/`left()`) is just
//! another span, so its summary covers exactly the viewed code units.

use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{Adapter, TextEncoding, TextSpan, TypeLayout};
use crate::memory::{MemoryReaderExt, POINTER_SIZE};
use crate::render;
use crate::types::{Address, Summary, TypeDescriptor, ValueHandle};

/// Quoted rendering of `span`, cut at `max_len` units
///
/// ## Errors
///
/// `Unreadable` when the units cannot be read.
pub(crate) fn render_span(adapter: &Adapter<'_>, span: &TextSpan, max_len: usize) -> Result<String>
{
    let (bytes, more) = adapter.read_text(span, max_len)?;
    Ok(match span.encoding {
        TextEncoding::Utf16 => render::quote_text(&render::decode_utf16(&bytes), max_len, more),
        TextEncoding::Utf8 => render::quote_text(&String::from_utf8_lossy(&bytes), max_len, more),
        TextEncoding::Bytes => render::quote_bytes(&bytes, max_len, more),
    })
}

/// Unquoted, unescaped contents of `span` (file names, property names)
///
/// ## Errors
///
/// `Unreadable` when the units cannot be read.
pub(crate) fn plain_span(adapter: &Adapter<'_>, span: &TextSpan, max_len: usize) -> Result<String>
{
    let (bytes, _) = adapter.read_text(span, max_len)?;
    Ok(match span.encoding {
        TextEncoding::Utf16 => render::decode_utf16(&bytes),
        TextEncoding::Utf8 | TextEncoding::Bytes => String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Whether the `QString` at `address` is empty
pub(crate) fn qstring_is_empty(adapter: &Adapter<'_>, address: Address) -> Result<bool>
{
    Ok(adapter.string(address)?.len == 0)
}

fn qt_array_layout(descriptor: &TypeDescriptor) -> Option<TypeLayout>
{
    let size = crate::layout::tables::for_major(descriptor.version().major())?
        .array
        .object_size();
    Some(TypeLayout::new(size, POINTER_SIZE))
}

/// `QString`
pub struct QStringFormatter;

impl Formatter for QStringFormatter
{
    fn name(&self) -> &'static str
    {
        "qstring"
    }

    fn category(&self) -> Category
    {
        Category::Text
    }

    fn layout(&self, descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        qt_array_layout(descriptor)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let span = adapter.string(value.address())?;
        render_span(&adapter, &span, cx.options().max_string_len).map(Summary::text)
    }
}

/// `QByteArray`
pub struct ByteArrayFormatter;

impl Formatter for ByteArrayFormatter
{
    fn name(&self) -> &'static str
    {
        "qbytearray"
    }

    fn category(&self) -> Category
    {
        Category::Text
    }

    fn layout(&self, descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        qt_array_layout(descriptor)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let span = adapter.byte_array(value.address())?;
        render_span(&adapter, &span, cx.options().max_string_len).map(Summary::text)
    }
}

/// `QStringView`
pub struct StringViewFormatter;

impl Formatter for StringViewFormatter
{
    fn name(&self) -> &'static str
    {
        "qstringview"
    }

    fn category(&self) -> Category
    {
        Category::Text
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(16, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let span = adapter.string_view(value.address())?;
        render_span(&adapter, &span, cx.options().max_string_len).map(Summary::text)
    }
}

/// `std::basic_string<char>` (libstdc++)
pub struct StdStringFormatter;

impl Formatter for StdStringFormatter
{
    fn name(&self) -> &'static str
    {
        "std-string"
    }

    fn category(&self) -> Category
    {
        Category::Text
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(32, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let span = adapter.std_string(value.address())?;
        render_span(&adapter, &span, cx.options().max_string_len).map(Summary::text)
    }
}

/// NUL-terminated `char*`
///
/// The handle is the pointer variable; a null or garbage pointer has no summary.
pub struct CStringFormatter;

impl Formatter for CStringFormatter
{
    fn name(&self) -> &'static str
    {
        "c-string"
    }

    fn category(&self) -> Category
    {
        Category::Text
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let target = cx.pointers().follow(value.address())?;
        let max = cx.options().max_string_len;
        let (bytes, more) = cx.reader().read_c_string(target, max)?;
        Ok(Summary::text(render::quote_text(&String::from_utf8_lossy(&bytes), max, more)))
    }
}
