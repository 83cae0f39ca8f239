//! Fixed-field aggregates.
//!
//! Children are the declared fields in schema order. The summary is the
//! canonical serialized form, or `None` while the aggregate is still in its
//! default state (an empty `QUrl`, a null `QRect`).

use super::text::plain_span;
use super::{type_arg, Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::{TypeLayout, UrlFieldKind};
use crate::memory::MemoryReaderExt;
use crate::render;
use crate::types::{ChildEntry, ChildKey, Summary, TypeDescriptor, ValueHandle};

/// Port value of a locator without an explicit port
const DEFAULT_PORT: i32 = -1;

/// `QUrl`
pub struct UrlFormatter;

impl Formatter for UrlFormatter
{
    fn name(&self) -> &'static str
    {
        "qurl"
    }

    fn category(&self) -> Category
    {
        Category::Aggregate
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let url = adapter.url(value.address())?;
        let max = cx.options().max_string_len;

        let mut text = [""; 8].map(String::from);
        let mut port = DEFAULT_PORT;
        for (slot, field) in text.iter_mut().zip(url.fields) {
            let Some(location) = field.location else {
                continue;
            };
            match field.kind {
                UrlFieldKind::Text => *slot = plain_span(&adapter, &adapter.string(location)?, max)?,
                UrlFieldKind::Port => port = cx.reader().read_i32(location)?,
            }
        }

        let [scheme, user, password, host, _, path, query, fragment] = &text;
        if port == DEFAULT_PORT && text.iter().all(String::is_empty) {
            return Ok(Summary::none());
        }

        let mut out = String::new();
        if !scheme.is_empty() {
            out.push_str(scheme);
            out.push_str("://");
        }
        // The credentials separator is kept even without a password: `user:@host`
        if !user.is_empty() {
            out.push_str(user);
            out.push(':');
            out.push_str(password);
            out.push('@');
        }
        out.push_str(host);
        if port > 0 {
            out.push(':');
            out.push_str(&port.to_string());
        }
        out.push_str(path);
        if !query.is_empty() {
            out.push('?');
            out.push_str(query);
        }
        if !fragment.is_empty() {
            out.push('#');
            out.push_str(fragment);
        }
        Ok(Summary::text(render::quote_text(&out, max, false)))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let version = value.descriptor().version();
        let url = cx.adapter(value).url(value.address())?;
        Ok(url
            .fields
            .iter()
            .map(|field| {
                let key = ChildKey::field(field.name);
                let (type_name, default) = match field.kind {
                    UrlFieldKind::Text => ("QString", "\"\""),
                    UrlFieldKind::Port => ("int", "-1"),
                };
                match field.location {
                    Some(location) => {
                        ChildEntry::handle(key, value.child(location, TypeDescriptor::new(type_name, version)))
                    }
                    None => ChildEntry::leaf(key, default),
                }
            })
            .collect())
    }
}

/// Reads the `int` members of a plain geometry struct
fn int_fields<const N: usize>(cx: &FormatContext<'_>, value: &ValueHandle) -> Result<[i32; N]>
{
    let mut out = [0; N];
    for (index, slot) in out.iter_mut().enumerate() {
        *slot = cx.reader().read_i32(value.address() + (index * 4) as u64)?;
    }
    Ok(out)
}

fn int_children(value: &ValueHandle, names: &[&str]) -> Vec<ChildEntry>
{
    let int = TypeDescriptor::new("int", value.descriptor().version());
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            ChildEntry::handle(
                ChildKey::field(name),
                value.child(value.address() + (index * 4) as u64, int.clone()),
            )
        })
        .collect()
}

/// `QRect` (`x1, y1, x2, y2`; the null rect is `0, 0, -1, -1`)
pub struct RectFormatter;

impl Formatter for RectFormatter
{
    fn name(&self) -> &'static str
    {
        "qrect"
    }

    fn category(&self) -> Category
    {
        Category::Aggregate
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(16, 4))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let [x1, y1, x2, y2] = int_fields::<4>(cx, value)?;
        if [x1, y1, x2, y2] == [0, 0, -1, -1] {
            return Ok(Summary::none());
        }
        let width = i64::from(x2) - i64::from(x1) + 1;
        let height = i64::from(y2) - i64::from(y1) + 1;
        Ok(Summary::text(format!("{width}x{height}{x1:+}{y1:+}")))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, _cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(int_children(value, &["x1", "y1", "x2", "y2"]))
    }
}

/// `QPoint`
pub struct PointFormatter;

impl Formatter for PointFormatter
{
    fn name(&self) -> &'static str
    {
        "qpoint"
    }

    fn category(&self) -> Category
    {
        Category::Aggregate
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(8, 4))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let [x, y] = int_fields::<2>(cx, value)?;
        if [x, y] == [0, 0] {
            return Ok(Summary::none());
        }
        Ok(Summary::text(format!("({x}, {y})")))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, _cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(int_children(value, &["xp", "yp"]))
    }
}

/// `QSize` (the invalid size is `-1, -1`)
pub struct SizeFormatter;

impl Formatter for SizeFormatter
{
    fn name(&self) -> &'static str
    {
        "qsize"
    }

    fn category(&self) -> Category
    {
        Category::Aggregate
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::new(8, 4))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let [width, height] = int_fields::<2>(cx, value)?;
        if [width, height] == [-1, -1] {
            return Ok(Summary::none());
        }
        Ok(Summary::text(format!("{width}x{height}")))
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, _cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(int_children(value, &["wd", "ht"]))
    }
}

/// `std::pair<A, B>` and `QPair<A, B>`
pub struct PairFormatter;

impl PairFormatter
{
    fn members(value: &ValueHandle, cx: &FormatContext<'_>) -> Result<(ValueHandle, ValueHandle)>
    {
        let first = type_arg(value.descriptor(), 0)?;
        let second = type_arg(value.descriptor(), 1)?;
        let (_, offset) = TypeLayout::pair(cx.layout_of(first)?, cx.layout_of(second)?);
        Ok((
            value.child(value.address(), first.clone()),
            value.child(value.address() + offset, second.clone()),
        ))
    }
}

impl Formatter for PairFormatter
{
    fn name(&self) -> &'static str
    {
        "pair"
    }

    fn category(&self) -> Category
    {
        Category::Aggregate
    }

    fn layout(&self, descriptor: &TypeDescriptor, cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        let first = cx.layout_of(descriptor.arg(0)?).ok()?;
        let second = cx.layout_of(descriptor.arg(1)?).ok()?;
        Some(TypeLayout::pair(first, second).0)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let (first, second) = Self::members(value, cx)?;
        Ok(match (cx.summary_of(&first).into_inner(), cx.summary_of(&second).into_inner()) {
            (Some(a), Some(b)) => Summary::text(format!("({a}, {b})")),
            _ => Summary::none(),
        })
    }

    fn has_children(&self) -> bool
    {
        true
    }

    fn children(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        let (first, second) = Self::members(value, cx)?;
        Ok(vec![
            ChildEntry::handle(ChildKey::field("first"), first),
            ChildEntry::handle(ChildKey::field("second"), second),
        ])
    }
}

