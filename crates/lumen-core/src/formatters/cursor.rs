//! `QTextCursor`: `{pos=<position>, anchor=<anchor>}`, no children.

use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::TypeLayout;
use crate::types::{Summary, TypeDescriptor, ValueHandle};

/// `QTextCursor`
pub struct CursorFormatter;

impl Formatter for CursorFormatter
{
    fn name(&self) -> &'static str
    {
        "qtextcursor"
    }

    fn category(&self) -> Category
    {
        Category::Cursor
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        Some(TypeLayout::POINTER)
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        Ok(match cx.adapter(value).cursor(value.address())? {
            Some(cursor) => Summary::text(format!("{{pos={}, anchor={}}}", cursor.position, cursor.anchor)),
            None => Summary::none(),
        })
    }
}
