//! `QFile` and `QFileInfo`.

use super::text::{plain_span, render_span};
use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::Result;
use crate::layout::TypeLayout;
use crate::memory::POINTER_SIZE;
use crate::render;
use crate::types::{Summary, TypeDescriptor, ValueHandle};

/// `QFileDevice::FileError` names, indexed by value
const FILE_ERRORS: &[&str] = &[
    "NoError",
    "ReadError",
    "WriteError",
    "FatalError",
    "ResourceError",
    "OpenError",
    "AbortError",
    "TimeOutError",
    "UnspecifiedError",
    "RemoveError",
    "RenameError",
    "PositionError",
    "ResizeError",
    "PermissionsError",
    "CopyError",
];

/// Name of a file error state; unknown values render as their number
pub fn file_error_name(error: i32) -> String
{
    usize::try_from(error)
        .ok()
        .and_then(|index| FILE_ERRORS.get(index))
        .map_or_else(|| error.to_string(), |name| (*name).to_string())
}

/// `QFile`: `{filename=<path>, openmode=<flags>, error=<state>}`
pub struct FileFormatter;

impl Formatter for FileFormatter
{
    fn name(&self) -> &'static str
    {
        "qfile"
    }

    fn category(&self) -> Category
    {
        Category::FileHandle
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        // vtable + d_ptr
        Some(TypeLayout::new(2 * POINTER_SIZE, POINTER_SIZE))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let adapter = cx.adapter(value);
        let Some(state) = adapter.file(value.address())? else {
            return Ok(Summary::none());
        };
        let options = cx.options();
        let file_name = plain_span(&adapter, &adapter.string(state.file_name)?, options.max_string_len)?;
        Ok(Summary::text(format!(
            "{{filename={file_name}, openmode={}, error={}}}",
            render::join_flags(state.open_mode, &options.open_mode_labels),
            file_error_name(state.error),
        )))
    }
}

/// `QFileInfo`: the quoted file path
pub struct FileInfoFormatter;

impl Formatter for FileInfoFormatter
{
    fn name(&self) -> &'static str
    {
        "qfileinfo"
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
        let adapter = cx.adapter(value);
        let Some(path) = adapter.file_info_path(value.address())? else {
            return Ok(Summary::none());
        };
        let span = adapter.string(path)?;
        Ok(Summary::text(render_span(&adapter, &span, cx.options().max_string_len)?))
    }
}
