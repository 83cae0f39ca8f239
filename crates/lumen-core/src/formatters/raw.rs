//! Fallback for descriptors nothing else claims: a hex preview, no children.

use std::fmt::Write as _;

use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::{InspectError, Result};
use crate::layout::TypeLayout;
use crate::memory::MemoryReaderExt;
use crate::types::{Summary, TypeDescriptor, ValueHandle};

/// `<opaque: 48 65 6c 6c>` over the first bytes at `data`
pub fn opaque_preview(data: &[u8]) -> String
{
    let mut out = String::from("<opaque");
    if !data.is_empty() {
        out.push(':');
    }
    for byte in data {
        let _ = write!(out, " {byte:02x}");
    }
    out.push('>');
    out
}

/// Raw bytes of an unrecognized type
pub struct RawFormatter;

impl Formatter for RawFormatter
{
    fn name(&self) -> &'static str
    {
        "raw"
    }

    fn category(&self) -> Category
    {
        Category::Raw
    }

    fn layout(&self, _descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        None
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let len = cx.options().raw_preview_bytes;
        // The value may end at a region edge; show what is readable
        let bytes: Vec<u8> = (0..len as u64)
            .map_while(|offset| cx.reader().read_u8(value.address() + offset).ok())
            .collect();
        if bytes.is_empty() && len > 0 {
            return Err(InspectError::Unreadable {
                address: value.address(),
                size: len,
            });
        }
        Ok(Summary::text(opaque_preview(&bytes)))
    }
}
