//! Integers, floats, booleans, and characters.

use std::fmt::Write as _;

use super::{Category, Formatter};
use crate::context::FormatContext;
use crate::error::{InspectError, Result};
use crate::layout::TypeLayout;
use crate::memory::MemoryReaderExt;
use crate::render;
use crate::types::{Address, Summary, TypeDescriptor, ValueHandle};

/// Machine representation of a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind
{
    Bool,
    /// 8-bit character, shown quoted
    Char,
    /// UTF-16 code unit, shown quoted (`QChar`, `char16_t`)
    Char16,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarKind
{
    /// Size in bytes (alignment is the same)
    pub const fn size(self) -> usize
    {
        match self {
            ScalarKind::Bool | ScalarKind::Char | ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::Char16 | ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }
}

/// Recognized scalar spellings (LP64)
pub const SCALAR_TYPES: &[(&str, ScalarKind)] = &[
    ("bool", ScalarKind::Bool),
    ("char", ScalarKind::Char),
    ("signed char", ScalarKind::I8),
    ("qint8", ScalarKind::I8),
    ("int8_t", ScalarKind::I8),
    ("unsigned char", ScalarKind::U8),
    ("uchar", ScalarKind::U8),
    ("quint8", ScalarKind::U8),
    ("uint8_t", ScalarKind::U8),
    ("QChar", ScalarKind::Char16),
    ("char16_t", ScalarKind::Char16),
    ("short", ScalarKind::I16),
    ("qint16", ScalarKind::I16),
    ("int16_t", ScalarKind::I16),
    ("unsigned short", ScalarKind::U16),
    ("ushort", ScalarKind::U16),
    ("quint16", ScalarKind::U16),
    ("uint16_t", ScalarKind::U16),
    ("int", ScalarKind::I32),
    ("qint32", ScalarKind::I32),
    ("int32_t", ScalarKind::I32),
    ("unsigned int", ScalarKind::U32),
    ("unsigned", ScalarKind::U32),
    ("uint", ScalarKind::U32),
    ("quint32", ScalarKind::U32),
    ("uint32_t", ScalarKind::U32),
    ("char32_t", ScalarKind::U32),
    ("long", ScalarKind::I64),
    ("long long", ScalarKind::I64),
    ("qint64", ScalarKind::I64),
    ("qlonglong", ScalarKind::I64),
    ("qsizetype", ScalarKind::I64),
    ("qptrdiff", ScalarKind::I64),
    ("int64_t", ScalarKind::I64),
    ("ptrdiff_t", ScalarKind::I64),
    ("ssize_t", ScalarKind::I64),
    ("unsigned long", ScalarKind::U64),
    ("ulong", ScalarKind::U64),
    ("unsigned long long", ScalarKind::U64),
    ("quint64", ScalarKind::U64),
    ("qulonglong", ScalarKind::U64),
    ("quintptr", ScalarKind::U64),
    ("uint64_t", ScalarKind::U64),
    ("size_t", ScalarKind::U64),
    ("float", ScalarKind::F32),
    ("double", ScalarKind::F64),
    ("qreal", ScalarKind::F64),
];

/// Kind of a scalar type name
pub fn scalar_kind(name: &str) -> Option<ScalarKind>
{
    SCALAR_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, kind)| kind)
}

/// Formatter for every name in [`SCALAR_TYPES`]
pub struct ScalarFormatter;

impl ScalarFormatter
{
    fn kind(descriptor: &TypeDescriptor) -> Result<ScalarKind>
    {
        scalar_kind(descriptor.name()).ok_or_else(|| InspectError::UnsupportedType(descriptor.to_string()))
    }
}

impl Formatter for ScalarFormatter
{
    fn name(&self) -> &'static str
    {
        "scalar"
    }

    fn category(&self) -> Category
    {
        Category::Scalar
    }

    fn layout(&self, descriptor: &TypeDescriptor, _cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        let size = scalar_kind(descriptor.name())?.size();
        Some(TypeLayout::new(size, size))
    }

    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>
    {
        let kind = Self::kind(value.descriptor())?;
        read_scalar(cx, value.address(), kind).map(Summary::text)
    }
}

/// Literal form of the scalar of `kind` at `address`
///
/// ## Errors
///
/// `Unreadable` when the value cannot be read.
pub fn read_scalar(cx: &FormatContext<'_>, address: Address, kind: ScalarKind) -> Result<String>
{
    let reader = cx.reader();
    Ok(match kind {
        ScalarKind::Bool => (reader.read_u8(address)? != 0).to_string(),
        ScalarKind::Char => quote_char(u32::from(reader.read_u8(address)?)),
        ScalarKind::Char16 => quote_char(u32::from(reader.read_u16(address)?)),
        ScalarKind::I8 => i8::from_le_bytes(reader.read_array::<1>(address)?).to_string(),
        ScalarKind::U8 => reader.read_u8(address)?.to_string(),
        ScalarKind::I16 => reader.read_i16(address)?.to_string(),
        ScalarKind::U16 => reader.read_u16(address)?.to_string(),
        ScalarKind::I32 => reader.read_i32(address)?.to_string(),
        ScalarKind::U32 => reader.read_u32(address)?.to_string(),
        ScalarKind::I64 => reader.read_i64(address)?.to_string(),
        ScalarKind::U64 => reader.read_u64(address)?.to_string(),
        ScalarKind::F32 => render::format_f32(reader.read_f32(address)?),
        ScalarKind::F64 => render::format_f64(reader.read_f64(address)?),
    })
}

fn quote_char(code: u32) -> String
{
    let mut out = String::from("'");
    match char::from_u32(code) {
        Some('\'') => out.push_str("\\'"),
        Some('\\') => out.push_str("\\\\"),
        Some(c) if !c.is_control() => out.push(c),
        _ if code < 0o1000 => {
            let _ = write!(out, "\\{code:03o}");
        }
        _ => {
            let _ = write!(out, "\\u{{{code:x}}}");
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_scalar_names()
    {
        assert_eq!(scalar_kind("int"), Some(ScalarKind::I32));
        assert_eq!(scalar_kind("qreal"), Some(ScalarKind::F64));
        assert_eq!(scalar_kind("QString"), None);
    }

    #[test]
    fn test_quote_char()
    {
        assert_eq!(quote_char(u32::from(b'a')), "'a'");
        assert_eq!(quote_char(1), "'\\001'");
        assert_eq!(quote_char(0xe4), "'ä'");
    }
}
