//! # Formatters
//!
//! One formatter per semantic category. A formatter turns a [`ValueHandle`]
//! into a [`Summary`] and, on demand, a list of [`ChildEntry`] values. It
//! reads memory only through the [`FormatContext`] (which wraps the
//! per-request page cache) and reads raw layouts only through the version
//! [`Adapter`](crate::layout::Adapter).
//!
//! Formatters propagate faults with `?`. The context catches them and turns
//! them into a `None` summary or an empty children list, so a formatter never
//! needs to guard against its own failure.
//!
//! ## Categories
//!
//! | Module | Types |
//! |---|---|
//! | [`scalar`] | integers, floats, `bool`, `char` |
//! | [`text`] | `QString`, `QStringView`, `QByteArray`, `std::string`, `char*` |
//! | [`sequence`] | `QList`, `QVector`, `std::vector` |
//! | [`assoc`] | `QMap`, `std::map`, `QHash` |
//! | [`aggregate`] | `QUrl`, `QRect`, `QPoint`, `QSize`, `std::pair`, `QPair` |
//! | [`owner`] | `std::unique_ptr`, raw pointers |
//! | [`variant`] | `QVariant` |
//! | [`file`] | `QFile`, `QFileInfo` |
//! | [`cursor`] | `QTextCursor` |
//! | [`json`] | `QJsonArray`, `QJsonObject`, `QJsonValue` |
//! | [`object`] | `QObject`, `QCoreApplication` and friends |
//! | [`raw`] | everything else |

pub mod aggregate;
pub mod assoc;
pub mod cursor;
pub mod file;
pub mod json;
pub mod object;
pub mod owner;
pub mod raw;
pub mod scalar;
pub mod sequence;
pub mod text;
pub mod variant;

use std::fmt;

use crate::context::FormatContext;
use crate::error::{InspectError, Result};
use crate::layout::TypeLayout;
use crate::render;
use crate::types::{ChildEntry, Summary, TypeDescriptor, ValueHandle};

/// Semantic category of a formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category
{
    Scalar,
    Text,
    Sequence,
    Associative,
    Aggregate,
    Ownership,
    Variant,
    FileHandle,
    Cursor,
    Structured,
    Object,
    Raw,
}

impl fmt::Display for Category
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            Category::Scalar => "scalar",
            Category::Text => "text",
            Category::Sequence => "sequence",
            Category::Associative => "associative",
            Category::Aggregate => "aggregate",
            Category::Ownership => "ownership",
            Category::Variant => "variant",
            Category::FileHandle => "file",
            Category::Cursor => "cursor",
            Category::Structured => "structured",
            Category::Object => "object",
            Category::Raw => "raw",
        };
        f.pad(name)
    }
}

/// Summary and children for one family of types
///
/// Implementations are stateless unit structs registered once in the
/// [`Registry`](crate::Registry); everything request-specific arrives through
/// the context.
pub trait Formatter: Send + Sync
{
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Semantic category
    fn category(&self) -> Category;

    /// Size and alignment of a value of `descriptor`, if known
    fn layout(&self, descriptor: &TypeDescriptor, cx: &FormatContext<'_>) -> Option<TypeLayout>;

    /// One-line rendering
    ///
    /// ## Errors
    ///
    /// Any fault; the context turns it into `None`.
    fn summary(&self, value: &ValueHandle, cx: &FormatContext<'_>) -> Result<Summary>;

    /// Whether values of this category can ever be expanded
    fn has_children(&self) -> bool
    {
        false
    }

    /// Children, in the category's natural order
    ///
    /// Implementations list at most `max_children` entries and end with a
    /// truncation marker when they stopped early.
    ///
    /// ## Errors
    ///
    /// Any fault; the context turns it into an empty list.
    fn children(&self, _value: &ValueHandle, _cx: &FormatContext<'_>) -> Result<Vec<ChildEntry>>
    {
        Ok(Vec::new())
    }
}

/// Template argument `index`, or an error naming the incomplete type
pub(crate) fn type_arg(descriptor: &TypeDescriptor, index: usize) -> Result<&TypeDescriptor>
{
    descriptor
        .arg(index)
        .ok_or_else(|| InspectError::InvalidDescriptor(format!("{descriptor} is missing template argument {index}")))
}

/// Build up to `max_children` entries with `entry`, then the truncation marker
pub(crate) fn capped_children(
    cx: &FormatContext<'_>,
    total: usize,
    mut entry: impl FnMut(usize) -> Result<ChildEntry>,
) -> Result<Vec<ChildEntry>>
{
    let visible = render::visible_children(total, cx.options().max_children);
    let mut children = Vec::with_capacity(visible + 1);
    for index in 0..visible {
        children.push(entry(index)?);
    }
    if visible < total {
        children.push(render::truncation_marker(total - visible));
    }
    Ok(children)
}

/// Rendered map key for a child entry: `"key1"` for strings, `10` for ints
pub(crate) fn key_text(cx: &FormatContext<'_>, key: &ValueHandle, fallback: usize) -> String
{
    cx.summary_of(key).into_inner().unwrap_or_else(|| format!("#{fallback}"))
}
