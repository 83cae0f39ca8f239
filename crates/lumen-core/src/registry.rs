//! # Type Registry
//!
//! Closed mapping from a descriptor's base name (and library version) to the
//! formatter responsible for it. The table is built once, on first use, and
//! never changes afterwards. Lookup never fails: pointers go to the pointer
//! formatter, `char*` to the C string formatter, and anything unknown (or
//! known but not for this version) to the raw-bytes fallback.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::context::FormatContext;
use crate::formatters::{
    aggregate, assoc, cursor, file, json, object, owner, raw, scalar, sequence, text, variant, Category,
    Formatter,
};
use crate::layout::TypeLayout;
use crate::types::{TypeDescriptor, VersionTag};

static BUILTIN: Lazy<Registry> = Lazy::new(Registry::with_builtin_formatters);

/// Library versions an entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Versions
{
    /// Independent of the Qt version (scalars, standard library types)
    Any,
    /// Qt 5 and Qt 6 layouts are known
    Qt5And6,
    /// Only the Qt 6 layout is known
    Qt6,
}

impl Versions
{
    /// Whether values produced by `version` can be formatted
    pub fn supports(self, version: VersionTag) -> bool
    {
        match self {
            Versions::Any => true,
            Versions::Qt5And6 => matches!(version.major(), 5 | 6),
            Versions::Qt6 => version.major() == 6,
        }
    }
}

impl fmt::Display for Versions
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.pad(match self {
            Versions::Any => "any",
            Versions::Qt5And6 => "Qt5, Qt6",
            Versions::Qt6 => "Qt6",
        })
    }
}

struct Entry
{
    formatter: &'static dyn Formatter,
    versions: Versions,
}

/// One registered type name, for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredType
{
    pub name: &'static str,
    pub category: Category,
    pub versions: Versions,
}

/// Descriptor-to-formatter table
pub struct Registry
{
    entries: HashMap<&'static str, Entry>,
}

impl Registry
{
    /// The process-wide table of recognized types
    pub fn builtin() -> &'static Registry
    {
        &BUILTIN
    }

    fn with_builtin_formatters() -> Self
    {
        let mut registry = Self {
            entries: HashMap::new(),
        };

        for &(name, _) in scalar::SCALAR_TYPES {
            registry.register(&[name], &scalar::ScalarFormatter, Versions::Any);
        }

        registry.register(&["QString"], &text::QStringFormatter, Versions::Qt5And6);
        registry.register(&["QByteArray"], &text::ByteArrayFormatter, Versions::Qt5And6);
        registry.register(&["QStringView"], &text::StringViewFormatter, Versions::Any);
        registry.register(&["std::basic_string"], &text::StdStringFormatter, Versions::Any);
        registry.register(&["QFileInfo"], &file::FileInfoFormatter, Versions::Qt5And6);

        registry.register(&["QList", "QVector"], &sequence::QListFormatter, Versions::Qt5And6);
        registry.register(&["std::vector"], &sequence::StdVectorFormatter, Versions::Any);

        registry.register(&["QMap"], &assoc::QMapFormatter, Versions::Qt5And6);
        registry.register(&["std::map"], &assoc::StdMapFormatter, Versions::Any);
        registry.register(&["QHash"], &assoc::QHashFormatter, Versions::Qt6);

        registry.register(&["QUrl"], &aggregate::UrlFormatter, Versions::Qt5And6);
        registry.register(&["QRect"], &aggregate::RectFormatter, Versions::Any);
        registry.register(&["QPoint"], &aggregate::PointFormatter, Versions::Any);
        registry.register(&["QSize"], &aggregate::SizeFormatter, Versions::Any);
        registry.register(&["std::pair", "QPair"], &aggregate::PairFormatter, Versions::Any);

        registry.register(&["std::unique_ptr"], &owner::UniquePtrFormatter, Versions::Any);

        registry.register(&["QVariant"], &variant::VariantFormatter, Versions::Qt5And6);
        registry.register(&["QFile"], &file::FileFormatter, Versions::Qt5And6);
        registry.register(&["QTextCursor"], &cursor::CursorFormatter, Versions::Qt5And6);

        registry.register(&["QJsonArray"], &json::JsonArrayFormatter, Versions::Qt6);
        registry.register(&["QJsonObject"], &json::JsonObjectFormatter, Versions::Qt6);
        registry.register(&["QJsonValue"], &json::JsonValueFormatter, Versions::Qt6);

        registry.register(&["QObject"], &object::ObjectFormatter, Versions::Qt5And6);
        registry.register(
            &["QCoreApplication", "QGuiApplication", "QApplication"],
            &object::ApplicationFormatter,
            Versions::Qt5And6,
        );

        registry
    }

    fn register(&mut self, names: &[&'static str], formatter: &'static dyn Formatter, versions: Versions)
    {
        for &name in names {
            self.entries.insert(name, Entry { formatter, versions });
        }
    }

    /// Registered formatter for `descriptor`, without any fallback
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> Option<&'static dyn Formatter>
    {
        if descriptor.is_c_string() {
            return Some(&text::CStringFormatter);
        }
        if descriptor.is_pointer() {
            return Some(&owner::PointerFormatter);
        }
        self.entries
            .get(descriptor.name())
            .filter(|entry| entry.versions.supports(descriptor.version()))
            .map(|entry| entry.formatter)
    }

    /// Formatter for `descriptor`; unknown descriptors get the raw-bytes fallback
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> &'static dyn Formatter
    {
        self.lookup(descriptor).unwrap_or(&raw::RawFormatter)
    }

    /// Size and alignment of `descriptor`, if any formatter knows it
    pub fn layout_of(&self, descriptor: &TypeDescriptor, cx: &FormatContext<'_>) -> Option<TypeLayout>
    {
        if descriptor.is_pointer() {
            return Some(TypeLayout::POINTER);
        }
        self.resolve(descriptor).layout(descriptor, cx)
    }

    /// Registered base names, sorted
    pub fn type_names(&self) -> Vec<&'static str>
    {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered base names with their category and versions, sorted by name
    pub fn registered_types(&self) -> Vec<RegisteredType>
    {
        let mut types: Vec<_> = self
            .entries
            .iter()
            .map(|(&name, entry)| RegisteredType {
                name,
                category: entry.formatter.category(),
                versions: entry.versions,
            })
            .collect();
        types.sort_unstable_by_key(|ty| ty.name);
        types
    }
}

impl fmt::Debug for Registry
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Registry").field("types", &self.entries.len()).finish()
    }
}
