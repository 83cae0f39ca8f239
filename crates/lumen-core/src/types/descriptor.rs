//! Type descriptors and library version tags.
//!
//! A [`TypeDescriptor`] is the registry lookup key: a normalized, qualified
//! type name (with parsed template arguments and pointer depth) plus the
//! [`VersionTag`] of the library that produced the value. Descriptors are
//! immutable once parsed.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{InspectError, Result};

/// Nesting ceiling for template arguments, guards against hostile type names
const MAX_TEMPLATE_DEPTH: usize = 32;

/// Library revision a value was produced by
///
/// Only the major version selects a layout today; minor and patch are kept
/// so that a revision-specific table can be added without changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag
{
    major: u8,
    minor: u8,
    patch: u8,
}

impl VersionTag
{
    /// Qt 5 (5.15 layouts)
    pub const QT5: Self = Self::new(5, 15, 0);
    /// Qt 6 (6.3 layouts), the fallback when detection fails
    pub const QT6: Self = Self::new(6, 3, 0);

    /// Create a version tag from its components
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self
    {
        Self { major, minor, patch }
    }

    /// Decode the packed `0xMMNNPP` form Qt stores in `qtHookData[2]`
    ///
    /// ```rust
    /// use lumen_core::types::VersionTag;
    ///
    /// assert_eq!(VersionTag::from_hook_data(0x060300), VersionTag::new(6, 3, 0));
    /// ```
    pub const fn from_hook_data(packed: u64) -> Self
    {
        Self::new(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        )
    }

    /// Major version component
    pub const fn major(self) -> u8
    {
        self.major
    }

    /// Minor version component
    pub const fn minor(self) -> u8
    {
        self.minor
    }

    /// Patch version component
    pub const fn patch(self) -> u8
    {
        self.patch
    }
}

impl Default for VersionTag
{
    fn default() -> Self
    {
        Self::QT6
    }
}

impl fmt::Display for VersionTag
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionTag
{
    type Err = InspectError;

    /// Accepts `6`, `6.3`, `5.15.2`, `Qt6`, and the packed hex form `0x060300`.
    fn from_str(s: &str) -> Result<Self>
    {
        let trimmed = s.trim();
        let invalid = || InspectError::InvalidDescriptor(format!("invalid version tag '{trimmed}'"));

        if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            let packed = u64::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(Self::from_hook_data(packed));
        }

        let digits = trimmed
            .strip_prefix("Qt")
            .or_else(|| trimmed.strip_prefix("qt"))
            .unwrap_or(trimmed);
        let mut parts = digits.split('.').map(|part| part.parse::<u8>().map_err(|_| invalid()));
        let major = parts.next().ok_or_else(invalid)??;
        let minor = parts.next().transpose()?.unwrap_or(0);
        let patch = parts.next().transpose()?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

/// Parsed, normalized type name bound to a library version
///
/// ## Normalization
///
/// - `const`/`volatile`/`class`/`struct` qualifiers and references are dropped
/// - inline standard library namespaces (`std::__1::`, `std::__cxx11::`) fold to `std::`
/// - whitespace is canonical, so `QMap<QString,int>` and `QMap<QString, int>` are equal
/// - Qt convenience aliases expand (`QStringList` is `QList<QString>`)
///
/// ## Example
///
/// ```rust
/// use lumen_core::types::{TypeDescriptor, VersionTag};
///
/// let desc = TypeDescriptor::parse("const std::__1::vector<QString> &", VersionTag::QT6)?;
/// assert_eq!(desc.name(), "std::vector");
/// assert_eq!(desc.to_string(), "std::vector<QString>");
/// # Ok::<(), lumen_core::InspectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor
{
    name: String,
    args: Vec<TypeDescriptor>,
    pointer_depth: u8,
    version: VersionTag,
}

impl TypeDescriptor
{
    /// Descriptor for a non-template, non-pointer type
    ///
    /// The name is taken as-is; use [`TypeDescriptor::parse`] for untrusted text.
    pub fn new(name: impl Into<String>, version: VersionTag) -> Self
    {
        Self {
            name: name.into(),
            args: Vec::new(),
            pointer_depth: 0,
            version,
        }
    }

    /// Parse a type name as printed by a debugger or stored in type metadata
    ///
    /// ## Errors
    ///
    /// Returns [`InspectError::InvalidDescriptor`] for unbalanced brackets,
    /// empty template arguments, characters that cannot appear in a type name,
    /// or nesting deeper than the parser accepts.
    pub fn parse(text: &str, version: VersionTag) -> Result<Self>
    {
        parse_type(text, version, 0).map(Self::expand_alias)
    }

    /// Qualified base name without template arguments, e.g. `QList`
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Template arguments in declaration order
    pub fn args(&self) -> &[TypeDescriptor]
    {
        &self.args
    }

    /// Template argument at `index`
    pub fn arg(&self, index: usize) -> Option<&TypeDescriptor>
    {
        self.args.get(index)
    }

    /// Library revision this descriptor was resolved under
    pub fn version(&self) -> VersionTag
    {
        self.version
    }

    /// Number of `*` after the base type
    pub fn pointer_depth(&self) -> u8
    {
        self.pointer_depth
    }

    /// Whether this descriptor is a raw pointer type
    pub fn is_pointer(&self) -> bool
    {
        self.pointer_depth > 0
    }

    /// Whether this is a `char*`-like NUL-terminated string pointer
    pub fn is_c_string(&self) -> bool
    {
        self.pointer_depth == 1 && matches!(self.name.as_str(), "char" | "signed char" | "unsigned char")
    }

    /// The type this pointer points at, if this is a pointer
    pub fn pointee(&self) -> Option<TypeDescriptor>
    {
        if self.pointer_depth == 0 {
            return None;
        }
        let mut pointee = self.clone();
        pointee.pointer_depth -= 1;
        Some(pointee)
    }

    /// Pointer to this type
    #[must_use]
    pub fn pointer_to(&self) -> TypeDescriptor
    {
        let mut pointer = self.clone();
        pointer.pointer_depth = pointer.pointer_depth.saturating_add(1);
        pointer
    }

    /// Same descriptor with template arguments replaced
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = TypeDescriptor>) -> Self
    {
        self.args = args.into_iter().collect();
        self
    }

    /// Same descriptor (and template arguments) under another version
    #[must_use]
    pub fn with_version(mut self, version: VersionTag) -> Self
    {
        self.version = version;
        for arg in &mut self.args {
            *arg = arg.clone().with_version(version);
        }
        self
    }

    fn expand_alias(self) -> Self
    {
        let version = self.version;
        let parsed = |text: &str| parse_type(text, version, 0).ok();
        let replacement = if self.args.is_empty() {
            match self.name.as_str() {
                "QStringList" => parsed("QList<QString>"),
                "QByteArrayList" => parsed("QList<QByteArray>"),
                "QVariantList" => parsed("QList<QVariant>"),
                "QVariantMap" => parsed("QMap<QString, QVariant>"),
                "QVariantHash" => parsed("QHash<QString, QVariant>"),
                "QObjectList" => parsed("QList<QObject*>"),
                "std::string" => parsed("std::basic_string<char>"),
                _ => None,
            }
        } else {
            None
        };

        let mut expanded = match replacement {
            Some(mut desc) => {
                desc.pointer_depth = desc.pointer_depth.saturating_add(self.pointer_depth);
                desc
            }
            None => self,
        };
        expanded.args = expanded.args.into_iter().map(Self::expand_alias).collect();
        expanded
    }
}

impl fmt::Display for TypeDescriptor
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.pointer_depth {
            f.write_str("*")?;
        }
        Ok(())
    }
}

fn parse_type(text: &str, version: VersionTag, depth: usize) -> Result<TypeDescriptor>
{
    if depth > MAX_TEMPLATE_DEPTH {
        return Err(InspectError::InvalidDescriptor(format!(
            "template nesting deeper than {MAX_TEMPLATE_DEPTH}"
        )));
    }

    let mut s = text.trim();
    let mut pointer_depth: u8 = 0;
    loop {
        if let Some(rest) = s.strip_suffix('*') {
            pointer_depth = pointer_depth.saturating_add(1);
            s = rest.trim_end();
        } else if let Some(rest) = s.strip_suffix('&') {
            s = rest.trim_end();
        } else if let Some(rest) = s.strip_suffix(" const").or_else(|| s.strip_suffix(" volatile")) {
            s = rest.trim_end();
        } else {
            break;
        }
    }
    while let Some(rest) = ["const ", "volatile ", "class ", "struct ", "enum "]
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
    {
        s = rest.trim_start();
    }

    let (base, args) = match s.find('<') {
        None => (s, Vec::new()),
        Some(open) => {
            let inner = s[open + 1..]
                .trim_end()
                .strip_suffix('>')
                .ok_or_else(|| InspectError::InvalidDescriptor(format!("unterminated template in '{text}'")))?;
            let args = split_args(inner, text)?
                .into_iter()
                .map(|arg| parse_type(arg, version, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            (&s[..open], args)
        }
    };

    let name = normalize_base(base);
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | ' ' | '-' | '.'));
    if !valid {
        return Err(InspectError::InvalidDescriptor(format!("invalid type name '{text}'")));
    }

    Ok(TypeDescriptor {
        name,
        args,
        pointer_depth,
        version,
    })
}

/// Split template arguments at top-level commas
fn split_args<'a>(inner: &'a str, whole: &str) -> Result<SmallVec<[&'a str; 4]>>
{
    let mut args = SmallVec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| InspectError::InvalidDescriptor(format!("unbalanced brackets in '{whole}'")))?;
            }
            ',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(InspectError::InvalidDescriptor(format!("unbalanced brackets in '{whole}'")));
    }
    args.push(&inner[start..]);

    if args.iter().any(|arg: &&str| arg.trim().is_empty()) {
        return Err(InspectError::InvalidDescriptor(format!("empty template argument in '{whole}'")));
    }
    Ok(args)
}

fn normalize_base(base: &str) -> String
{
    let collapsed = base.split_whitespace().collect::<Vec<_>>().join(" ");
    let unrooted = collapsed.strip_prefix("::").unwrap_or(&collapsed);
    ["std::__1::", "std::__2::", "std::__cxx11::"]
        .iter()
        .fold(unrooted.to_string(), |name, inline_ns| name.replace(inline_ns, "std::"))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn parse(text: &str) -> TypeDescriptor
    {
        TypeDescriptor::parse(text, VersionTag::QT6).unwrap()
    }

    #[test]
    fn test_parse_nested_templates()
    {
        let desc = parse("QMap<QString,QMap<QString,int>>");
        assert_eq!(desc.name(), "QMap");
        assert_eq!(desc.args().len(), 2);
        assert_eq!(desc.arg(1).unwrap().to_string(), "QMap<QString, int>");
        assert_eq!(desc.to_string(), "QMap<QString, QMap<QString, int>>");
    }

    #[test]
    fn test_parse_many_and_deeply_nested_arguments()
    {
        let desc = parse("std::tuple<int, char, bool, double, QList<QList<QMap<int, QString>>>>");
        assert_eq!(desc.args().len(), 5);
        assert_eq!(desc.arg(4).unwrap().to_string(), "QList<QList<QMap<int, QString>>>");
        let inner = desc.arg(4).and_then(|list| list.arg(0)).and_then(|list| list.arg(0)).unwrap();
        assert_eq!(inner.name(), "QMap");
        assert_eq!(inner.args().len(), 2);
    }

    #[test]
    fn test_parse_pointers_and_qualifiers()
    {
        let desc = parse("const QUrl * const");
        assert!(desc.is_pointer());
        assert_eq!(desc.pointee().unwrap().to_string(), "QUrl");

        let cstr = parse("const char *");
        assert!(cstr.is_c_string());
    }

    #[test]
    fn test_inline_namespaces_fold()
    {
        assert_eq!(parse("std::__1::unique_ptr<QUrl>").name(), "std::unique_ptr");
        assert_eq!(
            parse("std::__cxx11::basic_string<char, std::char_traits<char>, std::allocator<char> >").name(),
            "std::basic_string"
        );
    }

    #[test]
    fn test_aliases_expand()
    {
        assert_eq!(parse("QStringList").to_string(), "QList<QString>");
        assert_eq!(parse("QVariantMap").to_string(), "QMap<QString, QVariant>");
        assert_eq!(parse("QObjectList*").to_string(), "QList<QObject*>*");
        assert_eq!(parse("std::vector<QStringList>").to_string(), "std::vector<QList<QString>>");
    }

    #[test]
    fn test_parse_rejects_garbage()
    {
        assert!(TypeDescriptor::parse("QList<int", VersionTag::QT6).is_err());
        assert!(TypeDescriptor::parse("QMap<,int>", VersionTag::QT6).is_err());
        assert!(TypeDescriptor::parse("", VersionTag::QT6).is_err());
        assert!(TypeDescriptor::parse("Foo>>", VersionTag::QT6).is_err());
    }

    #[test]
    fn test_parse_rejects_deep_nesting()
    {
        let text = format!("{}int{}", "QList<".repeat(40), ">".repeat(40));
        assert!(TypeDescriptor::parse(&text, VersionTag::QT6).is_err());
    }

    #[test]
    fn test_version_tag_parsing()
    {
        assert_eq!("6".parse::<VersionTag>().unwrap(), VersionTag::new(6, 0, 0));
        assert_eq!("5.15.2".parse::<VersionTag>().unwrap(), VersionTag::new(5, 15, 2));
        assert_eq!("Qt6".parse::<VersionTag>().unwrap().major(), 6);
        assert_eq!("0x050f02".parse::<VersionTag>().unwrap(), VersionTag::new(5, 15, 2));
        assert!("six".parse::<VersionTag>().is_err());
        assert!("6.3.0.1".parse::<VersionTag>().is_err());
    }

    #[test]
    fn test_with_version_propagates_to_args()
    {
        let desc = parse("QList<QString>").with_version(VersionTag::QT5);
        assert_eq!(desc.arg(0).unwrap().version(), VersionTag::QT5);
    }
}
