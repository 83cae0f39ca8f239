//! # Version Adapter
//!
//! The same semantic type is laid out differently by different library
//! revisions: a Qt 5 `QString` is one pointer to a header, a Qt 6 `QString`
//! holds `{d, ptr, size}` inline. [`Adapter`] reads the raw fields through the
//! revision's offset table ([`tables`]) and returns a canonical shape, so the
//! formatters never look at an offset.
//!
//! ## Canonical Shapes
//!
//! - [`TextSpan`]: code units of a string or byte buffer
//! - [`ArraySpan`]: contiguous (or slot-indirect) elements of a sequence
//! - [`TreeShape`]: red-black tree header, first node, and count
//! - [`HashShape`]: span table of an open-addressing hash
//! - [`CanonicalUrl`]: the eight locator fields in schema order
//! - [`VariantPayload`], [`FileState`], [`CursorState`], [`ObjectShape`],
//!   [`CborContainer`], [`JsonValueShape`]
//!
//! Every pointer is classified before it is followed. A `d` pointer that is
//! null means "default-constructed" and yields the empty shape; a garbage one
//! is an error.

pub mod tables;

use crate::error::{InspectError, Result};
use crate::memory::{MemoryReader, MemoryReaderExt, POINTER_SIZE};
use crate::pointer::{PointerClass, PointerResolver};
use crate::types::{Address, VersionTag};

pub use tables::{QtLayout, TreeLinks};
use tables::{ArrayData, HashLayout, ListData, MapData, VariantLayout};

/// Deepest red-black tree walk accepted before the links are declared corrupt
const MAX_TREE_HEIGHT: usize = 128;

/// Longest metatype name read from a `QMetaTypeInterface`
const MAX_TYPE_NAME: usize = 256;

/// Size and alignment of a value in the inspected process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeLayout
{
    pub size: usize,
    pub align: usize,
}

impl TypeLayout
{
    /// A raw pointer
    pub const POINTER: Self = Self::new(POINTER_SIZE, POINTER_SIZE);

    pub const fn new(size: usize, align: usize) -> Self
    {
        Self { size, align }
    }

    /// Layout of `struct { A first; B second; }` and the offset of `second`
    pub fn pair(first: Self, second: Self) -> (Self, u64)
    {
        let second_offset = round_up(first.size, second.align);
        let align = first.align.max(second.align).max(1);
        let size = round_up(second_offset + second.size, align);
        (Self::new(size, align), second_offset as u64)
    }
}

fn checked_len(raw: i64, what: &str) -> Result<usize>
{
    usize::try_from(raw).map_err(|_| InspectError::Layout(format!("negative {what} length {raw}")))
}

fn round_up(value: usize, align: usize) -> usize
{
    let align = align.max(1);
    value.div_ceil(align) * align
}

/// How the code units of a [`TextSpan`] are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding
{
    /// Little-endian UTF-16 (`QString`)
    Utf16,
    /// UTF-8 text (`std::string`, `char*`, CBOR strings)
    Utf8,
    /// Arbitrary bytes (`QByteArray`)
    Bytes,
}

impl TextEncoding
{
    /// Bytes per code unit
    pub const fn unit_size(self) -> usize
    {
        match self {
            TextEncoding::Utf16 => 2,
            TextEncoding::Utf8 | TextEncoding::Bytes => 1,
        }
    }
}

/// Code units of one text value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan
{
    pub data: Address,
    /// Length in code units
    pub len: usize,
    pub encoding: TextEncoding,
}

/// How sequence elements are reached from their slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementStorage
{
    /// The slot is the element
    Inline,
    /// The slot holds a pointer to a heap-allocated element (Qt 5 `QList` of large types)
    Indirect,
}

/// Elements of a sequential container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArraySpan
{
    pub data: Address,
    pub len: usize,
    /// Distance between slots
    pub stride: usize,
    pub storage: ElementStorage,
}

impl ArraySpan
{
    /// The empty sequence
    pub const EMPTY: Self = Self {
        data: Address::ZERO,
        len: 0,
        stride: 0,
        storage: ElementStorage::Inline,
    };

    /// Address of slot `index`
    pub fn slot(&self, index: usize) -> Option<Address>
    {
        if index >= self.len {
            return None;
        }
        self.data.checked_index(index, self.stride)
    }
}

/// A red-black tree ready to be walked in key order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShape
{
    /// Sentinel node; reaching it ends the walk
    pub header: Address,
    /// Leftmost node
    pub first: Address,
    pub len: usize,
    pub links: TreeLinks,
}

/// Span table of a Qt 6 `QHash`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashShape
{
    pub spans: Address,
    pub span_count: usize,
    pub len: usize,
    pub layout: HashLayout,
}

/// Kind of a locator field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlFieldKind
{
    /// A `QString`; defaults to `""`
    Text,
    /// An `int`; defaults to `-1`
    Port,
}

/// Canonical locator schema, in display order
pub const URL_SCHEMA: [(&str, UrlFieldKind); 8] = [
    ("scheme", UrlFieldKind::Text),
    ("userName", UrlFieldKind::Text),
    ("password", UrlFieldKind::Text),
    ("host", UrlFieldKind::Text),
    ("port", UrlFieldKind::Port),
    ("path", UrlFieldKind::Text),
    ("query", UrlFieldKind::Text),
    ("fragment", UrlFieldKind::Text),
];

/// One locator field; `location` is `None` when the field takes its default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UrlField
{
    pub name: &'static str,
    pub kind: UrlFieldKind,
    pub location: Option<Address>,
}

/// The eight locator fields, in [`URL_SCHEMA`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalUrl
{
    pub fields: [UrlField; 8],
}

/// What a variant currently holds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantPayload
{
    /// Invalid (default-constructed) variant
    Empty,
    /// A value of `type_name` stored at `data`
    Value
    {
        data: Address,
        type_name: String,
    },
}

/// Fields of an open file handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileState
{
    /// Address of the file name `QString`
    pub file_name: Address,
    pub open_mode: u32,
    pub error: i32,
}

/// Fields of a document cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorState
{
    pub position: i32,
    pub anchor: i32,
}

/// Addresses of the members of an object's private data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectShape
{
    pub private: Address,
    /// `QObject*` field
    pub parent: Address,
    /// `QList<QObject*>` field
    pub children: Address,
    pub extra: Option<ObjectExtra>,
}

/// Addresses of the members of an object's lazily allocated extra data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectExtra
{
    /// `QList<QByteArray>` field
    pub property_names: Address,
    /// `QList<QVariant>` field
    pub property_values: Address,
    /// `QString` field
    pub object_name: Address,
}

/// Storage behind a `QJsonArray`/`QJsonObject`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CborContainer
{
    /// Start of the out-of-line byte data
    pub byte_data: Address,
    pub elements: ArraySpan,
}

/// `QtCbor::Element::Flag` bits
pub mod cbor_flags
{
    pub const IS_CONTAINER: i32 = 0x01;
    pub const HAS_BYTE_DATA: i32 = 0x02;
    pub const STRING_IS_UTF16: i32 = 0x04;
    pub const STRING_IS_ASCII: i32 = 0x08;
}

/// `QCborValue::Type` values used by the JSON types
pub mod cbor_types
{
    pub const INTEGER: i32 = 0x00;
    pub const BYTE_ARRAY: i32 = 0x40;
    pub const STRING: i32 = 0x60;
    pub const ARRAY: i32 = 0x80;
    pub const MAP: i32 = 0xa0;
    pub const FALSE: i32 = 0x14;
    pub const TRUE: i32 = 0x15;
    pub const NULL: i32 = 0x16;
    pub const UNDEFINED: i32 = 0x17;
    pub const DOUBLE: i32 = 0x202;
}

/// One decoded `QtCbor::Element`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CborElement
{
    /// Address of the element (its `value` field comes first)
    pub address: Address,
    pub value: i64,
    pub kind: i32,
    pub flags: i32,
}

/// Fields of a `QJsonValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JsonValueShape
{
    pub n: i64,
    /// Address of the `container` pointer field
    pub container_field: Address,
    pub container: Address,
    pub kind: i32,
}

/// Reads raw layouts for one library revision
pub struct Adapter<'a>
{
    reader: &'a dyn MemoryReader,
    version: VersionTag,
}

impl<'a> Adapter<'a>
{
    pub fn new(reader: &'a dyn MemoryReader, version: VersionTag) -> Self
    {
        Self { reader, version }
    }

    pub fn version(&self) -> VersionTag
    {
        self.version
    }

    /// Offset tables for this revision
    ///
    /// ## Errors
    ///
    /// `UnsupportedType` when no table exists for the major version.
    pub fn qt(&self) -> Result<&'static QtLayout>
    {
        tables::for_major(self.version.major())
            .ok_or_else(|| InspectError::UnsupportedType(format!("no Qt layout for version {}", self.version)))
    }

    fn pointers(&self) -> PointerResolver<'a, dyn MemoryReader + 'a>
    {
        PointerResolver::new(self.reader)
    }

    /// Follow an implicitly shared `d` pointer; null means default-constructed
    fn follow_d(&self, field: Address) -> Result<Option<Address>>
    {
        match self.pointers().load(field)? {
            PointerClass::Null => Ok(None),
            PointerClass::Invalid(target) => Err(InspectError::InvalidReference(target)),
            PointerClass::Valid(target) => Ok(Some(target)),
        }
    }

    /// `(data, len)` of an implicitly shared array
    fn array_data(&self, address: Address, layout: ArrayData) -> Result<(Address, usize)>
    {
        match layout {
            ArrayData::Pointer { ptr, size, .. } => {
                let len = checked_len(self.reader.read_i64(address + size)?, "array")?;
                let data = self.reader.read_ptr(address + ptr)?;
                if data.is_null() && len > 0 {
                    return Err(InspectError::Layout(format!("null data with length {len}")));
                }
                Ok((data, len))
            }
            ArrayData::Header { size, offset } => {
                let Some(header) = self.follow_d(address)? else {
                    return Ok((Address::ZERO, 0));
                };
                let len = checked_len(i64::from(self.reader.read_i32(header + size)?), "array")?;
                let data_offset = self.reader.read_i64(header + offset)?;
                let data = header
                    .checked_add(data_offset as u64)
                    .ok_or_else(|| InspectError::Layout(format!("data offset {data_offset} overflows")))?;
                Ok((data, len))
            }
        }
    }

    /// `QString`
    ///
    /// ## Errors
    ///
    /// Fails when the header cannot be read or describes an impossible string.
    pub fn string(&self, address: Address) -> Result<TextSpan>
    {
        let (data, len) = self.array_data(address, self.qt()?.array)?;
        Ok(TextSpan {
            data,
            len,
            encoding: TextEncoding::Utf16,
        })
    }

    /// `QByteArray`
    ///
    /// ## Errors
    ///
    /// Fails when the header cannot be read or describes an impossible buffer.
    pub fn byte_array(&self, address: Address) -> Result<TextSpan>
    {
        let (data, len) = self.array_data(address, self.qt()?.array)?;
        Ok(TextSpan {
            data,
            len,
            encoding: TextEncoding::Bytes,
        })
    }

    /// `QStringView` (`{qsizetype m_size; const QChar *m_data}` in every revision)
    ///
    /// ## Errors
    ///
    /// Fails when the view cannot be read.
    pub fn string_view(&self, address: Address) -> Result<TextSpan>
    {
        let len = usize::try_from(self.reader.read_i64(address)?).unwrap_or(0);
        let data = self.reader.read_ptr(address + 8)?;
        Ok(TextSpan {
            data,
            len: if data.is_null() { 0 } else { len },
            encoding: TextEncoding::Utf16,
        })
    }

    /// libstdc++ `std::basic_string<char>`
    ///
    /// ## Errors
    ///
    /// Fails when the string header cannot be read.
    pub fn std_string(&self, address: Address) -> Result<TextSpan>
    {
        let data = self.pointers().follow(address)?;
        let len = self.reader.read_u64(address + 8)?;
        let len = usize::try_from(len).map_err(|_| InspectError::Layout(format!("string length {len}")))?;
        Ok(TextSpan {
            data,
            len,
            encoding: TextEncoding::Utf8,
        })
    }

    /// Read at most `max_units` code units of `span`
    ///
    /// Returns the raw bytes and whether the span is longer than what was read.
    ///
    /// ## Errors
    ///
    /// `Unreadable` when the data cannot be read.
    pub fn read_text(&self, span: &TextSpan, max_units: usize) -> Result<(Vec<u8>, bool)>
    {
        let units = span.len.min(max_units);
        if units == 0 {
            return Ok((Vec::new(), span.len > 0));
        }
        let bytes = self.reader.read(span.data, units * span.encoding.unit_size())?;
        Ok((bytes, span.len > units))
    }

    fn checked_span(&self, data: Address, len: usize, stride: usize, storage: ElementStorage) -> Result<ArraySpan>
    {
        if len == 0 {
            return Ok(ArraySpan::EMPTY);
        }
        if stride == 0 {
            return Err(InspectError::Layout("zero-sized elements".to_string()));
        }
        // A sequence whose first slot is unreadable is garbage, not a long list of faults
        self.pointers().classify_sized(data, stride, 1).require()?;
        Ok(ArraySpan {
            data,
            len,
            stride,
            storage,
        })
    }

    /// `QList<T>` with elements laid out as `element`
    ///
    /// ## Errors
    ///
    /// Fails when the header is unreadable or inconsistent.
    pub fn list(&self, address: Address, element: TypeLayout) -> Result<ArraySpan>
    {
        match self.qt()?.list {
            ListData::Array(layout) => {
                let (data, len) = self.array_data(address, layout)?;
                self.checked_span(data, len, element.size, ElementStorage::Inline)
            }
            ListData::Slots { begin, end, array } => {
                let Some(header) = self.follow_d(address)? else {
                    return Ok(ArraySpan::EMPTY);
                };
                let begin = self.reader.read_i32(header + begin)?;
                let end = self.reader.read_i32(header + end)?;
                let len = checked_len(i64::from(end) - i64::from(begin), "list")?;
                let first = checked_len(i64::from(begin), "list begin")?;
                let data = header + array + (first * POINTER_SIZE) as u64;
                let storage = if element.size > POINTER_SIZE {
                    ElementStorage::Indirect
                } else {
                    ElementStorage::Inline
                };
                self.checked_span(data, len, POINTER_SIZE, storage)
            }
        }
    }

    /// `QVector<T>`
    ///
    /// ## Errors
    ///
    /// Fails when the header is unreadable or inconsistent.
    pub fn vector(&self, address: Address, element: TypeLayout) -> Result<ArraySpan>
    {
        let (data, len) = self.array_data(address, self.qt()?.array)?;
        self.checked_span(data, len, element.size, ElementStorage::Inline)
    }

    /// `std::vector<T>` (`begin`, `end`, `end_of_storage`)
    ///
    /// ## Errors
    ///
    /// Fails when `end` precedes `begin` or does not land on an element boundary.
    pub fn std_vector(&self, address: Address, element: TypeLayout) -> Result<ArraySpan>
    {
        let begin = self.reader.read_ptr(address)?;
        let end = self.reader.read_ptr(address + 8)?;
        let bytes = end
            .checked_offset_from(begin)
            .ok_or_else(|| InspectError::Layout(format!("vector end {end} before begin {begin}")))?;
        if element.size == 0 || bytes % element.size as u64 != 0 {
            return Err(InspectError::Layout(format!("vector span {bytes} is not a multiple of {}", element.size)));
        }
        let len = usize::try_from(bytes / element.size as u64)
            .map_err(|_| InspectError::Layout(format!("vector span {bytes}")))?;
        self.checked_span(begin, len, element.size, ElementStorage::Inline)
    }

    /// libstdc++ `std::map<K, V>` at `address`
    ///
    /// ## Errors
    ///
    /// Fails when the header cannot be read.
    pub fn std_map(&self, address: Address) -> Result<TreeShape>
    {
        let links = tables::STD_TREE_LINKS;
        let header = address + tables::STD_MAP.header;
        let count = self.reader.read_u64(address + tables::STD_MAP.count)?;
        let first = self.reader.read_ptr(header + links.left)?;
        Ok(TreeShape {
            header,
            first,
            len: usize::try_from(count).map_err(|_| InspectError::Layout(format!("map size {count}")))?,
            links,
        })
    }

    /// `QMap<K, V>`
    ///
    /// ## Errors
    ///
    /// Fails when the map data cannot be read.
    pub fn qt_map(&self, address: Address) -> Result<Option<TreeShape>>
    {
        let map = self.qt()?.map;
        let Some(data) = self.follow_d(address)? else {
            return Ok(None);
        };
        match map {
            MapData::StdMap { map } => self.std_map(data + map).map(Some),
            MapData::Qt5 { size, header, first } => {
                let len = checked_len(i64::from(self.reader.read_i32(data + size)?), "map")?;
                Ok(Some(TreeShape {
                    header: data + header,
                    first: self.reader.read_ptr(data + first)?,
                    len,
                    links: tables::QT5_TREE_LINKS,
                }))
            }
        }
    }

    fn link(&self, node: Address, offset: u64, mask: u64) -> Result<Address>
    {
        Ok(Address::new(self.reader.read_u64(node + offset)? & mask))
    }

    /// In-order successor of `node`; returns the header after the last node
    ///
    /// ## Errors
    ///
    /// Fails on unreadable links or a walk deeper than any balanced tree.
    pub fn tree_successor(&self, shape: &TreeShape, node: Address) -> Result<Address>
    {
        let links = shape.links;
        let right = self.link(node, links.right, !0)?;
        if !right.is_null() {
            let mut current = right;
            for _ in 0..MAX_TREE_HEIGHT {
                let left = self.link(current, links.left, !0)?;
                if left.is_null() {
                    return Ok(current);
                }
                current = left;
            }
            return Err(InspectError::Layout("tree deeper than any balanced tree".to_string()));
        }

        let mut child = node;
        for _ in 0..MAX_TREE_HEIGHT {
            let parent = self.link(child, links.parent, links.parent_mask)?;
            if parent.is_null() || parent == shape.header {
                return Ok(shape.header);
            }
            if self.link(parent, links.right, !0)? != child {
                return Ok(parent);
            }
            child = parent;
        }
        Err(InspectError::Layout("tree deeper than any balanced tree".to_string()))
    }

    /// Qt 6 `QHash<K, V>`
    ///
    /// ## Errors
    ///
    /// `UnsupportedType` before Qt 6; otherwise fails on an unreadable or
    /// inconsistent data block.
    pub fn hash(&self, address: Address) -> Result<Option<HashShape>>
    {
        let layout = self
            .qt()?
            .hash
            .ok_or_else(|| InspectError::UnsupportedType(format!("QHash layout for {}", self.version)))?;
        let Some(data) = self.follow_d(address)? else {
            return Ok(None);
        };
        let len = self.reader.read_u64(data + layout.size)?;
        let buckets = self.reader.read_u64(data + layout.buckets)?;
        let spans = self.pointers().follow(data + layout.spans)?;
        if buckets % layout.span_entries as u64 != 0 || len > buckets {
            return Err(InspectError::Layout(format!("{len} entries in {buckets} buckets")));
        }
        let to_usize = |v: u64| usize::try_from(v).map_err(|_| InspectError::Layout(format!("hash size {v}")));
        Ok(Some(HashShape {
            spans,
            span_count: to_usize(buckets)? / layout.span_entries,
            len: to_usize(len)?,
            layout,
        }))
    }

    /// `QUrl` in canonical field order
    ///
    /// ## Errors
    ///
    /// Fails when the `d` pointer is garbage.
    pub fn url(&self, address: Address) -> Result<CanonicalUrl>
    {
        let url = self.qt()?.url;
        let d = self.follow_d(address)?;
        let offsets = [
            url.scheme,
            url.user_name,
            url.password,
            url.host,
            url.port,
            url.path,
            url.query,
            url.fragment,
        ];
        let mut fields = URL_SCHEMA.map(|(name, kind)| UrlField {
            name,
            kind,
            location: None,
        });
        for (field, offset) in fields.iter_mut().zip(offsets) {
            field.location = d.zip(offset).map(|(base, offset)| base + offset);
        }
        Ok(CanonicalUrl { fields })
    }

    /// `QVariant` contents
    ///
    /// ## Errors
    ///
    /// Fails on unreadable type information, unknown builtin ids, or bad shared storage.
    pub fn variant(&self, address: Address) -> Result<VariantPayload>
    {
        match self.qt()?.variant {
            VariantLayout::MetaType {
                packed,
                interface_name,
                shared_offset,
                ..
            } => {
                let word = self.reader.read_u64(address + packed)?;
                // packedType:62, is_shared:1, is_null:1; the interface pointer is 4-aligned
                let is_shared = word & (1 << 62) != 0;
                let interface = Address::new((word & ((1 << 62) - 1)) << 2);
                if interface.is_null() {
                    return Ok(VariantPayload::Empty);
                }
                let interface = self.pointers().classify(interface).require()?;
                let name = self.pointers().follow(interface + interface_name)?;
                let (name, _) = self.reader.read_c_string(name, MAX_TYPE_NAME)?;
                let data = if is_shared {
                    let shared = self.pointers().follow(address)?;
                    let offset = self.reader.read_i32(shared + shared_offset)?;
                    let offset = u64::try_from(offset)
                        .map_err(|_| InspectError::Layout(format!("shared variant offset {offset}")))?;
                    shared + offset
                } else {
                    address
                };
                Ok(VariantPayload::Value {
                    data,
                    type_name: String::from_utf8_lossy(&name).into_owned(),
                })
            }
            VariantLayout::TypeId { flags, shared_ptr, .. } => {
                let word = self.reader.read_u32(address + flags)?;
                let id = word & 0x3fff_ffff;
                if id == 0 {
                    return Ok(VariantPayload::Empty);
                }
                let type_name = tables::qt5_builtin_type(id)
                    .ok_or_else(|| InspectError::UnsupportedType(format!("QVariant type id {id}")))?;
                let data = if word & (1 << 30) != 0 {
                    let shared = self.pointers().follow(address)?;
                    self.pointers().follow(shared + shared_ptr)?
                } else {
                    address
                };
                Ok(VariantPayload::Value {
                    data,
                    type_name: type_name.to_string(),
                })
            }
        }
    }

    /// `QFile`; `None` when the private data is missing
    ///
    /// ## Errors
    ///
    /// Fails when the private data is unreadable.
    pub fn file(&self, address: Address) -> Result<Option<FileState>>
    {
        let file = self.qt()?.file;
        let Some(d) = self.follow_d(address + file.d_ptr)? else {
            return Ok(None);
        };
        Ok(Some(FileState {
            file_name: d + file.file_name,
            open_mode: self.reader.read_u32(d + file.open_mode)?,
            error: self.reader.read_i32(d + file.error)?,
        }))
    }

    /// Address of the path `QString` inside a `QFileInfo`
    ///
    /// ## Errors
    ///
    /// Fails when the `d` pointer is garbage.
    pub fn file_info_path(&self, address: Address) -> Result<Option<Address>>
    {
        let offset = self.qt()?.file_info_path;
        Ok(self.follow_d(address)?.map(|d| d + offset))
    }

    /// `QTextCursor`; `None` for a null cursor
    ///
    /// ## Errors
    ///
    /// Fails when the private data is unreadable.
    pub fn cursor(&self, address: Address) -> Result<Option<CursorState>>
    {
        let qt = self.qt()?;
        let Some(d) = self.follow_d(address)? else {
            return Ok(None);
        };
        Ok(Some(CursorState {
            position: self.reader.read_i32(d + qt.cursor_position)?,
            anchor: self.reader.read_i32(d + qt.cursor_anchor)?,
        }))
    }

    /// `QObject` private members
    ///
    /// ## Errors
    ///
    /// Fails when the private data pointer is null or garbage.
    pub fn object(&self, address: Address) -> Result<ObjectShape>
    {
        let layout = self.qt()?.object;
        let private = self.pointers().follow(address + layout.d_ptr)?;
        let extra = self.follow_d(private + layout.extra_data)?.map(|extra| ObjectExtra {
            property_names: extra + layout.property_names,
            property_values: extra + layout.property_values,
            object_name: extra + layout.object_name,
        });
        Ok(ObjectShape {
            private,
            parent: private + layout.parent,
            children: private + layout.children,
            extra,
        })
    }

    /// `char*` pointers of a `QCoreApplication`'s `argv`, at most `max`
    ///
    /// Returns the pointers and the full `argc`.
    ///
    /// ## Errors
    ///
    /// Fails when `argc`/`argv` cannot be followed.
    pub fn application_args(&self, address: Address, max: usize) -> Result<(Vec<Address>, usize)>
    {
        let layout = self.qt()?.object;
        let private = self.pointers().follow(address + layout.d_ptr)?;
        let argc_ref = self.pointers().follow(private + layout.argc)?;
        let argc = checked_len(i64::from(self.reader.read_i32(argc_ref)?), "argv")?;
        let argv = self.pointers().follow(private + layout.argv)?;
        let args = (0..argc.min(max))
            .map(|i| self.reader.read_ptr(argv + (i * POINTER_SIZE) as u64))
            .collect::<Result<Vec<_>>>()?;
        Ok((args, argc))
    }

    /// Container behind a `QJsonArray`/`QJsonObject`; `None` when empty
    ///
    /// ## Errors
    ///
    /// `UnsupportedType` before Qt 6; otherwise fails on unreadable storage.
    pub fn cbor(&self, address: Address) -> Result<Option<CborContainer>>
    {
        let qt = self.qt()?;
        let cbor = qt
            .cbor
            .ok_or_else(|| InspectError::UnsupportedType(format!("JSON layout for {}", self.version)))?;
        let Some(d) = self.follow_d(address)? else {
            return Ok(None);
        };
        let (byte_data, _) = self.array_data(d + cbor.data, qt.array)?;
        let (data, len) = self.array_data(d + cbor.elements, qt.array)?;
        let elements = self.checked_span(data, len, cbor.element_size, ElementStorage::Inline)?;
        Ok(Some(CborContainer { byte_data, elements }))
    }

    /// Element `index` of a CBOR container
    ///
    /// ## Errors
    ///
    /// Fails when the index is out of range or the element is unreadable.
    pub fn cbor_element(&self, container: &CborContainer, index: usize) -> Result<CborElement>
    {
        let address = container
            .elements
            .slot(index)
            .ok_or_else(|| InspectError::Layout(format!("element {index} out of range")))?;
        Ok(CborElement {
            address,
            value: self.reader.read_i64(address)?,
            kind: self.reader.read_i32(address + 8)?,
            flags: self.reader.read_i32(address + 12)?,
        })
    }

    /// Out-of-line string or byte data of an element, if it has any
    ///
    /// ## Errors
    ///
    /// Fails when the byte data header is unreadable or inconsistent.
    pub fn cbor_bytes(&self, container: &CborContainer, element: &CborElement) -> Result<Option<TextSpan>>
    {
        if element.flags & cbor_flags::HAS_BYTE_DATA == 0 {
            return Ok(None);
        }
        let offset = u64::try_from(element.value)
            .map_err(|_| InspectError::Layout(format!("byte data offset {}", element.value)))?;
        let header = container.byte_data + offset;
        let byte_len = checked_len(self.reader.read_i64(header)?, "byte data")?;
        let (len, encoding) = if element.flags & cbor_flags::STRING_IS_UTF16 != 0 {
            (byte_len / 2, TextEncoding::Utf16)
        } else if element.kind == cbor_types::BYTE_ARRAY {
            (byte_len, TextEncoding::Bytes)
        } else {
            (byte_len, TextEncoding::Utf8)
        };
        Ok(Some(TextSpan {
            data: header + 8,
            len,
            encoding,
        }))
    }

    /// `QJsonValue` fields
    ///
    /// ## Errors
    ///
    /// `UnsupportedType` before Qt 6; otherwise fails when unreadable.
    pub fn json_value(&self, address: Address) -> Result<JsonValueShape>
    {
        let cbor = self
            .qt()?
            .cbor
            .ok_or_else(|| InspectError::UnsupportedType(format!("JSON layout for {}", self.version)))?;
        let container_field = address + cbor.value_container;
        Ok(JsonValueShape {
            n: self.reader.read_i64(address)?,
            container_field,
            container: self.reader.read_ptr(container_field)?,
            kind: self.reader.read_i32(address + cbor.value_type)?,
        })
    }
}
