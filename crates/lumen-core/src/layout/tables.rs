//! Field offset tables for each supported Qt major version.
//!
//! All offsets are for 64-bit little-endian builds with default alignment.
//! A field that a revision does not store is `None`; the adapter substitutes
//! the category default.

/// Storage of the implicitly shared array types (`QString`, `QByteArray`, `QVector`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayData
{
    /// Qt 6 `QArrayDataPointer`: `{d, ptr, size}` held inline
    Pointer
    {
        /// Offset of the element pointer
        ptr: u64,
        /// Offset of the `qsizetype` length
        size: u64,
        /// Size of the whole object
        object_size: usize,
    },
    /// Qt 5 `QArrayData*`: the object is one pointer to a header
    Header
    {
        /// Offset of the `int` length inside the header
        size: u64,
        /// Offset of the `qptrdiff` data offset inside the header
        offset: u64,
    },
}

impl ArrayData
{
    /// Size of a value of the owning type
    pub const fn object_size(self) -> usize
    {
        match self {
            ArrayData::Pointer { object_size, .. } => object_size,
            ArrayData::Header { .. } => 8,
        }
    }
}

/// `QList` storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListData
{
    /// Same storage as `QVector`
    Array(ArrayData),
    /// Qt 5 `QListData`: `void*` slots from `begin` to `end`
    Slots
    {
        /// Offset of `begin` in the header
        begin: u64,
        /// Offset of `end` in the header
        end: u64,
        /// Offset of the slot array in the header
        array: u64,
    },
}

/// Link offsets inside a red-black tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLinks
{
    /// Parent pointer offset
    pub parent: u64,
    /// Bits that hold the parent pointer (Qt 5 packs the color into the low bits)
    pub parent_mask: u64,
    /// Left child offset
    pub left: u64,
    /// Right child offset
    pub right: u64,
    /// Offset of the stored key (followed by the mapped value)
    pub value: u64,
}

/// libstdc++ `_Rb_tree_node_base`
pub const STD_TREE_LINKS: TreeLinks = TreeLinks {
    parent: 8,
    parent_mask: !0,
    left: 16,
    right: 24,
    value: 32,
};

/// Qt 5 `QMapNodeBase`
pub const QT5_TREE_LINKS: TreeLinks = TreeLinks {
    parent: 0,
    parent_mask: !3,
    left: 8,
    right: 16,
    value: 24,
};

/// libstdc++ `std::map` object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdMapLayout
{
    /// Offset of the header node
    pub header: u64,
    /// Offset of the node count
    pub count: u64,
    /// Size of the object
    pub object_size: usize,
}

/// libstdc++ `std::map<K, V>` (empty comparator, header node, count)
pub const STD_MAP: StdMapLayout = StdMapLayout {
    header: 8,
    count: 40,
    object_size: 48,
};

/// `QMap` storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapData
{
    /// Qt 6: `QMapData` wraps a `std::map` at `map`
    StdMap
    {
        /// Offset of the `std::map` in `QMapData`
        map: u64,
    },
    /// Qt 5: `QMapData` with its own header node
    Qt5
    {
        /// Offset of the `int` size
        size: u64,
        /// Offset of the header node
        header: u64,
        /// Offset of `mostLeftNode`
        first: u64,
    },
}

/// Qt 6 `QHashPrivate::Data` and its spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLayout
{
    /// Offset of `size`
    pub size: u64,
    /// Offset of `numBuckets`
    pub buckets: u64,
    /// Offset of the `spans` pointer
    pub spans: u64,
    /// Buckets per span
    pub span_entries: usize,
    /// Size of one `Span`
    pub span_size: usize,
    /// Offset of the `entries` pointer in a span
    pub span_storage: u64,
    /// Offset byte marking an unused bucket
    pub unused: u8,
}

/// `QUrlPrivate` field offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlLayout
{
    pub port: Option<u64>,
    pub scheme: Option<u64>,
    pub user_name: Option<u64>,
    pub password: Option<u64>,
    pub host: Option<u64>,
    pub path: Option<u64>,
    pub query: Option<u64>,
    pub fragment: Option<u64>,
}

/// `QVariant` storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantLayout
{
    /// Qt 6: packed `QMetaTypeInterface*` with `is_shared`/`is_null` in the low bits
    MetaType
    {
        /// Offset of the packed word
        packed: u64,
        /// Offset of `name` in `QMetaTypeInterface`
        interface_name: u64,
        /// Offset of the `int` data offset in `PrivateShared`
        shared_offset: u64,
        /// Size of the object
        object_size: usize,
    },
    /// Qt 5: 30-bit builtin type id with `is_shared`/`is_null` flags
    TypeId
    {
        /// Offset of the flags word
        flags: u64,
        /// Offset of the data pointer in `PrivateShared`
        shared_ptr: u64,
        /// Size of the object
        object_size: usize,
    },
}

impl VariantLayout
{
    /// Size of a `QVariant`
    pub const fn object_size(self) -> usize
    {
        match self {
            VariantLayout::MetaType { object_size, .. } | VariantLayout::TypeId { object_size, .. } => object_size,
        }
    }
}

/// `QFile` and `QFilePrivate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLayout
{
    /// `d_ptr` in the public object (after the vtable)
    pub d_ptr: u64,
    pub open_mode: u64,
    pub error: u64,
    pub file_name: u64,
}

/// `QObject`, `QObjectPrivate`, and `ExtraData`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectLayout
{
    /// `d_ptr` in the public object (after the vtable)
    pub d_ptr: u64,
    pub parent: u64,
    pub children: u64,
    pub extra_data: u64,
    pub property_names: u64,
    pub property_values: u64,
    pub object_name: u64,
    /// `int &argc` in `QCoreApplicationPrivate`
    pub argc: u64,
    /// `char **argv` in `QCoreApplicationPrivate`
    pub argv: u64,
}

/// Qt 6 `QCborContainerPrivate` behind `QJsonArray`/`QJsonObject`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborLayout
{
    /// `QByteArray data`
    pub data: u64,
    /// `QList<Element> elements`
    pub elements: u64,
    /// Size of one `Element`
    pub element_size: usize,
    /// `QCborValue::container` in `QJsonValue`
    pub value_container: u64,
    /// `QCborValue::t` in `QJsonValue`
    pub value_type: u64,
    /// Size of a `QJsonValue`
    pub value_size: usize,
}

/// Every table for one Qt major version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtLayout
{
    pub major: u8,
    pub array: ArrayData,
    pub list: ListData,
    pub map: MapData,
    pub hash: Option<HashLayout>,
    pub url: UrlLayout,
    pub variant: VariantLayout,
    pub file: FileLayout,
    /// `QFileInfoPrivate::fileEntry.m_filePath`
    pub file_info_path: u64,
    /// `QTextCursorPrivate::position`
    pub cursor_position: u64,
    /// `QTextCursorPrivate::anchor`
    pub cursor_anchor: u64,
    pub object: ObjectLayout,
    pub cbor: Option<CborLayout>,
}

const QT6_ARRAY: ArrayData = ArrayData::Pointer {
    ptr: 8,
    size: 16,
    object_size: 24,
};

const QT5_ARRAY: ArrayData = ArrayData::Header { size: 4, offset: 16 };

/// Qt 6.x (validated against 6.2 - 6.8)
pub const QT6: QtLayout = QtLayout {
    major: 6,
    array: QT6_ARRAY,
    list: ListData::Array(QT6_ARRAY),
    map: MapData::StdMap { map: 8 },
    hash: Some(HashLayout {
        size: 8,
        buckets: 16,
        spans: 32,
        span_entries: 128,
        span_size: 144,
        span_storage: 128,
        unused: 0xff,
    }),
    url: UrlLayout {
        port: Some(4),
        scheme: Some(8),
        user_name: Some(32),
        password: Some(56),
        host: Some(80),
        path: Some(104),
        query: Some(128),
        fragment: Some(152),
    },
    variant: VariantLayout::MetaType {
        packed: 24,
        interface_name: 24,
        shared_offset: 4,
        object_size: 32,
    },
    file: FileLayout {
        d_ptr: 8,
        open_mode: 0x88,
        error: 0x1c8,
        file_name: 0x1d8,
    },
    file_info_path: 8,
    cursor_position: 24,
    cursor_anchor: 28,
    object: ObjectLayout {
        d_ptr: 8,
        parent: 16,
        children: 24,
        extra_data: 72,
        property_names: 0,
        property_values: 24,
        object_name: 96,
        argc: 0x78,
        argv: 0x80,
    },
    cbor: Some(CborLayout {
        data: 16,
        elements: 40,
        element_size: 16,
        value_container: 8,
        value_type: 16,
        value_size: 24,
    }),
};

/// Qt 5.x (validated against 5.12 - 5.15)
pub const QT5: QtLayout = QtLayout {
    major: 5,
    array: QT5_ARRAY,
    list: ListData::Slots {
        begin: 8,
        end: 12,
        array: 16,
    },
    map: MapData::Qt5 {
        size: 4,
        header: 8,
        first: 32,
    },
    hash: None,
    url: UrlLayout {
        port: Some(4),
        scheme: Some(8),
        user_name: Some(16),
        password: Some(24),
        host: Some(32),
        path: Some(40),
        query: Some(48),
        fragment: Some(56),
    },
    variant: VariantLayout::TypeId {
        flags: 8,
        shared_ptr: 0,
        object_size: 16,
    },
    file: FileLayout {
        d_ptr: 8,
        open_mode: 0x74,
        error: 0x15c,
        file_name: 0x168,
    },
    file_info_path: 8,
    cursor_position: 24,
    cursor_anchor: 28,
    object: ObjectLayout {
        d_ptr: 8,
        parent: 16,
        children: 24,
        extra_data: 48,
        property_names: 0,
        property_values: 8,
        object_name: 32,
        argc: 0x68,
        argv: 0x70,
    },
    cbor: None,
};

/// Table for a major version, if it is supported
pub fn for_major(major: u8) -> Option<&'static QtLayout>
{
    match major {
        5 => Some(&QT5),
        6 => Some(&QT6),
        _ => None,
    }
}

/// Name of a Qt 5 builtin `QMetaType::Type` id
pub fn qt5_builtin_type(id: u32) -> Option<&'static str>
{
    Some(match id {
        1 => "bool",
        2 => "int",
        3 => "uint",
        4 => "qlonglong",
        5 => "qulonglong",
        6 => "double",
        7 => "QChar",
        8 => "QVariantMap",
        9 => "QVariantList",
        10 => "QString",
        11 => "QStringList",
        12 => "QByteArray",
        17 => "QUrl",
        19 => "QRect",
        21 => "QSize",
        25 => "QPoint",
        28 => "QVariantHash",
        31 => "void*",
        32 => "long",
        33 => "short",
        34 => "char",
        35 => "ulong",
        36 => "ushort",
        37 => "uchar",
        38 => "float",
        39 => "QObject*",
        40 => "signed char",
        45 => "QJsonValue",
        46 => "QJsonObject",
        47 => "QJsonArray",
        _ => return None,
    })
}
