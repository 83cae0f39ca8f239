//! Test image builder
//!
//! Lays out Qt and libstdc++ objects the way a 64-bit process would hold
//! them, inside a `SnapshotMemory`, so formatters can be exercised without a
//! live debuggee.

#![allow(dead_code)]

use lumen_core::{
    Address, ChildValue, FormatOptions, InspectRequest, Inspector, SnapshotMemory, ValueHandle, VersionTag,
};

/// First address handed out by [`Image::place`]
pub const BASE: u64 = 0x10_0000;

/// Little-endian byte buffer with fields written at fixed offsets
#[derive(Debug, Clone, Default)]
pub struct Blob(Vec<u8>);

impl Blob
{
    pub fn new(size: usize) -> Self
    {
        Blob(vec![0; size])
    }

    pub fn bytes(mut self, offset: usize, data: &[u8]) -> Self
    {
        let end = offset + data.len();
        if self.0.len() < end {
            self.0.resize(end, 0);
        }
        self.0[offset..end].copy_from_slice(data);
        self
    }

    pub fn u64(self, offset: usize, value: u64) -> Self
    {
        self.bytes(offset, &value.to_le_bytes())
    }

    pub fn i64(self, offset: usize, value: i64) -> Self
    {
        self.bytes(offset, &value.to_le_bytes())
    }

    pub fn u32(self, offset: usize, value: u32) -> Self
    {
        self.bytes(offset, &value.to_le_bytes())
    }

    pub fn i32(self, offset: usize, value: i32) -> Self
    {
        self.bytes(offset, &value.to_le_bytes())
    }

    pub fn into_vec(self) -> Vec<u8>
    {
        self.0
    }
}

/// A JSON node for [`Image::json_array`] and [`Image::json_object`]
#[derive(Debug, Clone)]
pub enum Json
{
    Int(i64),
    Double(f64),
    Str(String),
    Bool(bool),
    Null,
    Array(Vec<Json>),
}

pub fn int(value: i32) -> Vec<u8>
{
    value.to_le_bytes().to_vec()
}

pub fn ptr(address: u64) -> Vec<u8>
{
    address.to_le_bytes().to_vec()
}

fn utf16(text: &str) -> Vec<u8>
{
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn c_string(text: &str) -> Vec<u8>
{
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// Memory image of one (imaginary) process built with one Qt major version
pub struct Image
{
    memory: SnapshotMemory,
    next: u64,
    version: VersionTag,
}

impl Image
{
    pub fn new(version: VersionTag) -> Self
    {
        Self {
            memory: SnapshotMemory::new(),
            next: BASE,
            version,
        }
    }

    pub fn qt6() -> Self
    {
        Self::new(VersionTag::QT6)
    }

    pub fn qt5() -> Self
    {
        Self::new(VersionTag::QT5)
    }

    fn is_qt6(&self) -> bool
    {
        self.version.major() >= 6
    }

    /// Reserve `size` bytes at a fresh 16-aligned address, leaving a gap after it
    pub fn reserve(&mut self, size: usize) -> u64
    {
        let address = self.next;
        self.next = (address + size.max(1) as u64 + 0x40 + 0xf) & !0xf;
        address
    }

    /// Write `bytes` at `address` (later writes win)
    pub fn write(&mut self, address: u64, bytes: impl Into<Vec<u8>>)
    {
        self.memory.add_region(Address::new(address), bytes.into());
    }

    /// Place `bytes` at a fresh address
    pub fn place(&mut self, bytes: impl Into<Vec<u8>>) -> u64
    {
        let bytes = bytes.into();
        let address = self.reserve(bytes.len());
        self.write(address, bytes);
        address
    }

    /// Object bytes of an implicitly shared array (`QString`, `QByteArray`, `QVector`, Qt 6 `QList`)
    pub fn shared_array(&mut self, data: &[u8], len: usize) -> Vec<u8>
    {
        let mut payload = data.to_vec();
        payload.extend_from_slice(&[0, 0]);
        if self.is_qt6() {
            let d = self.place(Blob::new(16).i32(0, 1).into_vec());
            let data = self.place(payload);
            Blob::new(24).u64(0, d).u64(8, data).i64(16, len as i64).into_vec()
        } else {
            let header = Blob::new(24)
                .i32(0, 1)
                .i32(4, len as i32)
                .i64(16, 24)
                .bytes(24, &payload);
            ptr(self.place(header.into_vec()))
        }
    }

    pub fn qstring(&mut self, text: &str) -> Vec<u8>
    {
        self.shared_array(&utf16(text), text.encode_utf16().count())
    }

    pub fn qbytearray(&mut self, bytes: &[u8]) -> Vec<u8>
    {
        self.shared_array(bytes, bytes.len())
    }

    /// `QStringView` over units `from..from + len` of a placed `QString`
    pub fn qstring_view(&mut self, text: &str, from: usize, len: usize) -> Vec<u8>
    {
        let data = self.place(utf16(text));
        Blob::new(16).i64(0, len as i64).u64(8, data + 2 * from as u64).into_vec()
    }

    /// `QList<T>` holding `elements` (each already laid out as a `T`)
    pub fn qlist(&mut self, elements: &[Vec<u8>]) -> Vec<u8>
    {
        if self.is_qt6() {
            return self.shared_array(&elements.concat(), elements.len());
        }
        let n = elements.len();
        let mut header = Blob::new(16 + 8 * n).i32(0, 1).i32(4, n as i32).i32(8, 0).i32(12, n as i32);
        for (index, element) in elements.iter().enumerate() {
            let slot = if element.len() <= 8 { element.clone() } else { ptr(self.place(element.clone())) };
            header = header.bytes(16 + 8 * index, &slot);
        }
        ptr(self.place(header.into_vec()))
    }

    /// libstdc++ `std::string`
    pub fn std_string(&mut self, text: &str) -> Vec<u8>
    {
        let data = self.place(c_string(text));
        Blob::new(32).u64(0, data).u64(8, text.len() as u64).into_vec()
    }

    /// libstdc++ `std::vector<T>`
    pub fn std_vector(&mut self, elements: &[Vec<u8>]) -> Vec<u8>
    {
        let data = elements.concat();
        let begin = self.place(data.clone());
        let end = begin + data.len() as u64;
        Blob::new(24).u64(0, begin).u64(8, end).u64(16, end).into_vec()
    }

    /// `QUrl` with the given text fields (`scheme`, `userName`, ...) and port
    pub fn qurl(&mut self, fields: &[(&str, &str)], port: i32) -> Vec<u8>
    {
        const NAMES: [&str; 7] = ["scheme", "userName", "password", "host", "path", "query", "fragment"];
        let stride = if self.is_qt6() { 24 } else { 8 };
        let mut private = Blob::new(8 + 7 * stride).i32(0, 1).i32(4, port);
        for (index, name) in NAMES.iter().enumerate() {
            let text = fields.iter().find(|(field, _)| field == name).map_or("", |(_, text)| *text);
            let string = self.qstring(text);
            private = private.bytes(8 + index * stride, &string);
        }
        ptr(self.place(private.into_vec()))
    }

    /// `QTextCursor`
    pub fn qtextcursor(&mut self, position: i32, anchor: i32) -> Vec<u8>
    {
        let private = Blob::new(32).i32(0, 1).i32(24, position).i32(28, anchor);
        ptr(self.place(private.into_vec()))
    }

    /// `QFile` (vtable, `d_ptr`)
    pub fn qfile(&mut self, file_name: &str, open_mode: u32, error: i32) -> Vec<u8>
    {
        let (open_mode_at, error_at, name_at) = if self.is_qt6() { (0x88, 0x1c8, 0x1d8) } else { (0x74, 0x15c, 0x168) };
        let name = self.qstring(file_name);
        let private = Blob::new(name_at)
            .u32(open_mode_at, open_mode)
            .i32(error_at, error)
            .bytes(name_at, &name);
        let d = self.place(private.into_vec());
        Blob::new(16).u64(8, d).into_vec()
    }

    /// `QFileInfo`
    pub fn qfileinfo(&mut self, path: &str) -> Vec<u8>
    {
        let path = self.qstring(path);
        let private = Blob::new(8).i32(0, 1).bytes(8, &path);
        ptr(self.place(private.into_vec()))
    }

    /// Qt 6 `QVariant` holding `data` (at most 24 bytes) of type `type_name`
    pub fn qvariant6(&mut self, type_name: &str, data: &[u8]) -> Vec<u8>
    {
        let name = self.place(c_string(type_name));
        let interface = self.place(Blob::new(32).u32(4, data.len() as u32).u64(24, name).into_vec());
        Blob::new(24).bytes(0, data).u64(24, interface >> 2).into_vec()
    }

    /// Qt 5 `QVariant` holding `data` (at most 8 bytes) with builtin type `id`
    pub fn qvariant5(&mut self, id: u32, data: &[u8]) -> Vec<u8>
    {
        Blob::new(16).bytes(0, data).u32(8, id).into_vec()
    }

    /// Place a red-black tree holding `values` (key and mapped value laid out
    /// as the node payload) as a right-leaning chain, returning `(root, leftmost, rightmost)`
    fn tree(&mut self, header: u64, values: &[Vec<u8>], qt5_nodes: bool) -> (u64, u64, u64)
    {
        let (parent_at, left_at, right_at, value_at) = if qt5_nodes { (0, 8, 16, 24) } else { (8, 16, 24, 32) };
        let nodes: Vec<u64> = values.iter().map(|value| self.reserve(value_at + value.len())).collect();
        for (index, value) in values.iter().enumerate() {
            let parent = if index == 0 { header } else { nodes[index - 1] };
            let right = nodes.get(index + 1).copied().unwrap_or(0);
            let node = Blob::new(value_at)
                .u64(parent_at, parent)
                .u64(left_at, 0)
                .u64(right_at, right)
                .bytes(value_at, value);
            self.write(nodes[index], node.into_vec());
        }
        match (nodes.first(), nodes.last()) {
            (Some(&first), Some(&last)) => (first, first, last),
            _ => (0, header, header),
        }
    }

    /// Place a libstdc++ `std::map` holding `values` and return its address
    pub fn place_std_map(&mut self, values: &[Vec<u8>]) -> u64
    {
        let address = self.reserve(48);
        let header = address + 8;
        let (root, leftmost, rightmost) = self.tree(header, values, false);
        let map = Blob::new(48)
            .u64(16, root)
            .u64(24, leftmost)
            .u64(32, rightmost)
            .u64(40, values.len() as u64);
        self.write(address, map.into_vec());
        address
    }

    /// `QMap<K, V>` holding `values` in key order
    pub fn qmap(&mut self, values: &[Vec<u8>]) -> Vec<u8>
    {
        if self.is_qt6() {
            let data = self.reserve(56);
            let header = data + 16;
            let (root, leftmost, rightmost) = self.tree(header, values, false);
            // ref, then std::map: comparator, header node {color, parent, left, right}, count
            let map_data = Blob::new(56)
                .i32(0, 1)
                .u64(24, root)
                .u64(32, leftmost)
                .u64(40, rightmost)
                .u64(48, values.len() as u64);
            self.write(data, map_data.into_vec());
            return ptr(data);
        }
        let data = self.reserve(40);
        let header = data + 8;
        let (root, leftmost, _) = self.tree(header, values, true);
        let map_data = Blob::new(40)
            .i32(0, 1)
            .i32(4, values.len() as i32)
            .u64(16, root)
            .u64(32, if values.is_empty() { header } else { leftmost });
        self.write(data, map_data.into_vec());
        ptr(data)
    }

    /// Qt 6 `QHash<K, V>` with one span; `entries` are `(bucket, node)`
    pub fn qhash(&mut self, entries: &[(usize, Vec<u8>)]) -> Vec<u8>
    {
        let storage = self.place(entries.iter().map(|(_, node)| node.clone()).collect::<Vec<_>>().concat());
        let mut span = Blob::new(144).bytes(0, &[0xff; 128]).u64(128, storage);
        for (index, (bucket, _)) in entries.iter().enumerate() {
            span = span.bytes(*bucket, &[index as u8]);
        }
        let spans = self.place(span.into_vec());
        let data = Blob::new(40)
            .i32(0, 1)
            .u64(8, entries.len() as u64)
            .u64(16, 128)
            .u64(32, spans);
        ptr(self.place(data.into_vec()))
    }

    /// `QObject` with an optional name and dynamic properties (values are `QVariant` bytes)
    pub fn qobject(&mut self, name: Option<&str>, properties: &[(&str, Vec<u8>)]) -> Vec<u8>
    {
        let private = self.object_private(name, properties, 0);
        Blob::new(16).u64(8, private).into_vec()
    }

    fn object_private(&mut self, name: Option<&str>, properties: &[(&str, Vec<u8>)], size: usize) -> u64
    {
        let (extra_at, values_at, name_at, private_size) =
            if self.is_qt6() { (72, 24, 96, 80) } else { (48, 8, 32, 56) };

        let children = self.qlist(&[]);
        let mut private = Blob::new(private_size.max(size)).bytes(24, &children);
        if name.is_some() || !properties.is_empty() {
            let names: Vec<Vec<u8>> = properties.iter().map(|(name, _)| self.qbytearray(name.as_bytes())).collect();
            let values: Vec<Vec<u8>> = properties.iter().map(|(_, value)| value.clone()).collect();
            let names = self.qlist(&names);
            let values = self.qlist(&values);
            let object_name = self.qstring(name.unwrap_or(""));
            let extra = Blob::new(name_at)
                .bytes(0, &names)
                .bytes(values_at, &values)
                .bytes(name_at, &object_name);
            let extra = self.place(extra.into_vec());
            private = private.u64(extra_at, extra);
        }
        self.place(private.into_vec())
    }

    /// `QCoreApplication` started with `args`
    pub fn qcoreapplication(&mut self, args: &[&str]) -> Vec<u8>
    {
        let (argc_at, argv_at) = if self.is_qt6() { (0x78, 0x80) } else { (0x68, 0x70) };
        let argc = self.place(int(args.len() as i32));
        let pointers: Vec<Vec<u8>> = args.iter().map(|arg| ptr(self.place(c_string(arg)))).collect();
        let argv = self.place(pointers.concat());

        let private = self.object_private(None, &[], argv_at + 8);
        self.write(private + argc_at as u64, ptr(argc));
        self.write(private + argv_at as u64, ptr(argv));
        Blob::new(16).u64(8, private).into_vec()
    }

    /// Qt 6 CBOR container holding `items`; returns its address
    fn cbor_container(&mut self, items: &[Json]) -> u64
    {
        let mut byte_data = Vec::new();
        let mut elements = Vec::new();
        for item in items {
            let (value, kind, flags) = match item {
                Json::Int(v) => (*v, 0x00, 0),
                Json::Double(v) => (i64::from_ne_bytes(v.to_bits().to_ne_bytes()), 0x202, 0),
                Json::Bool(true) => (0, 0x15, 0),
                Json::Bool(false) => (0, 0x14, 0),
                Json::Null => (0, 0x16, 0),
                Json::Str(text) => {
                    let offset = byte_data.len() as i64;
                    byte_data.extend_from_slice(&(text.len() as i64).to_le_bytes());
                    byte_data.extend_from_slice(text.as_bytes());
                    while byte_data.len() % 8 != 0 {
                        byte_data.push(0);
                    }
                    // HasByteData | StringIsAscii
                    (offset, 0x60, 0x02 | 0x08)
                }
                Json::Array(nested) => (self.cbor_container(nested) as i64, 0x80, 0x01),
            };
            elements.push(Blob::new(16).i64(0, value).i32(8, kind).i32(12, flags).into_vec());
        }
        let data = self.qbytearray(&byte_data);
        let list = self.qlist(&elements);
        let private = Blob::new(64).i32(0, 1).bytes(16, &data).bytes(40, &list);
        self.place(private.into_vec())
    }

    pub fn json_array(&mut self, items: &[Json]) -> Vec<u8>
    {
        ptr(self.cbor_container(items))
    }

    pub fn json_object(&mut self, members: &[(&str, Json)]) -> Vec<u8>
    {
        let items: Vec<Json> = members
            .iter()
            .flat_map(|(key, value)| [Json::Str((*key).to_string()), value.clone()])
            .collect();
        ptr(self.cbor_container(&items))
    }

    /// `QJsonValue` holding a scalar
    pub fn json_value(&mut self, kind: i32, n: i64) -> Vec<u8>
    {
        Blob::new(24).i64(0, n).i32(16, kind).into_vec()
    }

    pub fn version(&self) -> VersionTag
    {
        self.version
    }

    pub fn finish(self) -> Inspector<SnapshotMemory>
    {
        let options = FormatOptions::default();
        self.finish_with(options)
    }

    pub fn finish_with(self, options: FormatOptions) -> Inspector<SnapshotMemory>
    {
        Inspector::new(self.memory, options.with_default_version(self.version))
    }
}

pub fn handle(inspector: &Inspector<SnapshotMemory>, address: u64, type_name: &str) -> ValueHandle
{
    inspector.handle(&InspectRequest::new(address, type_name)).unwrap()
}

/// `key = value` pairs of the first-level children; handles render as their summary
pub fn children_of(inspector: &Inspector<SnapshotMemory>, handle: &ValueHandle) -> Vec<(String, String)>
{
    inspector
        .format(handle)
        .children
        .into_iter()
        .map(|child| {
            let value = match &child.value {
                ChildValue::Leaf(text) => text.clone(),
                ChildValue::Handle(nested) => inspector.format(nested).summary.to_string(),
            };
            (child.key.to_string(), value)
        })
        .collect()
}

/// `CHECK_SUMMARY`: `None` for an absent summary
pub fn check_summary(inspector: &Inspector<SnapshotMemory>, address: u64, type_name: &str, expected: Option<&str>)
{
    let handle = handle(inspector, address, type_name);
    assert_eq!(inspector.format(&handle).summary.as_deref(), expected, "summary of {type_name} at {address:#x}");
}

/// `CHECK_CHILDREN`: exact keys and rendered values, in order
pub fn check_children(inspector: &Inspector<SnapshotMemory>, address: u64, type_name: &str, expected: &[(&str, &str)])
{
    let handle = handle(inspector, address, type_name);
    let actual = children_of(inspector, &handle);
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    assert_eq!(actual, expected, "children of {type_name} at {address:#x}");
}
