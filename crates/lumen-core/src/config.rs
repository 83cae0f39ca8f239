//! # Formatting Options
//!
//! Limits and label tables that travel with each request. There is no global
//! configuration: two panels inspecting the same process may use different
//! limits at the same time.
//!
//! ## Environment
//!
//! [`FormatOptions::from_env`] reads:
//!
//! - `LUMEN_MAX_DEPTH`: deepest child level that may be expanded
//! - `LUMEN_MAX_CHILDREN`: children listed per node before truncation
//! - `LUMEN_MAX_STRING_LEN`: characters (or bytes) rendered per text value
//! - `LUMEN_RAW_PREVIEW`: bytes shown for unrecognized types
//! - `LUMEN_QT_VERSION`: version tag used when a request does not carry one

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::types::VersionTag;

/// Default maximum expansion depth
pub const DEFAULT_MAX_DEPTH: usize = 16;
/// Default maximum children per node
pub const DEFAULT_MAX_CHILDREN: usize = 256;
/// Default maximum rendered text length
pub const DEFAULT_MAX_STRING_LEN: usize = 512;
/// Default raw preview length
pub const DEFAULT_RAW_PREVIEW_BYTES: usize = 16;

/// One bit of a file open-mode mask and its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenModeLabel
{
    /// Mask bit
    pub bit: u32,
    /// Label shown in the summary
    pub label: &'static str,
}

/// `QIODevice::OpenModeFlag` labels in declaration order
pub const DEFAULT_OPEN_MODE_LABELS: &[OpenModeLabel] = &[
    OpenModeLabel { bit: 0x01, label: "read" },
    OpenModeLabel { bit: 0x02, label: "write" },
    OpenModeLabel { bit: 0x04, label: "append" },
    OpenModeLabel { bit: 0x08, label: "truncate" },
    OpenModeLabel { bit: 0x10, label: "text" },
    OpenModeLabel { bit: 0x20, label: "unbuffered" },
    OpenModeLabel { bit: 0x40, label: "newonly" },
    OpenModeLabel { bit: 0x80, label: "existing" },
];

/// Per-request formatting limits and tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions
{
    /// Children of handles at this depth are replaced by a marker
    pub max_depth: usize,
    /// Children listed per node; the rest collapse into a `...` entry
    pub max_children: usize,
    /// Characters (bytes for byte buffers) rendered before `...`
    pub max_string_len: usize,
    /// Bytes previewed by the raw fallback
    pub raw_preview_bytes: usize,
    /// Open-mode labels, in the order they are joined
    pub open_mode_labels: Vec<OpenModeLabel>,
    /// Version used when neither the request nor the descriptor names one
    pub default_version: VersionTag,
}

impl Default for FormatOptions
{
    fn default() -> Self
    {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_children: DEFAULT_MAX_CHILDREN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            raw_preview_bytes: DEFAULT_RAW_PREVIEW_BYTES,
            open_mode_labels: DEFAULT_OPEN_MODE_LABELS.to_vec(),
            default_version: VersionTag::default(),
        }
    }
}

impl FormatOptions
{
    /// Defaults overridden by `LUMEN_*` environment variables
    ///
    /// Malformed values are logged and ignored.
    pub fn from_env() -> Self
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LUMEN_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self
    {
        let mut options = Self::default();
        override_from(&lookup, "LUMEN_MAX_DEPTH", &mut options.max_depth);
        override_from(&lookup, "LUMEN_MAX_CHILDREN", &mut options.max_children);
        override_from(&lookup, "LUMEN_MAX_STRING_LEN", &mut options.max_string_len);
        override_from(&lookup, "LUMEN_RAW_PREVIEW", &mut options.raw_preview_bytes);
        override_from(&lookup, "LUMEN_QT_VERSION", &mut options.default_version);
        options
    }

    /// Same options with a different depth ceiling
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self
    {
        self.max_depth = max_depth;
        self
    }

    /// Same options with a different child ceiling
    #[must_use]
    pub fn with_max_children(mut self, max_children: usize) -> Self
    {
        self.max_children = max_children;
        self
    }

    /// Same options with a different text ceiling
    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self
    {
        self.max_string_len = max_string_len;
        self
    }

    /// Same options with a different fallback version
    #[must_use]
    pub fn with_default_version(mut self, version: VersionTag) -> Self
    {
        self.default_version = version;
        self
    }
}

fn override_from<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(key, value = %raw, "ignoring malformed option"),
    }
}
