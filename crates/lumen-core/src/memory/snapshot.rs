//! Captured memory regions.
//!
//! [`SnapshotMemory`] is a sparse address space made of readable regions.
//! Hosts that already hold a copy of the relevant memory (core dumps, test
//! fixtures, the CLI's snapshot files) use it as their [`MemoryReader`].
//!
//! ## Text format
//!
//! ```text
//! # comment
//! 0x1000: 01 02 03 04
//! 0x1004: 05 06        # continues the region above
//! 0x2000: deadbeef     # bytes may be written without spaces
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::MemoryReader;
use crate::error::{InspectError, Result};
use crate::types::Address;

/// Sparse, read-only view of a process address space
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMemory
{
    regions: BTreeMap<u64, Vec<u8>>,
}

impl SnapshotMemory
{
    /// Create an empty snapshot (every read fails)
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Load a snapshot in the text format from a file
    ///
    /// ## Errors
    ///
    /// Returns `Io` if the file cannot be read and `Snapshot` on syntax errors.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self>
    {
        fs::read_to_string(path)?.parse()
    }

    /// Map `bytes` at `base`
    ///
    /// Overlapping or adjacent regions are merged; bytes added later win.
    pub fn add_region(&mut self, base: Address, bytes: Vec<u8>)
    {
        if bytes.is_empty() {
            return;
        }
        let start = base.value();
        let end = start.saturating_add(bytes.len() as u64);

        let touching: Vec<u64> = self
            .regions
            .range(..=end)
            .filter(|(&region_start, region)| region_start.saturating_add(region.len() as u64) >= start)
            .map(|(&region_start, _)| region_start)
            .collect();

        if touching.is_empty() {
            self.regions.insert(start, bytes);
            return;
        }

        let merged_start = touching[0].min(start);
        let mut merged_end = end;
        let mut merged = Vec::new();
        let mut pieces = Vec::with_capacity(touching.len());
        for region_start in touching {
            if let Some(region) = self.regions.remove(&region_start) {
                merged_end = merged_end.max(region_start + region.len() as u64);
                pieces.push((region_start, region));
            }
        }
        merged.resize(usize::try_from(merged_end - merged_start).unwrap_or(0), 0);
        for (region_start, region) in pieces.into_iter().chain(std::iter::once((start, bytes))) {
            let offset = (region_start - merged_start) as usize;
            merged[offset..offset + region.len()].copy_from_slice(&region);
        }
        self.regions.insert(merged_start, merged);
    }

    /// Number of disjoint regions
    pub fn region_count(&self) -> usize
    {
        self.regions.len()
    }

    /// Total number of mapped bytes
    pub fn mapped_bytes(&self) -> usize
    {
        self.regions.values().map(Vec::len).sum()
    }
}

impl MemoryReader for SnapshotMemory
{
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>
    {
        let unreadable = || InspectError::Unreadable { address, size };
        let start = address.value();
        let (&base, region) = self.regions.range(..=start).next_back().ok_or_else(unreadable)?;
        let offset = usize::try_from(start - base).map_err(|_| unreadable())?;
        let end = offset.checked_add(size).ok_or_else(unreadable)?;
        region.get(offset..end).map(<[u8]>::to_vec).ok_or_else(unreadable)
    }
}

impl FromStr for SnapshotMemory
{
    type Err = InspectError;

    fn from_str(text: &str) -> Result<Self>
    {
        let mut memory = SnapshotMemory::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let (addr_text, bytes_text) = line
                .split_once(':')
                .ok_or_else(|| InspectError::Snapshot(format!("line {line_no}: expected '<address>: <bytes>'")))?;
            let addr_text = addr_text.trim();
            let digits = addr_text
                .strip_prefix("0x")
                .or_else(|| addr_text.strip_prefix("0X"))
                .unwrap_or(addr_text);
            let base = u64::from_str_radix(digits, 16)
                .map_err(|_| InspectError::Snapshot(format!("line {line_no}: invalid address '{addr_text}'")))?;

            let hex: String = bytes_text.split_whitespace().collect();
            if !hex.is_ascii() {
                return Err(InspectError::Snapshot(format!("line {line_no}: invalid byte")));
            }
            if hex.len() % 2 != 0 {
                return Err(InspectError::Snapshot(format!("line {line_no}: odd number of hex digits")));
            }
            let bytes = (0..hex.len())
                .step_by(2)
                .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|_| InspectError::Snapshot(format!("line {line_no}: invalid byte")))?;

            memory.add_region(Address::new(base), bytes);
        }
        Ok(memory)
    }
}
