//! Per-request page cache.
//!
//! Formatting one value touches the same few cache lines many times (a QMap
//! node is read for its links, then again for its key). [`PageCache`] keeps
//! whole pages for the lifetime of one inspection so each page is fetched from
//! the host at most once. A cache is never reused across requests: memory may
//! change between debugger stops.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use super::MemoryReader;
use crate::error::Result;
use crate::types::Address;

/// Default cache page size
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Read-through cache over another [`MemoryReader`]
///
/// Pages that cannot be read as a whole (a small mapped region in the middle
/// of an unmapped page) are remembered as such, and reads touching them go
/// straight to the inner reader.
pub struct PageCache<R>
{
    inner: R,
    page_size: usize,
    pages: RwLock<HashMap<u64, Option<Arc<Vec<u8>>>>>,
}

impl<R: MemoryReader> PageCache<R>
{
    /// Create a cache using [`DEFAULT_PAGE_SIZE`]
    pub fn new(inner: R) -> Self
    {
        Self::with_page_size(inner, DEFAULT_PAGE_SIZE)
    }

    /// Create a cache with a custom page size (rounded up to a power of two, at least 256)
    pub fn with_page_size(inner: R, page_size: usize) -> Self
    {
        Self {
            inner,
            page_size: page_size.max(256).next_power_of_two(),
            pages: RwLock::new(HashMap::new()),
        }
    }

    /// Page size in bytes
    pub fn page_size(&self) -> usize
    {
        self.page_size
    }

    /// Number of pages fetched so far (readable or not)
    pub fn cached_pages(&self) -> usize
    {
        self.pages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The wrapped reader
    pub fn inner(&self) -> &R
    {
        &self.inner
    }

    fn fetch_page(&self, base: u64) -> Option<Arc<Vec<u8>>>
    {
        if let Some(existing) = self.pages.read().unwrap_or_else(PoisonError::into_inner).get(&base) {
            return existing.clone();
        }

        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = pages.get(&base) {
            return existing.clone();
        }

        let page = self.inner.read(Address::new(base), self.page_size).ok().map(Arc::new);
        trace!(page = %Address::new(base), readable = page.is_some(), "page cache miss");
        pages.insert(base, page.clone());
        page
    }
}

impl<R: MemoryReader> MemoryReader for PageCache<R>
{
    fn read(&self, address: Address, size: usize) -> Result<Vec<u8>>
    {
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut output = vec![0u8; size];
        let mut copied = 0usize;
        let page_mask = !(self.page_size as u64 - 1);
        while copied < size {
            let absolute = address.value().saturating_add(copied as u64);
            let page_base = absolute & page_mask;
            let page_offset = (absolute - page_base) as usize;
            let chunk = (size - copied).min(self.page_size - page_offset);

            match self.fetch_page(page_base) {
                Some(page) => {
                    output[copied..copied + chunk].copy_from_slice(&page[page_offset..page_offset + chunk]);
                }
                None => {
                    // Partially mapped page: go to the reader for the exact range
                    let bytes = self.inner.read(Address::new(absolute), chunk)?;
                    output[copied..copied + chunk].copy_from_slice(&bytes);
                }
            }
            copied += chunk;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::memory::SnapshotMemory;

    #[test]
    fn test_cached_reads_match_direct_reads()
    {
        let mut mem = SnapshotMemory::new();
        mem.add_region(Address::new(0x1000), (0..=255u8).cycle().take(0x800).collect());
        let cache = PageCache::with_page_size(&mem, 256);

        let addr = Address::new(0x10f0);
        assert_eq!(cache.read(addr, 0x40).unwrap(), mem.read(addr, 0x40).unwrap());
        assert_eq!(cache.cached_pages(), 2);
        assert_eq!(cache.read(addr, 0x40).unwrap(), mem.read(addr, 0x40).unwrap());
        assert_eq!(cache.cached_pages(), 2);
    }

    #[test]
    fn test_partially_mapped_page_falls_back()
    {
        let mut mem = SnapshotMemory::new();
        mem.add_region(Address::new(0x2010), vec![1, 2, 3, 4]);
        let cache = PageCache::new(&mem);

        assert_eq!(cache.read(Address::new(0x2011), 2).unwrap(), vec![2, 3]);
        assert!(cache.read(Address::new(0x2012), 4).is_err());
    }
}
