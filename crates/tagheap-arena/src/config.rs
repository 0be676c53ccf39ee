//! Heap configuration parameters.

use tagheap_core::{MAX_PAYLOAD, MIN_BLOCK_SIZE};

use crate::error::HeapError;

/// Configuration for a [`BlockHeap`](crate::BlockHeap).
///
/// Validated at construction; the heap copies it and never changes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Arena size in bytes, sentinels included.
    ///
    /// Default: 65_536. Must be at least [`HeapConfig::MIN_CAPACITY`] and at
    /// most [`HeapConfig::MAX_CAPACITY`].
    pub capacity: usize,

    /// Zero a block's payload when it is deallocated.
    ///
    /// Default: `false`. Only the released block's payload is cleared; bytes
    /// that were sentinels before a merge are left as they are.
    pub scrub_freed: bool,
}

impl HeapConfig {
    /// Default arena size: 64KB.
    pub const DEFAULT_CAPACITY: usize = 64 * 1024;

    /// Smallest arena that can host an empty block.
    pub const MIN_CAPACITY: usize = MIN_BLOCK_SIZE;

    /// Largest arena whose single initial block still fits in a sentinel.
    pub const MAX_CAPACITY: usize = MAX_PAYLOAD + MIN_BLOCK_SIZE;

    /// Create a config for an arena of `capacity` bytes.
    ///
    /// Uses default values for all other parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            scrub_freed: false,
        }
    }

    /// Enable or disable payload scrubbing on deallocation.
    pub fn scrub_freed(mut self, scrub: bool) -> Self {
        self.scrub_freed = scrub;
        self
    }

    /// Check that `capacity` is within bounds.
    pub fn validate(&self) -> Result<(), HeapError> {
        if !(Self::MIN_CAPACITY..=Self::MAX_CAPACITY).contains(&self.capacity) {
            return Err(HeapError::InvalidCapacity {
                capacity: self.capacity,
                minimum: Self::MIN_CAPACITY,
                maximum: Self::MAX_CAPACITY,
            });
        }
        Ok(())
    }

    /// Payload bytes available in a fresh arena (one free block).
    pub fn usable_bytes(&self) -> usize {
        self.capacity.saturating_sub(MIN_BLOCK_SIZE)
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
