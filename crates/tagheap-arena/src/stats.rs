//! Allocation counters and layout summaries.
//!
//! [`HeapStats`] accumulates over the heap's lifetime and is updated by
//! every public operation. [`HeapUsage`] is a point-in-time picture of the
//! arena computed on demand by walking it.

use tagheap_core::MIN_BLOCK_SIZE;

use crate::block::BlockInfo;

/// Cumulative operation counters for one heap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Successful `allocate` calls.
    pub allocations: u64,
    /// `deallocate` calls.
    pub deallocations: u64,
    /// Allocations that split a free block in two.
    pub splits: u64,
    /// Allocations that took a whole free block to avoid leaving a sliver.
    pub whole_grants: u64,
    /// Deallocations that merged into the preceding free block.
    pub left_merges: u64,
    /// Deallocations that absorbed the following free block.
    pub right_merges: u64,
    /// `allocate` calls that failed with `OutOfMemory`.
    pub out_of_memory: u64,
    /// `allocate` calls rejected with `InvalidRequest`.
    pub invalid_requests: u64,
}

/// Snapshot of how the arena is currently divided.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapUsage {
    /// Arena size in bytes.
    pub capacity: usize,
    /// Payload bytes in free blocks.
    pub free_bytes: usize,
    /// Payload bytes in allocated blocks, including whole-block slack.
    pub used_bytes: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Number of allocated blocks.
    pub used_blocks: usize,
    /// Largest single free payload; the biggest request that can succeed.
    pub largest_free: usize,
    /// Bytes spent on headers and footers.
    pub tag_bytes: usize,
}

impl HeapUsage {
    /// Summarise a sequence of blocks.
    pub fn from_blocks(capacity: usize, blocks: impl IntoIterator<Item = BlockInfo>) -> Self {
        let mut usage = Self {
            capacity,
            ..Self::default()
        };
        for block in blocks {
            usage.tag_bytes += MIN_BLOCK_SIZE;
            if block.tag.is_free() {
                usage.free_blocks += 1;
                usage.free_bytes += block.tag.payload;
                usage.largest_free = usage.largest_free.max(block.tag.payload);
            } else {
                usage.used_blocks += 1;
                usage.used_bytes += block.tag.payload;
            }
        }
        usage
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> usize {
        self.free_blocks + self.used_blocks
    }

    /// Bytes accounted for by all blocks. Equals `capacity` for a valid arena.
    pub fn accounted_bytes(&self) -> usize {
        self.free_bytes + self.used_bytes + self.tag_bytes
    }

    /// Share of free payload that lies outside the largest free block.
    ///
    /// 0.0 when all free space is contiguous (or there is none); approaches
    /// 1.0 as free space splinters into many small blocks.
    pub fn fragmentation(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        1.0 - self.largest_free as f64 / self.free_bytes as f64
    }
}
