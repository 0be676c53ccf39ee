//! Benchmark profiles for the tagheap allocator.
//!
//! Provides pre-built heaps in representative states:
//!
//! - [`fresh_heap`]: a single free block
//! - [`fragmented_heap`]: alternating used/free blocks, the worst case for
//!   a first-fit scan
//! - [`churned_heap`]: a heap after a seeded random workload

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tagheap_arena::BlockHeap;
use tagheap_core::BlockAddr;
use tagheap_test_utils::Workload;

/// Reference arena size: 1MB.
pub const REFERENCE_CAPACITY: usize = 1024 * 1024;

/// A fresh `u32` heap of `capacity` bytes.
pub fn fresh_heap(capacity: usize) -> BlockHeap<u32> {
    BlockHeap::with_capacity(capacity).expect("benchmark capacity is valid")
}

/// A `u32` heap filled with `count`-element blocks, every other one freed.
///
/// Returns the heap and the addresses still allocated. Every free hole is
/// exactly `count` elements, so any larger request must scan the whole
/// arena.
pub fn fragmented_heap(capacity: usize, count: usize) -> (BlockHeap<u32>, Vec<BlockAddr>) {
    let mut heap = fresh_heap(capacity);
    let mut addrs = Vec::new();
    while let Ok(addr) = heap.allocate(count) {
        addrs.push(addr);
    }
    let mut kept = Vec::with_capacity(addrs.len() / 2);
    for (i, addr) in addrs.into_iter().enumerate() {
        if i % 2 == 0 {
            heap.deallocate(addr);
        } else {
            kept.push(addr);
        }
    }
    (heap, kept)
}

/// A `u32` heap after `steps` operations of a seeded workload.
pub fn churned_heap(capacity: usize, seed: u64, steps: usize) -> (BlockHeap<u32>, Workload) {
    let mut heap = fresh_heap(capacity);
    let mut workload = Workload::new(seed, 64);
    workload.run(&mut heap, steps, |_, _| {});
    (heap, workload)
}
