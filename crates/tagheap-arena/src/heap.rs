//! The typed heap front-end.
//!
//! [`BlockHeap`] ties the arena, the allocation and deallocation engines and
//! the checker together behind element-count requests, and adds the two
//! object-lifecycle pass-throughs ([`construct`](BlockHeap::construct) and
//! [`destroy`](BlockHeap::destroy)) a container needs.

use std::fmt;
use std::marker::PhantomData;

use tagheap_core::{BlockAddr, Element, SENTINEL_SIZE};
use tracing::{debug, trace};

use crate::alloc;
use crate::arena::Arena;
use crate::block::Blocks;
use crate::check;
use crate::config::HeapConfig;
use crate::dealloc;
use crate::error::{HeapError, LayoutViolation};
use crate::stats::{HeapStats, HeapUsage};

/// Fixed-capacity first-fit allocator over a single byte arena.
///
/// `E` is the element type: `allocate(count)` asks for `count * E::SIZE`
/// payload bytes. The arena never grows; running out of space is an
/// ordinary, recoverable [`HeapError::OutOfMemory`].
///
/// # Address contract
///
/// [`deallocate`](Self::deallocate), [`construct`](Self::construct),
/// [`destroy`](Self::destroy) and the payload accessors expect an address
/// returned by [`allocate`](Self::allocate) on this heap and not yet
/// deallocated. Other addresses are not detected in release builds: the
/// result is a corrupted layout (which [`valid`](Self::valid) reports) or a
/// bounds panic. Debug builds assert that a deallocated block is allocated.
pub struct BlockHeap<E: Element> {
    arena: Arena,
    config: HeapConfig,
    stats: HeapStats,
    _element: PhantomData<E>,
}

impl<E: Element> BlockHeap<E> {
    /// Create a heap from a config.
    ///
    /// Fails with [`HeapError::InvalidCapacity`] if the arena cannot host an
    /// empty block. No heap is created in that case.
    ///
    /// # Panics
    ///
    /// Panics if `E::SIZE` is zero.
    pub fn new(config: HeapConfig) -> Result<Self, HeapError> {
        assert!(E::SIZE > 0, "zero-sized elements are not supported");
        let arena = Arena::new(config.capacity)?;
        debug!(
            capacity = config.capacity,
            element_size = E::SIZE,
            "heap created"
        );
        Ok(Self {
            arena,
            config,
            stats: HeapStats::default(),
            _element: PhantomData,
        })
    }

    /// Create a heap of `capacity` bytes with default settings.
    pub fn with_capacity(capacity: usize) -> Result<Self, HeapError> {
        Self::new(HeapConfig::new(capacity))
    }

    /// Reserve room for `count` elements.
    ///
    /// Returns the address of the first payload byte. The granted payload
    /// may be larger than requested when splitting would leave a fragment
    /// too small to be a block; see [`payload_len`](Self::payload_len).
    ///
    /// Fails with [`HeapError::InvalidRequest`] for `count == 0` and with
    /// [`HeapError::OutOfMemory`] when no free block is large enough. The
    /// arena is untouched on failure.
    pub fn allocate(&mut self, count: usize) -> Result<BlockAddr, HeapError> {
        if count == 0 {
            self.stats.invalid_requests += 1;
            debug!("rejected zero-element allocation");
            return Err(HeapError::InvalidRequest { count });
        }

        let requested = count.saturating_mul(E::SIZE);
        let Some(candidate) = alloc::first_fit(&self.arena, requested) else {
            let largest_free = alloc::largest_free(&self.arena);
            self.stats.out_of_memory += 1;
            debug!(requested, largest_free, "allocation failed: out of memory");
            return Err(HeapError::OutOfMemory {
                requested,
                largest_free,
            });
        };

        let (granted, placement) = alloc::place(&mut self.arena, candidate, requested);
        self.stats.allocations += 1;
        let (split, leftover) = match placement {
            alloc::Placement::Split { remainder } => {
                self.stats.splits += 1;
                (true, remainder)
            }
            alloc::Placement::Whole { slack } => {
                self.stats.whole_grants += 1;
                (false, slack)
            }
        };
        let addr = granted.addr();
        trace!(
            %addr,
            requested,
            granted = granted.tag.payload,
            split,
            leftover,
            "allocate"
        );
        Ok(addr)
    }

    /// Return a block to the heap, merging it with free neighbours.
    pub fn deallocate(&mut self, addr: BlockAddr) {
        let header = self.header_of(addr);
        let release = dealloc::release(&mut self.arena, header, self.config.scrub_freed);
        self.stats.deallocations += 1;
        self.stats.left_merges += u64::from(release.merged_left);
        self.stats.right_merges += u64::from(release.merged_right);
        trace!(
            %addr,
            free_block = %release.block.tag,
            merged_left = release.merged_left,
            merged_right = release.merged_right,
            "deallocate"
        );
    }

    /// Place `value` at `addr`.
    ///
    /// Pure pass-through: writes the element's bytes and nothing else.
    pub fn construct(&mut self, addr: BlockAddr, value: E) {
        value.write_bytes(self.arena.bytes_mut(addr.offset(), E::SIZE));
    }

    /// Move the value at `addr` out, ending its life in the arena.
    ///
    /// Pure pass-through: the bytes are left in place and the block stays
    /// allocated.
    pub fn destroy(&mut self, addr: BlockAddr) -> E {
        self.read(addr)
    }

    /// Copy the value at `addr` without ending its life.
    pub fn read(&self, addr: BlockAddr) -> E {
        E::read_bytes(self.arena.bytes(addr.offset(), E::SIZE))
    }

    /// Address of the `index`-th element of the block starting at `addr`.
    ///
    /// An index past the end of the block is outside the address contract,
    /// the same as a foreign `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the element offset overflows `usize`. Debug builds also
    /// panic when the element does not fit in the block's payload.
    pub fn element_addr(&self, addr: BlockAddr, index: usize) -> BlockAddr {
        let Some(offset) = index.checked_mul(E::SIZE) else {
            panic!("element {index} of {addr} overflows the address space");
        };
        debug_assert!(
            offset + E::SIZE <= self.payload_len(addr),
            "element {index} is past the end of the block at {addr}"
        );
        addr.byte_add(offset)
    }

    /// Payload bytes granted to the block at `addr`.
    pub fn payload_len(&self, addr: BlockAddr) -> usize {
        self.arena.tag(self.header_of(addr)).payload
    }

    /// The payload bytes of the block at `addr`.
    pub fn payload(&self, addr: BlockAddr) -> &[u8] {
        let len = self.payload_len(addr);
        self.arena.bytes(addr.offset(), len)
    }

    /// Mutable payload bytes of the block at `addr`.
    pub fn payload_mut(&mut self, addr: BlockAddr) -> &mut [u8] {
        let len = self.payload_len(addr);
        self.arena.bytes_mut(addr.offset(), len)
    }

    /// Whether the blocks tile the arena and every header matches its
    /// footer.
    pub fn valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`valid`](Self::valid), but says what is wrong.
    pub fn check(&self) -> Result<(), LayoutViolation> {
        check::check(&self.arena)
    }

    /// [`check`](Self::check) plus no two free blocks are adjacent.
    pub fn check_coalesced(&self) -> Result<(), LayoutViolation> {
        check::check_coalesced(&self.arena)
    }

    /// Drop every allocation and return to a single free block.
    ///
    /// All outstanding addresses become invalid. Counters are kept.
    pub fn reset(&mut self) {
        self.arena.format();
        debug!(capacity = self.arena.len(), "heap reset");
    }

    /// Walk the blocks in address order.
    pub fn blocks(&self) -> Blocks<'_> {
        self.arena.blocks()
    }

    /// Summarise the current layout.
    pub fn usage(&self) -> HeapUsage {
        HeapUsage::from_blocks(self.arena.len(), self.arena.blocks())
    }

    /// Cumulative operation counters.
    pub fn stats(&self) -> &HeapStats {
        &self.stats
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Arena size in bytes.
    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        E::SIZE
    }

    /// Read-only view of the underlying arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    fn header_of(&self, addr: BlockAddr) -> usize {
        assert!(
            addr.offset() >= SENTINEL_SIZE && addr.offset() < self.arena.len(),
            "address {addr} is outside the arena"
        );
        addr.offset() - SENTINEL_SIZE
    }
}

impl<E: Element> fmt::Debug for BlockHeap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockHeap")
            .field("capacity", &self.arena.len())
            .field("element_size", &E::SIZE)
            .field("blocks", &self.blocks().map(|b| b.tag).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagheap_core::Tag;

    fn tags<E: Element>(heap: &BlockHeap<E>) -> Vec<Tag> {
        heap.blocks().map(|b| b.tag).collect()
    }

    #[test]
    fn allocate_returns_address_after_header() {
        let mut heap = BlockHeap::<i32>::with_capacity(100).unwrap();
        let p1 = heap.allocate(5).unwrap();
        let p2 = heap.allocate(10).unwrap();
        assert_eq!(p1, BlockAddr::new(4));
        assert_eq!(p2, BlockAddr::new(32));
        assert_eq!(heap.arena().sentinel(0), -20);
        assert_eq!(heap.arena().sentinel(28), -40);
    }

    #[test]
    fn zero_count_is_invalid_and_counted() {
        let mut heap = BlockHeap::<i32>::with_capacity(100).unwrap();
        assert_eq!(
            heap.allocate(0),
            Err(HeapError::InvalidRequest { count: 0 })
        );
        assert_eq!(heap.stats().invalid_requests, 1);
        assert_eq!(tags(&heap), vec![Tag::free(92)]);
    }

    #[test]
    fn out_of_memory_reports_largest_free() {
        let mut heap = BlockHeap::<i32>::with_capacity(100).unwrap();
        let _ = heap.allocate(5).unwrap();
        let err = heap.allocate(100).unwrap_err();
        assert_eq!(
            err,
            HeapError::OutOfMemory {
                requested: 400,
                largest_free: 64,
            }
        );
        assert_eq!(heap.stats().out_of_memory, 1);
        assert_eq!(tags(&heap), vec![Tag::allocated(20), Tag::free(64)]);
    }

    #[test]
    fn overflowing_count_is_out_of_memory() {
        let mut heap = BlockHeap::<u64>::with_capacity(64).unwrap();
        assert!(matches!(
            heap.allocate(usize::MAX),
            Err(HeapError::OutOfMemory {
                requested: usize::MAX,
                ..
            })
        ));
        assert!(heap.valid());
    }

    #[test]
    fn invalid_capacity_creates_no_heap() {
        assert!(matches!(
            BlockHeap::<u8>::with_capacity(4),
            Err(HeapError::InvalidCapacity { capacity: 4, .. })
        ));
    }

    #[test]
    fn minimum_heap_cannot_allocate() {
        let mut heap = BlockHeap::<u8>::with_capacity(8).unwrap();
        assert!(heap.valid());
        assert!(matches!(
            heap.allocate(1),
            Err(HeapError::OutOfMemory { largest_free: 0, .. })
        ));
    }

    #[test]
    fn whole_grant_reports_larger_payload() {
        let mut heap = BlockHeap::<u8>::with_capacity(100).unwrap();
        let p = heap.allocate(88).unwrap();
        assert_eq!(heap.payload_len(p), 92);
        assert_eq!(heap.stats().whole_grants, 1);
        assert_eq!(heap.stats().splits, 0);
    }

    #[test]
    fn construct_then_destroy_moves_value_through() {
        let mut heap = BlockHeap::<f64>::with_capacity(128).unwrap();
        let p = heap.allocate(3).unwrap();
        for (i, v) in [1.5, -2.0, 1e9].into_iter().enumerate() {
            let at = heap.element_addr(p, i);
            heap.construct(at, v);
        }
        assert_eq!(heap.read(heap.element_addr(p, 1)), -2.0);
        assert_eq!(heap.destroy(heap.element_addr(p, 2)), 1e9);
        assert!(heap.valid());
    }

    #[test]
    fn element_addr_steps_by_element_size() {
        let mut heap = BlockHeap::<u64>::with_capacity(64).unwrap();
        let p = heap.allocate(3).unwrap();
        assert_eq!(heap.element_addr(p, 0), p);
        assert_eq!(heap.element_addr(p, 2), p.byte_add(16));
    }

    #[test]
    #[should_panic(expected = "overflows the address space")]
    fn element_addr_rejects_overflowing_index() {
        let mut heap = BlockHeap::<u64>::with_capacity(64).unwrap();
        let p = heap.allocate(1).unwrap();
        let _ = heap.element_addr(p, usize::MAX / 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "past the end of the block")]
    fn element_addr_past_block_end_asserts_in_debug() {
        let mut heap = BlockHeap::<u32>::with_capacity(64).unwrap();
        let p = heap.allocate(2).unwrap();
        let _ = heap.element_addr(p, 2);
    }

    #[test]
    fn construct_does_not_touch_sentinels() {
        let mut heap = BlockHeap::<u32>::with_capacity(64).unwrap();
        let p = heap.allocate(2).unwrap();
        heap.construct(p, u32::MAX);
        heap.construct(heap.element_addr(p, 1), u32::MAX);
        assert_eq!(tags(&heap), vec![Tag::allocated(8), Tag::free(40)]);
    }

    #[test]
    fn payload_views_cover_granted_bytes() {
        let mut heap = BlockHeap::<u16>::with_capacity(64).unwrap();
        let p = heap.allocate(3).unwrap();
        heap.payload_mut(p).fill(0xAB);
        assert_eq!(heap.payload(p), &[0xAB; 6]);
        assert_eq!(heap.read(p), 0xABAB);
    }

    #[test]
    fn deallocate_updates_merge_counters() {
        let mut heap = BlockHeap::<u32>::with_capacity(100).unwrap();
        let a = heap.allocate(1).unwrap();
        let b = heap.allocate(1).unwrap();
        heap.deallocate(a);
        heap.deallocate(b);
        let s = heap.stats();
        assert_eq!(s.deallocations, 2);
        assert_eq!(s.left_merges, 1);
        assert_eq!(s.right_merges, 1);
        assert_eq!(tags(&heap), vec![Tag::free(92)]);
    }

    #[test]
    fn scrub_freed_clears_payload() {
        let config = HeapConfig::new(64).scrub_freed(true);
        let mut heap = BlockHeap::<u32>::new(config).unwrap();
        let a = heap.allocate(1).unwrap();
        let _b = heap.allocate(1).unwrap();
        heap.construct(a, 0xDEAD_BEEF);
        heap.deallocate(a);
        assert_eq!(heap.arena().bytes(a.offset(), 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn reset_restores_fresh_layout_and_keeps_stats() {
        let mut heap = BlockHeap::<u32>::with_capacity(100).unwrap();
        let _ = heap.allocate(3).unwrap();
        let _ = heap.allocate(4).unwrap();
        heap.reset();
        assert_eq!(tags(&heap), vec![Tag::free(92)]);
        assert_eq!(heap.stats().allocations, 2);
    }

    #[test]
    fn usage_matches_layout() {
        let mut heap = BlockHeap::<i32>::with_capacity(100).unwrap();
        let _ = heap.allocate(5).unwrap();
        let _ = heap.allocate(10).unwrap();
        let u = heap.usage();
        assert_eq!(u.used_bytes, 60);
        assert_eq!(u.free_bytes, 16);
        assert_eq!(u.accounted_bytes(), 100);
    }

    #[test]
    fn debug_lists_blocks() {
        let mut heap = BlockHeap::<u8>::with_capacity(32).unwrap();
        let _ = heap.allocate(4).unwrap();
        let s = format!("{heap:?}");
        assert!(s.contains("capacity: 32"));
        assert!(s.contains("Allocated"));
    }

    #[test]
    #[should_panic(expected = "outside the arena")]
    fn address_before_first_header_panics() {
        let mut heap = BlockHeap::<u8>::with_capacity(32).unwrap();
        heap.deallocate(BlockAddr::new(0));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Free(usize),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1usize..24).prop_map(Op::Alloc),
                any::<usize>().prop_map(Op::Free),
            ]
        }

        proptest! {
            #[test]
            fn random_ops_keep_arena_tiled_and_coalesced(
                capacity in 8usize..512,
                ops in proptest::collection::vec(arb_op(), 1..64),
            ) {
                let mut heap = BlockHeap::<u32>::with_capacity(capacity).unwrap();
                let mut live = Vec::new();
                for op in ops {
                    match op {
                        Op::Alloc(n) => match heap.allocate(n) {
                            Ok(addr) => live.push(addr),
                            Err(HeapError::OutOfMemory { .. }) => {}
                            Err(e) => prop_assert!(false, "unexpected error: {e}"),
                        },
                        Op::Free(i) if !live.is_empty() => {
                            let addr = live.swap_remove(i % live.len());
                            heap.deallocate(addr);
                        }
                        Op::Free(_) => {}
                    }
                    prop_assert!(heap.valid());
                    prop_assert_eq!(heap.check_coalesced(), Ok(()));
                    prop_assert_eq!(heap.usage().accounted_bytes(), capacity);
                }
                for addr in live {
                    heap.deallocate(addr);
                }
                prop_assert_eq!(tags(&heap), vec![Tag::free(capacity - 8)]);
            }

            #[test]
            fn first_fit_takes_leftmost_large_enough_hole(
                sizes in proptest::collection::vec(1usize..12, 2..16),
                k in 1usize..14,
            ) {
                // Room for every block plus a 16-byte tail that a 4-element
                // plug fills exactly.
                let capacity: usize = sizes.iter().map(|s| s * 4 + 8).sum::<usize>() + 24;
                let mut heap = BlockHeap::<u32>::with_capacity(capacity).unwrap();
                let addrs: Vec<_> = sizes.iter().map(|&s| heap.allocate(s).unwrap()).collect();
                let _ = heap.allocate(4).unwrap();
                prop_assert_eq!(heap.usage().free_blocks, 0);

                // Free every other block; allocated blocks keep the holes apart.
                for addr in addrs.iter().step_by(2) {
                    heap.deallocate(*addr);
                }

                let expected = sizes
                    .iter()
                    .zip(&addrs)
                    .step_by(2)
                    .find(|(s, _)| **s >= k)
                    .map(|(_, &addr)| addr);
                match (heap.allocate(k), expected) {
                    (Ok(got), Some(want)) => prop_assert_eq!(got, want),
                    (Err(HeapError::OutOfMemory { .. }), None) => {}
                    (got, want) => prop_assert!(false, "got {got:?}, expected {want:?}"),
                }
                prop_assert!(heap.valid());
            }
        }
    }
}
