//! Seeded random allocate/deallocate workloads.
//!
//! A [`Workload`] draws operations from a `ChaCha8Rng`, applies them to a
//! heap and remembers which addresses are live, so the same seed always
//! replays the same sequence.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tagheap_arena::{BlockHeap, HeapError};
use tagheap_core::{BlockAddr, Element};

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapOp {
    /// Request `count` elements.
    Allocate { count: usize },
    /// Free the live block at index `slot` of [`Workload::live`].
    Deallocate { slot: usize },
}

/// Deterministic allocate/deallocate generator and driver.
pub struct Workload {
    rng: ChaCha8Rng,
    max_count: usize,
    free_percent: u32,
    live: Vec<BlockAddr>,
    pub allocated: u64,
    pub failed: u64,
    pub freed: u64,
}

impl Workload {
    /// Requests draw counts in `1..=max_count`; 40% of steps free a block
    /// when any are live.
    pub fn new(seed: u64, max_count: usize) -> Self {
        assert!(max_count > 0, "max_count must be at least 1");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_count,
            free_percent: 40,
            live: Vec::new(),
            allocated: 0,
            failed: 0,
            freed: 0,
        }
    }

    /// Set the share of steps (0..=100) that free a live block.
    pub fn free_percent(mut self, percent: u32) -> Self {
        self.free_percent = percent.min(100);
        self
    }

    /// Addresses allocated by this workload and not yet freed.
    pub fn live(&self) -> &[BlockAddr] {
        &self.live
    }

    /// Draw the next operation without applying it.
    pub fn next_op(&mut self) -> HeapOp {
        let roll = self.rng.next_u32() % 100;
        if !self.live.is_empty() && roll < self.free_percent {
            let slot = self.rng.next_u32() as usize % self.live.len();
            HeapOp::Deallocate { slot }
        } else {
            let count = 1 + self.rng.next_u32() as usize % self.max_count;
            HeapOp::Allocate { count }
        }
    }

    /// Draw one operation and apply it to `heap`.
    ///
    /// Out-of-memory failures are counted, not raised.
    pub fn step<E: Element>(&mut self, heap: &mut BlockHeap<E>) -> HeapOp {
        let op = self.next_op();
        match op {
            HeapOp::Allocate { count } => match heap.allocate(count) {
                Ok(addr) => {
                    self.live.push(addr);
                    self.allocated += 1;
                }
                Err(HeapError::OutOfMemory { .. }) => self.failed += 1,
                Err(e) => panic!("unexpected allocation error: {e}"),
            },
            HeapOp::Deallocate { slot } => {
                let addr = self.live.swap_remove(slot);
                heap.deallocate(addr);
                self.freed += 1;
            }
        }
        op
    }

    /// Apply `steps` operations, calling `inspect` after each.
    pub fn run<E: Element>(
        &mut self,
        heap: &mut BlockHeap<E>,
        steps: usize,
        mut inspect: impl FnMut(&BlockHeap<E>, HeapOp),
    ) {
        for _ in 0..steps {
            let op = self.step(heap);
            inspect(heap, op);
        }
    }

    /// Free every live block in a random order.
    pub fn drain<E: Element>(&mut self, heap: &mut BlockHeap<E>) {
        while !self.live.is_empty() {
            let slot = self.rng.next_u32() as usize % self.live.len();
            let addr = self.live.swap_remove(slot);
            heap.deallocate(addr);
            self.freed += 1;
        }
    }
}
