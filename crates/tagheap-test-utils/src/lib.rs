//! Test utilities for tagheap development.
//!
//! Provides tracing setup for tests, layout assertions over a
//! [`BlockHeap`], and seeded random [`Workload`]s for churn tests and
//! benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod workload;

use tagheap_arena::BlockHeap;
use tagheap_core::{Element, Sentinel, Tag};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use workload::{HeapOp, Workload};

/// Install a test-friendly tracing subscriber.
///
/// Filtered by `RUST_LOG`. Safe to call from every test; only the first
/// call in a process installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

/// Decoded tags of every block, in address order.
pub fn tags<E: Element>(heap: &BlockHeap<E>) -> Vec<Tag> {
    heap.blocks().map(|b| b.tag).collect()
}

/// Raw header sentinels of every block, in address order.
pub fn header_values<E: Element>(heap: &BlockHeap<E>) -> Vec<Sentinel> {
    heap.blocks().map(|b| heap.arena().sentinel(b.header)).collect()
}

/// Assert every layout invariant: exact tiling, matching tags, no adjacent
/// free blocks, and all bytes accounted for.
pub fn assert_consistent<E: Element>(heap: &BlockHeap<E>) {
    if let Err(violation) = heap.check_coalesced() {
        panic!("heap layout broken: {violation}\n{heap:?}");
    }
    assert_eq!(
        heap.usage().accounted_bytes(),
        heap.capacity(),
        "block footprints do not sum to capacity"
    );
}
