//! tagheap: a fixed-capacity, in-place block allocator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! tagheap sub-crates. For most users, adding `tagheap` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tagheap::prelude::*;
//!
//! // 100-byte arena holding i32 elements.
//! let mut heap = BlockHeap::<i32>::with_capacity(100).unwrap();
//!
//! let a = heap.allocate(5).unwrap();
//! let b = heap.allocate(10).unwrap();
//! heap.construct(a, 7);
//! heap.construct(heap.element_addr(b, 9), -1);
//! assert_eq!(heap.read(a), 7);
//!
//! // 100 - (8 + 20) - (8 + 40) - 8 = 16 bytes left.
//! assert_eq!(heap.usage().largest_free, 16);
//! assert!(matches!(heap.allocate(5), Err(HeapError::OutOfMemory { .. })));
//!
//! heap.deallocate(a);
//! heap.deallocate(b);
//! assert!(heap.valid());
//! assert_eq!(heap.usage().free_blocks, 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tagheap-core` | Boundary tags, element trait, addresses |
//! | [`arena`] | `tagheap-arena` | `BlockHeap`, arena, checker, config, stats |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Heap, arena, checker, configuration and statistics (`tagheap-arena`).
pub use tagheap_arena as arena;

/// Boundary-tag encoding, element types and addresses (`tagheap-core`).
pub use tagheap_core as types;

/// Common imports for typical tagheap usage.
///
/// ```rust
/// use tagheap::prelude::*;
/// ```
pub mod prelude {
    // Heap and configuration
    pub use tagheap_arena::{BlockHeap, HeapConfig};

    // Errors
    pub use tagheap_arena::{HeapError, LayoutViolation};

    // Introspection
    pub use tagheap_arena::{BlockInfo, HeapStats, HeapUsage};

    // Core types
    pub use tagheap_core::{BlockAddr, BlockStatus, Element, Tag};
}
