//! Fixed-capacity, in-place block allocation for tagheap.
//!
//! A [`BlockHeap`] carves a single pre-sized byte arena into variable-length
//! blocks. Block status and size live in the arena itself as boundary tags,
//! so no side structures are needed to find free space or merge neighbours.
//!
//! # Architecture
//!
//! ```text
//! BlockHeap<E> (typed front-end: element counts, construct/destroy)
//! ├── Arena (Box<[u8]>, fixed at construction)
//! │   └── sentinel codec (i32 header/footer at byte offsets)
//! ├── alloc   first-fit scan + split-or-consume
//! ├── dealloc status flip + right/left coalescing
//! ├── check   whole-arena tiling audit
//! └── HeapStats (cumulative counters)
//! ```
//!
//! # Block layout
//!
//! ```text
//! | hdr | payload ........ | ftr | hdr | payload | ftr | ...
//!   i32                     i32
//! ```
//!
//! Header and footer carry the same value: `>= 0` for a free block of that
//! many payload bytes, `< 0` for an allocated one. Blocks tile the arena from
//! offset 0 to its end with no gaps, and no two free blocks are ever adjacent
//! once a public operation returns.
//!
//! # Threading
//!
//! Every mutating operation takes `&mut self`. There is no internal locking;
//! share a heap across threads only behind your own exclusion.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod alloc;
pub mod arena;
pub mod block;
pub mod check;
pub mod config;
mod dealloc;
pub mod error;
pub mod heap;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use block::{BlockInfo, Blocks};
pub use config::HeapConfig;
pub use error::{HeapError, LayoutViolation};
pub use heap::BlockHeap;
pub use stats::{HeapStats, HeapUsage};
