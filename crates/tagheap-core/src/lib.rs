//! Core types for the tagheap block allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: the boundary-tag
//! encoding ([`Tag`]), the element types a heap can hold ([`Element`]),
//! and payload addresses ([`BlockAddr`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod addr;
pub mod element;
pub mod tag;

pub use addr::BlockAddr;
pub use element::Element;
pub use tag::{BlockStatus, Sentinel, Tag, MAX_PAYLOAD, MIN_BLOCK_SIZE, SENTINEL_SIZE};
