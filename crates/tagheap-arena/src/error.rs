//! Heap error types.

use std::error::Error;
use std::fmt;

use tagheap_core::Sentinel;

/// Errors reported by heap construction and allocation.
///
/// Every variant is local to the failing call: the arena is left exactly as
/// it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// The arena cannot host even an empty block, or is too large for its
    /// payload to be described by a sentinel.
    InvalidCapacity {
        /// Requested arena size in bytes.
        capacity: usize,
        /// Smallest accepted arena size.
        minimum: usize,
        /// Largest accepted arena size.
        maximum: usize,
    },
    /// `allocate` was asked for zero elements.
    InvalidRequest {
        /// The rejected element count.
        count: usize,
    },
    /// No free block has enough payload for the request.
    OutOfMemory {
        /// Payload bytes requested. Saturates at `usize::MAX` when the
        /// element count times element size overflows.
        requested: usize,
        /// Largest free payload currently in the arena.
        largest_free: usize,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity {
                capacity,
                minimum,
                maximum,
            } => {
                write!(
                    f,
                    "invalid arena capacity {capacity} bytes: must be within {minimum}..={maximum}"
                )
            }
            Self::InvalidRequest { count } => {
                write!(f, "invalid allocation request for {count} elements")
            }
            Self::OutOfMemory {
                requested,
                largest_free,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes, largest free block {largest_free} bytes"
                )
            }
        }
    }
}

impl Error for HeapError {}

/// A broken arena invariant found by the checker.
///
/// Offsets are byte offsets of block headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutViolation {
    /// Header and footer of a block disagree.
    TagMismatch {
        /// Offset of the block header.
        header: usize,
        /// Raw header value.
        header_value: Sentinel,
        /// Raw value found where the footer should be.
        footer_value: Sentinel,
    },
    /// A block (or a truncated sentinel) runs past the end of the arena.
    Overrun {
        /// Offset of the offending header.
        header: usize,
        /// Arena size in bytes.
        capacity: usize,
    },
    /// Two neighbouring blocks are both free.
    AdjacentFree {
        /// Header offset of the left block.
        left: usize,
        /// Header offset of the right block.
        right: usize,
    },
}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagMismatch {
                header,
                header_value,
                footer_value,
            } => {
                write!(
                    f,
                    "tag mismatch at {header}: header {header_value}, footer {footer_value}"
                )
            }
            Self::Overrun { header, capacity } => {
                write!(f, "block at {header} overruns arena of {capacity} bytes")
            }
            Self::AdjacentFree { left, right } => {
                write!(f, "adjacent free blocks at {left} and {right}")
            }
        }
    }
}

impl Error for LayoutViolation {}
