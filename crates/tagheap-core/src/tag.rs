//! Boundary-tag encoding.
//!
//! Every block in a heap carries the same [`Sentinel`] value at both ends.
//! The sign encodes status and the magnitude encodes payload size:
//!
//! ```text
//!  v >= 0   free block, payload = v bytes
//!  v <  0   allocated block, payload = -v bytes
//! ```
//!
//! [`Tag`] is the decoded form. It performs no I/O; reading and writing
//! sentinels at arena offsets is the arena's job.

use std::fmt;

/// Raw on-arena sentinel word.
pub type Sentinel = i32;

/// Width of one sentinel in bytes.
pub const SENTINEL_SIZE: usize = std::mem::size_of::<Sentinel>();

/// Footprint of an empty-payload block: header plus footer.
///
/// This is both the smallest valid arena and the sliver threshold: a split
/// whose leftover is below this size would produce a fragment that cannot
/// host a block of its own.
pub const MIN_BLOCK_SIZE: usize = 2 * SENTINEL_SIZE;

/// Largest payload a sentinel can describe.
pub const MAX_PAYLOAD: usize = Sentinel::MAX as usize;

/// Whether a block is available for allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockStatus {
    /// Available to the allocation engine.
    Free,
    /// Handed out to a caller.
    Allocated,
}

/// Decoded boundary tag: status plus payload size in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Free or allocated.
    pub status: BlockStatus,
    /// Payload size in bytes, excluding both sentinels.
    pub payload: usize,
}

impl Tag {
    /// A free block with the given payload.
    pub fn free(payload: usize) -> Self {
        Self {
            status: BlockStatus::Free,
            payload,
        }
    }

    /// An allocated block with the given payload.
    pub fn allocated(payload: usize) -> Self {
        Self {
            status: BlockStatus::Allocated,
            payload,
        }
    }

    /// Decode a raw sentinel.
    pub fn decode(raw: Sentinel) -> Self {
        if raw >= 0 {
            Self::free(raw as usize)
        } else {
            Self::allocated(raw.unsigned_abs() as usize)
        }
    }

    /// Encode into a raw sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `payload` exceeds [`MAX_PAYLOAD`]. Heaps reject capacities
    /// that could produce such a block at construction, so this only fires
    /// on a corrupted layout.
    pub fn encode(self) -> Sentinel {
        assert!(
            self.payload <= MAX_PAYLOAD,
            "payload {} does not fit in a sentinel",
            self.payload
        );
        let magnitude = self.payload as Sentinel;
        match self.status {
            BlockStatus::Free => magnitude,
            BlockStatus::Allocated => -magnitude,
        }
    }

    /// Whether the block is free.
    pub fn is_free(self) -> bool {
        self.status == BlockStatus::Free
    }

    /// Total bytes the block occupies in the arena, sentinels included.
    pub fn footprint(self) -> usize {
        self.payload + MIN_BLOCK_SIZE
    }

    /// The same block with its status flipped to free.
    pub fn freed(self) -> Self {
        Self::free(self.payload)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            BlockStatus::Free => write!(f, "free({})", self.payload),
            BlockStatus::Allocated => write!(f, "used({})", self.payload),
        }
    }
}
