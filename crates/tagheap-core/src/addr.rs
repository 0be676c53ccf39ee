//! Payload addresses.

use std::fmt;

/// Address of a payload byte within a heap's arena.
///
/// `allocate` returns the address of a block's first payload byte (the byte
/// right after its header). Addresses are plain byte offsets from the start
/// of the arena: they stay meaningful only for the heap that produced them,
/// and only until that block is deallocated or the heap is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct BlockAddr(usize);

impl BlockAddr {
    /// Wrap a raw arena byte offset.
    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Byte offset from the start of the arena.
    pub const fn offset(self) -> usize {
        self.0
    }

    /// The address `bytes` further into the arena.
    pub const fn byte_add(self, bytes: usize) -> Self {
        Self(self.0 + bytes)
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<BlockAddr> for usize {
    fn from(addr: BlockAddr) -> Self {
        addr.0
    }
}
