//! Block positions and the implicit block list.
//!
//! There is no stored list of blocks: the next block always starts right
//! after the current block's footer. [`Blocks`] follows that chain from
//! offset 0.

use tagheap_core::{BlockAddr, Tag, SENTINEL_SIZE};

use crate::arena::Arena;

/// One block as seen from its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    /// Byte offset of the header sentinel.
    pub header: usize,
    /// Decoded header value.
    pub tag: Tag,
}

impl BlockInfo {
    /// Describe the block whose header sits at `header`.
    pub fn new(header: usize, tag: Tag) -> Self {
        Self { header, tag }
    }

    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        self.header + SENTINEL_SIZE
    }

    /// Offset of the footer sentinel.
    pub fn footer(&self) -> usize {
        self.payload_offset() + self.tag.payload
    }

    /// Offset where the following block's header starts.
    pub fn next_header(&self) -> usize {
        self.header + self.tag.footprint()
    }

    /// The address `allocate` hands out for this block.
    pub fn addr(&self) -> BlockAddr {
        BlockAddr::new(self.payload_offset())
    }
}

/// Iterator over the blocks of an arena in address order.
///
/// Trusts each header to find the next block. If a header claims more bytes
/// than remain, iteration ends instead of panicking; use
/// [`check`](crate::check::check) to find out why.
pub struct Blocks<'a> {
    arena: &'a Arena,
    cursor: usize,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(arena: &'a Arena) -> Self {
        Self { arena, cursor: 0 }
    }
}

impl Iterator for Blocks<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        let raw = self.arena.try_sentinel(self.cursor)?;
        let block = BlockInfo::new(self.cursor, Tag::decode(raw));
        match block.tag.footprint().checked_add(block.header) {
            Some(end) if end <= self.arena.len() => {
                self.cursor = end;
                Some(block)
            }
            _ => {
                self.cursor = self.arena.len();
                None
            }
        }
    }
}
