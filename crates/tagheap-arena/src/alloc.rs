//! Allocation engine: first-fit search and split-or-consume placement.

use tagheap_core::{Tag, MIN_BLOCK_SIZE};

use crate::arena::Arena;
use crate::block::BlockInfo;

/// How a free block was turned into an allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// The block was split; a free block of `remainder` payload bytes
    /// follows the allocation.
    Split { remainder: usize },
    /// The whole block was granted because the leftover could not host a
    /// block of its own. `slack` bytes beyond the request came along.
    Whole { slack: usize },
}

/// The first free block, scanning from offset 0, with at least `needed`
/// payload bytes.
pub(crate) fn first_fit(arena: &Arena, needed: usize) -> Option<BlockInfo> {
    arena
        .blocks()
        .find(|b| b.tag.is_free() && b.tag.payload >= needed)
}

/// Largest free payload in the arena.
pub(crate) fn largest_free(arena: &Arena) -> usize {
    arena
        .blocks()
        .filter(|b| b.tag.is_free())
        .map(|b| b.tag.payload)
        .max()
        .unwrap_or(0)
}

/// Mark `needed` bytes of the free block `candidate` as allocated.
///
/// `candidate` must be free with `payload >= needed`. A leftover smaller
/// than an empty block is not split off; the caller gets the whole block
/// with its original payload size.
pub(crate) fn place(arena: &mut Arena, candidate: BlockInfo, needed: usize) -> (BlockInfo, Placement) {
    debug_assert!(candidate.tag.is_free());
    debug_assert!(candidate.tag.payload >= needed);

    let leftover = candidate.tag.payload - needed;
    if leftover < MIN_BLOCK_SIZE {
        let granted = BlockInfo::new(candidate.header, Tag::allocated(candidate.tag.payload));
        arena.write_block(granted.header, granted.tag);
        return (granted, Placement::Whole { slack: leftover });
    }

    let granted = BlockInfo::new(candidate.header, Tag::allocated(needed));
    let remainder = leftover - MIN_BLOCK_SIZE;
    arena.write_block(granted.header, granted.tag);
    arena.write_block(granted.next_header(), Tag::free(remainder));
    (granted, Placement::Split { remainder })
}
