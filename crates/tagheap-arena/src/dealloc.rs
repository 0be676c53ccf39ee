//! Deallocation engine: status flip and neighbour coalescing.

use tagheap_core::{Tag, MIN_BLOCK_SIZE, SENTINEL_SIZE};

use crate::arena::Arena;
use crate::block::BlockInfo;

/// Outcome of releasing one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Release {
    /// The free block that now covers the released bytes.
    pub block: BlockInfo,
    /// Whether the block after it was absorbed.
    pub merged_right: bool,
    /// Whether the block was absorbed into the one before it.
    pub merged_left: bool,
}

/// Free the allocated block whose header sits at `header` and merge it with
/// any free neighbours.
///
/// Both sides are always tried, so a block freed between two free blocks
/// ends up as a single free block.
pub(crate) fn release(arena: &mut Arena, header: usize, scrub: bool) -> Release {
    let tag = arena.tag(header);
    debug_assert!(
        !tag.is_free(),
        "block at {header} is not allocated (double free or foreign address)"
    );

    let mut block = BlockInfo::new(header, tag.freed());
    if scrub {
        arena
            .bytes_mut(block.payload_offset(), block.tag.payload)
            .fill(0);
    }
    arena.write_block(block.header, block.tag);

    let merged_right = coalesce_right(arena, &mut block);
    let merged_left = coalesce_left(arena, &mut block);
    Release {
        block,
        merged_right,
        merged_left,
    }
}

fn coalesce_right(arena: &mut Arena, block: &mut BlockInfo) -> bool {
    let next = block.next_header();
    if next >= arena.len() {
        return false;
    }
    let right = arena.tag(next);
    if !right.is_free() {
        return false;
    }
    block.tag = Tag::free(block.tag.payload + MIN_BLOCK_SIZE + right.payload);
    arena.write_block(block.header, block.tag);
    true
}

fn coalesce_left(arena: &mut Arena, block: &mut BlockInfo) -> bool {
    if block.header == 0 {
        return false;
    }
    let left = arena.tag(block.header - SENTINEL_SIZE);
    if !left.is_free() {
        return false;
    }
    let header = block.header - left.footprint();
    *block = BlockInfo::new(
        header,
        Tag::free(left.payload + MIN_BLOCK_SIZE + block.tag.payload),
    );
    arena.write_block(block.header, block.tag);
    true
}
