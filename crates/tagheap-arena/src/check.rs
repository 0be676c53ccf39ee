//! Whole-arena invariant checker.
//!
//! Read-only audits used by tests and as a debugging aid. Nothing in the
//! allocation or deallocation path calls these.

use tagheap_core::{Tag, SENTINEL_SIZE};

use crate::arena::Arena;
use crate::error::LayoutViolation;

/// Verify that blocks tile the arena exactly and every header matches its
/// footer.
///
/// Walks from offset 0, reading each header, locating its footer from the
/// decoded payload size and stepping to the next header. The walk must land
/// exactly on the end of the arena.
pub fn check(arena: &Arena) -> Result<(), LayoutViolation> {
    let capacity = arena.len();
    let overrun = |header| LayoutViolation::Overrun { header, capacity };

    let mut header = 0;
    while header < capacity {
        let header_value = arena.try_sentinel(header).ok_or(overrun(header))?;
        let footer = (header + SENTINEL_SIZE)
            .checked_add(Tag::decode(header_value).payload)
            .ok_or(overrun(header))?;
        let footer_value = arena.try_sentinel(footer).ok_or(overrun(header))?;
        if header_value != footer_value {
            return Err(LayoutViolation::TagMismatch {
                header,
                header_value,
                footer_value,
            });
        }
        header = footer + SENTINEL_SIZE;
    }
    Ok(())
}

/// [`check`], plus no two neighbouring blocks are both free.
pub fn check_coalesced(arena: &Arena) -> Result<(), LayoutViolation> {
    check(arena)?;
    let mut prev_free: Option<usize> = None;
    for block in arena.blocks() {
        match (prev_free, block.tag.is_free()) {
            (Some(left), true) => {
                return Err(LayoutViolation::AdjacentFree {
                    left,
                    right: block.header,
                });
            }
            (_, true) => prev_free = Some(block.header),
            (_, false) => prev_free = None,
        }
    }
    Ok(())
}
