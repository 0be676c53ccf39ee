//! The fixed byte arena and its sentinel codec.
//!
//! An [`Arena`] owns one `Box<[u8]>` sized at construction. It knows how to
//! read and write [`Sentinel`]s at byte offsets and how to stamp a block's
//! header and footer together, but makes no allocation decisions itself.

use tagheap_core::{Element, Sentinel, Tag, MIN_BLOCK_SIZE, SENTINEL_SIZE};

use crate::block::Blocks;
use crate::config::HeapConfig;
use crate::error::HeapError;

/// Fixed-size backing storage for a heap.
///
/// Sentinels are copied in and out byte-wise in native byte order, so no
/// offset needs any particular alignment.
pub struct Arena {
    /// Backing storage. Never resized.
    bytes: Box<[u8]>,
}

impl Arena {
    /// Create an arena of `capacity` bytes holding one free block.
    ///
    /// Returns `Err(HeapError::InvalidCapacity)` if `capacity` is below
    /// [`HeapConfig::MIN_CAPACITY`] or above [`HeapConfig::MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self, HeapError> {
        HeapConfig::new(capacity).validate()?;
        let mut arena = Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        };
        arena.format();
        Ok(arena)
    }

    /// Rewrite the arena as a single free block spanning all of it.
    ///
    /// Payload bytes are not cleared.
    pub fn format(&mut self) {
        let payload = self.bytes.len() - MIN_BLOCK_SIZE;
        self.write_block(0, Tag::free(payload));
    }

    /// Arena size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the arena has zero bytes. Always false for a constructed arena.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the sentinel at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the sentinel would extend past the end of the arena.
    pub fn sentinel(&self, offset: usize) -> Sentinel {
        Sentinel::read_bytes(&self.bytes[offset..offset + SENTINEL_SIZE])
    }

    /// Read the sentinel at `offset`, or `None` if it does not fit.
    pub fn try_sentinel(&self, offset: usize) -> Option<Sentinel> {
        let end = offset.checked_add(SENTINEL_SIZE)?;
        self.bytes.get(offset..end).map(Sentinel::read_bytes)
    }

    /// Write a raw sentinel at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the sentinel would extend past the end of the arena.
    pub fn set_sentinel(&mut self, offset: usize, value: Sentinel) {
        value.write_bytes(&mut self.bytes[offset..offset + SENTINEL_SIZE]);
    }

    /// Decode the tag whose header or footer sits at `offset`.
    pub fn tag(&self, offset: usize) -> Tag {
        Tag::decode(self.sentinel(offset))
    }

    /// Stamp `tag` into both the header at `header` and the matching footer.
    pub fn write_block(&mut self, header: usize, tag: Tag) {
        let raw = tag.encode();
        self.set_sentinel(header, raw);
        self.set_sentinel(header + SENTINEL_SIZE + tag.payload, raw);
    }

    /// Shared view of `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    /// Mutable view of `len` bytes starting at `offset`.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.bytes[offset..offset + len]
    }

    /// Walk the blocks from offset 0.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(self)
    }
}
