//! Fixed-count, fixed-capacity block pool.
//!
//! All blocks are allocated once when the pool is built; [`BlockPool::acquire`]
//! and [`BlockPool::release`] are pure ownership transfers. The pool bounds
//! the worst-case burst of unread audio: when every block is in flight, the
//! producer stalls until the consumer releases one.

use parking_lot::Mutex;

/// Blocks in the pool, matching the original peripheral's slab.
pub const DEFAULT_BLOCK_COUNT: usize = 4;

/// Per-block capacity in bytes, the largest block the hardware can deliver.
pub const DEFAULT_BLOCK_CAPACITY: usize = 6400;

/// One pool-owned capture block, lent out by [`BlockPool::acquire`].
///
/// The producer fills `buf_mut()` and records the delivered length with
/// `set_len`; the consumer copies `bytes()` out and returns the block with
/// [`BlockPool::release`]. Blocks cannot be constructed outside the pool, and
/// moving them through `release` makes double-release unrepresentable.
#[derive(Debug)]
pub struct PooledBlock {
    slot: usize,
    len: usize,
    data: Box<[u8]>,
}

impl PooledBlock {
    /// Index of this block within its pool.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Delivered payload length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed capacity of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The delivered payload.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Producer-side access to the whole buffer.
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Record how many bytes the producer wrote.
    ///
    /// # Panics
    /// Panics if `len` exceeds the block capacity.
    pub fn set_len(&mut self, len: usize) {
        assert!(len <= self.data.len(), "block length exceeds capacity");
        self.len = len;
    }
}

/// Statically-sized arena of capture blocks shared between the hardware
/// producer and the streaming reader.
#[derive(Debug)]
pub struct BlockPool {
    block_size: usize,
    total: usize,
    free: Mutex<Vec<PooledBlock>>,
}

impl BlockPool {
    /// Allocate a pool of `count` blocks of `block_size` bytes each.
    ///
    /// This is the only allocation the pool ever performs.
    ///
    /// # Panics
    /// Panics if `count` or `block_size` is zero.
    pub fn new(count: usize, block_size: usize) -> Self {
        assert!(count > 0, "pool needs at least one block");
        assert!(block_size > 0, "blocks need a nonzero capacity");

        let free = (0..count)
            .map(|slot| PooledBlock {
                slot,
                len: 0,
                data: vec![0u8; block_size].into_boxed_slice(),
            })
            .collect();

        Self {
            block_size,
            total: count,
            free: Mutex::new(free),
        }
    }

    /// Pool sized like the original peripheral slab: 4 blocks of 6400 bytes.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BLOCK_COUNT, DEFAULT_BLOCK_CAPACITY)
    }

    /// Take a free block, or `None` when all blocks are in flight.
    pub fn acquire(&self) -> Option<PooledBlock> {
        self.free.lock().pop()
    }

    /// Return a block to the pool.
    ///
    /// A block that does not belong to this pool (wrong slot range, wrong
    /// capacity, or a slot that is already free) is a caller bug; it is
    /// logged and discarded rather than corrupting the free list.
    pub fn release(&self, mut block: PooledBlock) {
        if block.slot >= self.total || block.capacity() != self.block_size {
            log::warn!(
                "discarding foreign block (slot {}, capacity {})",
                block.slot,
                block.capacity()
            );
            return;
        }

        let mut free = self.free.lock();
        if free.iter().any(|b| b.slot == block.slot) {
            log::warn!("discarding duplicate release of slot {}", block.slot);
            return;
        }
        block.len = 0;
        free.push(block);
    }

    /// Number of blocks currently free.
    pub fn free_blocks(&self) -> usize {
        self.free.lock().len()
    }

    /// Total blocks owned by the pool.
    pub fn total_blocks(&self) -> usize {
        self.total
    }

    /// Capacity of each block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}
