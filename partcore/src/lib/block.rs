use itertools::Itertools;
use log::debug;

use crate::{CommitError, ConfigError, Units};

/// Blocks are numbered from 1, in the order they were carved out of
/// the pool. The id of the block at index `i` is always `i + 1`.
pub type BlockId = usize;

/// A contiguous region of the pool.
///
/// `capacity` never changes. `free` only ever goes down, and
/// `start_offset` moves forward by the same amount, so that it always
/// points at the first unused unit of the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBlock {
    id:             BlockId,
    capacity:       Units,
    free:           Units,
    start_offset:   Units,
}

impl MemoryBlock {
    fn new(id: BlockId, capacity: Units, start_offset: Units) -> Self {
        Self {
            id,
            capacity,
            free: capacity,
            start_offset,
        }
    }

    pub fn id(&self) -> BlockId { self.id }

    pub fn capacity(&self) -> Units { self.capacity }

    pub fn free(&self) -> Units { self.free }

    pub fn start_offset(&self) -> Units { self.start_offset }

    /// Units handed out so far.
    pub fn used(&self) -> Units { self.capacity - self.free }

    /// A block is eligible for a request if it can host it whole.
    pub fn fits(&self, size: Units) -> bool { self.free >= size }
}

/// What to do when a commit asks for more than a block has left.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Refuse the commit; the block is left untouched.
    #[default]
    Reject,
    /// Drain the block to zero and report the drained amount as committed.
    /// Reproduces the legacy demo, which clamped negative sizes to zero.
    ///
    /// Only direct [`BlockTable::commit`] callers can hit this: the
    /// allocation engine checks fit under the table lock before committing.
    ClampToZero,
}

/// The result of a successful commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commit {
    pub block:          BlockId,
    /// Equals the requested amount, except under
    /// [`CommitPolicy::ClampToZero`].
    pub amount:         Units,
    pub free_before:    Units,
    pub free_after:     Units,
    /// Where the committed range begins inside the pool.
    pub start_offset:   Units,
}

/// One row of a block listing, ready to be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRow {
    pub id:             BlockId,
    pub free:           Units,
    pub start_offset:   Units,
    pub allocated:      bool,
}

/// Read-only window over the blocks of a [`BlockTable`]. Fit strategies
/// only ever get to see one of these.
#[derive(Clone, Copy, Debug)]
pub struct BlockView<'a> {
    blocks: &'a [MemoryBlock],
}

impl<'a> BlockView<'a> {
    pub fn len(&self) -> usize { self.blocks.len() }

    pub fn is_empty(&self) -> bool { self.blocks.is_empty() }

    /// Blocks in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'a, MemoryBlock> {
        self.blocks.iter()
    }

    pub fn get(&self, id: BlockId) -> Option<&'a MemoryBlock> {
        id.checked_sub(1).and_then(|idx| self.blocks.get(idx))
    }

    pub fn free_sizes(&self) -> Vec<Units> {
        self.blocks.iter().map(MemoryBlock::free).collect()
    }

    pub fn total_free(&self) -> Units {
        self.blocks.iter().map(MemoryBlock::free).sum()
    }
}

/// The single source of truth about the pool. [`commit`](BlockTable::commit)
/// is the only way to change it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTable {
    blocks: Vec<MemoryBlock>,
    policy: CommitPolicy,
}

impl BlockTable {
    /// Carves `total_size` into equally sized partitions of
    /// `partition_size`, laid out back to back from offset 0.
    pub fn initialize(total_size: Units, partition_size: Units) -> Result<Self, ConfigError> {
        if partition_size == 0 {
            return Err(ConfigError::ZeroPartition);
        }
        if total_size == 0 || total_size % partition_size != 0 {
            return Err(ConfigError::Indivisible {
                total:      total_size,
                partition:  partition_size,
            });
        }

        Self::from_capacities(&vec![partition_size; total_size / partition_size])
    }

    /// Builds a table of arbitrarily sized blocks, laid out back to back
    /// from offset 0 in the given order.
    pub fn from_capacities(capacities: &[Units]) -> Result<Self, ConfigError> {
        if capacities.is_empty() {
            return Err(ConfigError::NoBlocks);
        }
        let mut blocks = Vec::with_capacity(capacities.len());
        let mut offset = 0;
        for (idx, &cap) in capacities.iter().enumerate() {
            if cap == 0 {
                return Err(ConfigError::ZeroCapacity(idx + 1));
            }
            blocks.push(MemoryBlock::new(idx + 1, cap, offset));
            offset += cap;
        }

        Ok(Self {
            blocks,
            policy: CommitPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CommitPolicy { self.policy }

    pub fn len(&self) -> usize { self.blocks.len() }

    pub fn is_empty(&self) -> bool { self.blocks.is_empty() }

    pub fn snapshot(&self) -> BlockView<'_> {
        BlockView { blocks: &self.blocks }
    }

    pub fn total_free(&self) -> Units {
        self.snapshot().total_free()
    }

    pub fn total_capacity(&self) -> Units {
        self.blocks.iter().map(MemoryBlock::capacity).sum()
    }

    /// Takes `amount` units off the front of block `block_id`.
    pub fn commit(&mut self, block_id: BlockId, amount: Units) -> Result<Commit, CommitError> {
        if amount == 0 {
            return Err(CommitError::ZeroAmount);
        }
        let policy = self.policy;
        let block = block_id
            .checked_sub(1)
            .and_then(|idx| self.blocks.get_mut(idx))
            .ok_or(CommitError::UnknownBlock(block_id))?;

        let free_before = block.free;
        let taken = if amount <= free_before {
            amount
        } else {
            match policy {
                CommitPolicy::Reject        => {
                    return Err(CommitError::Insufficient {
                        block:      block_id,
                        requested:  amount,
                        free:       free_before,
                    });
                },
                CommitPolicy::ClampToZero   => { free_before },
            }
        };

        let start_offset = block.start_offset;
        block.free -= taken;
        block.start_offset += taken;
        debug!(
            "block #{} committed {} of {} requested units ({} -> {})",
            block_id, taken, amount, free_before, block.free
        );

        Ok(Commit {
            block:          block_id,
            amount:         taken,
            free_before,
            free_after:     block.free,
            start_offset,
        })
    }

    pub fn listing(&self) -> Vec<BlockRow> {
        self.blocks
            .iter()
            .map(|b| BlockRow {
                id:             b.id,
                free:           b.free,
                start_offset:   b.start_offset,
                allocated:      b.free == 0,
            })
            .collect()
    }
}

impl std::fmt::Display for BlockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.blocks.iter().map(|b| b.free).join(", "))
    }
}
