use thiserror::Error;

use crate::{BlockId, Units};

/// Raised before anything is allocated. No [`BlockTable`](crate::BlockTable)
/// exists once one of these has been returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("partition size must be positive")]
    ZeroPartition,
    #[error("memory size {total} is not a positive multiple of the partition size {partition}")]
    Indivisible {
        total:      Units,
        partition:  Units,
    },
    #[error("memory size {0} is outside the allowed range {1}..={2}")]
    MemoryOutOfRange(Units, Units, Units),
    #[error("process count {0} is outside the allowed range {1}..={2}")]
    ProcessCountOutOfRange(usize, usize, usize),
    #[error("cannot split {total} units into {count} positive sizes")]
    UnsplittableTotal {
        total:  Units,
        count:  usize,
    },
    #[error("a block table needs at least one block")]
    NoBlocks,
    #[error("block #{0} has zero capacity")]
    ZeroCapacity(BlockId),
    #[error("process #{0} requests zero units")]
    ZeroProcess(usize),
}

/// Fatal trouble with the shared table itself. Any report produced up to
/// this point must be thrown away.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("the block table lock was poisoned by a panicking worker")]
    Poisoned,
    #[error("the block table has already been torn down")]
    TornDown,
}

/// Why a single commit was refused. The engine never propagates these:
/// they end up as failed segments in the report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("no block with id #{0}")]
    UnknownBlock(BlockId),
    #[error("commits must be for a positive amount")]
    ZeroAmount,
    #[error("block #{block} has {free} units free, {requested} requested")]
    Insufficient {
        block:      BlockId,
        requested:  Units,
        free:       Units,
    },
}

/// Everything that can abort a simulation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}
