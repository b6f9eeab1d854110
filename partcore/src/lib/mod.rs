//! Welcome to `partcore`!
//!
//! A fixed pool of memory is carved into [`MemoryBlock`]s, and a stream
//! of processes, each possibly split into partition-sized segments, competes
//! for them. Every segment is placed by a [`FitStrategy`] and committed
//! against one [`BlockTable`], which may be shared by many concurrent
//! allocation attempts through a [`SharedTable`].
//!
//! The typical entry point is [`Simulation::run`], which validates a
//! [`SimConfig`], builds the table, runs the [`AllocationEngine`] and hands
//! back an [`Outcome`] for some renderer to print.

pub mod block;
pub mod config;
pub mod engine;
pub mod error;
pub mod fit;
pub mod generate;
pub mod report;
pub mod segment;
pub mod shared;
pub mod sim;

pub use crate::{
    block::{BlockId, BlockRow, BlockTable, BlockView, Commit, CommitPolicy, MemoryBlock},
    config::{Execution, Pool, Schedule, SimConfig, Strategy, MEMORY_RANGE, PROCESS_RANGE, DEFAULT_PARTITION},
    engine::AllocationEngine,
    error::{CommitError, ConfigError, ResourceError, SimError},
    fit::{BestFit, FirstFit, FitStrategy, NextFit, RandomMiss, WorstFit},
    generate::generate,
    report::{AllocationRecord, AllocationReport},
    segment::{split, Process, Segment, SegmentState, Segmentation},
    shared::{Placement, SharedTable},
    sim::{Outcome, Simulation},
};

/// The unit in which block capacities and request sizes are measured.
/// `partcore` attaches no meaning to it: the legacy demo talked about
/// megabytes, a textbook exercise talks about kilobytes.
pub type Units = usize;
