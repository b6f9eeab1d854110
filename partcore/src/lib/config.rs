use std::ops::RangeInclusive;

use crate::{
    BestFit, ConfigError, FirstFit, FitStrategy, NextFit, RandomMiss,
    Segmentation, Units, WorstFit,
};

/// Allowed total pool sizes for a uniformly partitioned pool.
pub const MEMORY_RANGE: RangeInclusive<Units> = 96..=1024;
/// Allowed number of competing processes.
pub const PROCESS_RANGE: RangeInclusive<usize> = 5..=10;
pub const DEFAULT_PARTITION: Units = 16;

/// The placement policy a process is served with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    FirstFit,
    #[default]
    BestFit,
    WorstFit,
    NextFit,
    /// Random block per segment while memory is plentiful, best fit
    /// otherwise. See [`RandomMiss`] for what happens on a bad draw.
    Adaptive,
}

impl Strategy {
    /// The selector kept next to the table for a whole run. The adaptive
    /// mode draws blocks on its own and only needs best fit to fall back on.
    pub fn selector(&self) -> Box<dyn FitStrategy> {
        match self {
            Strategy::FirstFit  => Box::new(FirstFit),
            Strategy::BestFit   => Box::new(BestFit),
            Strategy::WorstFit  => Box::new(WorstFit),
            Strategy::NextFit   => Box::new(NextFit::new()),
            Strategy::Adaptive  => Box::new(BestFit),
        }
    }
}

/// Which strategy each process gets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Every process uses the configured strategy.
    #[default]
    Uniform,
    /// The first process arriving goes adaptive, every later one best fit,
    /// whatever strategy is configured.
    LeadAdaptive,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// One process after the other, in arrival order.
    #[default]
    Sequential,
    /// One worker per process, all racing on the same table.
    Concurrent,
}

/// How the pool is carved into blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pool {
    /// `total / partition_size` equal blocks.
    Uniform { total: Units },
    /// Blocks of the given capacities, in order.
    Explicit(Vec<Units>),
}

/// Everything a simulation run needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub pool:           Pool,
    pub partition_size: Units,
    pub process_count:  usize,
    /// When set, these sizes are used instead of random ones and
    /// `process_count` is ignored.
    pub sizes:          Option<Vec<Units>>,
    pub strategy:       Strategy,
    pub schedule:       Schedule,
    pub segmentation:   Segmentation,
    pub execution:      Execution,
    pub random_miss:    RandomMiss,
    pub seed:           Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pool:           Pool::Uniform { total: 256 },
            partition_size: DEFAULT_PARTITION,
            process_count:  *PROCESS_RANGE.start(),
            sizes:          None,
            strategy:       Strategy::default(),
            schedule:       Schedule::default(),
            segmentation:   Segmentation::default(),
            execution:      Execution::default(),
            random_miss:    RandomMiss::default(),
            seed:           None,
        }
    }
}

impl SimConfig {
    /// The textbook exercise: five blocks of 100, 500, 200, 300 and 600
    /// units, five processes asking for 212, 417, 112, 426 and 120 units,
    /// each served whole.
    pub fn classic(strategy: Strategy) -> Self {
        Self {
            pool:           Pool::Explicit(vec![100, 500, 200, 300, 600]),
            sizes:          Some(vec![212, 417, 112, 426, 120]),
            strategy,
            segmentation:   Segmentation::Whole,
            ..Self::default()
        }
    }

    /// Checks every bound. Nothing gets allocated unless this passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partition_size == 0 {
            return Err(ConfigError::ZeroPartition);
        }
        match &self.pool {
            Pool::Uniform { total }     => {
                if !MEMORY_RANGE.contains(total) {
                    return Err(ConfigError::MemoryOutOfRange(
                        *total,
                        *MEMORY_RANGE.start(),
                        *MEMORY_RANGE.end(),
                    ));
                }
                if total % self.partition_size != 0 {
                    return Err(ConfigError::Indivisible {
                        total:      *total,
                        partition:  self.partition_size,
                    });
                }
            },
            Pool::Explicit(caps)        => {
                if caps.is_empty() {
                    return Err(ConfigError::NoBlocks);
                }
                if let Some(idx) = caps.iter().position(|&c| c == 0) {
                    return Err(ConfigError::ZeroCapacity(idx + 1));
                }
            },
        }

        let count = self.process_total();
        if !PROCESS_RANGE.contains(&count) {
            return Err(ConfigError::ProcessCountOutOfRange(
                count,
                *PROCESS_RANGE.start(),
                *PROCESS_RANGE.end(),
            ));
        }
        if let Some(sizes) = &self.sizes {
            if let Some(idx) = sizes.iter().position(|&s| s == 0) {
                return Err(ConfigError::ZeroProcess(idx + 1));
            }
        } else if self.pool_size() < count {
            return Err(ConfigError::UnsplittableTotal {
                total:  self.pool_size(),
                count,
            });
        }

        Ok(())
    }

    /// Number of processes that will compete.
    pub fn process_total(&self) -> usize {
        match &self.sizes {
            Some(sizes) => sizes.len(),
            None        => self.process_count,
        }
    }

    /// Total capacity of the pool.
    pub fn pool_size(&self) -> Units {
        match &self.pool {
            Pool::Uniform { total } => *total,
            Pool::Explicit(caps)    => caps.iter().sum(),
        }
    }

    /// Selector to keep next to the table for the whole run.
    pub fn selector(&self) -> Box<dyn FitStrategy> {
        match self.schedule {
            Schedule::Uniform       => self.strategy.selector(),
            Schedule::LeadAdaptive  => Box::new(BestFit),
        }
    }
}
