pub use clap::{Parser, ValueEnum};

use partcore::{
    Execution, Pool, RandomMiss, Schedule, Segmentation, SimConfig, Strategy,
    Units, DEFAULT_PARTITION,
};

/// A partition-based memory allocation simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Total memory size, a multiple of the partition size (96 - 1024)
    #[arg(short, long, default_value_t = 256)]
    pub memory:         Units,

    /// Partition size, also the size of every segment but the last
    #[arg(short, long, default_value_t = DEFAULT_PARTITION)]
    pub partition:      Units,

    /// Number of processes (5 - 10)
    #[arg(short = 'n', long, default_value_t = 5)]
    pub processes:      usize,

    /// Comma separated process sizes, instead of random ones
    #[arg(long, value_delimiter = ',')]
    pub sizes:          Option<Vec<Units>>,

    /// Block placement strategy
    #[arg(short, long, value_enum, default_value_t = Fit::Best)]
    pub strategy:       Fit,

    /// Which processes get which strategy
    #[arg(long, value_enum, default_value_t = Plan::Uniform)]
    pub schedule:       Plan,

    /// Serve every process as a single segment
    #[arg(long)]
    pub whole:          bool,

    /// Run one worker per process against the shared table
    #[arg(long)]
    pub concurrent:     bool,

    /// In adaptive mode, fall back to best fit after a bad random draw
    #[arg(long)]
    pub retry_best_fit: bool,

    /// Seed for process sizes and random draws
    #[arg(long)]
    pub seed:           Option<u64>,

    /// Run the classic five blocks, five processes exercise
    #[arg(long)]
    pub classic:        bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Fit {
    /// First fit
    First,
    /// Best fit
    Best,
    /// Worst fit
    Worst,
    /// Next fit
    Next,
    /// Random block while memory is plentiful, best fit otherwise
    Adaptive,
}

impl From<Fit> for Strategy {
    fn from(f: Fit) -> Self {
        match f {
            Fit::First      => Strategy::FirstFit,
            Fit::Best       => Strategy::BestFit,
            Fit::Worst      => Strategy::WorstFit,
            Fit::Next       => Strategy::NextFit,
            Fit::Adaptive   => Strategy::Adaptive,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Plan {
    /// Every process uses the chosen strategy
    Uniform,
    /// First process adaptive, the rest best fit
    LeadAdaptive,
}

impl From<Plan> for Schedule {
    fn from(p: Plan) -> Self {
        match p {
            Plan::Uniform       => Schedule::Uniform,
            Plan::LeadAdaptive  => Schedule::LeadAdaptive,
        }
    }
}

impl Args {
    /// Translates the command line into a configuration. Bounds are
    /// checked later, by the simulation itself.
    pub fn to_config(&self) -> SimConfig {
        let base = if self.classic {
            SimConfig::classic(self.strategy.into())
        } else {
            SimConfig {
                pool:           Pool::Uniform { total: self.memory },
                partition_size: self.partition,
                process_count:  self.processes,
                sizes:          self.sizes.clone(),
                strategy:       self.strategy.into(),
                segmentation:   if self.whole { Segmentation::Whole } else { Segmentation::Partitioned },
                ..SimConfig::default()
            }
        };

        SimConfig {
            schedule:       self.schedule.into(),
            execution:      if self.concurrent { Execution::Concurrent } else { Execution::Sequential },
            random_miss:    if self.retry_best_fit { RandomMiss::BestFit } else { RandomMiss::Fail },
            seed:           self.seed,
            ..base
        }
    }
}
