use std::sync::Arc;

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    shared::{place_with, Placement},
    AllocationRecord, AllocationReport, BestFit, BlockTable, Execution, Process, RandomMiss,
    ResourceError, Schedule, Segment, Segmentation, SharedTable, SimConfig, Strategy, Units,
};

/// Drives processes through segmentation and placement against one
/// [`SharedTable`].
///
/// Non-adaptive processes are served by the strategy the table was shared
/// with, so that e.g. the next-fit cursor is one per run and moves under
/// the same lock as the blocks.
#[derive(Debug)]
pub struct AllocationEngine {
    table:          Arc<SharedTable>,
    partition_size: Units,
    segmentation:   Segmentation,
    strategy:       Strategy,
    schedule:       Schedule,
    execution:      Execution,
    random_miss:    RandomMiss,
    seed:           Option<u64>,
}

impl AllocationEngine {
    /// Shares `table` together with the selector `config` asks for.
    pub fn new(table: BlockTable, config: &SimConfig) -> Self {
        Self {
            table:          Arc::new(SharedTable::new(table, config.selector())),
            partition_size: config.partition_size,
            segmentation:   config.segmentation,
            strategy:       config.strategy,
            schedule:       config.schedule,
            execution:      config.execution,
            random_miss:    config.random_miss,
            seed:           config.seed,
        }
    }

    /// The table this engine commits against.
    pub fn shared(&self) -> &Arc<SharedTable> {
        &self.table
    }

    /// Turns requested sizes into processes, numbered from 1 in
    /// arrival order.
    pub fn admit(&self, sizes: &[Units]) -> Vec<Process> {
        sizes.iter()
            .enumerate()
            .map(|(idx, &size)| Process::new(idx + 1, size, self.partition_size, self.segmentation))
            .collect()
    }

    fn strategy_for(&self, idx: usize) -> Strategy {
        match self.schedule {
            Schedule::Uniform       => self.strategy,
            Schedule::LeadAdaptive  => {
                if idx == 0 { Strategy::Adaptive } else { Strategy::BestFit }
            },
        }
    }

    fn rng_for(&self, process_id: usize) -> StdRng {
        match self.seed {
            // One stream per process, independent of worker scheduling.
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(process_id as u64)),
            None    => StdRng::from_entropy(),
        }
    }

    /// Admits and allocates every size, and returns the processes in their
    /// final state along with the report.
    pub fn run(&self, sizes: &[Units]) -> Result<(Vec<Process>, AllocationReport), ResourceError> {
        let mut processes = self.admit(sizes);
        info!(
            "allocating {} processes ({:?}, {:?})",
            processes.len(), self.execution, self.schedule
        );
        let per_process: Vec<Vec<AllocationRecord>> = match self.execution {
            Execution::Sequential   => {
                processes.iter_mut()
                    .enumerate()
                    .map(|(idx, p)| {
                        let mut rng = self.rng_for(p.id);
                        self.allocate(p, self.strategy_for(idx), &mut rng)
                    })
                    .collect::<Result<_, _>>()?
            },
            Execution::Concurrent   => {
                processes.par_iter_mut()
                    .enumerate()
                    .map(|(idx, p)| {
                        let mut rng = self.rng_for(p.id);
                        self.allocate(p, self.strategy_for(idx), &mut rng)
                    })
                    .collect::<Result<_, _>>()?
            },
        };

        let report = AllocationReport::from_records(per_process.into_iter().flatten().collect());
        info!(
            "{} of {} segments placed",
            report.placed().count(), report.len()
        );

        Ok((processes, report))
    }

    /// Places every pending segment of `process`, in segment order.
    /// Segments that find no room are marked failed; only a broken table
    /// makes this return an error.
    pub fn allocate(
        &self,
        process:    &mut Process,
        strategy:   Strategy,
        rng:        &mut StdRng,
    ) -> Result<Vec<AllocationRecord>, ResourceError> {
        match strategy {
            Strategy::Adaptive  => self.allocate_adaptive(process, rng),
            _                   => {
                let pid = process.id;
                pending(process)
                    .map(|seg| {
                        let placement = self.table.place(seg.size)?;
                        Ok(settle(pid, seg, placement))
                    })
                    .collect()
            },
        }
    }

    fn allocate_adaptive(
        &self,
        process:    &mut Process,
        rng:        &mut StdRng,
    ) -> Result<Vec<AllocationRecord>, ResourceError> {
        let pid = process.id;
        let requested = process.pending_size();
        let available = self.table.total_free()?;
        if available < requested {
            info!(
                "process #{}: {} units free for {} requested, switching to best fit",
                pid, available, requested
            );
            return pending(process)
                .map(|seg| {
                    let placement = self.table.place_using(&mut BestFit, seg.size)?;
                    Ok(settle(pid, seg, placement))
                })
                .collect();
        }

        let on_miss = self.random_miss;
        pending(process)
            .map(|seg| {
                let size = seg.size;
                let placement = self.table.transact(|table, _| {
                    let drawn = rng.gen_range(1..=table.len());
                    let fits = table.snapshot()
                        .get(drawn)
                        .is_some_and(|b| b.fits(size));
                    if fits {
                        return match table.commit(drawn, size) {
                            Ok(commit)  => Placement::Placed(commit),
                            Err(e)      => Placement::Refused(e),
                        };
                    }
                    debug!("process #{}: drew block #{}, too small for {}", pid, drawn, size);
                    match on_miss {
                        RandomMiss::Fail    => Placement::NoFit,
                        RandomMiss::BestFit => place_with(table, &mut BestFit, size),
                    }
                })?;

                Ok(settle(pid, seg, placement))
            })
            .collect()
    }
}

fn pending(process: &mut Process) -> impl Iterator<Item = &mut Segment> {
    process.segments
        .iter_mut()
        .filter(|s| !s.is_settled())
}

/// Moves a segment to its final state according to `placement`.
fn settle(process_id: usize, seg: &mut Segment, placement: Placement) -> AllocationRecord {
    match placement {
        Placement::Placed(commit)   => {
            seg.allocate(&commit);
            AllocationRecord::placed(process_id, seg.id, seg.size, &commit)
        },
        Placement::NoFit            => {
            warn!(
                "process #{} segment {}: no block can host {} units",
                process_id, seg.id, seg.size
            );
            seg.fail();
            AllocationRecord::failed(process_id, seg.id, seg.size)
        },
        Placement::Refused(e)       => {
            warn!("process #{} segment {}: {}", process_id, seg.id, e);
            seg.fail();
            AllocationRecord::failed(process_id, seg.id, seg.size)
        },
    }
}
