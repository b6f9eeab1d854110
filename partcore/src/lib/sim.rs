use std::sync::Arc;

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    generate, AllocationEngine, AllocationReport, BlockRow, BlockTable, Pool, Process,
    ResourceError, SharedTable, SimConfig, SimError, Units,
};

/// Everything a renderer needs once a run is over.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub sizes:          Vec<Units>,
    pub initial:        Vec<BlockRow>,
    pub processes:      Vec<Process>,
    pub report:         AllocationReport,
    pub final_table:    BlockTable,
}

/// Tears the table down however the run ends.
struct Release(Arc<SharedTable>);

impl Drop for Release {
    fn drop(&mut self) {
        self.0.teardown();
    }
}

/// Owns the lifecycle of one run: configuration checks, table setup,
/// allocation, teardown.
pub struct Simulation;

impl Simulation {
    pub fn run(config: &SimConfig) -> Result<Outcome, SimError> {
        config.validate()?;

        let table = match &config.pool {
            Pool::Uniform { total } => BlockTable::initialize(*total, config.partition_size)?,
            Pool::Explicit(caps)    => BlockTable::from_capacities(caps)?,
        };
        let sizes = match &config.sizes {
            Some(sizes) => sizes.clone(),
            None        => {
                let mut rng = match config.seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None    => StdRng::from_entropy(),
                };
                generate(config.process_count, config.pool_size(), &mut rng)?
            },
        };
        info!(
            "{} blocks, {} units in total, process sizes {:?}",
            table.len(), table.total_capacity(), sizes
        );

        let initial = table.listing();
        let engine = AllocationEngine::new(table, config);
        let release = Release(engine.shared().clone());
        let (processes, report) = engine.run(&sizes)?;
        let final_table = release.0
            .teardown()
            .ok_or(ResourceError::TornDown)?;

        Ok(Outcome {
            sizes,
            initial,
            processes,
            report,
            final_table,
        })
    }
}
