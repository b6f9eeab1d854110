//! The block table as a resource shared between allocation workers.
//!
//! One mutex guards both the table and the run's fit strategy. Choosing a
//! block and committing to it happen under the same lock acquisition.

use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

use crate::{
    BlockRow, BlockTable, Commit, CommitError, FitStrategy, ResourceError, Units,
};

#[derive(Debug)]
struct Ledger {
    table:  BlockTable,
    fit:    Box<dyn FitStrategy>,
}

/// Outcome of one select-then-commit transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Placed(Commit),
    /// The strategy found no block with enough room.
    NoFit,
    /// A block was chosen but the commit was refused.
    Refused(CommitError),
}

#[derive(Debug)]
pub struct SharedTable {
    // `None` once torn down.
    ledger: Mutex<Option<Ledger>>,
}

impl SharedTable {
    pub fn new(table: BlockTable, fit: Box<dyn FitStrategy>) -> Self {
        debug!("sharing {} blocks, placing with {}", table.len(), fit.name());
        Self {
            ledger: Mutex::new(Some(Ledger { table, fit })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Ledger>>, ResourceError> {
        self.ledger.lock().map_err(|_| ResourceError::Poisoned)
    }

    /// Runs `f` with exclusive access to the table and the run's strategy.
    pub fn transact<R, F>(&self, f: F) -> Result<R, ResourceError>
    where F: FnOnce(&mut BlockTable, &mut dyn FitStrategy) -> R {
        let mut guard = self.lock()?;
        let ledger = guard.as_mut().ok_or(ResourceError::TornDown)?;

        Ok(f(&mut ledger.table, ledger.fit.as_mut()))
    }

    /// Lets the run's strategy choose a block for `size` units and commits
    /// to it before anybody else gets a look at the table.
    pub fn place(&self, size: Units) -> Result<Placement, ResourceError> {
        self.transact(|table, fit| place_with(table, fit, size))
    }

    /// Same as [`place`](SharedTable::place), with a one-off strategy.
    /// The run's strategy is not consulted or updated.
    pub fn place_using(&self, fit: &mut dyn FitStrategy, size: Units) -> Result<Placement, ResourceError> {
        self.transact(|table, _| place_with(table, fit, size))
    }

    pub fn total_free(&self) -> Result<Units, ResourceError> {
        self.transact(|table, _| table.total_free())
    }

    pub fn listing(&self) -> Result<Vec<BlockRow>, ResourceError> {
        self.transact(|table, _| table.listing())
    }

    /// A copy of the table as it stands right now.
    pub fn snapshot(&self) -> Result<BlockTable, ResourceError> {
        self.transact(|table, _| table.clone())
    }

    pub fn is_torn_down(&self) -> bool {
        match self.ledger.lock() {
            Ok(guard)   => guard.is_none(),
            Err(poison) => poison.into_inner().is_none(),
        }
    }

    /// Releases the table. Returns its final state the first time it is
    /// called and `None` on every later call. Works on a poisoned lock too,
    /// so that an aborted run still gets cleaned up.
    pub fn teardown(&self) -> Option<BlockTable> {
        let mut guard = match self.ledger.lock() {
            Ok(guard)   => guard,
            Err(poison) => poison.into_inner(),
        };
        let released = guard.take().map(|ledger| ledger.table);
        if released.is_some() {
            info!("block table released");
        }

        released
    }
}

pub(crate) fn place_with(table: &mut BlockTable, fit: &mut dyn FitStrategy, size: Units) -> Placement {
    let picked = fit.select(&table.snapshot(), size);
    match picked {
        Some(block) => {
            match table.commit(block, size) {
                Ok(commit)  => {
                    fit.committed(&table.snapshot(), block);
                    Placement::Placed(commit)
                },
                Err(e)      => Placement::Refused(e),
            }
        },
        None        => Placement::NoFit,
    }
}

