//! Block selection policies.
//!
//! A [`FitStrategy`] looks at a [`BlockView`] and names the block a request
//! should go to, or nothing. It never commits anything itself: the engine
//! does that, while still holding the lock under which the choice was made.
//!
//! All scans go in ascending block id, and comparisons are strict, so when
//! several blocks are equally good the one with the lowest id wins.

use crate::{BlockId, BlockView, MemoryBlock, Units};

pub trait FitStrategy: Send + std::fmt::Debug {
    /// Picks a block whose free size is at least `size`.
    fn select(&self, view: &BlockView<'_>, size: Units) -> Option<BlockId>;

    /// Called once a commit against `block` went through. Strategies that
    /// remember where they left off update their state here.
    fn committed(&mut self, _view: &BlockView<'_>, _block: BlockId) {}

    fn name(&self) -> &'static str;
}

/// Takes the first block large enough, ignoring how much it would waste.
#[derive(Copy, Clone, Debug, Default)]
pub struct FirstFit;

impl FitStrategy for FirstFit {
    fn select(&self, view: &BlockView<'_>, size: Units) -> Option<BlockId> {
        view.iter()
            .find(|b| b.fits(size))
            .map(MemoryBlock::id)
    }

    fn name(&self) -> &'static str { "first-fit" }
}

/// Takes the block that would be left with the least slack.
#[derive(Copy, Clone, Debug, Default)]
pub struct BestFit;

impl FitStrategy for BestFit {
    fn select(&self, view: &BlockView<'_>, size: Units) -> Option<BlockId> {
        let mut smallest_slack = Units::MAX;
        let mut best = None;
        for b in view.iter().filter(|b| b.fits(size)) {
            let slack = b.free() - size;
            if best.is_none() || slack < smallest_slack {
                smallest_slack = slack;
                best = Some(b.id());
            }
        }

        best
    }

    fn name(&self) -> &'static str { "best-fit" }
}

/// Takes the block with the most free space.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorstFit;

impl FitStrategy for WorstFit {
    fn select(&self, view: &BlockView<'_>, size: Units) -> Option<BlockId> {
        let mut largest_free = 0;
        let mut worst = None;
        for b in view.iter().filter(|b| b.fits(size)) {
            if worst.is_none() || b.free() > largest_free {
                largest_free = b.free();
                worst = Some(b.id());
            }
        }

        worst
    }

    fn name(&self) -> &'static str { "worst-fit" }
}

/// First fit, but resuming right after the block that served the
/// previous request and wrapping around once.
#[derive(Copy, Clone, Debug, Default)]
pub struct NextFit {
    // An index into the table, not a block id.
    cursor: usize,
}

impl NextFit {
    pub fn new() -> Self { Self::default() }

    pub fn cursor(&self) -> usize { self.cursor }
}

impl FitStrategy for NextFit {
    fn select(&self, view: &BlockView<'_>, size: Units) -> Option<BlockId> {
        let start = self.cursor.min(view.len());
        view.iter()
            .skip(start)
            .chain(view.iter().take(start))
            .find(|b| b.fits(size))
            .map(MemoryBlock::id)
    }

    fn committed(&mut self, view: &BlockView<'_>, block: BlockId) {
        // Ids are 1-based, so the id doubles as the index of the next block.
        self.cursor = if view.is_empty() { 0 } else { block % view.len() };
    }

    fn name(&self) -> &'static str { "next-fit" }
}

/// What the adaptive mode does when the randomly drawn block cannot host
/// the segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RandomMiss {
    /// Give up on the segment. One draw, no second chance.
    #[default]
    Fail,
    /// Place the segment with best fit instead.
    BestFit,
}
