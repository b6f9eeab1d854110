use crate::{BlockId, Commit, Units};

/// Splits a process of `process_size` units into partition-sized pieces.
///
/// All pieces but the last are exactly `partition_size` long. The last
/// one carries the remainder, or a full partition when the size divides
/// evenly, so no zero-sized segment is ever produced.
///
/// # Panics
///
/// Panics if `partition_size` is zero. [`SimConfig::validate`] rejects
/// such configurations before anything gets split.
///
/// [`SimConfig::validate`]: crate::SimConfig::validate
///
/// ```
/// assert_eq!(partcore::split(37, 16), vec![16, 16, 5]);
/// assert_eq!(partcore::split(32, 16), vec![16, 16]);
/// ```
pub fn split(process_size: Units, partition_size: Units) -> Vec<Units> {
    assert!(partition_size > 0, "zero partition size");
    let count = process_size.div_ceil(partition_size);
    let mut res = vec![partition_size; count];
    if let Some(last) = res.last_mut() {
        *last = process_size - partition_size * (count - 1);
    }

    res
}

/// How a process is turned into segments.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Segmentation {
    /// Partition-sized segments, see [`split`].
    #[default]
    Partitioned,
    /// One segment holding the whole request.
    Whole,
}

impl Segmentation {
    pub fn sizes(&self, process_size: Units, partition_size: Units) -> Vec<Units> {
        match self {
            Segmentation::Partitioned   => split(process_size, partition_size),
            Segmentation::Whole         => {
                if process_size == 0 { vec![] } else { vec![process_size] }
            },
        }
    }
}

/// Where a segment stands. Both `Allocated` and `Failed` are final.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentState {
    Unassigned,
    Allocated {
        block:          BlockId,
        start_offset:   Units,
    },
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// 1-based, within the owning process.
    pub id:     usize,
    pub size:   Units,
    state:      SegmentState,
}

impl Segment {
    pub fn new(id: usize, size: Units) -> Self {
        Self {
            id,
            size,
            state: SegmentState::Unassigned,
        }
    }

    pub fn state(&self) -> SegmentState { self.state }

    pub fn assigned_block(&self) -> Option<BlockId> {
        match self.state {
            SegmentState::Allocated { block, .. }   => Some(block),
            _                                       => None,
        }
    }

    pub fn start_offset(&self) -> Option<Units> {
        match self.state {
            SegmentState::Allocated { start_offset, .. }    => Some(start_offset),
            _                                               => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state != SegmentState::Unassigned
    }

    pub(crate) fn allocate(&mut self, commit: &Commit) {
        debug_assert!(!self.is_settled(), "segment {} settled twice", self.id);
        self.state = SegmentState::Allocated {
            block:          commit.block,
            start_offset:   commit.start_offset,
        };
    }

    pub(crate) fn fail(&mut self) {
        debug_assert!(!self.is_settled(), "segment {} settled twice", self.id);
        self.state = SegmentState::Failed;
    }
}

/// A competitor for memory, together with the segments it was cut into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pub id:             usize,
    pub requested_size: Units,
    pub segments:       Vec<Segment>,
}

impl Process {
    pub fn new(
        id:             usize,
        requested_size: Units,
        partition_size: Units,
        segmentation:   Segmentation,
    ) -> Self {
        let segments = segmentation
            .sizes(requested_size, partition_size)
            .into_iter()
            .enumerate()
            .map(|(idx, size)| Segment::new(idx + 1, size))
            .collect();

        Self {
            id,
            requested_size,
            segments,
        }
    }

    /// Sum of the sizes of the segments that still wait for a block.
    pub fn pending_size(&self) -> Units {
        self.segments
            .iter()
            .filter(|s| !s.is_settled())
            .map(|s| s.size)
            .sum()
    }

    pub fn is_settled(&self) -> bool {
        self.segments.iter().all(Segment::is_settled)
    }
}
