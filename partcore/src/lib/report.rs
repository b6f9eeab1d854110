use indexmap::IndexMap;

use crate::{BlockId, Commit, Units};

/// What happened to one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationRecord {
    pub process_id:     usize,
    pub segment_id:     usize,
    pub segment_size:   Units,
    // All of the following are `None` for failed segments.
    pub block:          Option<BlockId>,
    pub free_before:    Option<Units>,
    pub free_after:     Option<Units>,
    pub start_offset:   Option<Units>,
}

impl AllocationRecord {
    pub fn placed(process_id: usize, segment_id: usize, segment_size: Units, commit: &Commit) -> Self {
        Self {
            process_id,
            segment_id,
            segment_size,
            block:          Some(commit.block),
            free_before:    Some(commit.free_before),
            free_after:     Some(commit.free_after),
            start_offset:   Some(commit.start_offset),
        }
    }

    pub fn failed(process_id: usize, segment_id: usize, segment_size: Units) -> Self {
        Self {
            process_id,
            segment_id,
            segment_size,
            block:          None,
            free_before:    None,
            free_after:     None,
            start_offset:   None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.block.is_some()
    }
}

/// The full story of a run, one record per segment. Records of one
/// process appear in segment order; no order is promised across processes
/// when they ran concurrently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocationReport {
    records: Vec<AllocationRecord>,
}

impl AllocationReport {
    pub(crate) fn from_records(records: Vec<AllocationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AllocationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AllocationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn placed(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.iter().filter(|r| r.is_placed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.iter().filter(|r| !r.is_placed())
    }

    /// Units actually handed out over the run.
    pub fn committed_total(&self) -> Units {
        self.placed()
            .filter_map(|r| Some(r.free_before? - r.free_after?))
            .sum()
    }

    /// Records grouped by process, processes in order of first appearance.
    pub fn by_process(&self) -> IndexMap<usize, Vec<&AllocationRecord>> {
        let mut res: IndexMap<usize, Vec<&AllocationRecord>> = IndexMap::new();
        for r in &self.records {
            res.entry(r.process_id)
                .or_default()
                .push(r);
        }

        res
    }

    pub fn for_process(&self, process_id: usize) -> Vec<&AllocationRecord> {
        self.records
            .iter()
            .filter(|r| r.process_id == process_id)
            .collect()
    }
}

impl<'a> IntoIterator for &'a AllocationReport {
    type Item = &'a AllocationRecord;
    type IntoIter = std::slice::Iter<'a, AllocationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
