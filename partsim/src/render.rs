//! Plain-text tables for block listings and allocation reports.

use std::io::{Result, Write};

use itertools::Itertools;
use partcore::{AllocationRecord, AllocationReport, BlockRow, Outcome};

const NA: &str = "N/A";

fn or_na(v: Option<usize>) -> String {
    v.map_or_else(|| NA.to_string(), |v| v.to_string())
}

pub fn blocks<W: Write>(w: &mut W, rows: &[BlockRow]) -> Result<()> {
    writeln!(w, "{:<11}{:<18}{:<25}", "Block No.", "Free Size", "Start Offset")?;
    for row in rows {
        let offset = if row.allocated {
            String::from("allocated")
        } else {
            row.start_offset.to_string()
        };
        writeln!(w, "{:<11}{:<18}{:<25}", row.id, row.free, offset)?;
    }
    writeln!(w)
}

fn record<W: Write>(w: &mut W, r: &AllocationRecord) -> Result<()> {
    writeln!(
        w,
        "{:<14}{:<13}{:<18}{:<11}{:<23}{:<30}{:<25}",
        r.process_id,
        r.segment_id,
        r.segment_size,
        or_na(r.block),
        or_na(r.free_before),
        or_na(r.free_after),
        or_na(r.start_offset),
    )
}

pub fn allocations<W: Write>(w: &mut W, report: &AllocationReport) -> Result<()> {
    writeln!(
        w,
        "{:<14}{:<13}{:<18}{:<11}{:<23}{:<30}{:<25}",
        "Process No.",
        "Segment No.",
        "Segment Size",
        "Block No.",
        "Initial Block Size",
        "Block Size After Allocation",
        "Block Start Offset",
    )?;
    for r in report {
        record(w, r)?;
    }
    writeln!(w)
}

/// Renders a finished run: the pool before, every segment, the pool after.
pub fn outcome<W: Write>(w: &mut W, outcome: &Outcome) -> Result<()> {
    writeln!(w, "Process sizes: {}", outcome.sizes.iter().join(", "))?;
    writeln!(w)?;
    writeln!(w, "Memory overview prior to any allocation:")?;
    blocks(w, &outcome.initial)?;
    writeln!(w, "Memory allocation details:")?;
    allocations(w, &outcome.report)?;
    writeln!(w, "Memory overview after allocation:")?;
    blocks(w, &outcome.final_table.listing())?;

    let failed = outcome.report
        .failed()
        .map(|r| format!("{}.{}", r.process_id, r.segment_id))
        .join(" ");
    writeln!(
        w,
        "{} of {} segments placed, {} of {} units still free",
        outcome.report.placed().count(),
        outcome.report.len(),
        outcome.final_table.total_free(),
        outcome.final_table.total_capacity(),
    )?;
    if !failed.is_empty() {
        writeln!(w, "Not allocated (process.segment): {}", failed)?;
    }

    Ok(())
}
