//! # Checkpoint Ingestion
//!
//! Line-oriented parsing of site layout files. One header line, then one
//! checkpoint per line:
//!
//! ```text
//! name, base, rx, ry, is_portal[, weight]
//! ```
//!
//! Unparsable lines are skipped and counted, never fatal — layout files
//! come from hand-maintained exports and one bad row should not block the
//! rest. Portals ignore the weight field; assets default to weight 1.0
//! when it is absent or empty, and a weight that is not strictly positive
//! and finite rejects the line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::Result;
use crate::model::Checkpoint;

// ============================================================================
// IngestReport
// ============================================================================

/// Outcome of one parse: what was read and how many lines were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub checkpoints: Vec<Checkpoint>,
    pub skipped: usize,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse checkpoints from any line source. The first line is a header and
/// is discarded; blank lines are ignored without counting as skipped.
pub fn parse_checkpoints<R: BufRead>(reader: R) -> Result<IngestReport> {
    let mut lines = reader.lines();
    if let Some(header) = lines.next() {
        header?;
    }

    let mut checkpoints = Vec::new();
    let mut skipped = 0;
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(cp) => checkpoints.push(cp),
            None => {
                debug!(line = idx + 2, "skipping unparsable checkpoint line");
                skipped += 1;
            }
        }
    }

    Ok(IngestReport {
        checkpoints,
        skipped,
    })
}

/// Parse a checkpoint file from disk.
pub fn parse_checkpoint_file(path: impl AsRef<Path>) -> Result<IngestReport> {
    let file = File::open(path)?;
    parse_checkpoints(BufReader::new(file))
}

fn parse_line(line: &str) -> Option<Checkpoint> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 {
        return None;
    }

    let rx: f64 = fields[2].parse().ok()?;
    let ry: f64 = fields[3].parse().ok()?;
    let is_portal = parse_flag(fields[4])?;

    let weight = if is_portal {
        0.0
    } else {
        match fields.get(5).copied().unwrap_or("") {
            "" => 1.0,
            raw => {
                let w: f64 = raw.parse().ok()?;
                if !(w > 0.0 && w.is_finite()) {
                    return None;
                }
                w
            }
        }
    };

    Some(Checkpoint {
        name: fields[0].to_string(),
        base: fields[1].to_string(),
        rx,
        ry,
        is_portal,
        weight,
    })
}

/// The usual boolean spellings: `1/0`, `t/f`, `true/false` with initial
/// or full capitalization.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
