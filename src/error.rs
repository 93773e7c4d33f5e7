//! Planner and cache failure kinds, following the manual
//! `enum` + `Display` + `Error` pattern the teacher uses for
//! `ParseError` rather than a derive-macro error crate.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PlanError {
    /// No free pointer id was available for a note. Conservative planning
    /// always reports this; radical planning may instead skip the note,
    /// depending on `PlannerConfig::continue_when_failed`.
    PointerExhausted { note_index: usize, line_id: u32 },
    /// A note's time or duration is not finite, or its duration is
    /// negative.
    ChartIllFormed {
        reason: String,
        note_index: Option<usize>,
        line_id: Option<u32>,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::PointerExhausted { note_index, line_id } => write!(
                f,
                "pointer pool exhausted at note {note_index} on line {line_id}"
            ),
            PlanError::ChartIllFormed { reason, note_index, line_id } => {
                write!(f, "chart ill-formed: {reason}")?;
                if let Some(idx) = note_index {
                    write!(f, " (note {idx})")?;
                }
                if let Some(id) = line_id {
                    write!(f, " (line {id})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PlanError {}

#[derive(Debug)]
pub enum CacheError {
    Io(io::Error),
    /// Bad magic, or a record truncated mid-event — anything short of a
    /// clean EOF at a record boundary.
    CacheCorrupt(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "IO error: {e}"),
            CacheError::CacheCorrupt(reason) => write!(f, "cache corrupt: {reason}"),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::Io(err)
    }
}
