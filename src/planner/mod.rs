//! The planner: assigns pointer-level touch events to chart notes. Two
//! allocation policies share this module's per-note event emission —
//! [`conservative`] (per-line pointer recycling) and [`radical`] (a global
//! pointer pool with interval-based reuse) — per spec.md Design Note 9
//! ("Two planners sharing ~70% code").

pub mod conservative;
pub mod radical;

use crate::chart::{JudgeLine, Note, NoteType};
use crate::config::{FlickDirection, PlannerConfig};
use crate::geometry::Position;
use crate::screen::ScreenUtil;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TouchAction {
    Down = 0,
    Up = 1,
    Move = 2,
    Cancel = 3,
    Outside = 4,
    PointerDown = 5,
    PointerUp = 6,
    HoverMove = 7,
}

impl TouchAction {
    pub fn from_u8(v: u8) -> Option<TouchAction> {
        use TouchAction::*;
        match v {
            0 => Some(Down),
            1 => Some(Up),
            2 => Some(Move),
            3 => Some(Cancel),
            4 => Some(Outside),
            5 => Some(PointerDown),
            6 => Some(PointerUp),
            7 => Some(HoverMove),
            _ => None,
        }
    }
}

/// A single touch event before batching into ms-indexed frames.
#[derive(Debug, Clone, Copy)]
pub struct MicroEvent {
    pub t_seconds: f64,
    pub pointer_id: u32,
    pub action: TouchAction,
    pub pos: Position,
}

/// The full set of samples one note produces, ignoring pointer-sharing —
/// both planners compute this, then decide whether to actually emit the
/// leading DOWN / trailing UP depending on whether a pointer carries over
/// from a neighboring note.
#[derive(Debug, Clone)]
pub struct NoteGesture {
    pub down_t: f64,
    pub down_pos: Position,
    pub moves: Vec<(f64, Position)>,
    pub up_t: f64,
    pub up_pos: Position,
}

impl NoteGesture {
    /// The time interval this note occupies a pointer, used by the radical
    /// planner's interval-based reuse.
    pub fn occupancy(&self) -> (f64, f64) {
        (self.down_t, self.up_t)
    }
}

/// Compute the full gesture for a note, sampling the line's geometry and
/// clipping any off-screen sample through `screen`.
pub fn note_gesture(
    note: &Note,
    line: &JudgeLine,
    config: &PlannerConfig,
    screen: &ScreenUtil,
) -> NoteGesture {
    let offset = note.local_offset();
    let tangent = |t: f64| line.tangent(t);
    let sample = |t: f64| screen.remap(line.pos(t, offset), tangent(t));

    match note.kind {
        NoteType::Tap => {
            let pos = sample(note.t);
            let up_t = note.t + config.tap_release_ms as f64 / 1000.0;
            NoteGesture { down_t: note.t, down_pos: pos, moves: Vec::new(), up_t, up_pos: pos }
        }
        NoteType::Drag => {
            let pos = sample(note.t);
            let up_t = note.t + config.tap_release_ms as f64 / 1000.0;
            NoteGesture {
                down_t: note.t,
                down_pos: pos,
                moves: vec![(note.t, pos)],
                up_t,
                up_pos: pos,
            }
        }
        NoteType::Hold => {
            let down_pos = sample(note.t);
            let end_t = note.t + note.duration;
            let delay = (config.sample_delay_ms as f64 / 1000.0).max(1e-6);
            let mut moves = Vec::new();
            let mut t = note.t + delay;
            while t < end_t {
                moves.push((t, sample(t)));
                t += delay;
            }
            let up_pos = sample(end_t);
            NoteGesture { down_t: note.t, down_pos, moves, up_t: end_t, up_pos }
        }
        NoteType::Flick => {
            let start_t = note.t + config.flick_start_ms as f64 / 1000.0;
            let end_t = note.t + config.flick_end_ms as f64 / 1000.0;
            let center = line.pos(note.t, offset);
            let dir = match config.flick_direction {
                FlickDirection::Perpendicular => tangent(note.t).rotate(std::f64::consts::FRAC_PI_2),
                FlickDirection::Parallel => tangent(note.t),
            };
            let radius = screen.flick_radius;
            let down_pos = screen.remap(center - dir * radius, tangent(note.t));
            let up_pos = screen.remap(center + dir * radius, tangent(end_t));

            let mut moves = Vec::new();
            let delay = (config.sample_delay_ms as f64 / 1000.0).max(1e-6);
            let mut t = start_t + delay;
            while t < end_t {
                let frac = (t - start_t) / (end_t - start_t);
                let pos = screen.remap(center + dir * (radius * (2.0 * frac - 1.0)), tangent(t));
                moves.push((t, pos));
                t += delay;
            }

            NoteGesture { down_t: start_t, down_pos, moves, up_t: end_t, up_pos }
        }
    }
}

/// Whether two consecutive notes on the same line may share one pointer:
/// only successive DRAG/HOLD notes chain — TAP and FLICK are always
/// self-contained.
pub fn chains(prev: NoteType, next: NoteType) -> bool {
    matches!(prev, NoteType::Drag | NoteType::Hold) && matches!(next, NoteType::Drag | NoteType::Hold)
}

/// A FIFO pool of pointer ids up to a hard cap, used by the conservative
/// planner (one pool per line). A released id only becomes eligible for
/// reuse once its release time has actually passed — a pointer "released"
/// at the same instant a new note starts is not yet free, matching the
/// simultaneous-notes exhaustion scenario in spec scenario 6.
#[derive(Debug)]
pub struct PointerFreeList {
    free: std::collections::VecDeque<(u32, f64)>,
    next_id: u32,
    cap: u32,
}

impl PointerFreeList {
    pub fn new(cap: u32) -> Self {
        PointerFreeList { free: std::collections::VecDeque::new(), next_id: 0, cap }
    }

    pub fn acquire(&mut self, min_release_time: f64) -> Option<u32> {
        if let Some(pos) = self.free.iter().position(|(_, release_t)| *release_t <= min_release_time) {
            let (id, _) = self.free.remove(pos).unwrap();
            return Some(id);
        }
        if self.next_id < self.cap {
            let id = self.next_id;
            self.next_id += 1;
            Some(id)
        } else {
            None
        }
    }

    pub fn release(&mut self, id: u32, at_time: f64) {
        self.free.push_back((id, at_time));
    }
}

pub fn validate_note(note: &Note, note_index: usize, line_id: u32) -> Result<(), crate::error::PlanError> {
    if !note.is_finite() || note.duration < 0.0 {
        return Err(crate::error::PlanError::ChartIllFormed {
            reason: format!(
                "note t={} duration={} x_offset={} is not well-formed",
                note.t, note.duration, note.x_offset
            ),
            note_index: Some(note_index),
            line_id: Some(line_id),
        });
    }
    Ok(())
}
