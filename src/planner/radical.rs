//! Radical planner ("algo2"): one global pointer pool shared across every
//! judge line, with interval-based reuse — two notes on different lines can
//! share a pointer when their occupancy intervals don't overlap.

use crate::chart::{Chart, Note};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::geometry::{distance, Position};
use crate::screen::ScreenUtil;
use log::warn;

use super::{note_gesture, validate_note, MicroEvent, TouchAction};

/// An explicit allocator: `acquire` hands out a pointer id released no
/// later than `min_release_time` and near enough `near_position`,
/// falling back to a fresh id (up to the cap) otherwise. Deterministic FIFO
/// among eligible released ids.
struct PointerPool {
    free: Vec<(u32, f64, Position)>,
    next_id: u32,
    cap: u32,
}

impl PointerPool {
    fn new(cap: u32) -> Self {
        PointerPool { free: Vec::new(), next_id: 0, cap }
    }

    fn acquire(&mut self, min_release_time: f64, near_position: Position, reuse_distance: f64) -> Option<u32> {
        if let Some(idx) = self
            .free
            .iter()
            .position(|(_, release_t, release_pos)| {
                *release_t <= min_release_time && distance(*release_pos, near_position) <= reuse_distance
            })
        {
            let (id, _, _) = self.free.remove(idx);
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

    fn release(&mut self, id: u32, at_time: f64, at_position: Position) {
        self.free.push((id, at_time, at_position));
    }
}

/// Plan a chart with the radical, globally-pooled algorithm. Notes from
/// every line are processed in one global time order (stable on ties).
pub fn plan(chart: &Chart, config: &PlannerConfig) -> Result<Vec<MicroEvent>, PlanError> {
    let screen = ScreenUtil::new(chart.width, chart.height);
    let mut pool = PointerPool::new(config.max_pointers);
    let mut events = Vec::new();

    let mut ordered: Vec<(usize, usize, &Note)> = Vec::new();
    for (line_idx, line) in chart.lines.iter().enumerate() {
        for (note_index, note) in line.notes.iter().enumerate() {
            ordered.push((line_idx, note_index, note));
        }
    }
    ordered.sort_by(|a, b| a.2.t.partial_cmp(&b.2.t).unwrap_or(std::cmp::Ordering::Equal));

    for (line_idx, note_index, note) in ordered {
        let line = &chart.lines[line_idx];
        validate_note(note, note_index, line.id)?;

        let gesture = note_gesture(note, line, config, &screen);
        let (start, _) = gesture.occupancy();

        let pointer = match pool.acquire(start, gesture.down_pos, config.reuse_distance) {
            Some(id) => id,
            None if config.continue_when_failed => {
                warn!(
                    "radical planner: dropping note {note_index} on line {} — pointer pool exhausted",
                    line.id
                );
                continue;
            }
            None => return Err(PlanError::PointerExhausted { note_index, line_id: line.id }),
        };

        events.push(MicroEvent {
            t_seconds: gesture.down_t,
            pointer_id: pointer,
            action: TouchAction::Down,
            pos: gesture.down_pos,
        });
        for (t, pos) in &gesture.moves {
            events.push(MicroEvent { t_seconds: *t, pointer_id: pointer, action: TouchAction::Move, pos: *pos });
        }
        events.push(MicroEvent {
            t_seconds: gesture.up_t,
            pointer_id: pointer,
            action: TouchAction::Up,
            pos: gesture.up_pos,
        });

        pool.release(pointer, gesture.up_t, gesture.up_pos);
    }

    Ok(events)
}
