//! Timeline builder: batches per-pointer micro-events into integer-ms
//! frames, and a "viscous" post-processor that turns those frames into
//! per-pointer state snapshots for a HID-style transport.

use std::collections::{HashMap, HashSet};

use crate::geometry::Position;
use crate::planner::{MicroEvent, TouchAction};

/// One touch event inside a frame, stripped of its (now-redundant) time.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pointer_id: u32,
    pub pos: Position,
}

/// All touch events sharing one integer-ms timestamp, in emission order.
pub type Frame = (i32, Vec<TouchEvent>);

fn action_rank(action: TouchAction) -> u8 {
    match action {
        TouchAction::Up => 0,
        TouchAction::Down => 1,
        TouchAction::Move => 2,
        _ => 3,
    }
}

/// Round a position to integer pixels for the purposes of MOVE dedup only —
/// the emitted event still carries the original un-rounded position.
fn quantized_pos(pos: Position) -> (i64, i64) {
    (pos.x.round() as i64, pos.y.round() as i64)
}

/// Quantize each micro-event's time to an integer ms, group events sharing
/// an ms into a frame ordered UP, then DOWN, then MOVE, and drop redundant
/// MOVEs (same pointer, same rounded position) within a frame.
pub fn build_timeline(events: &[MicroEvent]) -> Vec<Frame> {
    let mut indexed: Vec<(i32, usize, MicroEvent)> = events
        .iter()
        .enumerate()
        // `round`, not `floor`: note times arrive as exact decimal seconds
        // (e.g. 1.001) that f64 cannot represent exactly, so a literal
        // floor occasionally quantizes one ms early.
        .map(|(i, e)| ((e.t_seconds * 1000.0).round() as i32, i, *e))
        .collect();
    indexed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut frames = Vec::new();
    let mut i = 0;
    while i < indexed.len() {
        let ms = indexed[i].0;
        let mut j = i;
        let mut batch = Vec::new();
        while j < indexed.len() && indexed[j].0 == ms {
            batch.push(indexed[j].2);
            j += 1;
        }
        batch.sort_by_key(|e| action_rank(e.action));

        let mut seen_moves = HashSet::new();
        let mut deduped = Vec::new();
        for e in batch {
            if e.action == TouchAction::Move {
                let key = (e.pointer_id, quantized_pos(e.pos));
                if !seen_moves.insert(key) {
                    continue;
                }
            }
            deduped.push(TouchEvent { action: e.action, pointer_id: e.pointer_id, pos: e.pos });
        }

        frames.push((ms, deduped));
        i = j;
    }
    frames
}

/// A pointer's state in one viscous-mode frame. `packed_id`s are remapped
/// to a small contiguous range — freed and recycled as pointers lift —
/// rather than being the raw (potentially sparse) planner pointer ids.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ViscousPointer {
    pub packed_id: u32,
    pub active: bool,
    pub pos: Position,
}

pub type ViscousFrame = (i32, Vec<ViscousPointer>);

/// Render a timeline as JSON, for external tooling (a GUI transport, a
/// debugging dump) that wants the granular event stream rather than the
/// binary cache format.
pub fn to_json(frames: &[Frame]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(frames)
}

/// Reduce a timeline to, for each frame, the set of pointers currently down.
pub fn viscous(frames: &[Frame]) -> Vec<ViscousFrame> {
    let mut packed: HashMap<u32, u32> = HashMap::new();
    let mut positions: HashMap<u32, Position> = HashMap::new();
    let mut down: HashSet<u32> = HashSet::new();
    let mut free_packed: Vec<u32> = Vec::new();
    let mut next_packed = 0u32;

    let mut out = Vec::new();
    for (ms, events) in frames {
        for e in events {
            match e.action {
                TouchAction::Down | TouchAction::PointerDown => {
                    down.insert(e.pointer_id);
                    positions.insert(e.pointer_id, e.pos);
                    packed.entry(e.pointer_id).or_insert_with(|| {
                        free_packed.pop().unwrap_or_else(|| {
                            let id = next_packed;
                            next_packed += 1;
                            id
                        })
                    });
                }
                TouchAction::Move | TouchAction::HoverMove => {
                    positions.insert(e.pointer_id, e.pos);
                }
                TouchAction::Up | TouchAction::PointerUp | TouchAction::Cancel => {
                    down.remove(&e.pointer_id);
                    if let Some(id) = packed.remove(&e.pointer_id) {
                        free_packed.push(id);
                    }
                }
                TouchAction::Outside => {}
            }
        }

        let mut snapshot: Vec<ViscousPointer> = down
            .iter()
            .map(|id| ViscousPointer { packed_id: packed[id], active: true, pos: positions[id] })
            .collect();
        snapshot.sort_by_key(|p| p.packed_id);
        out.push((*ms, snapshot));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;

    fn ev(t: f64, pointer: u32, action: TouchAction, x: f64, y: f64) -> MicroEvent {
        MicroEvent { t_seconds: t, pointer_id: pointer, action, pos: Vec2::new(x, y) }
    }

    #[test]
    fn single_tap_produces_down_then_up_frames() {
        let events = vec![ev(1.0, 0, TouchAction::Down, 50.0, 50.0), ev(1.001, 0, TouchAction::Up, 50.0, 50.0)];
        let frames = build_timeline(&events);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].0, 1000);
        assert_eq!(frames[0].1[0].action, TouchAction::Down);
        assert_eq!(frames[1].0, 1001);
        assert_eq!(frames[1].1[0].action, TouchAction::Up);
    }

    #[test]
    fn ups_sort_before_downs_within_a_frame() {
        let events =
            vec![ev(1.0, 1, TouchAction::Down, 10.0, 10.0), ev(1.0, 0, TouchAction::Up, 50.0, 50.0)];
        let frames = build_timeline(&events);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1[0].action, TouchAction::Up);
        assert_eq!(frames[0].1[1].action, TouchAction::Down);
    }

    #[test]
    fn redundant_moves_in_one_frame_are_deduped() {
        let events = vec![
            ev(1.0, 0, TouchAction::Move, 10.0, 10.0),
            ev(1.0004, 0, TouchAction::Move, 10.0001, 10.0),
            ev(1.0, 0, TouchAction::Move, 20.0, 10.0),
        ];
        let frames = build_timeline(&events);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1.len(), 2);
    }

    #[test]
    fn viscous_snapshot_tracks_only_currently_down_pointers() {
        let events = vec![
            ev(1.0, 0, TouchAction::Down, 10.0, 10.0),
            ev(1.0, 1, TouchAction::Down, 20.0, 20.0),
            ev(1.01, 0, TouchAction::Up, 10.0, 10.0),
        ];
        let frames = build_timeline(&events);
        let snapshots = viscous(&frames);
        let last = &snapshots.last().unwrap().1;
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].pos, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn viscous_recycles_packed_ids_after_release() {
        let events = vec![
            ev(1.0, 5, TouchAction::Down, 1.0, 1.0),
            ev(1.01, 5, TouchAction::Up, 1.0, 1.0),
            ev(1.02, 9, TouchAction::Down, 2.0, 2.0),
        ];
        let frames = build_timeline(&events);
        let snapshots = viscous(&frames);
        let last_down = snapshots.iter().rev().find(|(_, s)| !s.is_empty()).unwrap();
        assert_eq!(last_down.1[0].packed_id, 0);
    }

    #[test]
    fn json_export_round_trips_frame_count() {
        let events = vec![ev(1.0, 0, TouchAction::Down, 50.0, 50.0), ev(1.001, 0, TouchAction::Up, 50.0, 50.0)];
        let frames = build_timeline(&events);
        let json = to_json(&frames).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}
