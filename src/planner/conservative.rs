//! Conservative planner ("algo1"): per-line pointer recycling. Each judge
//! line owns its own pointer pool; successive DRAG/HOLD notes on the same
//! line share a pointer rather than releasing and re-acquiring one.

use crate::chart::{Chart, NoteType};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::screen::ScreenUtil;

use super::{chains, note_gesture, validate_note, MicroEvent, PointerFreeList, TouchAction};

/// Plan a chart with the conservative, per-line algorithm. Fails outright
/// the moment any single line's pointer pool is exhausted — `max_pointers`
/// is the cap for each line's own pool, not shared across lines.
pub fn plan(chart: &Chart, config: &PlannerConfig) -> Result<Vec<MicroEvent>, PlanError> {
    let screen = ScreenUtil::new(chart.width, chart.height);
    let mut events = Vec::new();

    for line in &chart.lines {
        let mut pool = PointerFreeList::new(config.max_pointers);
        let mut held_pointer: Option<u32> = None;
        let mut prev_kind: Option<NoteType> = None;

        for (note_index, note) in line.notes.iter().enumerate() {
            validate_note(note, note_index, line.id)?;

            let continues_from_prev = held_pointer.is_some()
                && prev_kind.is_some_and(|prev| chains(prev, note.kind));
            let continues_to_next = line
                .notes
                .get(note_index + 1)
                .is_some_and(|next| chains(note.kind, next.kind));

            let gesture = note_gesture(note, line, config, &screen);

            let pointer = if continues_from_prev {
                held_pointer.unwrap()
            } else {
                pool.acquire(gesture.down_t).ok_or(PlanError::PointerExhausted { note_index, line_id: line.id })?
            };

            if !continues_from_prev {
                events.push(MicroEvent {
                    t_seconds: gesture.down_t,
                    pointer_id: pointer,
                    action: TouchAction::Down,
                    pos: gesture.down_pos,
                });
            }
            for (t, pos) in &gesture.moves {
                events.push(MicroEvent { t_seconds: *t, pointer_id: pointer, action: TouchAction::Move, pos: *pos });
            }

            if continues_to_next {
                held_pointer = Some(pointer);
            } else {
                events.push(MicroEvent {
                    t_seconds: gesture.up_t,
                    pointer_id: pointer,
                    action: TouchAction::Up,
                    pos: gesture.up_pos,
                });
                pool.release(pointer, gesture.up_t);
                held_pointer = None;
            }

            prev_kind = Some(note.kind);
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bamboo::{LivingTrack, Track};
    use crate::chart::{JudgeLine, Note, PositionSource};
    use crate::easing::EasingFn;
    use crate::geometry::Vec2;
    use std::rc::Rc;

    fn centered_line(id: u32, notes: Vec<Note>) -> JudgeLine {
        let mut pos = LivingTrack::new();
        pos.cut(0.0, Vec2::new(50.0, 50.0), Some(EasingFn::Linear));
        let mut rot = LivingTrack::new();
        rot.cut(0.0, 0.0, Some(EasingFn::Linear));
        JudgeLine::new(
            id,
            PositionSource::Direct(Track::Living(pos)),
            Track::Living(rot),
            notes,
            Rc::from(vec![crate::chart::BpmPoint { t_seconds: 0.0, bps: 2.0 }]),
        )
    }

    #[test]
    fn single_tap_emits_down_then_up() {
        let chart = Chart::new(100, 100, vec![centered_line(0, vec![Note::tap(1.0, 0.0, true)])]);
        let config = PlannerConfig::default();
        let events = plan(&chart, &config).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, TouchAction::Down);
        assert_eq!(events[0].t_seconds, 1.0);
        assert_eq!(events[0].pos, Vec2::new(50.0, 50.0));
        assert_eq!(events[1].action, TouchAction::Up);
        assert!((events[1].t_seconds - 1.001).abs() < 1e-9);
    }

    #[test]
    fn hold_emits_down_moves_up_on_one_pointer() {
        let chart = Chart::new(
            100,
            100,
            vec![centered_line(0, vec![Note::hold(1.0, 0.5, 0.0, true)])],
        );
        let config = PlannerConfig { sample_delay_ms: 100, ..Default::default() };
        let events = plan(&chart, &config).unwrap();
        assert_eq!(events[0].action, TouchAction::Down);
        assert_eq!(events.last().unwrap().action, TouchAction::Up);
        let pointer = events[0].pointer_id;
        assert!(events.iter().all(|e| e.pointer_id == pointer));
    }

    #[test]
    fn successive_drags_share_one_pointer() {
        let notes = vec![Note::drag(1.0, 0.0, true), Note::drag(1.1, 5.0, true)];
        let chart = Chart::new(100, 100, vec![centered_line(0, notes)]);
        let config = PlannerConfig::default();
        let events = plan(&chart, &config).unwrap();
        let downs = events.iter().filter(|e| e.action == TouchAction::Down).count();
        let ups = events.iter().filter(|e| e.action == TouchAction::Up).count();
        assert_eq!(downs, 1);
        assert_eq!(ups, 1);
    }

    #[test]
    fn two_lines_get_distinct_pointer_pools() {
        let chart = Chart::new(
            100,
            100,
            vec![
                centered_line(0, vec![Note::tap(1.0, 0.0, true)]),
                centered_line(1, vec![Note::tap(1.0, 0.0, true)]),
            ],
        );
        let config = PlannerConfig::default();
        let events = plan(&chart, &config).unwrap();
        let downs: Vec<u32> = events
            .iter()
            .filter(|e| e.action == TouchAction::Down)
            .map(|e| e.pointer_id)
            .collect();
        assert_eq!(downs, vec![0, 0]);
    }

    #[test]
    fn pointer_exhaustion_is_reported_with_note_index() {
        let notes: Vec<Note> = (0..11).map(|_| Note::tap(1.0, 0.0, true)).collect();
        let chart = Chart::new(100, 100, vec![centered_line(0, notes)]);
        let config = PlannerConfig { max_pointers: 10, ..Default::default() };
        let err = plan(&chart, &config).unwrap_err();
        match err {
            PlanError::PointerExhausted { note_index, line_id } => {
                assert_eq!(note_index, 10);
                assert_eq!(line_id, 0);
            }
            other => panic!("expected PointerExhausted, got {other:?}"),
        }
    }
}
