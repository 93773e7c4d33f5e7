//! The chart data model: judge lines whose position/rotation evolve via
//! keyframe tracks, and the notes timed against them.

use std::rc::Rc;

use crate::bamboo::{Track, TwinTrack};
use crate::geometry::{Position, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteType {
    Tap,
    Hold,
    Drag,
    Flick,
}

#[derive(Debug, Clone, Copy)]
pub struct Note {
    pub kind: NoteType,
    /// Note time, in seconds.
    pub t: f64,
    /// Hold duration in seconds; zero for Tap/Drag/Flick.
    pub duration: f64,
    pub x_offset: f64,
    pub above: bool,
}

impl Note {
    pub fn tap(t: f64, x_offset: f64, above: bool) -> Self {
        Note { kind: NoteType::Tap, t, duration: 0.0, x_offset, above }
    }

    pub fn hold(t: f64, duration: f64, x_offset: f64, above: bool) -> Self {
        Note { kind: NoteType::Hold, t, duration, x_offset, above }
    }

    pub fn drag(t: f64, x_offset: f64, above: bool) -> Self {
        Note { kind: NoteType::Drag, t, duration: 0.0, x_offset, above }
    }

    pub fn flick(t: f64, x_offset: f64, above: bool) -> Self {
        Note { kind: NoteType::Flick, t, duration: 0.0, x_offset, above }
    }

    /// The note's striking offset in line-local coordinates. The judged
    /// point always sits on the line itself (`y == 0`); `above` would
    /// negate a nonzero y-offset, but none of the four note types carry
    /// one — it is kept as a per-note flag for renderers that draw the
    /// note sprite to either side of the line.
    pub fn local_offset(&self) -> Position {
        Vec2::new(self.x_offset, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.t.is_finite() && self.duration.is_finite() && self.x_offset.is_finite()
    }
}

/// A BPM timeline sample: the beats-per-second in effect from `t_seconds`
/// onward, until the next point.
#[derive(Debug, Clone, Copy)]
pub struct BpmPoint {
    pub t_seconds: f64,
    pub bps: f64,
}

/// Either a directly-authored `Position` track, or two float tracks glued
/// together (and possibly coordinate-flipped) by a chart dialect.
pub enum PositionSource {
    Direct(Track<Position>),
    Twin(TwinTrack),
}

impl PositionSource {
    pub fn evaluate(&self, t: f64) -> Position {
        match self {
            PositionSource::Direct(track) => track.evaluate(t),
            PositionSource::Twin(twin) => twin.evaluate(t),
        }
    }
}

impl std::fmt::Debug for PositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSource::Direct(_) => write!(f, "PositionSource::Direct"),
            PositionSource::Twin(t) => write!(f, "PositionSource::Twin({t:?})"),
        }
    }
}

#[derive(Debug)]
pub struct JudgeLine {
    pub id: u32,
    pub position: PositionSource,
    pub rotation: Track<f64>,
    /// Sorted by `t` — an invariant upheld at construction, never
    /// re-checked per note.
    pub notes: Vec<Note>,
    bpm_schedule: Rc<[BpmPoint]>,
}

impl JudgeLine {
    pub fn new(
        id: u32,
        position: PositionSource,
        rotation: Track<f64>,
        mut notes: Vec<Note>,
        bpm_schedule: Rc<[BpmPoint]>,
    ) -> Self {
        notes.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        JudgeLine { id, position, rotation, notes, bpm_schedule }
    }

    /// The on-screen striking position of a point `offset` from the line's
    /// local origin, at time `t`.
    pub fn pos(&self, t: f64, offset: Position) -> Position {
        let base = self.position.evaluate(t);
        let angle = self.rotation.evaluate(t);
        base + offset.rotate(angle)
    }

    /// The tangent direction of the line at `t` (angle `rotation(t)`,
    /// pointing along the line's local x axis).
    pub fn tangent(&self, t: f64) -> Position {
        Vec2::new(1.0, 0.0).rotate(self.rotation.evaluate(t))
    }

    /// The current beat length in seconds, needed for hold/drag sampling.
    pub fn beat_duration(&self, t: f64) -> f64 {
        let bps = self
            .bpm_schedule
            .iter()
            .rev()
            .find(|p| p.t_seconds <= t)
            .map(|p| p.bps)
            .unwrap_or_else(|| self.bpm_schedule.first().map(|p| p.bps).unwrap_or(1.0));
        if bps <= 0.0 {
            f64::INFINITY
        } else {
            1.0 / bps
        }
    }
}

#[derive(Debug)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<JudgeLine>,
}

impl Chart {
    pub fn new(width: u32, height: u32, lines: Vec<JudgeLine>) -> Self {
        Chart { width, height, lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bamboo::LivingTrack;
    use crate::easing::EasingFn;

    fn fixed_schedule() -> Rc<[BpmPoint]> {
        Rc::from(vec![BpmPoint { t_seconds: 0.0, bps: 2.0 }])
    }

    fn centered_line() -> JudgeLine {
        let mut pos_track = LivingTrack::new();
        pos_track.cut(0.0, Vec2::new(50.0, 50.0), Some(EasingFn::Linear));
        let mut rot_track = LivingTrack::new();
        rot_track.cut(0.0, 0.0, Some(EasingFn::Linear));
        JudgeLine::new(
            0,
            PositionSource::Direct(Track::Living(pos_track)),
            Track::Living(rot_track),
            vec![Note::tap(1.0, 0.0, true)],
            fixed_schedule(),
        )
    }

    #[test]
    fn pos_combines_translation_and_rotation() {
        let line = centered_line();
        let p = line.pos(0.0, Vec2::new(10.0, 0.0));
        assert_eq!(p, Vec2::new(60.0, 50.0));
    }

    #[test]
    fn beat_duration_is_reciprocal_of_bps() {
        let line = centered_line();
        assert!((line.beat_duration(5.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn notes_are_kept_sorted_by_time() {
        let mut pos_track = LivingTrack::new();
        pos_track.cut(0.0, Vec2::ZERO, Some(EasingFn::Linear));
        let mut rot_track = LivingTrack::new();
        rot_track.cut(0.0, 0.0, Some(EasingFn::Linear));
        let line = JudgeLine::new(
            0,
            PositionSource::Direct(Track::Living(pos_track)),
            Track::Living(rot_track),
            vec![Note::tap(2.0, 0.0, true), Note::tap(1.0, 0.0, true)],
            fixed_schedule(),
        );
        assert_eq!(line.notes[0].t, 1.0);
        assert_eq!(line.notes[1].t, 2.0);
    }
}
