//! Keyframe tracks ("bamboo"): lazy time -> value interpolation with
//! insertion, segment insertion, and composition. Ported joint-for-joint
//! from `original_source/bamboo.py`, with the `LivingBamboo::embed` overlap
//! question resolved per spec.md (reject, don't silently merge).

use crate::easing::EasingFn;
use crate::geometry::Vec2;

/// Values a track can hold: must support `T+T`, `T-T`, `T*scalar`.
pub trait Interp: Copy {
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn scale(self, s: f64) -> Self;
    fn zero() -> Self;
}

impl Interp for f64 {
    fn add(self, other: f64) -> f64 {
        self + other
    }
    fn sub(self, other: f64) -> f64 {
        self - other
    }
    fn scale(self, s: f64) -> f64 {
        self * s
    }
    fn zero() -> f64 {
        0.0
    }
}

impl Interp for Vec2 {
    fn add(self, other: Vec2) -> Vec2 {
        self + other
    }
    fn sub(self, other: Vec2) -> Vec2 {
        self - other
    }
    fn scale(self, s: f64) -> Vec2 {
        self * s
    }
    fn zero() -> Vec2 {
        Vec2::ZERO
    }
}

/// `math.isclose` with Python's default tolerances (`rel_tol=1e-9`,
/// `abs_tol=0.0`), since joint-timestamp merging depends on matching that
/// exactly (spec.md Open Question 1).
pub fn equal(a: f64, b: f64) -> bool {
    const REL_TOL: f64 = 1e-9;
    (a - b).abs() <= REL_TOL * a.abs().max(b.abs())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackError {
    InvalidSegment { start: f64, end: f64 },
    OverlappingEmbed { start: f64, end: f64 },
    EmptyTrack,
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackError::InvalidSegment { start, end } => {
                write!(f, "segment [{start}, {end}] is not start < end")
            }
            TrackError::OverlappingEmbed { start, end } => {
                write!(f, "embed [{start}, {end}] overlaps an existing joint")
            }
            TrackError::EmptyTrack => write!(f, "cannot embed into a track with no joints"),
        }
    }
}

impl std::error::Error for TrackError {}

/// A coarser, segment-addressed track: `cut` always appends a whole
/// `(start, end, start_value, end_value)` segment rather than a single
/// joint. Kept alongside `LivingBamboo` as one of the tagged-sum track
/// variants (spec.md Design Note 9), ported from
/// `original_source/bamboo.py::BrokenBamboo`.
#[derive(Debug, Clone)]
pub struct BrokenTrack<T: Interp> {
    segments: Vec<(f64, f64, T, T)>,
}

impl<T: Interp> Default for BrokenTrack<T> {
    fn default() -> Self {
        BrokenTrack { segments: Vec::new() }
    }
}

impl<T: Interp> BrokenTrack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cut(&mut self, start: f64, end: f64, start_value: T, end_value: T) {
        let pos = self.segments.partition_point(|s| s.0 < start);
        self.segments.insert(pos, (start, end, start_value, end_value));
    }

    pub fn evaluate(&self, time: f64) -> T {
        debug_assert!(!self.segments.is_empty(), "TrackOutOfDomain: empty BrokenTrack");
        let right = self.segments.partition_point(|s| s.0 < time);
        if right < self.segments.len() && equal(self.segments[right].0, time) {
            return self.segments[right].2;
        }
        let seg = &self.segments[right - 1];
        let t = (time - seg.0) / (seg.1 - seg.0);
        seg.2.add(seg.3.sub(seg.2).scale(t))
    }
}

#[derive(Debug, Clone, Copy)]
struct Joint<T> {
    t: f64,
    value: T,
    easing: EasingFn,
}

/// The primary keyframe track. An ordered sequence of joints with strictly
/// increasing (modulo `equal`) timestamps.
#[derive(Debug, Clone)]
pub struct LivingTrack<T: Interp> {
    joints: Vec<Joint<T>>,
}

impl<T: Interp> Default for LivingTrack<T> {
    fn default() -> Self {
        LivingTrack { joints: Vec::new() }
    }
}

impl<T: Interp> LivingTrack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Insert/replace the joint at `t`. An existing joint within `equal`
    /// tolerance of `t` has its value and easing overwritten in place
    /// rather than gaining a sibling.
    pub fn cut(&mut self, t: f64, value: T, easing: Option<EasingFn>) {
        let easing = easing.unwrap_or(EasingFn::LValue);
        let insert_point = self.joints.partition_point(|j| j.t < t);
        if self.joints.is_empty() {
            self.joints.push(Joint { t, value, easing });
            return;
        }
        if insert_point == self.joints.len() {
            if equal(self.joints[insert_point - 1].t, t) {
                self.joints[insert_point - 1] = Joint { t, value, easing };
                return;
            }
        } else if equal(self.joints[insert_point].t, t) {
            self.joints[insert_point] = Joint { t, value, easing };
            return;
        } else if insert_point > 0 && equal(self.joints[insert_point - 1].t, t) {
            self.joints[insert_point - 1] = Joint { t, value, easing };
            return;
        }
        self.joints.insert(insert_point, Joint { t, value, easing });
    }

    /// Insert a segment `(start, vs, easing) -> (end, end_value, prev)`
    /// where `vs` is the track's value at `start` *before* insertion.
    /// Overlapping an existing joint strictly inside `(start, end)` is
    /// rejected rather than silently merged (spec.md Open Question 2).
    pub fn embed(
        &mut self,
        start: f64,
        end: f64,
        end_value: T,
        easing: EasingFn,
    ) -> Result<(), TrackError> {
        if start.partial_cmp(&end) != Some(std::cmp::Ordering::Less) {
            return Err(TrackError::InvalidSegment { start, end });
        }
        if self.joints.is_empty() {
            return Err(TrackError::EmptyTrack);
        }
        let lo = self.joints.partition_point(|j| j.t <= start);
        let hi = self.joints.partition_point(|j| j.t < end);
        if lo != hi {
            return Err(TrackError::OverlappingEmbed { start, end });
        }

        let insert_point = self.joints.partition_point(|j| j.t < start);
        if insert_point < self.joints.len() && equal(self.joints[insert_point].t, start) {
            let left_easing = self.joints[insert_point].easing;
            self.joints[insert_point].easing = easing;
            if insert_point >= self.joints.len() - 1
                || !equal(self.joints[insert_point + 1].t, end)
            {
                self.joints
                    .insert(insert_point + 1, Joint { t: end, value: end_value, easing: left_easing });
            }
        } else if insert_point == self.joints.len() {
            let value = self.joints.last().unwrap().value;
            self.joints.push(Joint { t: start, value, easing });
            let prev_easing = self.joints[self.joints.len() - 2].easing;
            self.joints
                .push(Joint { t: end, value: end_value, easing: prev_easing });
        } else if equal(self.joints[insert_point].t, end) {
            let prev_value = self.joints[insert_point - 1].value;
            self.joints[insert_point].value = end_value;
            self.joints
                .insert(insert_point, Joint { t: start, value: prev_value, easing });
        } else {
            let left_easing = self.joints[insert_point - 1].easing;
            self.joints
                .insert(insert_point, Joint { t: end, value: end_value, easing: left_easing });
            let prev_value = self.joints[insert_point - 1].value;
            self.joints
                .insert(insert_point, Joint { t: start, value: prev_value, easing });
        }
        Ok(())
    }

    pub fn evaluate(&self, time: f64) -> T {
        debug_assert!(!self.joints.is_empty(), "TrackOutOfDomain: empty LivingTrack");
        if self.joints.is_empty() {
            return T::zero();
        }
        let right = self.joints.partition_point(|j| j.t < time);
        if right == self.joints.len() {
            return self.joints[right - 1].value;
        }
        if right == 0 || self.joints[right].t == time {
            return self.joints[right].value;
        }
        let start = self.joints[right - 1];
        let end = self.joints[right];
        let frac = start.easing.eval((time - start.t) / (end.t - start.t));
        start.value.add(end.value.sub(start.value).scale(frac))
    }
}

/// Two float tracks glued into a `Position` track, optionally post-composed
/// with a rigid transform (a chart dialect that flips coordinates, say).
pub struct TwinTrack {
    pub xs: LivingTrack<f64>,
    pub ys: LivingTrack<f64>,
    pub convert: Option<Box<dyn Fn(Vec2) -> Vec2>>,
}

impl TwinTrack {
    pub fn new(xs: LivingTrack<f64>, ys: LivingTrack<f64>) -> Self {
        TwinTrack { xs, ys, convert: None }
    }

    pub fn with_convert(xs: LivingTrack<f64>, ys: LivingTrack<f64>, convert: Box<dyn Fn(Vec2) -> Vec2>) -> Self {
        TwinTrack { xs, ys, convert: Some(convert) }
    }

    pub fn evaluate(&self, time: f64) -> Vec2 {
        let p = Vec2::new(self.xs.evaluate(time), self.ys.evaluate(time));
        match &self.convert {
            Some(f) => f(p),
            None => p,
        }
    }
}

impl std::fmt::Debug for TwinTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwinTrack")
            .field("xs_joints", &self.xs.len())
            .field("ys_joints", &self.ys.len())
            .field("has_convert", &self.convert.is_some())
            .finish()
    }
}

/// Pointwise sum of several tracks, folded with a zero.
#[derive(Debug)]
pub struct GroveTrack<T: Interp> {
    pub tracks: Vec<Track<T>>,
}

impl<T: Interp> GroveTrack<T> {
    pub fn new(tracks: Vec<Track<T>>) -> Self {
        GroveTrack { tracks }
    }

    pub fn evaluate(&self, time: f64) -> T {
        self.tracks
            .iter()
            .fold(T::zero(), |acc, t| acc.add(t.evaluate(time)))
    }
}

/// The tagged sum of track kinds named in spec.md Design Note 9, generic
/// over `T`. `TwinBamboo` composes two `Track<f64>` into a `Position` and so
/// lives outside this enum (see [`TwinTrack`]), exactly as
/// `original_source/bamboo.py` keeps `TwinBamboo` as its own class rather
/// than a member of the `Bamboo[T]` union.
#[derive(Debug)]
pub enum Track<T: Interp> {
    Broken(BrokenTrack<T>),
    Living(LivingTrack<T>),
    Grove(GroveTrack<T>),
    Shoot(T),
}

impl<T: Interp> Track<T> {
    pub fn evaluate(&self, time: f64) -> T {
        match self {
            Track::Broken(t) => t.evaluate(time),
            Track::Living(t) => t.evaluate(time),
            Track::Grove(t) => t.evaluate(time),
            Track::Shoot(v) => *v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_track(a: f64, b: f64) -> LivingTrack<f64> {
        let mut t = LivingTrack::new();
        t.cut(0.0, a, Some(EasingFn::Linear));
        t.cut(1.0, b, Some(EasingFn::Linear));
        t
    }

    #[test]
    fn linear_track_midpoint() {
        let t = linear_track(0.0, 1.0);
        assert_eq!(t.evaluate(0.5), 0.5);
    }

    #[test]
    fn broken_track_interpolates_within_a_segment() {
        let mut t = BrokenTrack::new();
        t.cut(0.0, 1.0, 0.0, 10.0);
        assert_eq!(t.evaluate(0.0), 0.0);
        assert_eq!(t.evaluate(1.0), 10.0);
        assert_eq!(t.evaluate(0.5), 5.0);
    }

    #[test]
    fn broken_track_picks_the_right_segment_across_boundaries() {
        let mut t = BrokenTrack::new();
        t.cut(0.0, 1.0, 0.0, 10.0);
        t.cut(1.0, 2.0, 10.0, 20.0);
        assert_eq!(t.evaluate(1.0), 10.0);
        assert_eq!(t.evaluate(1.5), 15.0);
    }

    #[test]
    fn lvalue_track_holds() {
        let mut t = LivingTrack::new();
        t.cut(0.0, 0.0, Some(EasingFn::LValue));
        t.cut(1.0, 1.0, Some(EasingFn::LValue));
        assert_eq!(t.evaluate(0.5), 0.0);
    }

    #[test]
    fn clamps_outside_extremes() {
        let t = linear_track(0.0, 1.0);
        assert_eq!(t.evaluate(-5.0), 0.0);
        assert_eq!(t.evaluate(5.0), 1.0);
    }

    #[test]
    fn idempotent_cut_does_not_grow_track() {
        let mut t = LivingTrack::new();
        t.cut(1.0, 1.0, None);
        t.cut(1.0, 2.0, None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.evaluate(1.0), 2.0);
    }

    #[test]
    fn cut_merges_within_isclose_tolerance() {
        let mut t = LivingTrack::new();
        t.cut(1.0, 1.0, None);
        t.cut(1.0 + 1e-12, 2.0, None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn embed_into_middle_inserts_two_joints() {
        let mut t = LivingTrack::new();
        t.cut(0.0, 0.0, Some(EasingFn::Linear));
        t.cut(10.0, 10.0, Some(EasingFn::Linear));
        t.embed(2.0, 4.0, 100.0, EasingFn::Linear).unwrap();
        assert_eq!(t.len(), 4);
        // The inherited start value is the preceding joint's raw value
        // (0.0 at t=0), not the interpolated value at t=2 — this matches
        // original_source/bamboo.py::LivingBamboo.embed exactly.
        assert_eq!(t.evaluate(2.0), 0.0);
        assert_eq!(t.evaluate(4.0), 100.0);
    }

    #[test]
    fn embed_rejects_overlap() {
        let mut t = LivingTrack::new();
        t.cut(0.0, 0.0, Some(EasingFn::Linear));
        t.cut(5.0, 5.0, Some(EasingFn::Linear));
        t.cut(10.0, 10.0, Some(EasingFn::Linear));
        let err = t.embed(1.0, 8.0, 1.0, EasingFn::Linear).unwrap_err();
        assert_eq!(err, TrackError::OverlappingEmbed { start: 1.0, end: 8.0 });
    }

    #[test]
    fn embed_at_existing_start_overwrites_easing_only() {
        let mut t = LivingTrack::new();
        t.cut(0.0, 0.0, Some(EasingFn::Linear));
        t.cut(5.0, 5.0, Some(EasingFn::SineIn));
        t.embed(5.0, 8.0, 80.0, EasingFn::CubicOut).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.evaluate(5.0), 5.0); // value preserved at the overwritten start
        assert_eq!(t.evaluate(8.0), 80.0);
    }

    #[test]
    fn embed_at_existing_end_overwrites_value() {
        let mut t = LivingTrack::new();
        t.cut(0.0, 0.0, Some(EasingFn::Linear));
        t.cut(10.0, 999.0, Some(EasingFn::Linear));
        t.embed(2.0, 10.0, 42.0, EasingFn::Linear).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.evaluate(10.0), 42.0);
    }

    #[test]
    fn grove_sums_sub_tracks() {
        let g = GroveTrack::new(vec![
            Track::Living(linear_track(0.0, 10.0)),
            Track::Shoot(1.0),
        ]);
        assert_eq!(g.evaluate(0.5), 6.0);
    }

    #[test]
    fn twin_track_composes_position() {
        let twin = TwinTrack::new(linear_track(0.0, 10.0), linear_track(0.0, 20.0));
        let p = twin.evaluate(0.5);
        assert_eq!(p, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn twin_track_applies_convert() {
        let twin = TwinTrack::with_convert(
            linear_track(0.0, 10.0),
            linear_track(0.0, 20.0),
            Box::new(|p| Vec2::new(p.x, -p.y)),
        );
        assert_eq!(twin.evaluate(1.0), Vec2::new(10.0, -20.0));
    }
}
