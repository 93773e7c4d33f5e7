//! Named interpolation functions `[0,1] -> [0,1]`, plus `LVALUE`, the
//! left-constant step a track joint uses to mean "hold previous value until
//! the next joint."

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EasingFn {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    /// Hold the previous joint's value until `t` reaches 1.
    LValue,
}

const BACK_C1: f64 = 1.70158;

impl EasingFn {
    /// Evaluate the easing at `t`. Callers are expected to pass `t` already
    /// clamped to `[0,1]`; values outside that range extrapolate the same
    /// formula rather than panicking, since a track only ever calls this
    /// with a fraction it computed itself.
    pub fn eval(self, t: f64) -> f64 {
        use EasingFn::*;
        match self {
            Linear => t,
            QuadIn => t * t,
            QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            CubicIn => t * t * t,
            CubicOut => 1.0 - (1.0 - t).powi(3),
            CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            QuartIn => t.powi(4),
            QuartOut => 1.0 - (1.0 - t).powi(4),
            QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            QuintIn => t.powi(5),
            QuintOut => 1.0 - (1.0 - t).powi(5),
            QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            SineIn => 1.0 - (t * PI / 2.0).cos(),
            SineOut => (t * PI / 2.0).sin(),
            SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0f64.powf(10.0 * t - 10.0)
                }
            }
            ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0f64.powf(-10.0 * t)
                }
            }
            ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            CircIn => 1.0 - (1.0 - t * t).sqrt(),
            CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            BackIn => (BACK_C1 + 1.0) * t * t * t - BACK_C1 * t * t,
            BackOut => {
                1.0 + (BACK_C1 + 1.0) * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            BackInOut => {
                let c2 = BACK_C1 * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            ElasticIn => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c4 = 2.0 * PI / 3.0;
                    -(2.0f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
                }
            }
            ElasticOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c4 = 2.0 * PI / 3.0;
                    2.0f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            ElasticInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c5 = 2.0 * PI / 4.5;
                    if t < 0.5 {
                        -(2.0f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                    } else {
                        (2.0f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                            + 1.0
                    }
                }
            }
            BounceIn => 1.0 - Self::bounce_out(1.0 - t),
            BounceOut => Self::bounce_out(t),
            BounceInOut => {
                if t < 0.5 {
                    (1.0 - Self::bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + Self::bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            LValue => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    fn bounce_out(t: f64) -> f64 {
        const N1: f64 = 7.5625;
        const D1: f64 = 2.75;
        if t < 1.0 / D1 {
            N1 * t * t
        } else if t < 2.0 / D1 {
            let t = t - 1.5 / D1;
            N1 * t * t + 0.75
        } else if t < 2.5 / D1 {
            let t = t - 2.25 / D1;
            N1 * t * t + 0.9375
        } else {
            let t = t - 2.625 / D1;
            N1 * t * t + 0.984375
        }
    }

    /// Stand-in mapping from a chart-dialect easing id to an [`EasingFn`],
    /// in category order (linear, then each named family's in/out/in-out
    /// triple, then bounce). The literal historical id table used by a
    /// given chart dialect's parser lives outside this core; see
    /// DESIGN.md.
    pub fn from_rpe_id(id: u8) -> Option<EasingFn> {
        use EasingFn::*;
        const TABLE: [EasingFn; 31] = [
            Linear, QuadIn, QuadOut, QuadInOut, CubicIn, CubicOut, CubicInOut, QuartIn, QuartOut,
            QuartInOut, QuintIn, QuintOut, QuintInOut, SineIn, SineOut, SineInOut, ExpoIn,
            ExpoOut, ExpoInOut, CircIn, CircOut, CircInOut, BackIn, BackOut, BackInOut,
            ElasticIn, ElasticOut, ElasticInOut, BounceIn, BounceOut, BounceInOut,
        ];
        TABLE.get(id as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        assert_eq!(EasingFn::Linear.eval(0.5), 0.5);
    }

    #[test]
    fn lvalue_holds_until_one() {
        assert_eq!(EasingFn::LValue.eval(0.0), 0.0);
        assert_eq!(EasingFn::LValue.eval(0.5), 0.0);
        assert_eq!(EasingFn::LValue.eval(0.999), 0.0);
        assert_eq!(EasingFn::LValue.eval(1.0), 1.0);
    }

    #[test]
    fn all_named_easings_are_total_on_unit_interval() {
        let all = [
            EasingFn::Linear,
            EasingFn::QuadIn,
            EasingFn::QuadOut,
            EasingFn::QuadInOut,
            EasingFn::CubicIn,
            EasingFn::CubicOut,
            EasingFn::CubicInOut,
            EasingFn::QuartIn,
            EasingFn::QuartOut,
            EasingFn::QuartInOut,
            EasingFn::QuintIn,
            EasingFn::QuintOut,
            EasingFn::QuintInOut,
            EasingFn::SineIn,
            EasingFn::SineOut,
            EasingFn::SineInOut,
            EasingFn::ExpoIn,
            EasingFn::ExpoOut,
            EasingFn::ExpoInOut,
            EasingFn::CircIn,
            EasingFn::CircOut,
            EasingFn::CircInOut,
            EasingFn::BackIn,
            EasingFn::BackOut,
            EasingFn::BackInOut,
            EasingFn::ElasticIn,
            EasingFn::ElasticOut,
            EasingFn::ElasticInOut,
            EasingFn::BounceIn,
            EasingFn::BounceOut,
            EasingFn::BounceInOut,
        ];
        for e in all {
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                assert!(e.eval(t).is_finite(), "{e:?} at {t} was not finite");
            }
        }
    }

    #[test]
    fn monotone_families_are_monotone() {
        let monotone = [
            EasingFn::Linear,
            EasingFn::QuadIn,
            EasingFn::QuadOut,
            EasingFn::CubicIn,
            EasingFn::CubicOut,
            EasingFn::SineIn,
            EasingFn::SineOut,
            EasingFn::ExpoIn,
            EasingFn::ExpoOut,
            EasingFn::CircIn,
            EasingFn::CircOut,
        ];
        for e in monotone {
            let mut prev = e.eval(0.0);
            for i in 1..=20 {
                let t = i as f64 / 20.0;
                let v = e.eval(t);
                assert!(v + 1e-9 >= prev, "{e:?} not monotone at {t}: {prev} -> {v}");
                prev = v;
            }
        }
    }

    #[test]
    fn from_rpe_id_round_trips_linear() {
        assert_eq!(EasingFn::from_rpe_id(0), Some(EasingFn::Linear));
    }
}
