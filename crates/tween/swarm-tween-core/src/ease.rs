//! Easing curves.
//!
//! Every curve takes the elapsed time `t` and the duration `d` (both in
//! seconds) and returns the eased fraction. Most curves map `[0, d]` onto
//! `[0, 1]`; back, elastic and punch overshoot on purpose.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

const BACK_OVERSHOOT: f32 = 1.70158;
const BACK_IN_OUT_SCALE: f32 = 1.525;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EaseType {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
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
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    Punch,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl EaseType {
    /// Every curve in table order.
    pub const ALL: [EaseType; 32] = [
        EaseType::Linear,
        EaseType::SineIn,
        EaseType::SineOut,
        EaseType::SineInOut,
        EaseType::QuadIn,
        EaseType::QuadOut,
        EaseType::QuadInOut,
        EaseType::CubicIn,
        EaseType::CubicOut,
        EaseType::CubicInOut,
        EaseType::QuartIn,
        EaseType::QuartOut,
        EaseType::QuartInOut,
        EaseType::QuintIn,
        EaseType::QuintOut,
        EaseType::QuintInOut,
        EaseType::ExpoIn,
        EaseType::ExpoOut,
        EaseType::ExpoInOut,
        EaseType::CircIn,
        EaseType::CircOut,
        EaseType::CircInOut,
        EaseType::ElasticIn,
        EaseType::ElasticOut,
        EaseType::ElasticInOut,
        EaseType::Punch,
        EaseType::BackIn,
        EaseType::BackOut,
        EaseType::BackInOut,
        EaseType::BounceIn,
        EaseType::BounceOut,
        EaseType::BounceInOut,
    ];

    /// Evaluate the curve at elapsed time `t` of duration `d`.
    pub fn evaluate(self, t: f32, d: f32) -> f32 {
        match self {
            EaseType::Linear => t / d,
            EaseType::SineIn => -(t / d * FRAC_PI_2).cos() + 1.0,
            EaseType::SineOut => (t / d * FRAC_PI_2).sin(),
            EaseType::SineInOut => -0.5 * ((PI * t / d).cos() - 1.0),
            EaseType::QuadIn => power_in(t, d, 2),
            EaseType::QuadOut => {
                let t = t / d;
                -t * (t - 2.0)
            }
            EaseType::QuadInOut => {
                let t = t / (d * 0.5);
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    let t = t - 1.0;
                    -0.5 * (t * (t - 2.0) - 1.0)
                }
            }
            EaseType::CubicIn => power_in(t, d, 3),
            EaseType::CubicOut => {
                let t = t / d - 1.0;
                t * t * t + 1.0
            }
            EaseType::CubicInOut => power_in_out(t, d, 3),
            EaseType::QuartIn => power_in(t, d, 4),
            EaseType::QuartOut => {
                let t = t / d - 1.0;
                -(t.powi(4) - 1.0)
            }
            EaseType::QuartInOut => {
                let t = t / (d * 0.5);
                if t < 1.0 {
                    0.5 * t.powi(4)
                } else {
                    let t = t - 2.0;
                    -0.5 * (t.powi(4) - 2.0)
                }
            }
            EaseType::QuintIn => power_in(t, d, 5),
            EaseType::QuintOut => {
                let t = t / d - 1.0;
                t.powi(5) + 1.0
            }
            EaseType::QuintInOut => power_in_out(t, d, 5),
            EaseType::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t / d - 1.0))
                }
            }
            EaseType::ExpoOut => {
                if t == d {
                    1.0
                } else {
                    -(2f32.powf(-10.0 * t / d)) + 1.0
                }
            }
            EaseType::ExpoInOut => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == d {
                    return 1.0;
                }
                let t = t / (d * 0.5);
                if t < 1.0 {
                    0.5 * 2f32.powf(10.0 * (t - 1.0))
                } else {
                    0.5 * (-(2f32.powf(-10.0 * (t - 1.0))) + 2.0)
                }
            }
            EaseType::CircIn => {
                let t = t / d;
                -((1.0 - t * t).sqrt() - 1.0)
            }
            EaseType::CircOut => {
                let t = t / d - 1.0;
                (1.0 - t * t).sqrt()
            }
            EaseType::CircInOut => {
                let t = t / (d * 0.5);
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
            EaseType::ElasticIn => elastic_in(t, d),
            EaseType::ElasticOut => elastic_out(t, d),
            EaseType::ElasticInOut => elastic_in_out(t, d),
            EaseType::Punch => punch(t),
            EaseType::BackIn => {
                let s = BACK_OVERSHOOT;
                let t = t / d;
                t * t * ((s + 1.0) * t - s)
            }
            EaseType::BackOut => {
                let s = BACK_OVERSHOOT;
                let t = t / d - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            EaseType::BackInOut => {
                let s = BACK_OVERSHOOT * BACK_IN_OUT_SCALE;
                let t = t / (d * 0.5);
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
            EaseType::BounceIn => bounce_in(t, d),
            EaseType::BounceOut => bounce_out(t, d),
            EaseType::BounceInOut => {
                if t < d * 0.5 {
                    bounce_in(t * 2.0, d) * 0.5
                } else {
                    bounce_out(t * 2.0 - d, d) * 0.5 + 0.5
                }
            }
        }
    }
}

#[inline]
fn power_in(t: f32, d: f32, n: i32) -> f32 {
    (t / d).powi(n)
}

/// Odd-power in-out (cubic, quint): mirrored halves meeting at 0.5.
#[inline]
fn power_in_out(t: f32, d: f32, n: i32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        0.5 * t.powi(n)
    } else {
        0.5 * ((t - 2.0).powi(n) + 2.0)
    }
}

fn bounce_out(t: f32, d: f32) -> f32 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

#[inline]
fn bounce_in(t: f32, d: f32) -> f32 {
    1.0 - bounce_out(d - t, d)
}

fn elastic_in(t: f32, d: f32) -> f32 {
    if t == 0.0 {
        return 0.0;
    }
    let t = t / d;
    if t == 1.0 {
        return 1.0;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    let t = t - 1.0;
    -(2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin())
}

fn elastic_out(t: f32, d: f32) -> f32 {
    if t == 0.0 {
        return 0.0;
    }
    let t = t / d;
    if t == 1.0 {
        return 1.0;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() + 1.0
}

fn elastic_in_out(t: f32, d: f32) -> f32 {
    if t == 0.0 {
        return 0.0;
    }
    let t = t / (d * 0.5);
    if t == 2.0 {
        return 1.0;
    }
    let p = d * (0.3 * 1.5);
    let s = p / 4.0;
    let t = t - 1.0;
    if t < 0.0 {
        -0.5 * (2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin())
    } else {
        2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() * 0.5 + 1.0
    }
}

/// Decaying oscillation around zero; works on raw seconds, not the normalized time.
fn punch(t: f32) -> f32 {
    if t == 0.0 {
        return 0.0;
    }
    let p = 0.3;
    2f32.powf(-10.0 * t) * (t * TAU / p).sin()
}
